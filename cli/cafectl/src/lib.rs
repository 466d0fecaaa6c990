//! cafectl - storefront and admin console for the café backend.
//!
//! The library holds the client layer (session, transport, API client,
//! auth, route guard, notifications) and the command tree; the `cafe`
//! binary only parses arguments and installs logging.

pub mod auth;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod guard;
pub mod notifications;
pub mod output;
pub mod resources;
pub mod session;
pub mod transport;
