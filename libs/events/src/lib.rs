//! # cafe-events
//!
//! In-process publish/subscribe for the café console.
//!
//! ## Design Principles
//!
//! - One bus per running application, created at startup and passed to
//!   producers (the HTTP client) and consumers (the notification center)
//! - Delivery is synchronous, on the publisher's thread, in registration order
//! - No buffering: a handler only sees events published after it subscribed
//!
//! ## Event Names
//!
//! - `api:success` - a write request (POST/PUT/DELETE) succeeded
//! - `api:error` - any request failed; payload is the normalized message
//! - `app:info`, `app:warning` - ad hoc messages from the front end

mod bus;
mod types;

pub use bus::*;
pub use types::*;
