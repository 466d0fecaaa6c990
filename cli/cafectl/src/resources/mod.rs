//! Typed access to the backend's REST resources.
//!
//! Each service is a thin wrapper over [`ApiClient`](crate::client::ApiClient);
//! notifications and error normalization happen there.

mod categories;
mod company;
mod dashboard;
mod news;
mod products;
mod reservations;

pub use categories::{Category, CategoryInput, CategoryService};
pub use company::{CompanyConfig, CompanyService};
pub use dashboard::DashboardCounts;
pub use news::{News, NewsInput, NewsService};
pub use products::{filter_by_category, CategoryRef, Product, ProductInput, ProductService};
pub use reservations::{Reservation, ReservationInput, ReservationService};
