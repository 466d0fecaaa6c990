use serde::Serialize;

use crate::client::ApiClient;
use crate::error::CliError;

use super::{CategoryService, ProductService, ReservationService};

/// Content counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub products: usize,
    pub categories: usize,
    pub reservations: usize,
}

impl DashboardCounts {
    /// Fetch the three lists concurrently.
    ///
    /// Every request runs to completion even when another fails, so each
    /// failure publishes its own `api:error`. The first error is returned.
    pub async fn load(client: &ApiClient) -> Result<Self, CliError> {
        let (products, categories, reservations) = tokio::join!(
            ProductService::new(client).list(),
            CategoryService::new(client).list(),
            ReservationService::new(client).list(),
        );

        Ok(Self {
            products: products?.len(),
            categories: categories?.len(),
            reservations: reservations?.len(),
        })
    }
}
