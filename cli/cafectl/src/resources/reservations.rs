use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::CliError;

/// Table reservation submitted from the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub date: String,
    pub time: String,
    pub persons: u32,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body for a new reservation.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationInput {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub date: String,
    pub time: String,
    pub persons: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `/reservations`.
#[derive(Debug, Clone, Copy)]
pub struct ReservationService<'a> {
    client: &'a ApiClient,
}

impl<'a> ReservationService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(self) -> Result<Vec<Reservation>, CliError> {
        self.client.get_json("/reservations").await
    }

    pub async fn create(self, input: &ReservationInput) -> Result<Reservation, CliError> {
        self.client.post_json("/reservations", input).await
    }

    pub async fn delete(self, id: i64) -> Result<(), CliError> {
        self.client.delete(&format!("/reservations/{id}")).await?;
        Ok(())
    }
}
