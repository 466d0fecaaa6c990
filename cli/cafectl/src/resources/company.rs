use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::CliError;

/// Single company-wide setting: the shop's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyConfig {
    pub name: String,
}

/// `/config`.
#[derive(Debug, Clone, Copy)]
pub struct CompanyService<'a> {
    client: &'a ApiClient,
}

impl<'a> CompanyService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(self) -> Result<CompanyConfig, CliError> {
        self.client.get_json("/config").await
    }

    pub async fn update(self, config: &CompanyConfig) -> Result<CompanyConfig, CliError> {
        self.client.put_json("/config", config).await
    }
}
