use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::CliError;

/// Menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Body for creating or renaming a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInput {
    pub name: String,
}

/// `/categories`.
#[derive(Debug, Clone, Copy)]
pub struct CategoryService<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoryService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(self) -> Result<Vec<Category>, CliError> {
        self.client.get_json("/categories").await
    }

    pub async fn create(self, input: &CategoryInput) -> Result<Category, CliError> {
        self.client.post_json("/categories", input).await
    }

    pub async fn update(self, id: i64, input: &CategoryInput) -> Result<Category, CliError> {
        self.client
            .put_json(&format!("/categories/{id}"), input)
            .await
    }

    pub async fn delete(self, id: i64) -> Result<(), CliError> {
        self.client.delete(&format!("/categories/{id}")).await?;
        Ok(())
    }
}
