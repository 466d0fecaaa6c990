use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::CliError;

/// News article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
}

/// Body for creating or updating an article.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsInput {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// `/news`.
#[derive(Debug, Clone, Copy)]
pub struct NewsService<'a> {
    client: &'a ApiClient,
}

impl<'a> NewsService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(self) -> Result<Vec<News>, CliError> {
        self.client.get_json("/news").await
    }

    pub async fn get(self, id: i64) -> Result<News, CliError> {
        self.client.get_json(&format!("/news/{id}")).await
    }

    pub async fn create(self, input: &NewsInput) -> Result<News, CliError> {
        self.client.post_json("/news", input).await
    }

    pub async fn update(self, id: i64, input: &NewsInput) -> Result<News, CliError> {
        self.client.put_json(&format!("/news/{id}"), input).await
    }

    pub async fn delete(self, id: i64) -> Result<(), CliError> {
        self.client.delete(&format!("/news/{id}")).await?;
        Ok(())
    }
}
