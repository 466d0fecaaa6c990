use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::CliError;

use super::Category;

/// A product's category as the backend returns it: embedded or by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Embedded(Category),
    Id(i64),
}

impl CategoryRef {
    pub fn id(&self) -> i64 {
        match self {
            CategoryRef::Embedded(c) => c.id,
            CategoryRef::Id(id) => *id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryRef::Embedded(c) => Some(&c.name),
            CategoryRef::Id(_) => None,
        }
    }
}

/// Menu product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

/// Body for creating or updating a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// `/products`.
#[derive(Debug, Clone, Copy)]
pub struct ProductService<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(self) -> Result<Vec<Product>, CliError> {
        self.client.get_json("/products").await
    }

    pub async fn get(self, id: i64) -> Result<Product, CliError> {
        self.client.get_json(&format!("/products/{id}")).await
    }

    pub async fn by_category(self, category_id: i64) -> Result<Vec<Product>, CliError> {
        self.client
            .get_json(&format!("/products/category/{category_id}"))
            .await
    }

    pub async fn create(self, input: &ProductInput) -> Result<Product, CliError> {
        self.client.post_json("/products", input).await
    }

    pub async fn update(self, id: i64, input: &ProductInput) -> Result<Product, CliError> {
        self.client.put_json(&format!("/products/{id}"), input).await
    }

    pub async fn delete(self, id: i64) -> Result<(), CliError> {
        self.client.delete(&format!("/products/{id}")).await?;
        Ok(())
    }
}

/// Products whose category (embedded or bare id) matches `category_id`.
pub fn filter_by_category(products: Vec<Product>, category_id: i64) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| p.category.as_ref().map(CategoryRef::id) == Some(category_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn products() -> Vec<Product> {
        serde_json::from_value(json!([
            {"id": 1, "name": "Espresso", "price": 1.8, "category": {"id": 1, "name": "Café"}},
            {"id": 2, "name": "Croissant", "price": 2.5, "category": 2},
            {"id": 3, "name": "Latte", "price": 2.9, "imageUrl": "latte.jpg", "category": {"id": 1, "name": "Café"}},
            {"id": 4, "name": "Agua", "price": 1.0}
        ]))
        .unwrap()
    }

    #[test]
    fn test_category_ref_shapes() {
        let all = products();
        assert_eq!(all[0].category.as_ref().unwrap().name(), Some("Café"));
        assert_eq!(all[1].category, Some(CategoryRef::Id(2)));
        assert_eq!(all[2].image_url.as_deref(), Some("latte.jpg"));
        assert_eq!(all[3].category, None);
    }

    #[test]
    fn test_filter_by_category() {
        let coffee = filter_by_category(products(), 1);
        assert_eq!(
            coffee.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 3]
        );

        let pastries = filter_by_category(products(), 2);
        assert_eq!(pastries.len(), 1);
        assert_eq!(pastries[0].name, "Croissant");

        assert!(filter_by_category(products(), 9).is_empty());
    }

    #[test]
    fn test_product_input_wire_shape() {
        let input = ProductInput {
            name: "Mocha".to_string(),
            description: None,
            price: 3.2,
            category_id: 1,
            image_url: Some("mocha.jpg".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"name": "Mocha", "price": 3.2, "categoryId": 1, "imageUrl": "mocha.jpg"})
        );
    }
}
