//! Product records and inputs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

impl ProductRecord {
    /// Case-insensitive word match over name and description, used by the in-memory store.
    /// Terms are compared verbatim, without stemming.
    pub fn matches_text(&self, search: &str) -> bool {
        let haystack = format!(
            "{} {}",
            self.name.to_lowercase(),
            self.description.as_deref().unwrap_or("").to_lowercase()
        );
        let words: Vec<&str> = haystack
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        search
            .split_whitespace()
            .map(str::to_lowercase)
            .any(|term| words.iter().any(|w| *w == term))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    #[validate(length(min = 1))]
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl UpdateProductInput {
    pub fn apply(self, product: &mut ProductRecord) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if self.description.is_some() {
            product.description = self.description;
        }
    }
}
