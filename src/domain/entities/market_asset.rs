use crate::domain::value_objects::price::{string_or_number, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog entry for a tradable instrument, as served by `/assets.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAsset {
    pub id: i64,
    pub name: String,
    pub ticker: String,
    #[serde(deserialize_with = "string_or_number")]
    pub price: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MarketAsset {
    pub fn new(id: i64, name: &str, ticker: &str, price: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            ticker: ticker.to_string(),
            price: price.to_string(),
            url: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn current_price(&self) -> Price {
        Price::parse(&self.price)
    }
}
