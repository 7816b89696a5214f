use crate::domain::entities::market_asset::MarketAsset;
use crate::domain::value_objects::price::{string_or_number, Price};
use crate::domain::value_objects::profit_rate::ProfitRate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted position attached to a trading log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryAsset {
    pub id: i64,
    pub diary_id: i64,
    pub asset_id: i64,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    #[serde(deserialize_with = "string_or_number")]
    pub buy_price: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A position typed by the user, not yet persisted.
///
/// `asset_id` is derived from `ticker` and must only be set through
/// re-resolution against the market asset registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiaryAssetDraft {
    pub asset_id: Option<i64>,
    pub ticker: String,
    pub amount: String,
    pub buy_price: String,
}

impl DiaryAssetDraft {
    pub fn is_resolved(&self) -> bool {
        self.asset_id.is_some()
    }
}

/// Request body for `POST /diary_assets.json` (wrapped in `{"diary_asset": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDiaryAsset {
    pub diary_id: i64,
    pub asset_id: i64,
    pub amount: String,
    pub buy_price: String,
}

/// An attached position evaluated against the current market price.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionView {
    pub diary_asset_id: i64,
    pub asset_name: String,
    pub amount: String,
    pub purchase_price: Price,
    pub current_price: Price,
    pub profit_rate: ProfitRate,
}

impl PositionView {
    /// `market` is `None` when the registry does not know the asset; the
    /// current price and rate are then NaN.
    pub fn evaluate(asset: &DiaryAsset, market: Option<&MarketAsset>) -> Self {
        let purchase_price = Price::parse(&asset.buy_price);
        let current_price = Price::from_optional(market.map(|m| m.price.as_str()));

        Self {
            diary_asset_id: asset.id,
            asset_name: market.map(|m| m.name.clone()).unwrap_or_default(),
            amount: asset.amount.clone(),
            purchase_price,
            current_price,
            profit_rate: ProfitRate::compute(current_price, purchase_price),
        }
    }
}
