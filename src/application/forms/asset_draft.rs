use crate::application::services::asset_registry::MarketAssetRegistry;
use crate::domain::entities::diary_asset::DiaryAssetDraft;

/// Editable column of a draft row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Ticker,
    Amount,
    BuyPrice,
}

/// Table of positions being typed in. Always holds at least one row.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDraftTable {
    rows: Vec<DiaryAssetDraft>,
}

impl Default for AssetDraftTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetDraftTable {
    pub fn new() -> Self {
        Self {
            rows: vec![DiaryAssetDraft::default()],
        }
    }

    pub fn rows(&self) -> &[DiaryAssetDraft] {
        &self.rows
    }

    pub fn first(&self) -> &DiaryAssetDraft {
        &self.rows[0]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| *row == DiaryAssetDraft::default())
    }

    pub fn push_empty_row(&mut self) {
        self.rows.push(DiaryAssetDraft::default());
    }

    /// Update one cell and re-derive the row's `asset_id` from its ticker.
    ///
    /// Returns false when `index` is out of range.
    pub fn set_field(
        &mut self,
        index: usize,
        field: DraftField,
        value: &str,
        registry: &MarketAssetRegistry,
    ) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        match field {
            DraftField::Ticker => row.ticker = value.to_string(),
            DraftField::Amount => row.amount = value.to_string(),
            DraftField::BuyPrice => row.buy_price = value.to_string(),
        }
        row.asset_id = registry.resolve_ticker(&row.ticker);
        true
    }

    /// Rows whose ticker resolved to a market asset, with that asset's id.
    pub fn resolved_rows(&self) -> impl Iterator<Item = (&DiaryAssetDraft, i64)> {
        self.rows
            .iter()
            .filter_map(|row| row.asset_id.map(|asset_id| (row, asset_id)))
    }

    /// Back to a single empty row.
    pub fn reset(&mut self) {
        self.rows = vec![DiaryAssetDraft::default()];
    }
}
