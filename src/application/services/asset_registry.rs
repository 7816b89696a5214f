use crate::domain::entities::market_asset::MarketAsset;
use crate::domain::errors::ApiError;
use crate::domain::repositories::journal_backend::JournalBackend;
use crate::domain::services::validation;
use std::sync::{Arc, RwLock, RwLockReadGuard};
use tracing::info;

/// Read-mostly cache of the market's tradable assets.
///
/// Cloning yields another handle on the same list. The list is replaced
/// wholesale by session initialization and read by every form and viewer
/// that needs to resolve a ticker or look up a current price.
#[derive(Debug, Clone, Default)]
pub struct MarketAssetRegistry {
    assets: Arc<RwLock<Vec<MarketAsset>>>,
}

impl MarketAssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: Vec<MarketAsset>) -> Self {
        let registry = Self::new();
        registry.replace(assets);
        registry
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<MarketAsset>> {
        self.assets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Full replace; there is no per-asset update.
    pub fn replace(&self, assets: Vec<MarketAsset>) {
        let mut guard = self
            .assets
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = assets;
    }

    /// Fetch the catalog and replace the registry with it.
    pub async fn refresh(&self, backend: &dyn JournalBackend) -> Result<usize, ApiError> {
        let assets = backend.list_market_assets().await?;
        let count = assets.len();
        self.replace(assets);
        info!("Market asset registry loaded with {} assets", count);
        Ok(count)
    }

    pub fn snapshot(&self) -> Vec<MarketAsset> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// First asset whose ticker equals `ticker` exactly.
    pub fn find_by_ticker(&self, ticker: &str) -> Option<MarketAsset> {
        self.read().iter().find(|a| a.ticker == ticker).cloned()
    }

    pub fn resolve_ticker(&self, ticker: &str) -> Option<i64> {
        self.read().iter().find(|a| a.ticker == ticker).map(|a| a.id)
    }

    pub fn find_by_id(&self, id: i64) -> Option<MarketAsset> {
        self.read().iter().find(|a| a.id == id).cloned()
    }

    pub fn tickers(&self) -> Vec<String> {
        self.read().iter().map(|a| a.ticker.clone()).collect()
    }

    /// Autocomplete candidates for a partially typed ticker.
    pub fn suggest(&self, input: &str) -> Vec<String> {
        let assets = self.read();
        validation::suggest_tickers(assets.iter().map(|a| a.ticker.as_str()), input)
    }
}
