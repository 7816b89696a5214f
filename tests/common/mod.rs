//! In-memory journal backend for the end-to-end tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use tradelog::domain::entities::diary_asset::{DiaryAsset, NewDiaryAsset};
use tradelog::domain::entities::market_asset::MarketAsset;
use tradelog::domain::entities::session::{Credentials, LoginOutcome, RegistrationOutcome};
use tradelog::domain::entities::trading_log::{NewTradingLog, TradingLog};
use tradelog::domain::errors::ApiError;
use tradelog::domain::repositories::journal_backend::{BackendResult, JournalBackend};

#[derive(Default)]
struct Store {
    logs: Vec<TradingLog>,
    assets: Vec<DiaryAsset>,
    market: Vec<MarketAsset>,
    calls: Vec<String>,
    failing: HashSet<&'static str>,
    next_id: i64,
}

pub struct InMemoryBackend {
    store: Mutex<Store>,
}

impl InMemoryBackend {
    pub fn new(market: Vec<MarketAsset>) -> Self {
        Self {
            store: Mutex::new(Store {
                market,
                next_id: 1000,
                ..Store::default()
            }),
        }
    }

    pub fn seed_logs(&self, logs: Vec<TradingLog>) {
        self.store.lock().unwrap().logs = logs;
    }

    pub fn fail(&self, operation: &'static str) {
        self.store.lock().unwrap().failing.insert(operation);
    }

    pub fn heal(&self, operation: &'static str) {
        self.store.lock().unwrap().failing.remove(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.store.lock().unwrap().calls.clone()
    }

    /// Calls whose name starts with `operation`, in order.
    pub fn calls_of(&self, operation: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(operation))
            .collect()
    }

    pub fn logs(&self) -> Vec<TradingLog> {
        self.store.lock().unwrap().logs.clone()
    }

    pub fn attached(&self) -> Vec<DiaryAsset> {
        self.store.lock().unwrap().assets.clone()
    }

    fn begin(&self, operation: &'static str, call: String) -> Result<std::sync::MutexGuard<'_, Store>, ApiError> {
        let mut store = self.store.lock().unwrap();
        store.calls.push(call);
        if store.failing.contains(operation) {
            return Err(ApiError::UnexpectedStatus {
                status: 500,
                body: "{\"error\":\"internal\"}".to_string(),
            });
        }
        Ok(store)
    }
}

#[async_trait]
impl JournalBackend for InMemoryBackend {
    async fn login(&self, credentials: &Credentials) -> BackendResult<LoginOutcome> {
        self.begin("login", format!("login {}", credentials.email))?;
        Ok(LoginOutcome::Rejected {
            error: Some("invalid email".to_string()),
        })
    }

    async fn register(&self, credentials: &Credentials) -> BackendResult<RegistrationOutcome> {
        self.begin("register", format!("register {}", credentials.email))?;
        Ok(RegistrationOutcome::Created)
    }

    async fn list_trading_logs(&self) -> BackendResult<Vec<TradingLog>> {
        let store = self.begin("list_trading_logs", "list_trading_logs".to_string())?;
        Ok(store.logs.clone())
    }

    async fn create_trading_log(&self, draft: &NewTradingLog) -> BackendResult<TradingLog> {
        let mut store = self.begin("create_trading_log", format!("create_trading_log {}", draft.title))?;
        store.next_id += 1;
        let log = TradingLog::new(store.next_id, &draft.date, &draft.title, &draft.contents);
        store.logs.push(log.clone());
        Ok(log)
    }

    async fn delete_trading_log(&self, id: i64) -> BackendResult<()> {
        let mut store = self.begin("delete_trading_log", format!("delete_trading_log {}", id))?;
        store.logs.retain(|log| log.id != id);
        store.assets.retain(|asset| asset.diary_id != id);
        Ok(())
    }

    async fn list_diary_assets(&self, diary_id: i64) -> BackendResult<Vec<DiaryAsset>> {
        let store = self.begin("list_diary_assets", format!("list_diary_assets {}", diary_id))?;
        Ok(store
            .assets
            .iter()
            .filter(|asset| asset.diary_id == diary_id)
            .cloned()
            .collect())
    }

    async fn attach_asset(&self, asset: &NewDiaryAsset) -> BackendResult<()> {
        let mut store = self.begin(
            "attach_asset",
            format!("attach_asset {} {}", asset.diary_id, asset.asset_id),
        )?;
        store.next_id += 1;
        let id = store.next_id;
        store.assets.push(DiaryAsset {
            id,
            diary_id: asset.diary_id,
            asset_id: asset.asset_id,
            ticker: None,
            amount: asset.amount.clone(),
            buy_price: asset.buy_price.clone(),
            created_at: None,
            updated_at: None,
        });
        Ok(())
    }

    async fn detach_asset(&self, id: i64) -> BackendResult<()> {
        let mut store = self.begin("detach_asset", format!("detach_asset {}", id))?;
        store.assets.retain(|asset| asset.id != id);
        Ok(())
    }

    async fn list_market_assets(&self) -> BackendResult<Vec<MarketAsset>> {
        let store = self.begin("list_market_assets", "list_market_assets".to_string())?;
        Ok(store.market.clone())
    }
}

pub fn market() -> Vec<MarketAsset> {
    vec![
        MarketAsset::new(1, "Samsung Electronics", "005930", "75000"),
        MarketAsset::new(2, "SK Hynix", "000660", "180000"),
        MarketAsset::new(3, "NAVER", "035420", "200000"),
    ]
}

/// Unsigned token carrying a session payload, as the backend would issue.
pub fn session_token(user_id: i64, email: &str) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload =
        URL_SAFE_NO_PAD.encode(serde_json::json!({ "user_id": user_id, "email": email }).to_string());
    format!("{}.{}.sig", header, payload)
}
