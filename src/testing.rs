//! In-memory backend double shared by the unit tests.

use crate::domain::entities::diary_asset::{DiaryAsset, NewDiaryAsset};
use crate::domain::entities::market_asset::MarketAsset;
use crate::domain::entities::session::{Credentials, LoginOutcome, RegistrationOutcome};
use crate::domain::entities::trading_log::{NewTradingLog, TradingLog};
use crate::domain::errors::ApiError;
use crate::domain::repositories::journal_backend::{BackendResult, JournalBackend};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct MockBackend {
    trading_logs: Mutex<Vec<TradingLog>>,
    diary_assets: Mutex<Vec<DiaryAsset>>,
    market_assets: Mutex<Vec<MarketAsset>>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    failing_assets: Mutex<HashSet<i64>>,
    list_delays: Mutex<VecDeque<Duration>>,
    asset_delays: Mutex<HashMap<i64, Duration>>,
    write_delay: Mutex<Option<Duration>>,
    login_outcome: Mutex<LoginOutcome>,
    registration_outcome: Mutex<RegistrationOutcome>,
    next_id: AtomicI64,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            trading_logs: Mutex::new(Vec::new()),
            diary_assets: Mutex::new(Vec::new()),
            market_assets: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            failing_assets: Mutex::new(HashSet::new()),
            list_delays: Mutex::new(VecDeque::new()),
            asset_delays: Mutex::new(HashMap::new()),
            write_delay: Mutex::new(None),
            login_outcome: Mutex::new(LoginOutcome::Rejected { error: None }),
            registration_outcome: Mutex::new(RegistrationOutcome::Created),
            next_id: AtomicI64::new(100),
        }
    }

    pub fn set_trading_logs(&self, logs: Vec<TradingLog>) {
        *self.trading_logs.lock().unwrap() = logs;
    }

    pub fn set_diary_assets(&self, assets: Vec<DiaryAsset>) {
        *self.diary_assets.lock().unwrap() = assets;
    }

    pub fn set_market_assets(&self, assets: Vec<MarketAsset>) {
        *self.market_assets.lock().unwrap() = assets;
    }

    pub fn set_login_outcome(&self, outcome: LoginOutcome) {
        *self.login_outcome.lock().unwrap() = outcome;
    }

    pub fn set_registration_outcome(&self, outcome: RegistrationOutcome) {
        *self.registration_outcome.lock().unwrap() = outcome;
    }

    /// Make every call of `operation` fail with a 500.
    pub fn fail_on(&self, operation: &str) {
        self.failing.lock().unwrap().insert(operation.to_string());
    }

    pub fn heal(&self, operation: &str) {
        self.failing.lock().unwrap().remove(operation);
    }

    /// Make `attach_asset` fail for one market asset only.
    pub fn fail_attach_of(&self, asset_id: i64) {
        self.failing_assets.lock().unwrap().insert(asset_id);
    }

    /// Delay the next `list_trading_logs` calls, in order.
    pub fn delay_list(&self, delays: &[Duration]) {
        self.list_delays.lock().unwrap().extend(delays.iter().copied());
    }

    pub fn delay_assets_of(&self, diary_id: i64, delay: Duration) {
        self.asset_delays.lock().unwrap().insert(diary_id, delay);
    }

    /// Delay every `attach_asset` and `detach_asset` call.
    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock().unwrap() = Some(delay);
    }

    async fn write_pause(&self) {
        let delay = *self.write_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.split(':').next() == Some(operation))
            .count()
    }

    pub fn trading_logs(&self) -> Vec<TradingLog> {
        self.trading_logs.lock().unwrap().clone()
    }

    pub fn diary_assets(&self) -> Vec<DiaryAsset> {
        self.diary_assets.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> BackendResult<()> {
        let operation = call.split(':').next().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&operation) {
            return Err(ApiError::UnexpectedStatus {
                status: 500,
                body: format!("{} failed", operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl JournalBackend for MockBackend {
    async fn login(&self, credentials: &Credentials) -> BackendResult<LoginOutcome> {
        self.record(format!("login:{}", credentials.email))?;
        Ok(self.login_outcome.lock().unwrap().clone())
    }

    async fn register(&self, credentials: &Credentials) -> BackendResult<RegistrationOutcome> {
        self.record(format!("register:{}", credentials.email))?;
        Ok(self.registration_outcome.lock().unwrap().clone())
    }

    async fn list_trading_logs(&self) -> BackendResult<Vec<TradingLog>> {
        let delay = self.list_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record("list_trading_logs".to_string())?;
        Ok(self.trading_logs())
    }

    async fn create_trading_log(&self, trading_log: &NewTradingLog) -> BackendResult<TradingLog> {
        self.record(format!("create_trading_log:{}", trading_log.title))?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = TradingLog::new(
            id,
            &trading_log.date,
            &trading_log.title,
            &trading_log.contents,
        );
        self.trading_logs.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_trading_log(&self, id: i64) -> BackendResult<()> {
        self.record(format!("delete_trading_log:{}", id))?;
        self.trading_logs.lock().unwrap().retain(|log| log.id != id);
        Ok(())
    }

    async fn list_diary_assets(&self, diary_id: i64) -> BackendResult<Vec<DiaryAsset>> {
        let delay = self.asset_delays.lock().unwrap().get(&diary_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(format!("list_diary_assets:{}", diary_id))?;
        Ok(self
            .diary_assets()
            .into_iter()
            .filter(|asset| asset.diary_id == diary_id)
            .collect())
    }

    async fn attach_asset(&self, asset: &NewDiaryAsset) -> BackendResult<()> {
        self.write_pause().await;
        self.record(format!("attach_asset:{}:{}", asset.diary_id, asset.asset_id))?;
        if self.failing_assets.lock().unwrap().contains(&asset.asset_id) {
            return Err(ApiError::UnexpectedStatus {
                status: 422,
                body: "asset rejected".to_string(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.diary_assets.lock().unwrap().push(DiaryAsset {
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
        self.write_pause().await;
        self.record(format!("detach_asset:{}", id))?;
        self.diary_assets.lock().unwrap().retain(|asset| asset.id != id);
        Ok(())
    }

    async fn list_market_assets(&self) -> BackendResult<Vec<MarketAsset>> {
        self.record("list_market_assets".to_string())?;
        Ok(self.market_assets.lock().unwrap().clone())
    }
}

/// Attached position fixture.
pub fn diary_asset(id: i64, diary_id: i64, asset_id: i64, buy_price: &str) -> DiaryAsset {
    DiaryAsset {
        id,
        diary_id,
        asset_id,
        ticker: None,
        amount: "1".to_string(),
        buy_price: buy_price.to_string(),
        created_at: None,
        updated_at: None,
    }
}

/// Unsigned JWT-shaped token carrying the given session claims.
pub fn session_token(user_id: i64, email: &str) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    let payload = serde_json::json!({ "user_id": user_id, "email": email });
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}
