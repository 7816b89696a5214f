//! Journal Backend Trait
//!
//! The REST backend is an external collaborator. Workflows only see this
//! trait, which keeps them testable against in-memory doubles; the HTTP
//! implementation lives in `infrastructure::api_client`.

use crate::domain::entities::diary_asset::{DiaryAsset, NewDiaryAsset};
use crate::domain::entities::market_asset::MarketAsset;
use crate::domain::entities::session::{Credentials, LoginOutcome, RegistrationOutcome};
use crate::domain::entities::trading_log::{NewTradingLog, TradingLog};
use crate::domain::errors::ApiError;
use async_trait::async_trait;

pub type BackendResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait JournalBackend: Send + Sync {
    /// `POST /users/login`
    async fn login(&self, credentials: &Credentials) -> BackendResult<LoginOutcome>;

    /// `POST /users.json`
    async fn register(&self, credentials: &Credentials) -> BackendResult<RegistrationOutcome>;

    /// `GET /diaries.json`, in backend order
    async fn list_trading_logs(&self) -> BackendResult<Vec<TradingLog>>;

    /// `POST /diaries.json`
    async fn create_trading_log(&self, trading_log: &NewTradingLog) -> BackendResult<TradingLog>;

    /// `DELETE /diaries/{id}.json`
    async fn delete_trading_log(&self, id: i64) -> BackendResult<()>;

    /// `GET /diaries/{id}/assets.json`, in backend order
    async fn list_diary_assets(&self, diary_id: i64) -> BackendResult<Vec<DiaryAsset>>;

    /// `POST /diary_assets.json`
    async fn attach_asset(&self, asset: &NewDiaryAsset) -> BackendResult<()>;

    /// `DELETE /diary_assets/{id}.json`
    async fn detach_asset(&self, id: i64) -> BackendResult<()>;

    /// `GET /assets.json`
    async fn list_market_assets(&self) -> BackendResult<Vec<MarketAsset>>;
}
