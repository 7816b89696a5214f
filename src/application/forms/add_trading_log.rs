use crate::application::forms::asset_draft::{AssetDraftTable, DraftField};
use crate::application::services::asset_registry::MarketAssetRegistry;
use crate::domain::entities::diary_asset::{DiaryAssetDraft, NewDiaryAsset};
use crate::domain::entities::trading_log::{NewTradingLog, TradingLog};
use crate::domain::errors::{ApiError, WorkflowError};
use crate::domain::repositories::journal_backend::JournalBackend;
use crate::domain::services::validation;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// A draft row whose attach request was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachFailure {
    pub ticker: String,
    pub asset_id: i64,
    pub error: ApiError,
}

/// Result of a submission whose trading log was created.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReport {
    pub trading_log: TradingLog,
    pub attached: usize,
    pub failures: Vec<AttachFailure>,
}

impl SubmitReport {
    /// True when every resolved row was attached.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Draft state and submission of a new trading log with its positions.
pub struct AddTradingLogForm {
    backend: Arc<dyn JournalBackend>,
    registry: MarketAssetRegistry,
    title: String,
    contents: String,
    date: String,
    assets: AssetDraftTable,
    phase: SubmitPhase,
}

impl AddTradingLogForm {
    pub fn new(backend: Arc<dyn JournalBackend>, registry: MarketAssetRegistry) -> Self {
        Self {
            backend,
            registry,
            title: String::new(),
            contents: String::new(),
            date: String::new(),
            assets: AssetDraftTable::new(),
            phase: SubmitPhase::Idle,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn assets(&self) -> &AssetDraftTable {
        &self.assets
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    pub fn set_title(&mut self, value: &str) {
        self.title = value.to_string();
        self.settle_phase();
    }

    pub fn set_contents(&mut self, value: &str) {
        self.contents = value.to_string();
        self.settle_phase();
    }

    pub fn set_date(&mut self, value: &str) {
        self.date = value.to_string();
        self.settle_phase();
    }

    pub fn set_asset_field(&mut self, index: usize, field: DraftField, value: &str) -> bool {
        let updated = self.assets.set_field(index, field, value, &self.registry);
        if updated {
            self.settle_phase();
        }
        updated
    }

    /// Append an empty position row. Ignored while a submission is pending.
    pub fn add_asset_row(&mut self) {
        if self.is_pending() {
            return;
        }
        self.assets.push_empty_row();
    }

    /// Whether the date field should be flagged as malformed.
    pub fn date_format_ok(&self) -> bool {
        validation::field_format_ok(&self.date, validation::is_valid_date)
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.is_pending()
            || validation::is_empty(&self.date)
            || validation::is_empty(&self.title)
            || validation::is_empty(&self.contents)
            || !validation::is_valid_date(&self.date)
    }

    /// Reset every field and drop back to a single empty position row.
    pub fn clear(&mut self) {
        self.title.clear();
        self.contents.clear();
        self.date.clear();
        self.assets.reset();
        self.phase = SubmitPhase::Idle;
    }

    fn settle_phase(&mut self) {
        if matches!(self.phase, SubmitPhase::Succeeded | SubmitPhase::Failed) {
            self.phase = SubmitPhase::Idle;
        }
    }

    /// Create the trading log, then attach every resolved position.
    ///
    /// Attach requests all run to completion; their failures are collected
    /// in the report and never undo the log. When the log itself cannot be
    /// created the draft is left untouched.
    pub async fn submit(&mut self) -> Result<SubmitReport, WorkflowError> {
        if self.is_pending() {
            return Err(WorkflowError::Busy);
        }
        if self.is_submit_disabled() {
            return Err(WorkflowError::SubmissionBlocked);
        }

        self.phase = SubmitPhase::Submitting;
        let draft = NewTradingLog {
            title: self.title.clone(),
            contents: self.contents.clone(),
            date: self.date.clone(),
            assets: self.assets.rows().to_vec(),
        };

        let trading_log = match self.backend.create_trading_log(&draft).await {
            Ok(log) => log,
            Err(e) => {
                error!("Failed to create trading log '{}': {}", draft.title, e);
                self.phase = SubmitPhase::Failed;
                return Err(e.into());
            }
        };
        info!(
            "Created trading log {} for {}",
            trading_log.id, trading_log.date
        );

        let pending: Vec<(DiaryAssetDraft, NewDiaryAsset)> = self
            .assets
            .resolved_rows()
            .map(|(row, asset_id)| {
                (
                    row.clone(),
                    NewDiaryAsset {
                        diary_id: trading_log.id,
                        asset_id,
                        amount: row.amount.clone(),
                        buy_price: row.buy_price.clone(),
                    },
                )
            })
            .collect();

        let backend = &self.backend;
        let outcomes = join_all(
            pending
                .iter()
                .map(|(_, request)| async move { backend.attach_asset(request).await }),
        )
        .await;

        let mut attached = 0;
        let mut failures = Vec::new();
        for ((row, request), outcome) in pending.into_iter().zip(outcomes) {
            match outcome {
                Ok(()) => attached += 1,
                Err(e) => {
                    warn!(
                        "Failed to attach {} to trading log {}: {}",
                        row.ticker, trading_log.id, e
                    );
                    failures.push(AttachFailure {
                        ticker: row.ticker,
                        asset_id: request.asset_id,
                        error: e,
                    });
                }
            }
        }

        self.clear();
        self.phase = SubmitPhase::Succeeded;
        info!(
            "Trading log {} submitted: {} attached, {} failed",
            trading_log.id,
            attached,
            failures.len()
        );

        Ok(SubmitReport {
            trading_log,
            attached,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::market_asset::MarketAsset;
    use crate::testing::MockBackend;

    fn registry() -> MarketAssetRegistry {
        MarketAssetRegistry::with_assets(vec![
            MarketAsset::new(1, "Apple", "AAPL", "190"),
            MarketAsset::new(2, "Tesla", "TSLA", "250"),
        ])
    }

    fn filled_form(backend: Arc<MockBackend>) -> AddTradingLogForm {
        let mut form = AddTradingLogForm::new(backend, registry());
        form.set_date("2024-05-01");
        form.set_title("Earnings day");
        form.set_contents("Bought the dip");
        form
    }

    #[test]
    fn test_gate() {
        let backend = Arc::new(MockBackend::new());
        let mut form = AddTradingLogForm::new(backend, registry());
        assert!(form.is_submit_disabled());

        form.set_date("2024-05-01");
        form.set_title("t");
        assert!(form.is_submit_disabled());

        form.set_contents("c");
        assert!(!form.is_submit_disabled());

        form.set_date("2024/05/01");
        assert!(form.is_submit_disabled());
        assert!(!form.date_format_ok());

        form.set_date("");
        assert!(form.date_format_ok());
    }

    #[tokio::test]
    async fn test_blocked_submission_sends_nothing() {
        let backend = Arc::new(MockBackend::new());
        let mut form = AddTradingLogForm::new(backend.clone(), registry());
        form.set_title("only a title");

        let result = form.submit().await;
        assert!(matches!(result, Err(WorkflowError::SubmissionBlocked)));
        assert!(backend.calls().is_empty());
        assert_eq!(form.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn test_creates_log_then_attaches_resolved_rows() {
        let backend = Arc::new(MockBackend::new());
        let mut form = filled_form(backend.clone());
        form.set_asset_field(0, DraftField::Ticker, "AAPL");
        form.set_asset_field(0, DraftField::Amount, "3");
        form.set_asset_field(0, DraftField::BuyPrice, "180");
        form.add_asset_row();
        form.set_asset_field(1, DraftField::Ticker, "UNKNOWN");

        let report = form.submit().await.unwrap();

        assert_eq!(report.trading_log.id, 100);
        assert_eq!(report.attached, 1);
        assert!(report.is_complete());
        assert_eq!(backend.count("create_trading_log"), 1);
        assert_eq!(backend.count("attach_asset"), 1);
        assert!(backend.calls().contains(&"attach_asset:100:1".to_string()));

        let attached = backend.diary_assets();
        assert_eq!(attached[0].amount, "3");
        assert_eq!(attached[0].buy_price, "180");

        assert_eq!(form.phase(), SubmitPhase::Succeeded);
        assert_eq!(form.title(), "");
        assert_eq!(form.assets().len(), 1);
        assert!(form.assets().is_empty());
    }

    #[tokio::test]
    async fn test_failed_attach_still_completes() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_attach_of(2);
        let mut form = filled_form(backend.clone());
        form.set_asset_field(0, DraftField::Ticker, "AAPL");
        form.add_asset_row();
        form.set_asset_field(1, DraftField::Ticker, "TSLA");

        let report = form.submit().await.unwrap();

        assert_eq!(report.attached, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].ticker, "TSLA");
        assert_eq!(report.failures[0].asset_id, 2);
        assert!(!report.is_complete());
        assert_eq!(backend.count("attach_asset"), 2);
        assert_eq!(backend.trading_logs().len(), 1);
        assert!(form.assets().is_empty());
    }

    #[tokio::test]
    async fn test_failed_create_keeps_draft() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_on("create_trading_log");
        let mut form = filled_form(backend.clone());
        form.set_asset_field(0, DraftField::Ticker, "AAPL");

        let result = form.submit().await;

        assert!(matches!(
            result,
            Err(WorkflowError::Api(ApiError::UnexpectedStatus { status: 500, .. }))
        ));
        assert_eq!(form.phase(), SubmitPhase::Failed);
        assert_eq!(form.title(), "Earnings day");
        assert_eq!(form.assets().first().asset_id, Some(1));
        assert_eq!(backend.count("attach_asset"), 0);

        form.set_title("Earnings day, retry");
        assert_eq!(form.phase(), SubmitPhase::Idle);
    }
}
