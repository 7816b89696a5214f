use crate::application::forms::asset_draft::{AssetDraftTable, DraftField};
use crate::application::services::asset_registry::MarketAssetRegistry;
use crate::application::services::generation::{FetchOutcome, Generation};
use crate::domain::entities::diary_asset::{DiaryAsset, NewDiaryAsset, PositionView};
use crate::domain::entities::trading_log::TradingLog;
use crate::domain::errors::WorkflowError;
use crate::domain::repositories::journal_backend::JournalBackend;
use crate::domain::services::validation;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Requests the viewer currently has in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerStatus {
    pub fetching: bool,
    pub attaching: bool,
    pub deleting: bool,
}

#[derive(Debug, Default)]
struct ViewerState {
    log: Option<TradingLog>,
    assets: Vec<DiaryAsset>,
    draft: AssetDraftTable,
    status: ViewerStatus,
    detaching: BTreeSet<i64>,
}

/// Detail view of one trading log: its attached positions, a one-row
/// attach draft, detach and delete.
pub struct TradingLogViewer {
    backend: Arc<dyn JournalBackend>,
    registry: MarketAssetRegistry,
    state: Mutex<ViewerState>,
    generation: Generation,
}

impl TradingLogViewer {
    pub fn new(backend: Arc<dyn JournalBackend>, registry: MarketAssetRegistry) -> Self {
        Self {
            backend,
            registry,
            state: Mutex::new(ViewerState::default()),
            generation: Generation::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn selected(&self) -> Option<TradingLog> {
        self.state().log.clone()
    }

    pub fn is_open(&self) -> bool {
        self.state().log.is_some()
    }

    /// Attached positions, highest id first.
    pub fn assets(&self) -> Vec<DiaryAsset> {
        self.state().assets.clone()
    }

    pub fn draft(&self) -> AssetDraftTable {
        self.state().draft.clone()
    }

    pub fn status(&self) -> ViewerStatus {
        self.state().status
    }

    pub fn is_detaching(&self, diary_asset_id: i64) -> bool {
        self.state().detaching.contains(&diary_asset_id)
    }

    /// Show `log` and load its positions. A response for a previously
    /// opened log that arrives afterwards is dropped.
    pub async fn open(&self, log: TradingLog) -> Result<FetchOutcome, WorkflowError> {
        {
            let mut state = self.state();
            info!("Opening trading log {}", log.id);
            state.log = Some(log);
            state.assets.clear();
            state.draft.reset();
        }
        self.refresh_assets(true).await
    }

    pub fn close(&self) {
        self.generation.invalidate();
        let mut state = self.state();
        if let Some(log) = state.log.take() {
            debug!("Closing trading log {}", log.id);
        }
        state.assets.clear();
        state.draft.reset();
        state.status.fetching = false;
    }

    /// Refetch the selected log's positions.
    pub async fn refresh_assets(&self, show_loading: bool) -> Result<FetchOutcome, WorkflowError> {
        let (diary_id, ticket) = {
            let mut state = self.state();
            let diary_id = state.log.as_ref().map(|log| log.id).ok_or(WorkflowError::NoSelection)?;
            if show_loading {
                state.status.fetching = true;
            }
            (diary_id, self.generation.next())
        };

        let result = self.backend.list_diary_assets(diary_id).await;

        let mut state = self.state();
        if !self.generation.is_current(ticket) {
            debug!("Discarding superseded asset list for trading log {}", diary_id);
            return Ok(FetchOutcome::Superseded);
        }
        state.status.fetching = false;

        match result {
            Ok(mut assets) => {
                assets.sort_by(|a, b| b.id.cmp(&a.id));
                debug!("Trading log {} has {} positions", diary_id, assets.len());
                state.assets = assets;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                warn!("Failed to load positions of trading log {}: {}", diary_id, e);
                Err(e.into())
            }
        }
    }

    pub fn set_draft_field(&self, field: DraftField, value: &str) {
        self.state().draft.set_field(0, field, value, &self.registry);
    }

    pub fn can_attach(&self) -> bool {
        let state = self.state();
        let row = state.draft.first();
        !state.status.attaching && !validation::is_empty(&row.ticker) && row.is_resolved()
    }

    pub fn suggestions(&self) -> Vec<String> {
        let ticker = self.state().draft.first().ticker.clone();
        self.registry.suggest(&ticker)
    }

    /// Attach the draft row to the selected log, then reload the positions.
    ///
    /// The draft is kept when the request fails.
    pub async fn attach(&self) -> Result<(), WorkflowError> {
        let request = {
            let mut state = self.state();
            let diary_id = state.log.as_ref().map(|log| log.id).ok_or(WorkflowError::NoSelection)?;
            if state.status.attaching {
                return Err(WorkflowError::Busy);
            }
            let row = state.draft.first();
            let asset_id = match row.asset_id {
                Some(id) if !validation::is_empty(&row.ticker) => id,
                _ => return Err(WorkflowError::SubmissionBlocked),
            };
            let request = NewDiaryAsset {
                diary_id,
                asset_id,
                amount: row.amount.clone(),
                buy_price: row.buy_price.clone(),
            };
            state.status.attaching = true;
            request
        };

        let result = self.backend.attach_asset(&request).await;

        let still_selected = {
            let mut state = self.state();
            state.status.attaching = false;
            if let Err(e) = result {
                error!(
                    "Failed to attach asset {} to trading log {}: {}",
                    request.asset_id, request.diary_id, e
                );
                return Err(e.into());
            }
            let still_selected = selected_id(&state) == Some(request.diary_id);
            if still_selected {
                state.draft.reset();
            }
            still_selected
        };
        info!(
            "Attached asset {} to trading log {}",
            request.asset_id, request.diary_id
        );

        if !still_selected {
            debug!("Trading log {} no longer selected, skipping reload", request.diary_id);
            return Ok(());
        }
        if let Err(e) = self.refresh_assets(false).await {
            warn!("Reload after attach failed: {}", e);
        }
        Ok(())
    }

    /// Remove one attached position. The list is reloaded whatever the
    /// outcome of the delete.
    pub async fn detach(&self, diary_asset_id: i64) -> Result<(), WorkflowError> {
        let diary_id = {
            let mut state = self.state();
            if !state.detaching.insert(diary_asset_id) {
                return Err(WorkflowError::Busy);
            }
            selected_id(&state)
        };

        let result = self.backend.detach_asset(diary_asset_id).await;

        let still_selected = {
            let mut state = self.state();
            state.detaching.remove(&diary_asset_id);
            let still_selected = diary_id.is_some() && selected_id(&state) == diary_id;
            if still_selected {
                state.draft.reset();
            }
            still_selected
        };
        match &result {
            Ok(()) => info!("Detached position {}", diary_asset_id),
            Err(e) => error!("Failed to detach position {}: {}", diary_asset_id, e),
        }

        if still_selected {
            if let Err(e) = self.refresh_assets(false).await {
                warn!("Reload after detach failed: {}", e);
            }
        }
        result.map_err(WorkflowError::from)
    }

    /// Delete the selected trading log. Closing the viewer and reloading
    /// the feed is up to the caller.
    pub async fn delete(&self) -> Result<(), WorkflowError> {
        let diary_id = {
            let mut state = self.state();
            let diary_id = state.log.as_ref().map(|log| log.id).ok_or(WorkflowError::NoSelection)?;
            if state.status.deleting {
                return Err(WorkflowError::Busy);
            }
            state.status.deleting = true;
            diary_id
        };

        let result = self.backend.delete_trading_log(diary_id).await;
        self.state().status.deleting = false;

        match result {
            Ok(()) => {
                info!("Deleted trading log {}", diary_id);
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete trading log {}: {}", diary_id, e);
                Err(e.into())
            }
        }
    }

    /// Attached positions priced against the registry as it is now.
    pub fn positions(&self) -> Vec<PositionView> {
        self.state()
            .assets
            .iter()
            .map(|asset| {
                let market = self.registry.find_by_id(asset.asset_id);
                PositionView::evaluate(asset, market.as_ref())
            })
            .collect()
    }
}

fn selected_id(state: &ViewerState) -> Option<i64> {
    state.log.as_ref().map(|log| log.id)
}
