use crate::application::services::generation::{FetchOutcome, Generation};
use crate::domain::entities::trading_log::{sort_for_feed, TradingLog};
use crate::domain::errors::ApiError;
use crate::domain::repositories::journal_backend::JournalBackend;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct FeedState {
    logs: Vec<TradingLog>,
    loading: bool,
}

/// The signed-in user's trading logs, newest first.
pub struct TradingLogFeed {
    backend: Arc<dyn JournalBackend>,
    state: Mutex<FeedState>,
    generation: Generation,
}

impl TradingLogFeed {
    pub fn new(backend: Arc<dyn JournalBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(FeedState::default()),
            generation: Generation::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn logs(&self) -> Vec<TradingLog> {
        self.state().logs.clone()
    }

    pub fn find(&self, id: i64) -> Option<TradingLog> {
        self.state().logs.iter().find(|log| log.id == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Refetch the whole list and replace the current one.
    ///
    /// Only the most recently started refresh writes its result; earlier
    /// ones that finish later are dropped.
    pub async fn refresh(&self, show_loading: bool) -> Result<FetchOutcome, ApiError> {
        let ticket = {
            let mut state = self.state();
            if show_loading {
                state.loading = true;
            }
            self.generation.next()
        };

        let result = self.backend.list_trading_logs().await;

        let mut state = self.state();
        if !self.generation.is_current(ticket) {
            debug!("Discarding superseded trading log list response");
            return Ok(FetchOutcome::Superseded);
        }
        state.loading = false;

        match result {
            Ok(mut logs) => {
                sort_for_feed(&mut logs);
                info!("Loaded {} trading logs", logs.len());
                state.logs = logs;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                warn!("Failed to load trading logs: {}", e);
                Err(e)
            }
        }
    }
}
