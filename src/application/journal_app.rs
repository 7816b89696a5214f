//! Page-level coordinator of the journal: session, feed, add-log modal and
//! viewer modal.

use crate::application::forms::add_trading_log::{AddTradingLogForm, SubmitReport};
use crate::application::services::asset_registry::MarketAssetRegistry;
use crate::application::services::trading_log_feed::TradingLogFeed;
use crate::application::services::trading_log_viewer::TradingLogViewer;
use crate::application::ui::alert::Alert;
use crate::application::ui::modal::{ClickTarget, Modal};
use crate::auth;
use crate::domain::entities::session::UserSession;
use crate::domain::entities::trading_log::TradingLog;
use crate::domain::errors::WorkflowError;
use crate::domain::repositories::journal_backend::JournalBackend;
use crate::domain::repositories::token_store::TokenStore;
use std::sync::Arc;
use tracing::{info, warn};

pub const PARTIAL_ATTACH_MESSAGE: &str =
    "The trading log was saved, but some positions could not be attached.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    Journal,
}

pub struct JournalApp {
    backend: Arc<dyn JournalBackend>,
    tokens: Arc<dyn TokenStore>,
    registry: MarketAssetRegistry,
    session: Option<UserSession>,
    route: Route,
    feed: TradingLogFeed,
    viewer: TradingLogViewer,
    add_form: AddTradingLogForm,
    add_modal: Modal,
    viewer_modal: Modal,
    alert: Alert,
}

impl JournalApp {
    pub fn new(
        backend: Arc<dyn JournalBackend>,
        tokens: Arc<dyn TokenStore>,
        registry: MarketAssetRegistry,
    ) -> Self {
        Self {
            feed: TradingLogFeed::new(backend.clone()),
            viewer: TradingLogViewer::new(backend.clone(), registry.clone()),
            add_form: AddTradingLogForm::new(backend.clone(), registry.clone()),
            backend,
            tokens,
            registry,
            session: None,
            route: Route::SignIn,
            add_modal: Modal::new(),
            viewer_modal: Modal::new(),
            alert: Alert::default(),
        }
    }

    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn registry(&self) -> &MarketAssetRegistry {
        &self.registry
    }

    pub fn feed(&self) -> &TradingLogFeed {
        &self.feed
    }

    pub fn viewer(&self) -> &TradingLogViewer {
        &self.viewer
    }

    pub fn add_form(&self) -> &AddTradingLogForm {
        &self.add_form
    }

    pub fn add_form_mut(&mut self) -> &mut AddTradingLogForm {
        &mut self.add_form
    }

    pub fn alert(&self) -> &Alert {
        &self.alert
    }

    pub fn is_add_form_open(&self) -> bool {
        self.add_modal.is_open()
    }

    pub fn is_viewer_open(&self) -> bool {
        self.viewer_modal.is_open()
    }

    /// Pick up a session from the stored token, if it decodes.
    pub async fn restore(&mut self) -> Result<Option<UserSession>, WorkflowError> {
        let Some(token) = self.tokens.load() else {
            info!("No stored session");
            self.route = Route::SignIn;
            return Ok(None);
        };
        let Some(session) = auth::decode_session(&token) else {
            warn!("Stored token does not decode to a session");
            self.route = Route::SignIn;
            return Ok(None);
        };
        self.enter(session.clone()).await?;
        Ok(Some(session))
    }

    /// Start the journal for a signed-in user: load the market catalog and
    /// the feed.
    pub async fn enter(&mut self, session: UserSession) -> Result<(), WorkflowError> {
        info!("Session for {} (user {})", session.email, session.user_id);
        self.session = Some(session);
        self.route = Route::Journal;
        self.alert.clear();

        if let Err(e) = self.registry.refresh(self.backend.as_ref()).await {
            warn!("Failed to load market assets: {}", e);
            return Err(self.report(e.into()));
        }
        if let Err(e) = self.feed.refresh(true).await {
            return Err(self.report(e.into()));
        }
        Ok(())
    }

    pub fn open_add_form(&mut self) {
        self.add_modal.open();
    }

    pub fn close_add_form(&mut self) {
        self.add_modal.close();
    }

    pub fn click_add_modal(&mut self, target: ClickTarget) -> bool {
        self.add_modal.click(target)
    }

    /// Submit the add-log form. On success the modal closes and the feed
    /// is reloaded; on failure the modal stays open with the draft intact.
    /// The alert left by a previous attempt is cleared first.
    pub async fn submit_add_form(&mut self) -> Result<SubmitReport, WorkflowError> {
        self.alert.clear();
        match self.add_form.submit().await {
            Ok(report) => {
                self.add_modal.close();
                if !report.is_complete() {
                    self.alert = Alert::warning(PARTIAL_ATTACH_MESSAGE);
                }
                if let Err(e) = self.feed.refresh(false).await {
                    warn!("Reload after adding trading log failed: {}", e);
                }
                Ok(report)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    pub async fn select_log(&mut self, log: TradingLog) -> Result<(), WorkflowError> {
        self.alert.clear();
        self.viewer_modal.open();
        match self.viewer.open(log).await {
            Ok(_) => Ok(()),
            Err(e) => Err(self.report(e)),
        }
    }

    pub fn close_viewer(&mut self) {
        self.viewer.close();
        self.viewer_modal.close();
    }

    pub fn click_viewer_modal(&mut self, target: ClickTarget) -> bool {
        let dismissed = self.viewer_modal.click(target);
        if dismissed {
            self.viewer.close();
        }
        dismissed
    }

    /// Delete the log in the viewer. The viewer is closed and the feed
    /// reloaded whether or not the delete went through.
    pub async fn delete_selected(&mut self) -> Result<(), WorkflowError> {
        let result = self.viewer.delete().await;
        if matches!(result, Err(WorkflowError::Busy)) {
            return result;
        }
        self.alert.clear();

        self.close_viewer();
        if let Err(e) = self.feed.refresh(false).await {
            warn!("Reload after delete failed: {}", e);
        }
        result.map_err(|e| self.report(e))
    }

    pub fn logout(&mut self) -> Result<Route, WorkflowError> {
        self.tokens.clear()?;
        if let Some(session) = self.session.take() {
            info!("Signed out {}", session.email);
        }
        self.close_viewer();
        self.add_modal.close();
        self.add_form.clear();
        self.alert.clear();
        self.route = Route::SignIn;
        Ok(self.route)
    }

    fn report(&mut self, error: WorkflowError) -> WorkflowError {
        if let Some(alert) = Alert::for_error(&error) {
            self.alert = alert;
        }
        error
    }
}
