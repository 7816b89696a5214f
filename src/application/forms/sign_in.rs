use crate::application::ui::alert::Alert;
use crate::auth;
use crate::domain::entities::session::{Credentials, LoginOutcome, UserSession};
use crate::domain::errors::{AuthError, WorkflowError};
use crate::domain::repositories::journal_backend::JournalBackend;
use crate::domain::repositories::token_store::TokenStore;
use crate::domain::services::validation;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Backend error codes that mean the credentials were wrong.
const CREDENTIAL_ERRORS: [&str; 2] = ["invalid email", "invalid password"];

pub struct SignInForm {
    backend: Arc<dyn JournalBackend>,
    tokens: Arc<dyn TokenStore>,
    email: String,
    password: String,
    pending: bool,
    alert: Alert,
}

impl SignInForm {
    pub fn new(backend: Arc<dyn JournalBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            backend,
            tokens,
            email: String::new(),
            password: String::new(),
            pending: false,
            alert: Alert::default(),
        }
    }

    pub fn set_email(&mut self, value: &str) {
        self.email = value.to_string();
    }

    pub fn set_password(&mut self, value: &str) {
        self.password = value.to_string();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn alert(&self) -> &Alert {
        &self.alert
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn email_format_ok(&self) -> bool {
        validation::field_format_ok(&self.email, validation::is_valid_email)
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.pending
            || validation::is_empty(&self.email)
            || validation::is_empty(&self.password)
            || !validation::is_valid_email(&self.email)
    }

    /// Log in, persist the token and return the decoded session.
    pub async fn submit(&mut self) -> Result<UserSession, WorkflowError> {
        if self.pending {
            return Err(WorkflowError::Busy);
        }
        if self.is_submit_disabled() {
            return Err(WorkflowError::SubmissionBlocked);
        }

        self.pending = true;
        self.alert.clear();
        let result = self.login().await;
        self.pending = false;

        if let Err(e) = &result {
            if let Some(alert) = Alert::for_error(e) {
                self.alert = alert;
            }
        }
        result
    }

    async fn login(&self) -> Result<UserSession, WorkflowError> {
        let credentials = Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        };

        let outcome = self.backend.login(&credentials).await.map_err(|e| {
            error!("Login request failed: {}", e);
            AuthError::from(e)
        })?;

        match outcome {
            LoginOutcome::Authenticated { token } => {
                let Some(session) = auth::decode_session(&token) else {
                    warn!("Login returned a token without a readable session");
                    return Err(AuthError::Rejected("unreadable session token".to_string()).into());
                };
                self.tokens.save(&token)?;
                info!("Signed in as {} (user {})", session.email, session.user_id);
                Ok(session)
            }
            LoginOutcome::Rejected { error } => match error.as_deref() {
                Some(code) if CREDENTIAL_ERRORS.contains(&code) => {
                    info!("Login rejected: {}", code);
                    Err(AuthError::InvalidCredentials.into())
                }
                other => {
                    let reason = other.unwrap_or("no token in response").to_string();
                    warn!("Login failed: {}", reason);
                    Err(AuthError::Rejected(reason).into())
                }
            },
        }
    }
}
