use crate::application::ui::alert::Alert;
use crate::domain::entities::session::{Credentials, FieldErrors, RegistrationOutcome};
use crate::domain::errors::{AuthError, WorkflowError};
use crate::domain::repositories::journal_backend::JournalBackend;
use crate::domain::services::validation;
use std::sync::Arc;
use tracing::{error, info, warn};

const EMAIL_TAKEN: &str = "has already been taken";

pub struct SignUpForm {
    backend: Arc<dyn JournalBackend>,
    email: String,
    password: String,
    password_confirmation: String,
    pending: bool,
    alert: Alert,
}

impl SignUpForm {
    pub fn new(backend: Arc<dyn JournalBackend>) -> Self {
        Self {
            backend,
            email: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
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

    pub fn set_password_confirmation(&mut self, value: &str) {
        self.password_confirmation = value.to_string();
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

    /// Confirmation is only flagged once something has been typed into it.
    pub fn confirmation_ok(&self) -> bool {
        validation::is_empty(&self.password_confirmation)
            || validation::is_equal(&self.password, &self.password_confirmation)
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.pending
            || validation::is_empty(&self.email)
            || validation::is_empty(&self.password)
            || !validation::is_valid_email(&self.email)
            || !validation::is_equal(&self.password, &self.password_confirmation)
    }

    /// Register the account. On success the user still has to sign in.
    pub async fn submit(&mut self) -> Result<(), WorkflowError> {
        if self.pending {
            return Err(WorkflowError::Busy);
        }
        if self.is_submit_disabled() {
            return Err(WorkflowError::SubmissionBlocked);
        }

        self.pending = true;
        self.alert.clear();
        let result = self.register().await;
        self.pending = false;

        if let Err(e) = &result {
            if let Some(alert) = Alert::for_error(e) {
                self.alert = alert;
            }
        }
        result
    }

    async fn register(&self) -> Result<(), WorkflowError> {
        let credentials = Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        };

        let outcome = self.backend.register(&credentials).await.map_err(|e| {
            error!("Registration request failed: {}", e);
            AuthError::from(e)
        })?;

        match outcome {
            RegistrationOutcome::Created => {
                info!("Registered {}", self.email);
                Ok(())
            }
            RegistrationOutcome::Rejected { errors, .. } if email_taken(&errors) => {
                info!("Registration rejected: {} is taken", self.email);
                Err(AuthError::EmailTaken.into())
            }
            RegistrationOutcome::Rejected { status, errors } => {
                warn!("Registration rejected with status {}: {:?}", status, errors);
                Err(AuthError::Rejected(format!("status {}", status)).into())
            }
        }
    }
}

fn email_taken(errors: &FieldErrors) -> bool {
    errors
        .get("email")
        .and_then(|messages| messages.first())
        .is_some_and(|message| message == EMAIL_TAKEN)
}
