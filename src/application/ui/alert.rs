use crate::domain::errors::{AuthError, WorkflowError};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "The email or password is incorrect.";
pub const EMAIL_TAKEN_MESSAGE: &str = "This email is already in use.";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong. We are looking into it, please try again in a moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertKind {
    Success,
    #[default]
    Info,
    Warning,
    Error,
}

/// Transient status message. An alert with empty text is not shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alert {
    pub kind: AlertKind,
    pub text: String,
}

impl Alert {
    pub fn new(kind: AlertKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(AlertKind::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(AlertKind::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(AlertKind::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(AlertKind::Error, text)
    }

    pub fn is_visible(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Alert::default();
    }

    /// Message for a failed workflow. Validation guards produce nothing,
    /// known business errors a fixed info message, anything else the
    /// generic error message.
    pub fn for_error(error: &WorkflowError) -> Option<Alert> {
        if error.is_silent() {
            return None;
        }
        Some(match error {
            WorkflowError::Auth(AuthError::InvalidCredentials) => {
                Alert::info(INVALID_CREDENTIALS_MESSAGE)
            }
            WorkflowError::Auth(AuthError::EmailTaken) => Alert::info(EMAIL_TAKEN_MESSAGE),
            _ => Alert::error(GENERIC_FAILURE_MESSAGE),
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self.kind {
            AlertKind::Success => "✓",
            AlertKind::Info => "i",
            AlertKind::Warning => "!",
            AlertKind::Error => "✗",
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.symbol(), self.text)
    }
}
