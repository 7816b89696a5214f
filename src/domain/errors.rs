use thiserror::Error;

/// Failures talking to the journal backend.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to encode request body: {0}")]
    Encode(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Business errors returned by the authentication endpoints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email has already been taken")]
    EmailTaken,

    #[error("Rejected by server: {0}")]
    Rejected(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Token storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the form and viewer workflows.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Local validation failed; the submit control is disabled, no message is shown.
    #[error("Submission blocked by validation")]
    SubmissionBlocked,

    #[error("A request for this action is already pending")]
    Busy,

    #[error("No trading log selected")]
    NoSelection,

    #[error("Not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl WorkflowError {
    /// Validation and re-entrancy guards are not reported to the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, WorkflowError::SubmissionBlocked | WorkflowError::Busy)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
