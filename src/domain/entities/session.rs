use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity decoded from the stored token. Display only: never used to
/// authorize anything, the backend verifies the token itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: i64,
    pub email: String,
}

/// Body of `POST /users/login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated { token: String },
    /// Carries the backend's `error` code, e.g. `"invalid password"`.
    Rejected { error: Option<String> },
}

/// Field errors in the backend's `{"email": ["has already been taken"]}` shape.
pub type FieldErrors = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    Created,
    Rejected { status: u16, errors: FieldErrors },
}
