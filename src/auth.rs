//! Session token helpers.
//!
//! The client never verifies the token signature: decoding exists only to
//! show who is signed in. Authorization is the backend's job.

use crate::domain::entities::session::UserSession;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Deserialize)]
struct SessionClaims {
    user_id: Option<i64>,
    email: Option<String>,
}

/// `Authorization` header value for a token.
pub fn bearer_header(token: &str) -> String {
    format!("{}{}", BEARER_PREFIX, token)
}

fn unverified() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// Decode the claims of a JWT without checking its signature or expiry.
///
/// Returns `None` unless the payload carries a non-zero `user_id` and a
/// non-empty `email`.
pub fn decode_session(token: &str) -> Option<UserSession> {
    let claims = match jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(&[]),
        &unverified(),
    ) {
        Ok(data) => data.claims,
        Err(e) => {
            tracing::warn!("Session token is not a readable JWT: {}", e);
            return None;
        }
    };

    match (claims.user_id, claims.email) {
        (Some(user_id), Some(email)) if user_id != 0 && !email.is_empty() => {
            Some(UserSession { user_id, email })
        }
        _ => {
            tracing::debug!("Session token lacks user_id or email");
            None
        }
    }
}
