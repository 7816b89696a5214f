use crate::domain::errors::StorageError;
use zeroize::Zeroizing;

/// Where the session token lives between runs (the `token` cookie of the web client).
pub trait TokenStore: Send + Sync {
    /// Current token, if any. Read on every request.
    fn load(&self) -> Option<Zeroizing<String>>;

    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}
