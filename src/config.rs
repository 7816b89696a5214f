use crate::domain::errors::ConfigError;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_LOG_FILTER: &str = "tradelog=info";
const TOKEN_FILE: &str = "token";

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub state_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            state_dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tradelog")
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppConfig {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup. Invalid values are
    /// reported and replaced by their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppConfig {
        let mut config = AppConfig::default();

        if let Some(api_url) = lookup("TRADELOG_API_URL") {
            match check_api_url(&api_url) {
                Ok(()) => config.api_url = api_url.trim_end_matches('/').to_string(),
                Err(e) => {
                    tracing::warn!(
                        "Invalid TRADELOG_API_URL '{}': {}, using default: {}",
                        api_url,
                        e,
                        config.api_url
                    );
                }
            }
        }

        if let Some(state_dir) = lookup("TRADELOG_STATE_DIR") {
            if state_dir.trim().is_empty() {
                tracing::warn!(
                    "Empty TRADELOG_STATE_DIR, using default: {}",
                    config.state_dir.display()
                );
            } else {
                config.state_dir = PathBuf::from(state_dir);
            }
        }

        config
    }

    /// Where the session token is persisted.
    pub fn token_path(&self) -> PathBuf {
        self.state_dir.join(TOKEN_FILE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_api_url(&self.api_url)?;
        if self.state_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("state directory is empty".to_string()));
        }
        Ok(())
    }
}

fn check_api_url(value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::Invalid(format!("{}: {}", value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid(format!(
            "unsupported scheme '{}' in {}",
            other, value
        ))),
    }
}
