//! Runtime configuration read from the environment (and `.env`)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::api::HttpTransport;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("TROVE_SESSION_KEY is required when TROVE_SESSION_FILE is set")]
    MissingSessionKey,
    #[error("TROVE_SESSION_KEY must be 64 hex characters")]
    InvalidSessionKey,
    #[error("TROVE_HTTP_TIMEOUT_SECS must be a positive whole number, got {0:?}")]
    InvalidTimeout(String),
    #[error("TROVE_API_BASE_URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

/// Persisted session location and the hex key that seals it
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFile {
    pub path: PathBuf,
    pub key_hex: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub http_timeout: Duration,
    /// `None` keeps the session in memory for this process only
    pub session_file: Option<SessionFile>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = var("TROVE_API_BASE_URL")
            .unwrap_or_else(|| HttpTransport::DEFAULT_BASE_URL.to_string());
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(api_base_url));
        }

        let http_timeout = match var("TROVE_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let session_file = match var("TROVE_SESSION_FILE") {
            Some(path) => {
                let key_hex = var("TROVE_SESSION_KEY").ok_or(ConfigError::MissingSessionKey)?;
                if key_hex.len() != 64 || !key_hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(ConfigError::InvalidSessionKey);
                }
                Some(SessionFile {
                    path: PathBuf::from(path),
                    key_hex,
                })
            }
            None => None,
        };

        Ok(Self {
            api_base_url,
            http_timeout,
            session_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.session_file, None);
    }

    #[test]
    fn test_session_file_needs_valid_key() {
        assert_eq!(
            config(&[("TROVE_SESSION_FILE", "/tmp/s.enc")]),
            Err(ConfigError::MissingSessionKey)
        );
        assert_eq!(
            config(&[("TROVE_SESSION_FILE", "/tmp/s.enc"), ("TROVE_SESSION_KEY", "abc")]),
            Err(ConfigError::InvalidSessionKey)
        );

        let key = "ab".repeat(32);
        let config = config(&[("TROVE_SESSION_FILE", "/tmp/s.enc"), ("TROVE_SESSION_KEY", &key)]).unwrap();
        assert_eq!(config.session_file.unwrap().path, PathBuf::from("/tmp/s.enc"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            config(&[("TROVE_HTTP_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidTimeout("0".into()))
        );
        assert_eq!(
            config(&[("TROVE_API_BASE_URL", "localhost:8000")]),
            Err(ConfigError::InvalidBaseUrl("localhost:8000".into()))
        );
        assert_eq!(
            config(&[("TROVE_API_BASE_URL", " https://api.trove.io/api ")]).unwrap().api_base_url,
            "https://api.trove.io/api"
        );
    }
}
