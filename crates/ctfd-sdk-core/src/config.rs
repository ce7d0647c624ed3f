//! SDK configuration.
//!
//! A `Config` is resolved once by the caller, usually from the environment,
//! and handed to `CtfdApi::new`:
//!
//! - `CTFD_ADMIN_TOKEN` (required)
//! - `CTFD_HOST` (default `http://localhost:8000`)
//! - `CTFD_STORAGE` (default `<data dir>/ctfd-sdk/ctfd_storage.json`)
//! - `CTFD_TIMEOUT_SECS` (default 30)

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Application name used for the default storage directory
const APP_NAME: &str = "ctfd-sdk";

/// Storage file name
const STORAGE_FILE: &str = "ctfd_storage.json";

pub const DEFAULT_HOST: &str = "http://localhost:8000";

/// HTTP request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_ADMIN_TOKEN: &str = "CTFD_ADMIN_TOKEN";
pub const ENV_HOST: &str = "CTFD_HOST";
pub const ENV_STORAGE: &str = "CTFD_STORAGE";
pub const ENV_TIMEOUT_SECS: &str = "CTFD_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct Config {
    pub admin_token: String,
    pub host: String,
    pub storage_path: PathBuf,
    pub timeout: Duration,
}

impl Config {
    /// Config with the default host, storage path and timeout.
    pub fn new(admin_token: impl Into<String>) -> Self {
        Self {
            admin_token: admin_token.into(),
            host: DEFAULT_HOST.to_string(),
            storage_path: Self::default_storage_path(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary lookup, e.g. a map in tests.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let admin_token = get(ENV_ADMIN_TOKEN).ok_or_else(|| {
            Error::Config(format!("To use ctfd you need to define \"{}\"", ENV_ADMIN_TOKEN))
        })?;

        let mut config = Self::new(admin_token);
        if let Some(host) = get(ENV_HOST) {
            config.host = host;
        }
        if let Some(path) = get(ENV_STORAGE) {
            config.storage_path = PathBuf::from(path);
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            let secs = match secs.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::Config(format!(
                        "{} must be a positive whole number of seconds, got {:?}",
                        ENV_TIMEOUT_SECS, secs
                    )))
                }
            };
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn default_storage_path() -> PathBuf {
        match dirs::data_dir() {
            Some(dir) => dir.join(APP_NAME).join(STORAGE_FILE),
            None => PathBuf::from(STORAGE_FILE),
        }
    }
}
