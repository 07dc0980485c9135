//! Process configuration, read from the environment.

use std::net::{Ipv4Addr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEV_API_KEY: &str = "mysecretkey";

/// Controls how much detail error responses leak.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Development,
    /// Internal error messages are redacted.
    Production,
}

impl RunMode {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("production") => RunMode::Production,
            _ => RunMode::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == RunMode::Production
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT value '{0}'")]
    InvalidPort(String),

    #[error("API_KEY is set but empty")]
    EmptyApiKey,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Expected value of the `x-api-key` header.
    pub api_key: String,
    pub run_mode: RunMode,
}

impl ApiConfig {
    /// Development defaults with an explicit key; binds an ephemeral local port.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
            api_key: api_key.into(),
            run_mode: RunMode::Development,
        }
    }

    pub fn with_run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = run_mode;
        self
    }

    /// Reads `PORT`, `API_KEY` and `APP_ENV`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let api_key = match lookup("API_KEY") {
            Some(key) if key.is_empty() => return Err(ConfigError::EmptyApiKey),
            Some(key) => key,
            None => {
                tracing::warn!("API_KEY not set; using insecure dev default");
                DEV_API_KEY.to_string()
            }
        };

        Ok(Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            api_key,
            run_mode: RunMode::from_env_value(lookup("APP_ENV").as_deref()),
        })
    }
}
