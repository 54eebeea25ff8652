// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{AppError, Result};
use crate::models::Model;
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Fallback variable for the credential when `RAG_SEARCH__PROVIDER__API_KEY` is unset.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub provider: ProviderConfig,
    pub search: SearchDefaults,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: ApiKey,
    pub base_url: String,
    pub vector_store_id: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchDefaults {
    pub model: Model,
    pub max_results: u32,
    pub include_results: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Bearer credential. Redacted in `Debug` and `Display`.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "<unset>")
        } else {
            let tail: String = {
                let chars: Vec<char> = self.0.chars().collect();
                chars[chars.len().saturating_sub(4)..].iter().collect()
            };
            write!(f, "****{}", tail)
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Layers built-in defaults, an optional TOML file and `RAG_SEARCH__*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default_config();
        let mut builder = config::Config::builder()
            .set_default("provider.base_url", defaults.provider.base_url)
            .and_then(|b| b.set_default("provider.vector_store_id", ""))
            .and_then(|b| b.set_default("provider.timeout_secs", defaults.provider.timeout_secs))
            .and_then(|b| b.set_default("search.model", defaults.search.model.as_str()))
            .and_then(|b| b.set_default("search.max_results", defaults.search.max_results))
            .and_then(|b| b.set_default("search.include_results", defaults.search.include_results))
            .and_then(|b| b.set_default("server.host", defaults.server.host))
            .and_then(|b| b.set_default("server.port", defaults.server.port))
            .map_err(|e| AppError::Config(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RAG_SEARCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        if config.provider.api_key.is_empty()
            && let Ok(key) = std::env::var(API_KEY_ENV)
        {
            config.provider.api_key = ApiKey::new(key);
        }

        config.validate()?;
        Ok(config)
    }

    /// Defaults for every optional setting. The credential and vector store stay empty.
    pub fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                api_key: ApiKey::default(),
                base_url: "https://api.openai.com/v1".to_string(),
                vector_store_id: String::new(),
                timeout_secs: 60,
            },
            search: SearchDefaults {
                model: Model::default(),
                max_results: 5,
                include_results: true,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8501,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.provider.api_key.is_empty() {
            return Err(AppError::Config(format!(
                "API credential missing: set {} or provider.api_key",
                API_KEY_ENV
            )));
        }

        Validator::validate_vector_store_id(&self.provider.vector_store_id)
            .map_err(|e| AppError::Config(e.to_string()))?;
        Validator::validate_url(&self.provider.base_url)
            .map_err(|e| AppError::Config(e.to_string()))?;

        if self.provider.timeout_secs == 0 {
            return Err(AppError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Validator::validate_max_results(i64::from(self.search.max_results))
            .map_err(|e| AppError::Config(e.to_string()))?;
        Validator::validate_port(self.server.port)
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(())
    }
}
