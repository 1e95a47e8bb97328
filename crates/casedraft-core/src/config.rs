//! Application configuration, loaded from the environment.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main casedraft configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CasedraftConfig {
    pub model: ModelConfig,
    /// Directory holding the Office document templates
    pub templates_dir: String,
    /// TTL in seconds for stored parse results
    #[serde(default = "default_store_ttl_secs")]
    pub store_ttl_secs: u64,
}

impl CasedraftConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_env("CASEDRAFT")
    }

    /// Load configuration from environment with custom prefix
    pub fn load_from_env(prefix: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(
                Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("model.base_url", "https://api.openai.com")?
            .set_default("model.model", "gpt-4o")?
            .set_default("model.api_key", "")?
            .set_default("model.max_tokens", 4096)?
            .set_default("model.temperature", 0.2)?
            .set_default("model.timeout_secs", 120)?
            .set_default("templates_dir", "templates")?
            .set_default("store_ttl_secs", 1800)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load configuration from file with environment overrides
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("CASEDRAFT").separator("__"));

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn store_ttl(&self) -> Duration {
        Duration::from_secs(self.store_ttl_secs)
    }
}

/// Generative model provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ModelConfig {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self {
            base_url,
            model,
            api_key,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_store_ttl_secs() -> u64 {
    1800
}
