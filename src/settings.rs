//! Application settings.
//!
//! ```yaml
//! ElasticSearch:
//!   Address: http://localhost:9200
//!   Username: elastic
//!   Password: changeme
//!   TimeoutSecs: 30
//! ```
//!
//! `CLUBSEARCH_ES_ADDRESS`, `CLUBSEARCH_ES_USERNAME` and
//! `CLUBSEARCH_ES_PASSWORD` override the file, after an optional `.env` file
//! has been loaded into the environment.

use crate::error::Result;
use clubsearch_config::{ConfigLoader, ConfigValidator, EnvLoader, Validate};
use clubsearch_engine::SearchConfig;
use clubsearch_log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "CLUBSEARCH";

/// Default configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "ElasticSearch")]
    pub elastic_search: EngineSettings,
}

/// Engine connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Username", default)]
    pub username: Option<String>,
    #[serde(rename = "Password", default)]
    pub password: Option<String>,
    #[serde(rename = "TimeoutSecs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for EngineSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineSettings")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Settings file named by `CLUBSEARCH_CONFIG`, or [`DEFAULT_CONFIG_PATH`].
pub fn config_path() -> PathBuf {
    let env = EnvLoader::new(Some(ENV_PREFIX.to_string()));
    PathBuf::from(env.load_var_or("config", DEFAULT_CONFIG_PATH))
}

impl AppConfig {
    /// Load settings from `path`, apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());

        EnvLoader::load_dotenv(None)?;

        let mut config: AppConfig = ConfigLoader::auto(path)?.load_as(path)?;
        config.apply_env(&EnvLoader::new(Some(ENV_PREFIX.to_string())));
        config.validate()?;

        debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Replace file values with any non-empty `<prefix>_ES_*` variables.
    pub fn apply_env(&mut self, env: &EnvLoader) {
        let es = &mut self.elastic_search;
        if let Some(address) = env.load_var_opt("es_address") {
            es.address = address;
        }
        if let Some(username) = env.load_var_opt("es_username") {
            es.username = Some(username);
        }
        if let Some(password) = env.load_var_opt("es_password") {
            es.password = Some(password);
        }
    }

    /// Connection settings for the engine client.
    pub fn search_config(&self) -> SearchConfig {
        let es = &self.elastic_search;
        let config = SearchConfig::new(es.address.trim())
            .with_request_timeout(Duration::from_secs(es.timeout_secs));

        match (non_empty(&es.username), non_empty(&es.password)) {
            (Some(user), Some(pass)) => config.with_basic_auth(user, pass),
            _ => config,
        }
    }
}

// YAML writes an unset credential as an empty string.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Validate for AppConfig {
    fn validate(&self) -> clubsearch_config::Result<()> {
        let es = &self.elastic_search;
        ConfigValidator::not_empty(&es.address, "ElasticSearch.Address")?;
        ConfigValidator::is_url(es.address.trim(), "ElasticSearch.Address")?;
        ConfigValidator::paired(
            &non_empty(&es.username),
            &non_empty(&es.password),
            "ElasticSearch.Username",
            "ElasticSearch.Password",
        )?;
        ConfigValidator::in_range(es.timeout_secs, 1, 600, "ElasticSearch.TimeoutSecs")?;
        Ok(())
    }
}
