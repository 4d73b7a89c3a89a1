// Environment variable overrides

use crate::{ConfigError, Result};
use std::env;
use std::path::Path;

/// Environment variable loader
///
/// Keys are upper-cased and joined to the prefix with `_`, so
/// `EnvLoader::new(Some("CLUBSEARCH".into())).load_var("es_password")` reads
/// `CLUBSEARCH_ES_PASSWORD`.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Name of the variable backing `key`
    pub fn var_name(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        let name = self.var_name(key);
        env::var(&name).map_err(|source| ConfigError::EnvError { name, source })
    }

    /// Load a variable if it is set and non-empty
    pub fn load_var_opt(&self, key: &str) -> Option<String> {
        self.load_var(key).ok().filter(|v| !v.is_empty())
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var_opt(key).unwrap_or_else(|| default.to_string())
    }

    /// Populate the process environment from a .env file.
    ///
    /// With no path, a missing `.env` in the working directory is ignored.
    /// An explicit path must exist.
    pub fn load_dotenv(path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Ok(())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
