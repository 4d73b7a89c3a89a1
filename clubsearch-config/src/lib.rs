// Configuration loading for clubsearch
//
// Settings are read from a file once at startup, optionally overridden from
// the environment, validated, and handed to the caller as a plain value.

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use serde::de::DeserializeOwned;
use std::path::Path;

/// Load, deserialize and validate a configuration file
///
/// The format is picked from the file extension.
pub fn load<T: DeserializeOwned + Validate>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let config: T = ConfigLoader::auto(path)?.load_as(path)?;
    config.validate()?;
    Ok(config)
}
