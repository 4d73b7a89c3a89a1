// Configuration errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The source could not be read (missing file, unknown extension).
    #[error("Cannot read configuration: {0}")]
    LoadError(String),

    /// The text is not valid for its format, or is empty.
    #[error("Malformed configuration: {0}")]
    ParseError(String),

    /// A value is present but unusable.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The document does not have the expected shape.
    #[error("Configuration does not match the expected layout: {0}")]
    DeserializationError(String),

    #[error("Environment variable {name}: {source}")]
    EnvError {
        name: String,
        #[source]
        source: std::env::VarError,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
