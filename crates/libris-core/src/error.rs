use thiserror::Error;

/// Top-level error type for the Libris platform.
#[derive(Error, Debug)]
pub enum LibrisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl From<config::ConfigError> for LibrisError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
