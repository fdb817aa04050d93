/// Structured error types for spontyctl-core.
///
/// Uses `thiserror` for better API surface and error composition.
/// Binary crates (spontyctl-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for spontyctl-core operations
#[derive(Error, Debug)]
pub enum SpontyError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Configuration file could not be parsed
    #[error("Invalid config file {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// Configuration is missing or incomplete
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// A status string did not match any known variant
    #[error("Invalid {what} '{value}'")]
    InvalidStatus { what: &'static str, value: String },
}

/// Result type alias for spontyctl-core operations
pub type Result<T> = std::result::Result<T, SpontyError>;

impl SpontyError {
    /// Create an invalid config error
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create an invalid status error
    pub fn invalid_status(what: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidStatus {
            what,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpontyError::invalid_status("event status", "Archived");
        assert_eq!(err.to_string(), "Invalid event status 'Archived'");

        let err = SpontyError::invalid_config("/tmp/config.toml", "missing url");
        assert!(err.to_string().contains("Invalid config file"));
        assert!(err.to_string().contains("/tmp/config.toml"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: SpontyError = io_err.into();

        assert!(matches!(err, SpontyError::Io { .. }));
    }
}
