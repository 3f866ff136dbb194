//! Server and configuration errors.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a [`ServerConfig`](crate::ServerConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// Explanation of the parsing error.
        reason: String,
    },

    /// A value is out of range or malformed.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// The offending field.
        field: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },
}

/// Errors that stop the server from running.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The listener could not be bound.
    #[error("failed to bind to {addr}")]
    Bind {
        /// The address that was tried.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The listener failed after it was bound.
    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::EnvParseError {
            var: "ORBIT_MAX_BODY_SIZE".into(),
            reason: "invalid digit found in string".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse environment variable ORBIT_MAX_BODY_SIZE: invalid digit found in string"
        );
    }

    #[test]
    fn test_server_error_wraps_config() {
        let err = ServerError::from(ConfigError::InvalidValue {
            field: "http_addr".into(),
            reason: "not a socket address".into(),
        });
        assert!(err.to_string().starts_with("invalid configuration value for http_addr"));
    }
}
