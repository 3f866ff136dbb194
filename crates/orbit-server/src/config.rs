//! Server configuration types.
//!
//! Configuration is layered: built-in defaults, then an optional TOML
//! document, then `ORBIT_*` environment variables.
//!
//! # Example
//!
//! ```rust
//! use orbit_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .http_addr("127.0.0.1:3000")
//!     .request_timeout(Duration::from_secs(5))
//!     .build();
//!
//! assert_eq!(config.http_addr(), "127.0.0.1:3000");
//! assert_eq!(config.max_body_size(), 1024 * 1024);
//! ```
//!
//! # TOML
//!
//! ```toml
//! http_addr = "127.0.0.1:8080"
//! shutdown_timeout_secs = 10
//! request_timeout_secs = 5
//! max_body_size = 65536
//! ```
//!
//! # Environment
//!
//! | Variable | Field |
//! |---|---|
//! | `ORBIT_HTTP_ADDR` | `http_addr` |
//! | `ORBIT_SHUTDOWN_TIMEOUT_SECS` | `shutdown_timeout` |
//! | `ORBIT_REQUEST_TIMEOUT_SECS` | `request_timeout` |
//! | `ORBIT_MAX_BODY_SIZE` | `max_body_size` |

use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default request body limit in bytes (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "ORBIT";

/// Server configuration.
///
/// Use [`ServerConfig::builder()`] to construct instances, or
/// [`ServerConfig::load`] for the layered sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// HTTP server bind address (e.g., "0.0.0.0:8080")
    http_addr: String,

    /// How long to wait for in-flight connections on shutdown
    shutdown_timeout: Duration,

    /// Upper bound for body collection and for the handler, each
    request_timeout: Duration,

    /// Largest accepted request body
    max_body_size: usize,
}

impl ServerConfig {
    /// Creates a new server configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Loads defaults, then `path` if given, then `ORBIT_*` environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or an
    /// environment variable holds an unparsable value.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = match path {
            Some(path) => ServerConfigBuilder::from_file(path)?,
            None => ServerConfigBuilder::new(),
        };
        Ok(builder.with_env()?.build())
    }

    /// Parses a TOML document on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlError`] for malformed TOML or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        ServerConfigBuilder::from_toml_str(content).map(ServerConfigBuilder::build)
    }

    /// Reads a TOML file on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ServerConfigBuilder::from_file(path).map(ServerConfigBuilder::build)
    }

    /// Returns the HTTP bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses the HTTP address as a `SocketAddr`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.http_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                field: "http_addr".to_string(),
                reason: format!("'{}': {e}", self.http_addr),
            })
    }

    /// Returns the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the request body limit in bytes.
    #[must_use]
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// TOML shape of [`ServerConfig`]. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    http_addr: Option<String>,
    shutdown_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    max_body_size: Option<usize>,
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
    request_timeout: Duration,
    max_body_size: usize,
}

impl ServerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Starts from the defaults with a TOML document applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlError`] for malformed TOML or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content)?;
        Ok(Self::new().merge(file))
    }

    /// Starts from the defaults with a TOML file applied.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the request timeout.
    ///
    /// Applies separately to body collection and to the handler.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the request body limit in bytes.
    #[must_use]
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Applies `ORBIT_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvParseError`] for unparsable values.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Applies `ORBIT_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvParseError`] for unparsable values.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| format!("{ENV_PREFIX}_{name}");

        if let Some(addr) = lookup(&var("HTTP_ADDR")) {
            self.http_addr = addr;
        }
        if let Some(secs) = parse_env::<u64>(&lookup, &var("SHUTDOWN_TIMEOUT_SECS"))? {
            self.shutdown_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env::<u64>(&lookup, &var("REQUEST_TIMEOUT_SECS"))? {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = parse_env::<usize>(&lookup, &var("MAX_BODY_SIZE"))? {
            self.max_body_size = bytes;
        }

        Ok(self)
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
            request_timeout: self.request_timeout,
            max_body_size: self.max_body_size,
        }
    }

    fn merge(mut self, file: FileConfig) -> Self {
        if let Some(addr) = file.http_addr {
            self.http_addr = addr;
        }
        if let Some(secs) = file.shutdown_timeout_secs {
            self.shutdown_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = file.max_body_size {
            self.max_body_size = bytes;
        }
        self
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(var)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::EnvParseError {
                    var: var.to_string(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr(), DEFAULT_HTTP_ADDR);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_body_size(), 1024 * 1024);
        assert!(config.socket_addr().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:3000")
            .shutdown_timeout(Duration::from_secs(5))
            .request_timeout(Duration::from_millis(250))
            .max_body_size(16)
            .build();

        assert_eq!(config.socket_addr().unwrap().port(), 3000);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
        assert_eq!(config.max_body_size(), 16);
    }

    #[test]
    fn test_invalid_socket_addr() {
        let config = ServerConfig::builder().http_addr("localhost").build();
        assert!(matches!(
            config.socket_addr(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_toml_partial_overrides() {
        let config = ServerConfig::from_toml_str(
            r#"
            http_addr = "127.0.0.1:9000"
            max_body_size = 2048
            "#,
        )
        .unwrap();

        assert_eq!(config.http_addr(), "127.0.0.1:9000");
        assert_eq!(config.max_body_size(), 2048);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_toml_unknown_key_rejected() {
        let err = ServerConfig::from_toml_str("http2_enabled = true").unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = 3").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_from_missing_file() {
        let err = ServerConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_env_overrides_file() {
        let config = ServerConfigBuilder::from_toml_str("shutdown_timeout_secs = 10")
            .unwrap()
            .with_env_from(env(&[
                ("ORBIT_SHUTDOWN_TIMEOUT_SECS", "2"),
                ("ORBIT_HTTP_ADDR", "127.0.0.1:7000"),
                ("ORBIT_MAX_BODY_SIZE", " 512 "),
            ]))
            .unwrap()
            .build();

        assert_eq!(config.shutdown_timeout(), Duration::from_secs(2));
        assert_eq!(config.http_addr(), "127.0.0.1:7000");
        assert_eq!(config.max_body_size(), 512);
    }

    #[test]
    fn test_env_parse_error() {
        let err = ServerConfigBuilder::new()
            .with_env_from(env(&[("ORBIT_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();

        match err {
            ConfigError::EnvParseError { var, .. } => {
                assert_eq!(var, "ORBIT_REQUEST_TIMEOUT_SECS");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
