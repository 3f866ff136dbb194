//! Structured logging setup for Orbit services.
//!
//! Orbit crates emit `tracing` events and spans. This crate installs the
//! subscriber that turns them into log lines:
//!
//! - JSON output for production, pretty output for development
//! - `EnvFilter` directives, optionally overridden by `RUST_LOG`
//! - Span events for following a request through dispatch
//!
//! # Example
//!
//! ```rust,no_run
//! use orbit_telemetry::{init_logging, LogConfig, LogFormat};
//!
//! # fn main() -> Result<(), orbit_telemetry::TelemetryError> {
//! let config = LogConfig::production()
//!     .with_level("info,orbit_server=debug")
//!     .with_format(LogFormat::Json);
//! init_logging(&config)?;
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/orbit-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
