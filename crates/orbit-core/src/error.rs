//! Error types for Orbit.
//!
//! Two families of failures exist:
//!
//! - [`BakeError`]: a route table could not be compiled. Raised once, before
//!   any request is served, and always names the offending template.
//! - [`RouteError`]: a single request could not be routed. The
//!   [`RouteError::DoesNotMatch`] variant is a soft signal telling the
//!   dispatcher to try the next route; every other variant is terminal.
//!
//! | `ErrorCategory` | Variants | Status |
//! |---|---|---|
//! | `NoMatch` | `DoesNotMatch` | 404 |
//! | `Misconfigured` | `Misconfigured` | 503 |
//! | `Resolution` | `ParamResolution`, `BodyResolution` | 503 |

use http::StatusCode;
use orbit_router::{TemplateError, TokenizeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed error produced by application resolvers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`RouteError`].
pub type RouteResult<T> = Result<T, RouteError>;

/// Categories of routing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// No route accepted the request.
    NoMatch,
    /// The route table is internally inconsistent.
    Misconfigured,
    /// A param or body value could not be decoded.
    Resolution,
}

impl ErrorCategory {
    /// Returns the HTTP status code for this category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::NoMatch => StatusCode::NOT_FOUND,
            Self::Misconfigured | Self::Resolution => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// A request could not be routed to a handler.
///
/// # Example
///
/// ```
/// use orbit_core::{ErrorCategory, RouteError};
///
/// let err = RouteError::param_resolution("user", "invalid digit found in string");
/// assert_eq!(err.category(), ErrorCategory::Resolution);
/// assert_eq!(err.param(), Some("user"));
/// assert_eq!(err.status_code().as_u16(), 503);
/// assert!(!err.is_does_not_match());
/// ```
#[derive(Error, Debug)]
pub enum RouteError {
    /// The route does not accept this request. Try the next one.
    #[error("route doesn't match ({reason})")]
    DoesNotMatch {
        /// What did not match.
        reason: String,
    },

    /// The route was set up inconsistently: a resolver produced the wrong
    /// type or the matcher disagrees with its placeholder names.
    #[error("route is misconfigured: {message}")]
    Misconfigured {
        /// Description of the inconsistency.
        message: String,
    },

    /// A placeholder value could not be resolved into its declared type.
    #[error("couldn't get param '{param}': {source}")]
    ParamResolution {
        /// Placeholder name.
        param: String,
        /// The resolver's error.
        #[source]
        source: BoxError,
    },

    /// The request body could not be resolved into its declared type.
    #[error("couldn't resolve request body: {source}")]
    BodyResolution {
        /// The resolver's error.
        #[source]
        source: BoxError,
    },
}

impl RouteError {
    /// Creates a does-not-match signal.
    #[must_use]
    pub fn does_not_match(reason: impl Into<String>) -> Self {
        Self::DoesNotMatch {
            reason: reason.into(),
        }
    }

    /// Creates a misconfiguration error.
    #[must_use]
    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::Misconfigured {
            message: message.into(),
        }
    }

    /// Creates a param resolution error for the named placeholder.
    pub fn param_resolution(param: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ParamResolution {
            param: param.into(),
            source: source.into(),
        }
    }

    /// Creates a body resolution error.
    pub fn body_resolution(source: impl Into<BoxError>) -> Self {
        Self::BodyResolution {
            source: source.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::DoesNotMatch { .. } => ErrorCategory::NoMatch,
            Self::Misconfigured { .. } => ErrorCategory::Misconfigured,
            Self::ParamResolution { .. } | Self::BodyResolution { .. } => {
                ErrorCategory::Resolution
            }
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns `true` for the soft signal that lets dispatch continue.
    #[must_use]
    pub const fn is_does_not_match(&self) -> bool {
        matches!(self, Self::DoesNotMatch { .. })
    }

    /// Returns the placeholder name for param resolution failures.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        match self {
            Self::ParamResolution { param, .. } => Some(param),
            _ => None,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DoesNotMatch { .. } => "ROUTE_NOT_FOUND",
            Self::Misconfigured { .. } => "ROUTE_MISCONFIGURED",
            Self::ParamResolution { .. } => "PARAM_RESOLUTION_FAILED",
            Self::BodyResolution { .. } => "BODY_RESOLUTION_FAILED",
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }
}

impl From<TokenizeError> for RouteError {
    fn from(err: TokenizeError) -> Self {
        match err {
            TokenizeError::DoesNotMatch { path } => Self::DoesNotMatch {
                reason: format!("path '{path}'"),
            },
            err @ TokenizeError::ParamCount { .. } => Self::Misconfigured {
                message: err.to_string(),
            },
        }
    }
}

/// A route table could not be baked.
#[derive(Error, Debug)]
pub enum BakeError {
    /// The template is structurally invalid.
    #[error("couldn't compile route template '{template}': {source}")]
    Template {
        /// The offending template.
        template: String,
        /// What is wrong with it.
        #[source]
        source: TemplateError,
    },

    /// A param spec names a placeholder the template does not declare.
    #[error("route template '{template}' has no placeholder named '{param}'")]
    UnknownParam {
        /// The offending template.
        template: String,
        /// The undeclared placeholder name.
        param: String,
    },
}

impl BakeError {
    /// Returns the template that failed to bake.
    #[must_use]
    pub fn template(&self) -> &str {
        match self {
            Self::Template { template, .. } | Self::UnknownParam { template, .. } => template,
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
}
