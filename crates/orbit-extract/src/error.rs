//! Errors raised by the built-in resolvers and accessors.

use thiserror::Error;

/// A resolved param could not be read back with the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamAccessError {
    /// No value was resolved under this name.
    #[error("no resolved param named '{name}'")]
    Missing {
        /// The requested name.
        name: String,
    },

    /// A value exists but holds a different type.
    #[error("param '{name}' holds {actual}, not {requested}")]
    WrongType {
        /// The requested name.
        name: String,
        /// The type that was asked for.
        requested: &'static str,
        /// The type actually stored.
        actual: &'static str,
    },
}

/// A JSON body could not be decoded.
#[derive(Debug, Error)]
pub enum JsonRejection {
    /// The body was empty.
    #[error("empty request body")]
    Empty,

    /// The body was not valid JSON for the target type.
    #[error("invalid JSON body: {0}")]
    Invalid(#[from] serde_json::Error),
}
