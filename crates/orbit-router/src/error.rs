//! Template and tokenizer error types.

use thiserror::Error;

/// A route template could not be compiled.
///
/// Every variant except [`TemplateError::Pattern`] describes a structural
/// problem with the braces or names in the template. Positions are byte
/// offsets into the template string.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A `{` appeared while a placeholder was already open.
    #[error("nested '{{' at byte {position} in route template")]
    Nested {
        /// Offset of the offending brace.
        position: usize,
    },

    /// A `}` appeared with no placeholder open.
    #[error("unopened '}}' at byte {position} in route template")]
    Unopened {
        /// Offset of the offending brace.
        position: usize,
    },

    /// The template ended while a placeholder was still open.
    #[error("unclosed '{{' opened at byte {position} in route template")]
    Unclosed {
        /// Offset of the brace that was never closed.
        position: usize,
    },

    /// A placeholder has no name (`{}`).
    #[error("empty placeholder name at byte {position} in route template")]
    EmptyName {
        /// Offset of the opening brace.
        position: usize,
    },

    /// The same placeholder name is used twice.
    #[error("placeholder '{name}' appears more than once in route template")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// The generated pattern was rejected by the regex engine.
    #[error("pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),
}

impl TemplateError {
    /// Returns `true` if the braces themselves are unbalanced or nested.
    #[must_use]
    pub fn is_unbalanced(&self) -> bool {
        matches!(
            self,
            Self::Nested { .. } | Self::Unopened { .. } | Self::Unclosed { .. }
        )
    }
}

/// A compiled template could not produce params for a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// The path is not matched by the template. Callers should try the next
    /// candidate route.
    #[error("route doesn't match ({path})")]
    DoesNotMatch {
        /// The request path that was tried.
        path: String,
    },

    /// The matcher produced a different number of captures than there are
    /// placeholder names. The matcher and the names are built together, so
    /// this means the template setup is broken.
    #[error("wrong param count (want {expected} got {found})")]
    ParamCount {
        /// Number of placeholder names.
        expected: usize,
        /// Number of captures produced by the matcher.
        found: usize,
    },
}

impl TokenizeError {
    /// Returns `true` for the soft "try another route" signal.
    #[must_use]
    pub fn is_does_not_match(&self) -> bool {
        matches!(self, Self::DoesNotMatch { .. })
    }
}
