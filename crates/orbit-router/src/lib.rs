//! Path template compilation and tokenization for Orbit.
//!
//! This crate turns route templates such as `/users/{user}/events/{event}`
//! into anchored matchers and applies them to concrete request paths.
//!
//! # Features
//!
//! - **Template Compilation**: brace-delimited placeholders are validated and
//!   compiled once into a [`CompiledTemplate`]
//! - **Tokenization**: a request path yields its raw placeholder values as
//!   [`Params`], in declaration order
//! - **Method Filtering**: a case-insensitive allow-list of HTTP methods
//!   ([`MethodFilter`])
//!
//! # Example
//!
//! ```rust
//! use orbit_router::CompiledTemplate;
//!
//! let template = CompiledTemplate::compile("/a/b/{foo}/d/{bar}").unwrap();
//! assert_eq!(template.param_names(), ["foo", "bar"]);
//!
//! let params = template.tokenize("/a/b/hello/d/123").unwrap();
//! assert_eq!(params.get("foo"), Some("hello"));
//! assert_eq!(params.get("bar"), Some("123"));
//!
//! // A trailing slash is tolerated, anything else is a miss.
//! assert!(template.tokenize("/a/b/hello/d/123/").is_ok());
//! assert!(template.tokenize("/a/b/hello/d").is_err());
//! ```
//!
//! # Placeholder values
//!
//! A placeholder captures one or more characters from `[A-Za-z0-9_-]`, so a
//! captured value never spans a `/`. Literal text between placeholders is
//! matched verbatim.

mod error;
mod method_filter;
mod params;
mod template;

pub use error::{TemplateError, TokenizeError};
pub use method_filter::MethodFilter;
pub use params::Params;
pub use template::{tokenize, CompiledTemplate, PLACEHOLDER_PATTERN};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_and_tokenize() {
        let template = CompiledTemplate::compile("/users/{user}/events/{event}").unwrap();

        let params = template.tokenize("/users/42/events/launch-day").unwrap();
        assert_eq!(params.get("user"), Some("42"));
        assert_eq!(params.get("event"), Some("launch-day"));
    }

    #[test]
    fn test_tokenize_miss_is_soft() {
        let template = CompiledTemplate::compile("/users/{user}").unwrap();

        let err = template.tokenize("/posts/42").unwrap_err();
        assert!(err.is_does_not_match());
    }

    #[test]
    fn test_malformed_template() {
        assert!(CompiledTemplate::compile("/a/b/{c/d/{e}").is_err());
        assert!(CompiledTemplate::compile("/a/b}").is_err());
        assert!(CompiledTemplate::compile("/a/{b").is_err());
    }

    #[test]
    fn test_method_filter() {
        let filter = MethodFilter::from_names(["POST"]);
        assert!(filter.allows("post"));
        assert!(!filter.allows("GET"));
        assert!(MethodFilter::any().allows("DELETE"));
    }
}
