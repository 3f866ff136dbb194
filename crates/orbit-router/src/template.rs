//! Route template compilation and path tokenization.
//!
//! A template like `/a/b/{c}/d` is scanned once for placeholder spans, then
//! turned into an anchored regular expression with one capture group per
//! placeholder. The compiled form is immutable and can be shared freely
//! between request-handling tasks.

use regex::Regex;

use crate::error::{TemplateError, TokenizeError};
use crate::params::Params;

/// Capture group emitted for every placeholder.
///
/// Placeholder values are one or more of `[a-zA-Z0-9_-]`; they never
/// contain a `/`.
pub const PLACEHOLDER_PATTERN: &str = "([a-zA-Z0-9_-]+)";

/// Byte range of a `{name}` span, end-exclusive (includes both braces).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

/// A route template compiled into a matcher.
///
/// # Example
///
/// ```rust
/// use orbit_router::CompiledTemplate;
///
/// let template = CompiledTemplate::compile("/user/{user}/event/{event}").unwrap();
///
/// assert_eq!(template.template(), "/user/{user}/event/{event}");
/// assert_eq!(template.param_names(), ["user", "event"]);
/// assert_eq!(
///     template.pattern(),
///     "^/user/([a-zA-Z0-9_-]+)/event/([a-zA-Z0-9_-]+)/?$"
/// );
/// ```
///
/// # Adjacent placeholders
///
/// `{foo}{bar}` with no literal between them compiles fine, but the split
/// between the two captures is decided by the regex engine: the first
/// placeholder is greedy and takes everything except the final character.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    template: String,
    regex: Regex,
    param_names: Vec<String>,
}

impl CompiledTemplate {
    /// Compiles a route template.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] if braces are nested, unopened or
    /// unclosed, if a placeholder name is empty or repeated, or if the
    /// generated pattern fails to compile.
    pub fn compile(template: impl Into<String>) -> Result<Self, TemplateError> {
        let template = template.into();
        let spans = placeholder_spans(&template)?;

        let mut pattern = String::with_capacity(template.len() + spans.len() * 16 + 4);
        let mut param_names: Vec<String> = Vec::with_capacity(spans.len());
        let mut last_end = 0;

        pattern.push('^');
        for span in &spans {
            pattern.push_str(&regex::escape(&template[last_end..span.start]));
            last_end = span.end;

            // Trim the braces: {foo} -> foo
            let name = &template[span.start + 1..span.end - 1];
            if name.is_empty() {
                return Err(TemplateError::EmptyName {
                    position: span.start,
                });
            }
            if param_names.iter().any(|existing| existing == name) {
                return Err(TemplateError::DuplicateName {
                    name: name.to_string(),
                });
            }
            param_names.push(name.to_string());

            pattern.push_str(PLACEHOLDER_PATTERN);
        }
        pattern.push_str(&regex::escape(&template[last_end..]));
        pattern.push_str("/?$");

        let regex = Regex::new(&pattern)?;

        Ok(Self {
            template,
            regex,
            param_names,
        })
    }

    /// Returns the template this matcher was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the generated regular expression source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns the placeholder names in declaration order.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns `true` if the template declares a placeholder with this name.
    #[must_use]
    pub fn has_param(&self, name: &str) -> bool {
        self.param_names.iter().any(|n| n == name)
    }

    /// Returns `true` if the path is matched, without extracting values.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Extracts placeholder values from a request path.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::DoesNotMatch`] when the path is not matched.
    /// See [`tokenize`] for the misconfiguration case.
    pub fn tokenize(&self, path: &str) -> Result<Params, TokenizeError> {
        tokenize(&self.regex, &self.param_names, path)
    }
}

/// Applies a matcher to a path and zips the captures with `names`.
///
/// The matcher must match the whole path exactly once. Captures are paired
/// with names by position.
///
/// # Errors
///
/// - [`TokenizeError::DoesNotMatch`] if the matcher does not match `path`
/// - [`TokenizeError::ParamCount`] if the matcher's capture groups and
///   `names` disagree in number
///
/// # Example
///
/// ```rust
/// use orbit_router::{tokenize, TokenizeError};
/// use regex::Regex;
///
/// let regex = Regex::new("^/items/([a-z]+)/?$").unwrap();
///
/// let params = tokenize(&regex, &["item"], "/items/apple").unwrap();
/// assert_eq!(params.get("item"), Some("apple"));
///
/// let err = tokenize(&regex, &["item", "extra"], "/items/apple").unwrap_err();
/// assert_eq!(err, TokenizeError::ParamCount { expected: 2, found: 1 });
/// ```
pub fn tokenize<S: AsRef<str>>(
    regex: &Regex,
    names: &[S],
    path: &str,
) -> Result<Params, TokenizeError> {
    let Some(captures) = regex.captures(path) else {
        return Err(TokenizeError::DoesNotMatch {
            path: path.to_string(),
        });
    };

    let found = captures.len() - 1;
    if found != names.len() {
        return Err(TokenizeError::ParamCount {
            expected: names.len(),
            found,
        });
    }

    let mut params = Params::with_capacity(found);
    for (name, group) in names.iter().zip(captures.iter().skip(1)) {
        let value = group.map_or("", |m| m.as_str());
        params.push(name.as_ref(), value);
    }

    Ok(params)
}

/// Scans a template for `{name}` spans, checking that braces are balanced
/// and never nested.
fn placeholder_spans(template: &str) -> Result<Vec<Span>, TemplateError> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;

    for (idx, byte) in template.bytes().enumerate() {
        match byte {
            b'{' => {
                if open.is_some() {
                    return Err(TemplateError::Nested { position: idx });
                }
                open = Some(idx);
            }
            b'}' => {
                let Some(start) = open.take() else {
                    return Err(TemplateError::Unopened { position: idx });
                };
                spans.push(Span {
                    start,
                    end: idx + 1,
                });
            }
            _ => {}
        }
    }

    if let Some(position) = open {
        return Err(TemplateError::Unclosed { position });
    }

    Ok(spans)
}
