//! HTTP method allow-lists.
//!
//! A [`MethodFilter`] decides whether a route is willing to look at a
//! request at all. An empty filter allows every method.

use http::Method;
use smallvec::SmallVec;

/// Case-insensitive allow-list of HTTP methods for a single route.
///
/// # Example
///
/// ```rust
/// use orbit_router::MethodFilter;
/// use http::Method;
///
/// let filter = MethodFilter::new().post().put();
///
/// assert!(filter.allows_method(&Method::POST));
/// assert!(filter.allows("put"));
/// assert!(!filter.allows_method(&Method::GET));
///
/// // No methods configured: everything is allowed.
/// assert!(MethodFilter::any().allows("PATCH"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodFilter {
    /// Upper-cased method names. Empty means any method.
    allowed: SmallVec<[String; 4]>,
}

impl MethodFilter {
    /// Creates a filter that allows every method.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Creates an empty filter to be extended with the fluent methods.
    ///
    /// Until a method is added the filter allows everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from a list of method names.
    ///
    /// ```rust
    /// use orbit_router::MethodFilter;
    ///
    /// let filter = MethodFilter::from_names(["get", "HEAD"]);
    /// assert!(filter.allows("GET"));
    /// assert!(filter.allows("head"));
    /// assert!(!filter.allows("POST"));
    /// ```
    #[must_use]
    pub fn from_names<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        methods
            .into_iter()
            .fold(Self::default(), |filter, m| filter.method(m.as_ref()))
    }

    /// Allows GET.
    #[must_use]
    pub fn get(self) -> Self {
        self.method(Method::GET.as_str())
    }

    /// Allows POST.
    #[must_use]
    pub fn post(self) -> Self {
        self.method(Method::POST.as_str())
    }

    /// Allows PUT.
    #[must_use]
    pub fn put(self) -> Self {
        self.method(Method::PUT.as_str())
    }

    /// Allows DELETE.
    #[must_use]
    pub fn delete(self) -> Self {
        self.method(Method::DELETE.as_str())
    }

    /// Allows PATCH.
    #[must_use]
    pub fn patch(self) -> Self {
        self.method(Method::PATCH.as_str())
    }

    /// Allows HEAD.
    #[must_use]
    pub fn head(self) -> Self {
        self.method(Method::HEAD.as_str())
    }

    /// Allows OPTIONS.
    #[must_use]
    pub fn options(self) -> Self {
        self.method(Method::OPTIONS.as_str())
    }

    /// Allows an arbitrary method name. Blank names are ignored.
    #[must_use]
    pub fn method(mut self, method: &str) -> Self {
        let method = method.trim();
        if method.is_empty() {
            return self;
        }
        let upper = method.to_ascii_uppercase();
        if !self.allowed.contains(&upper) {
            self.allowed.push(upper);
        }
        self
    }

    /// Returns `true` if the filter lets `method` through.
    #[must_use]
    pub fn allows(&self, method: &str) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|m| m.eq_ignore_ascii_case(method))
    }

    /// Returns `true` if the filter lets `method` through.
    #[must_use]
    pub fn allows_method(&self, method: &Method) -> bool {
        self.allows(method.as_str())
    }

    /// Returns `true` if no methods are configured.
    #[must_use]
    pub fn is_any(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Iterates over the configured method names, upper-cased.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for MethodFilter {
    fn from(methods: [S; N]) -> Self {
        Self::from_names(methods)
    }
}

impl<S: AsRef<str>> From<Vec<S>> for MethodFilter {
    fn from(methods: Vec<S>) -> Self {
        Self::from_names(methods)
    }
}
