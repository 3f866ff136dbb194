//! Declared param and body types for a route.
//!
//! A [`ParamSpec`] maps placeholder names to the type each one must resolve
//! to. A [`BodySpec`] names the type the request body must resolve to.
//! Both are set up before the router is baked and only read afterwards.

use std::fmt;
use std::sync::Arc;

use bytes::{Buf, Bytes};
use orbit_core::RouteError;
use orbit_router::Params;

use crate::resolved::{ResolvedBody, ResolvedParams};
use crate::resolver::{
    AnyValue, BodyResolver, ExpectedType, FnParam, FromBody, FromParam, ParamResolver, TypedBody,
    TypedParam,
};

#[derive(Clone)]
struct ParamEntry {
    name: String,
    resolver: Arc<dyn ParamResolver>,
}

/// Placeholder name to declared type, in declaration order.
///
/// # Example
///
/// ```rust
/// use orbit_extract::{BasicInt, BasicString, ParamSpec};
/// use orbit_router::Params;
///
/// let spec = ParamSpec::new()
///     .param::<BasicInt>("user")
///     .param::<BasicString>("event");
///
/// let raw: Params = [("user", "42"), ("event", "launch")].into_iter().collect();
/// let resolved = spec.resolve(raw).unwrap();
///
/// assert_eq!(resolved.get::<BasicInt>("user").unwrap().value(), 42);
/// assert_eq!(resolved.get::<BasicString>("event").unwrap().as_str(), "launch");
///
/// let raw: Params = [("user", "abc"), ("event", "launch")].into_iter().collect();
/// let err = spec.resolve(raw).unwrap_err();
/// assert_eq!(err.param(), Some("user"));
/// ```
#[derive(Clone, Default)]
pub struct ParamSpec {
    entries: Vec<ParamEntry>,
}

impl ParamSpec {
    /// Creates an empty spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that placeholder `name` resolves to `T`.
    ///
    /// Declaring the same name twice replaces the earlier type.
    #[must_use]
    pub fn param<T: FromParam>(self, name: impl Into<String>) -> Self {
        self.with_resolver(name, TypedParam::<T>::new())
    }

    /// Declares a closure resolver for placeholder `name`.
    #[must_use]
    pub fn param_with<T, F, E>(self, name: impl Into<String>, f: F) -> Self
    where
        T: std::any::Any + Send + Sync,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        E: Into<orbit_core::BoxError> + 'static,
    {
        self.with_resolver(name, FnParam::new(f))
    }

    /// Declares a custom resolver for placeholder `name`.
    #[must_use]
    pub fn with_resolver(
        mut self,
        name: impl Into<String>,
        resolver: impl ParamResolver + 'static,
    ) -> Self {
        let entry = ParamEntry {
            name: name.into(),
            resolver: Arc::new(resolver),
        };
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Iterates over the declared names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Returns the declared type for `name`.
    #[must_use]
    pub fn expected(&self, name: &str) -> Option<ExpectedType> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.resolver.expected())
    }

    /// Returns the number of declared params.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves every declared param from the raw captures.
    ///
    /// Params are resolved in declaration order. The first failure aborts
    /// and nothing resolved so far is returned.
    ///
    /// # Errors
    ///
    /// - [`RouteError::ParamResolution`] if a resolver rejects its value
    /// - [`RouteError::Misconfigured`] if a declared name has no capture, or
    ///   a resolver produces a type other than the one it declared
    pub fn resolve(&self, raw: Params) -> Result<ResolvedParams, RouteError> {
        let mut values = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let Some(text) = raw.get(&entry.name) else {
                return Err(RouteError::misconfigured(format!(
                    "param '{}' has no capture in the matched template",
                    entry.name
                )));
            };

            let value = entry
                .resolver
                .resolve(text)
                .map_err(|source| RouteError::param_resolution(entry.name.clone(), source))?;

            check_type(entry.resolver.expected(), &value, || {
                format!("param '{}'", entry.name)
            })?;

            values.push((entry.name.clone(), value));
        }

        Ok(ResolvedParams::new(values, raw))
    }
}

impl fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|e| (&e.name, e.resolver.expected().name())),
            )
            .finish()
    }
}

/// Declared body type for a route.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use orbit_extract::{BodySpec, Json};
///
/// let spec = BodySpec::of::<Json<Vec<u32>>>();
/// let body = Bytes::from_static(b"[1, 2, 3]");
///
/// let resolved = spec.resolve(&body).unwrap();
/// assert_eq!(resolved.get::<Json<Vec<u32>>>().unwrap().0, [1, 2, 3]);
///
/// // The caller's copy is still intact.
/// assert_eq!(&body[..], b"[1, 2, 3]");
/// ```
#[derive(Clone)]
pub struct BodySpec {
    resolver: Arc<dyn BodyResolver>,
}

impl BodySpec {
    /// Declares that the body resolves to `T`.
    #[must_use]
    pub fn of<T: FromBody>() -> Self {
        Self::with_resolver(TypedBody::<T>::new())
    }

    /// Declares a custom body resolver.
    #[must_use]
    pub fn with_resolver(resolver: impl BodyResolver + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Returns the declared type.
    #[must_use]
    pub fn expected(&self) -> ExpectedType {
        self.resolver.expected()
    }

    /// Resolves the body from a buffered copy.
    ///
    /// The resolver reads from its own cursor over `body`; the caller's
    /// buffer is not consumed.
    ///
    /// # Errors
    ///
    /// - [`RouteError::BodyResolution`] if the resolver rejects the body
    /// - [`RouteError::Misconfigured`] if the resolver produces a type other
    ///   than the one it declared
    pub fn resolve(&self, body: &Bytes) -> Result<ResolvedBody, RouteError> {
        let value = self
            .resolver
            .resolve(body.clone().reader())
            .map_err(RouteError::body_resolution)?;

        check_type(self.resolver.expected(), &value, || "request body".to_string())?;

        Ok(ResolvedBody::Present(value))
    }
}

impl fmt::Debug for BodySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BodySpec")
            .field(&self.resolver.expected().name())
            .finish()
    }
}

fn check_type(
    expected: ExpectedType,
    value: &AnyValue,
    what: impl FnOnce() -> String,
) -> Result<(), RouteError> {
    if expected.matches(value) {
        return Ok(());
    }
    Err(RouteError::misconfigured(format!(
        "{} resolved to {}, declared as {}",
        what(),
        value.type_name(),
        expected.name()
    )))
}
