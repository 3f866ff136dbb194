//! Per-request resolution results handed to handlers.

use std::any::Any;

use orbit_router::Params;

use crate::error::ParamAccessError;
use crate::resolver::AnyValue;

/// Typed placeholder values for one request.
///
/// Values are stored type-erased and read back with [`get`](Self::get) or
/// [`take`](Self::take), which fail with [`ParamAccessError::WrongType`] if
/// the requested type is not the declared one. Placeholders without a
/// declared type stay available as raw strings through
/// [`raw`](Self::raw).
///
/// # Example
///
/// ```rust
/// use orbit_extract::{ParamSpec, BasicInt};
/// use orbit_router::Params;
///
/// let spec = ParamSpec::new().param::<BasicInt>("user");
/// let raw: Params = [("user", "42"), ("event", "launch")].into_iter().collect();
///
/// let resolved = spec.resolve(raw).unwrap();
/// assert_eq!(resolved.get::<BasicInt>("user").unwrap().value(), 42);
/// assert!(resolved.get::<String>("user").is_err());
/// assert_eq!(resolved.raw("event"), Some("launch"));
/// ```
#[derive(Debug, Default)]
pub struct ResolvedParams {
    values: Vec<(String, AnyValue)>,
    raw: Params,
}

impl ResolvedParams {
    pub(crate) fn new(values: Vec<(String, AnyValue)>, raw: Params) -> Self {
        Self { values, raw }
    }

    /// Borrows the value resolved for `name` as a `T`.
    pub fn get<T: Any>(&self, name: &str) -> Result<&T, ParamAccessError> {
        let value = self
            .values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| ParamAccessError::Missing {
                name: name.to_string(),
            })?;

        value
            .downcast_ref::<T>()
            .ok_or_else(|| ParamAccessError::WrongType {
                name: name.to_string(),
                requested: std::any::type_name::<T>(),
                actual: value.type_name(),
            })
    }

    /// Removes the value resolved for `name` and returns it as a `T`.
    ///
    /// On a type mismatch the value stays in place.
    pub fn take<T: Any>(&mut self, name: &str) -> Result<T, ParamAccessError> {
        let idx = self
            .values
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| ParamAccessError::Missing {
                name: name.to_string(),
            })?;

        if !self.values[idx].1.is::<T>() {
            return Err(ParamAccessError::WrongType {
                name: name.to_string(),
                requested: std::any::type_name::<T>(),
                actual: self.values[idx].1.type_name(),
            });
        }

        let (_, value) = self.values.remove(idx);
        value.downcast::<T>().map_err(|v| ParamAccessError::WrongType {
            name: name.to_string(),
            requested: std::any::type_name::<T>(),
            actual: v.type_name(),
        })
    }

    /// Returns `true` if a typed value exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|(n, _)| n == name)
    }

    /// Returns the number of typed values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no typed values exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the names of typed values in resolution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    /// Returns the raw captured text for any placeholder in the template.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.raw.get(name)
    }

    /// Returns all raw captures.
    #[must_use]
    pub fn raw_params(&self) -> &Params {
        &self.raw
    }
}

/// The typed body for one request.
#[derive(Debug, Default)]
pub enum ResolvedBody {
    /// The route declares no body type.
    #[default]
    Absent,
    /// The decoded body.
    Present(AnyValue),
}

impl ResolvedBody {
    /// Returns `true` if a body was resolved.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Borrows the body as a `T`. `None` if absent or of another type.
    #[must_use]
    pub fn get<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Present(value) => value.downcast_ref::<T>(),
            Self::Absent => None,
        }
    }

    /// Takes the body as a `T`. `None` if absent or of another type.
    #[must_use]
    pub fn into_inner<T: Any>(self) -> Option<T> {
        match self {
            Self::Present(value) => value.downcast::<T>().ok(),
            Self::Absent => None,
        }
    }

    /// Returns the stored type name, if any.
    #[must_use]
    pub const fn type_name(&self) -> Option<&'static str> {
        match self {
            Self::Present(value) => Some(value.type_name()),
            Self::Absent => None,
        }
    }
}
