//! Capability traits and the type-erased resolver seam.
//!
//! Application types opt in to resolution by implementing [`FromParam`]
//! and/or [`FromBody`]. The produced type is `Self`, so a typed resolver can
//! never hand back something else.
//!
//! Routes store resolvers behind [`ParamResolver`] and [`BodyResolver`]
//! trait objects. Custom implementations of those traits are free to return
//! any [`AnyValue`], which is why the produced value is checked against
//! [`ParamResolver::expected`] before it reaches a handler.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use orbit_core::BoxError;

/// Readable cursor over a buffered request body.
///
/// Implements [`std::io::Read`]. The buffer itself is reference counted, so
/// handing a cursor to a resolver leaves the request's copy untouched.
pub type BodyStream = bytes::buf::Reader<Bytes>;

/// Types that can be built from a raw placeholder value.
///
/// # Example
///
/// ```rust
/// use orbit_extract::FromParam;
///
/// struct Slug(String);
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("slug must be lowercase")]
/// struct NotLowercase;
///
/// impl FromParam for Slug {
///     type Rejection = NotLowercase;
///
///     fn from_param(raw: &str) -> Result<Self, Self::Rejection> {
///         if raw.chars().any(|c| c.is_ascii_uppercase()) {
///             return Err(NotLowercase);
///         }
///         Ok(Slug(raw.to_string()))
///     }
/// }
///
/// assert!(Slug::from_param("hello-world").is_ok());
/// assert!(Slug::from_param("Hello").is_err());
/// ```
pub trait FromParam: Sized + Send + Sync + 'static {
    /// Error returned when the raw value is rejected.
    type Rejection: Into<BoxError>;

    /// Builds the value from the captured placeholder text.
    fn from_param(raw: &str) -> Result<Self, Self::Rejection>;
}

/// Types that can be built from a request body.
///
/// The resolver owns the stream it is given.
pub trait FromBody: Sized + Send + Sync + 'static {
    /// Error returned when the body is rejected.
    type Rejection: Into<BoxError>;

    /// Builds the value by reading the body.
    fn from_body(body: BodyStream) -> Result<Self, Self::Rejection>;
}

macro_rules! impl_from_param_via_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromParam for $ty {
                type Rejection = <$ty as std::str::FromStr>::Err;

                fn from_param(raw: &str) -> Result<Self, Self::Rejection> {
                    raw.parse()
                }
            }
        )*
    };
}

impl_from_param_via_from_str!(
    String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl FromBody for Bytes {
    type Rejection = std::convert::Infallible;

    fn from_body(body: BodyStream) -> Result<Self, Self::Rejection> {
        Ok(body.into_inner())
    }
}

impl FromBody for String {
    type Rejection = std::string::FromUtf8Error;

    fn from_body(body: BodyStream) -> Result<Self, Self::Rejection> {
        String::from_utf8(body.into_inner().to_vec())
    }
}

/// The type a resolver promises to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpectedType {
    id: TypeId,
    name: &'static str,
}

impl ExpectedType {
    /// Describes `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the type's id.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the type's name, for diagnostics only.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if `value` holds exactly this type.
    #[must_use]
    pub fn matches(&self, value: &AnyValue) -> bool {
        value.type_id() == self.id
    }
}

/// A resolved value with its concrete type erased.
///
/// # Example
///
/// ```rust
/// use orbit_extract::AnyValue;
///
/// let value = AnyValue::new(42_i64);
/// assert!(value.is::<i64>());
/// assert_eq!(value.downcast_ref::<i64>(), Some(&42));
/// assert_eq!(value.downcast_ref::<u64>(), None);
/// ```
pub struct AnyValue {
    inner: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl AnyValue {
    /// Erases `value`.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns the id of the stored value's concrete type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    /// Returns the stored value's type name, for diagnostics only.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the stored value is a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrows the stored value as a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Takes the stored value as a `T`, handing `self` back on mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        self.inner
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|inner| Self { inner, type_name })
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyValue")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Type-erased placeholder resolver stored in a route.
pub trait ParamResolver: Send + Sync {
    /// The type this resolver promises to produce.
    fn expected(&self) -> ExpectedType;

    /// Resolves a raw placeholder value.
    fn resolve(&self, raw: &str) -> Result<AnyValue, BoxError>;
}

/// Type-erased body resolver stored in a route.
pub trait BodyResolver: Send + Sync {
    /// The type this resolver promises to produce.
    fn expected(&self) -> ExpectedType;

    /// Resolves a body stream.
    fn resolve(&self, body: BodyStream) -> Result<AnyValue, BoxError>;
}

/// [`ParamResolver`] backed by a [`FromParam`] implementation.
pub struct TypedParam<T>(PhantomData<fn() -> T>);

impl<T> TypedParam<T> {
    /// Creates the resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TypedParam<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FromParam> ParamResolver for TypedParam<T> {
    fn expected(&self) -> ExpectedType {
        ExpectedType::of::<T>()
    }

    fn resolve(&self, raw: &str) -> Result<AnyValue, BoxError> {
        T::from_param(raw).map(AnyValue::new).map_err(Into::into)
    }
}

/// [`BodyResolver`] backed by a [`FromBody`] implementation.
pub struct TypedBody<T>(PhantomData<fn() -> T>);

impl<T> TypedBody<T> {
    /// Creates the resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TypedBody<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FromBody> BodyResolver for TypedBody<T> {
    fn expected(&self) -> ExpectedType {
        ExpectedType::of::<T>()
    }

    fn resolve(&self, body: BodyStream) -> Result<AnyValue, BoxError> {
        T::from_body(body).map(AnyValue::new).map_err(Into::into)
    }
}

/// [`ParamResolver`] backed by a closure.
pub struct FnParam<T, F> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> FnParam<T, F> {
    /// Wraps `f`.
    pub fn new<E>(f: F) -> Self
    where
        F: Fn(&str) -> Result<T, E>,
    {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<T, F, E> ParamResolver for FnParam<T, F>
where
    T: Any + Send + Sync,
    F: Fn(&str) -> Result<T, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn expected(&self) -> ExpectedType {
        ExpectedType::of::<T>()
    }

    fn resolve(&self, raw: &str) -> Result<AnyValue, BoxError> {
        (self.f)(raw).map(AnyValue::new).map_err(Into::into)
    }
}
