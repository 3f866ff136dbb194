//! Ready-made param types for the common cases.

use std::fmt;
use std::num::ParseIntError;
use std::ops::Deref;

use crate::resolver::FromParam;

/// A placeholder value taken as-is.
///
/// ```rust
/// use orbit_extract::{BasicString, FromParam};
///
/// let value = BasicString::from_param("launch-day").unwrap();
/// assert_eq!(value.as_str(), "launch-day");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasicString(pub String);

impl BasicString {
    /// Returns the value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromParam for BasicString {
    type Rejection = std::convert::Infallible;

    fn from_param(raw: &str) -> Result<Self, Self::Rejection> {
        Ok(Self(raw.to_string()))
    }
}

impl Deref for BasicString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for BasicString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A placeholder value parsed as a signed decimal integer.
///
/// ```rust
/// use orbit_extract::{BasicInt, FromParam};
///
/// assert_eq!(BasicInt::from_param("-17").unwrap().value(), -17);
/// assert!(BasicInt::from_param("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BasicInt(pub i64);

impl BasicInt {
    /// Returns the parsed value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl FromParam for BasicInt {
    type Rejection = ParseIntError;

    fn from_param(raw: &str) -> Result<Self, Self::Rejection> {
        raw.parse().map(Self)
    }
}

impl fmt::Display for BasicInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BasicInt> for i64 {
    fn from(value: BasicInt) -> Self {
        value.0
    }
}
