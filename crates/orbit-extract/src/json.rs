//! JSON request bodies.

use std::ops::Deref;

use serde::de::DeserializeOwned;

use crate::error::JsonRejection;
use crate::resolver::{BodyStream, FromBody};

/// A request body decoded as JSON into `T`.
///
/// # Example
///
/// ```rust
/// use bytes::{Buf, Bytes};
/// use orbit_extract::{FromBody, Json};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct CreateUser {
///     name: String,
///     email: String,
/// }
///
/// let body = Bytes::from_static(br#"{"name": "Alice", "email": "alice@example.com"}"#);
///
/// let Json(user) = Json::<CreateUser>::from_body(body.reader()).unwrap();
/// assert_eq!(user.name, "Alice");
/// assert_eq!(user.email, "alice@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consumes the Json and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromBody for Json<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    type Rejection = JsonRejection;

    fn from_body(body: BodyStream) -> Result<Self, Self::Rejection> {
        if body.get_ref().is_empty() {
            return Err(JsonRejection::Empty);
        }
        let value = serde_json::from_reader(body)?;
        Ok(Json(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{Buf, Bytes};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Event {
        name: String,
        attendees: u32,
    }

    fn decode(body: &'static [u8]) -> Result<Json<Event>, JsonRejection> {
        Json::from_body(Bytes::from_static(body).reader())
    }

    #[test]
    fn test_json_decodes() {
        let Json(event) = decode(br#"{"name":"launch","attendees":3}"#).unwrap();
        assert_eq!(
            event,
            Event {
                name: "launch".into(),
                attendees: 3
            }
        );
    }

    #[test]
    fn test_json_empty_body() {
        assert!(matches!(decode(b""), Err(JsonRejection::Empty)));
    }

    #[test]
    fn test_json_malformed() {
        assert!(matches!(
            decode(br#"{"name":"launch""#),
            Err(JsonRejection::Invalid(_))
        ));
    }

    #[test]
    fn test_json_wrong_shape() {
        assert!(matches!(
            decode(br#"{"name":"launch","attendees":"many"}"#),
            Err(JsonRejection::Invalid(_))
        ));
    }

    #[test]
    fn test_json_trailing_garbage_rejected() {
        assert!(decode(br#"{"name":"a","attendees":1} extra"#).is_err());
    }
}
