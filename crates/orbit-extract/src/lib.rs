//! # Orbit Extract
//!
//! Typed resolution of path params and request bodies for Orbit.
//!
//! A route declares which type each placeholder and the body must become.
//! At dispatch time the raw captures and the buffered body are run through
//! those declarations, and the handler receives typed values.
//!
//! ## Capability traits
//!
//! | Trait | Input | Built-in implementations |
//! |-------|-------|--------------------------|
//! | [`FromParam`] | captured placeholder text | [`BasicString`], [`BasicInt`], `String`, integers, floats, `bool`, `char` |
//! | [`FromBody`] | [`BodyStream`] over the body | [`Json<T>`], `String`, `Bytes` |
//!
//! ## Declaring types
//!
//! ```rust
//! use bytes::Bytes;
//! use orbit_extract::{BasicInt, BodySpec, Json, ParamSpec};
//! use orbit_router::Params;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Rsvp {
//!     guests: u8,
//! }
//!
//! let params = ParamSpec::new().param::<BasicInt>("event");
//! let body = BodySpec::of::<Json<Rsvp>>();
//!
//! let raw: Params = [("event", "12")].into_iter().collect();
//! let resolved = params.resolve(raw).unwrap();
//! assert_eq!(resolved.get::<BasicInt>("event").unwrap().value(), 12);
//!
//! let rsvp = body.resolve(&Bytes::from_static(br#"{"guests": 2}"#)).unwrap();
//! assert_eq!(rsvp.get::<Json<Rsvp>>().unwrap().guests, 2);
//! ```
//!
//! ## Error Handling
//!
//! Resolution reports [`orbit_core::RouteError`]:
//!
//! - a resolver rejecting its input is a resolution error naming the param
//! - a resolver producing a type other than the one it declared is a
//!   misconfiguration

#![doc(html_root_url = "https://docs.rs/orbit-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod basic;
mod binding;
mod error;
mod json;
mod resolved;
mod resolver;

pub use basic::{BasicInt, BasicString};
pub use binding::{BodySpec, ParamSpec};
pub use error::{JsonRejection, ParamAccessError};
pub use json::Json;
pub use resolved::{ResolvedBody, ResolvedParams};
pub use resolver::{
    AnyValue, BodyResolver, BodyStream, ExpectedType, FnParam, FromBody, FromParam,
    ParamResolver, TypedBody, TypedParam,
};

// Re-export useful types from dependencies
pub use orbit_router::Params;
