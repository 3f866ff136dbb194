//! # Orbit Core
//!
//! Core types shared by the Orbit router crates.
//!
//! - [`RouteError`] - Per-request routing and resolution failures
//! - [`BakeError`] - Structural failures while compiling a route table
//! - [`ErrorCategory`] - Classification driving the HTTP status of a failure
//! - [`RequestId`] - UUID v7 request identifier

#![doc(html_root_url = "https://docs.rs/orbit-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;

pub use context::{RequestId, REQUEST_ID_HEADER};
pub use error::{
    BakeError, BoxError, ErrorCategory, ErrorDetail, ErrorEnvelope, RouteError, RouteResult,
};
