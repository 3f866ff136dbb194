//! # Orbit
//!
//! **Typed path-template routing for HTTP services**
//!
//! Orbit matches requests against templates such as
//! `/user/{user}/event/{event}`, converts each captured placeholder and the
//! request body into application types, and hands them to the handler
//! already typed:
//!
//! - **Templates** compile once, when the router is baked
//! - **First match wins**: routes are tried in registration order
//! - **Typed params**: any [`FromParam`](extract::FromParam) type can be bound
//!   to a placeholder
//! - **Typed bodies**: any [`FromBody`](extract::FromBody) type can be bound
//!   to the body, which stays readable for the handler
//!
//! A path that matches no route is a 404. A route that matches but whose
//! params or body fail to resolve ends dispatch with a 503.
//!
//! ## Quick Start
//!
//! ```rust
//! use orbit::prelude::*;
//!
//! async fn show(_: Request<Bytes>, params: ResolvedParams, _: ResolvedBody) -> String {
//!     match params.get::<BasicInt>("id") {
//!         Ok(id) => format!("item {id}"),
//!         Err(err) => err.to_string(),
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let router = Router::builder()
//!     .route(RouteDefinition::new("/items/{id}", show).methods(["GET"]).param::<BasicInt>("id"))
//!     .bake()
//!     .unwrap();
//!
//! let response = router.handle(Request::get("/items/9").body(Bytes::new()).unwrap()).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! # });
//! ```
//!
//! ## Crates
//!
//! ```text
//! orbit-router     templates, tokenization, method filters
//! orbit-core       error taxonomy, request ids
//! orbit-extract    FromParam / FromBody, param and body specs
//! orbit-server     routes, router, hyper server, config
//! orbit-telemetry  logging setup
//! ```

#![doc(html_root_url = "https://docs.rs/orbit/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use orbit_core as core;

// Re-export template matching
pub use orbit_router as router;

// Re-export resolution types
pub use orbit_extract as extract;

// Re-export server types
pub use orbit_server as server;

// Re-export logging setup
pub use orbit_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use orbit::prelude::*;
///
/// let builder = Router::builder();
/// assert!(builder.is_empty());
/// ```
pub mod prelude {
    pub use bytes::Bytes;
    pub use http::{Method, Request, StatusCode};

    pub use orbit_core::{BakeError, ErrorCategory, RequestId, RouteError};
    pub use orbit_extract::{
        BasicInt, BasicString, BodySpec, BodyStream, FromBody, FromParam, Json, ParamSpec,
        ResolvedBody, ResolvedParams,
    };
    pub use orbit_router::MethodFilter;
    pub use orbit_server::{
        HttpResponse, IntoResponse, JsonResponse, RouteDefinition, Router, RouterBuilder, Server,
        ServerConfig, ShutdownSignal,
    };
    pub use orbit_telemetry::{init_logging, LogConfig};
}
