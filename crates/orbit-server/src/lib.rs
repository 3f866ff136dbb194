//! # Orbit Server
//!
//! Route tables, dispatch and the HTTP server for Orbit.
//!
//! - [`RouteDefinition`]: a template, a method allow-list, typed param and
//!   body declarations, and a handler
//! - [`RouterBuilder`] / [`Router`]: registration, baking and first-match
//!   dispatch
//! - [`Server`]: Hyper HTTP/1.1 serving with body limits, timeouts and
//!   graceful shutdown
//! - [`ServerConfig`]: TOML and environment configuration
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use orbit_extract::{BasicInt, BasicString, ResolvedBody, ResolvedParams};
//! use orbit_server::{RouteDefinition, Router};
//!
//! async fn event(_: Request<Bytes>, params: ResolvedParams, _: ResolvedBody) -> String {
//!     let user = params.get::<BasicInt>("user").map(|u| u.value()).unwrap_or_default();
//!     let event = params.get::<BasicString>("event").map(|e| e.to_string()).unwrap_or_default();
//!     format!("{user}:{event}")
//! }
//!
//! # tokio_test::block_on(async {
//! let router = Router::builder()
//!     .route(
//!         RouteDefinition::new("/user/{user}/event/{event}", event)
//!             .methods(["GET"])
//!             .param::<BasicInt>("user")
//!             .param::<BasicString>("event"),
//!     )
//!     .bake()
//!     .unwrap();
//!
//! let request = Request::get("/user/3/event/launch").body(Bytes::new()).unwrap();
//! assert_eq!(router.handle(request).await.status(), StatusCode::OK);
//!
//! let request = Request::get("/user/x/event/launch").body(Bytes::new()).unwrap();
//! assert_eq!(router.handle(request).await.status(), StatusCode::SERVICE_UNAVAILABLE);
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/orbit-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod handler;
mod response;
mod route;
mod router;
mod server;
mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_SIZE,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS, ENV_PREFIX,
};
pub use error::{ConfigError, ServerError};
pub use handler::{BoxFuture, Handler};
pub use response::{
    error_response, route_error_response, HttpResponse, IntoResponse, JsonResponse, ResponseBody,
};
pub use route::{CompiledRoute, Resolution, RouteDefinition};
pub use router::{DispatchOutcome, Router, RouterBuilder};
pub use server::Server;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
