//! Route tables and request dispatch.
//!
//! Routes are collected in a [`RouterBuilder`] and baked into an immutable
//! [`Router`]. Baking compiles every template up front, so a malformed
//! template or an undeclared param is reported once at startup instead of
//! on every request.
//!
//! Dispatch walks the routes in registration order. A route that does not
//! match is skipped; the first route that matches either handles the
//! request or, if resolution fails, ends the dispatch with that failure.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use orbit_extract::{BasicInt, ResolvedBody, ResolvedParams};
//! use orbit_server::{RouteDefinition, Router};
//!
//! async fn get_user(_: Request<Bytes>, params: ResolvedParams, _: ResolvedBody) -> String {
//!     match params.get::<BasicInt>("id") {
//!         Ok(id) => format!("user {id}"),
//!         Err(err) => err.to_string(),
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let router = Router::builder()
//!     .route(RouteDefinition::new("/users/{id}", get_user).param::<BasicInt>("id"))
//!     .bake()
//!     .unwrap();
//!
//! let request = Request::get("/users/7").body(Bytes::new()).unwrap();
//! let response = router.handle(request).await;
//! assert_eq!(response.status(), StatusCode::OK);
//!
//! let request = Request::get("/posts/7").body(Bytes::new()).unwrap();
//! assert_eq!(router.handle(request).await.status(), StatusCode::NOT_FOUND);
//! # });
//! ```

use std::sync::Arc;

use bytes::Bytes;
use http::header::HeaderValue;
use http::Request;
use tracing::Instrument;

use orbit_core::{BakeError, RequestId, RouteError, REQUEST_ID_HEADER};

use crate::response::{route_error_response, HttpResponse};
use crate::route::{CompiledRoute, RouteDefinition};

/// Collects route definitions before baking.
///
/// The builder is not consumed by [`bake`](Self::bake), so the same table
/// can be baked more than once.
#[derive(Debug, Clone, Default)]
pub struct RouterBuilder {
    routes: Vec<RouteDefinition>,
}

impl RouterBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route.
    #[must_use]
    pub fn route(mut self, route: RouteDefinition) -> Self {
        self.routes.push(route);
        self
    }

    /// Appends a route in place.
    pub fn register(&mut self, route: RouteDefinition) -> &mut Self {
        self.routes.push(route);
        self
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Compiles every route into a [`Router`].
    ///
    /// # Errors
    ///
    /// Returns the first [`BakeError`] in registration order.
    pub fn bake(&self) -> Result<Router, BakeError> {
        let routes = self
            .routes
            .iter()
            .map(|definition| {
                let route = definition.compile()?;
                tracing::debug!(
                    template = route.template(),
                    pattern = route.matcher().pattern(),
                    "compiled route"
                );
                Ok(route)
            })
            .collect::<Result<Vec<_>, BakeError>>()?;

        tracing::info!(routes = routes.len(), "router baked");
        Ok(Router {
            routes: routes.into(),
        })
    }
}

/// Result of dispatching one request.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A route matched and its handler produced a response.
    Handled(HttpResponse),
    /// No route matched.
    NotFound,
    /// A route matched but resolution failed.
    Failed(RouteError),
}

/// A baked, immutable route table.
///
/// Cloning is cheap and every clone shares the same routes.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Arc<[CompiledRoute]>,
}

impl Router {
    /// Starts a new [`RouterBuilder`].
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns the compiled routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    /// Finds the route for `request` and runs its handler.
    ///
    /// A [`RequestId`] is placed in the request extensions before any
    /// route sees it, taken from the `x-request-id` header when valid.
    pub async fn dispatch(&self, mut request: Request<Bytes>) -> DispatchOutcome {
        let request_id = ensure_request_id(&mut request);
        let span = tracing::info_span!(
            "dispatch",
            request_id = %request_id,
            method = %request.method(),
            path = request.uri().path(),
        );

        self.dispatch_inner(request).instrument(span).await
    }

    async fn dispatch_inner(&self, request: Request<Bytes>) -> DispatchOutcome {
        for route in self.routes.iter() {
            match route.resolve(&request) {
                Ok(resolution) => {
                    tracing::debug!(template = route.template(), "route matched");
                    return DispatchOutcome::Handled(route.call(request, resolution).await);
                }
                Err(err) if err.is_does_not_match() => {
                    tracing::trace!(template = route.template(), reason = %err, "route skipped");
                }
                Err(err) => {
                    tracing::error!(template = route.template(), error = %err, "route failed");
                    return DispatchOutcome::Failed(err);
                }
            }
        }

        tracing::debug!("no route matched");
        DispatchOutcome::NotFound
    }

    /// Dispatches `request` and turns the outcome into a response.
    ///
    /// Unmatched requests get 404, failed resolution gets 503. Every
    /// response carries the request id header.
    pub async fn handle(&self, mut request: Request<Bytes>) -> HttpResponse {
        let request_id = ensure_request_id(&mut request);
        let path = request.uri().path().to_owned();

        let mut response = match self.dispatch(request).await {
            DispatchOutcome::Handled(response) => response,
            DispatchOutcome::NotFound => {
                let err = RouteError::does_not_match(format!("no route for path '{path}'"));
                route_error_response(&err, Some(request_id))
            }
            DispatchOutcome::Failed(err) => route_error_response(&err, Some(request_id)),
        };

        if !response.headers().contains_key(REQUEST_ID_HEADER) {
            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
        }
        response
    }
}

/// Returns the request's id, inserting one into the extensions if absent.
fn ensure_request_id(request: &mut Request<Bytes>) -> RequestId {
    if let Some(id) = request.extensions().get::<RequestId>() {
        return *id;
    }
    let id = RequestId::from_headers(request.headers());
    request.extensions_mut().insert(id);
    id
}
