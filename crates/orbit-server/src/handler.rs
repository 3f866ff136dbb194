//! Route handlers.
//!
//! A handler receives the request (body still attached), the resolved
//! params and the resolved body, and owns the response entirely.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::Request;
//! use orbit_extract::{BasicInt, ResolvedBody, ResolvedParams};
//! use orbit_server::{Handler, IntoResponse};
//!
//! async fn get_user(
//!     _request: Request<Bytes>,
//!     params: ResolvedParams,
//!     _body: ResolvedBody,
//! ) -> impl IntoResponse {
//!     match params.get::<BasicInt>("user") {
//!         Ok(user) => format!("user {user}"),
//!         Err(err) => err.to_string(),
//!     }
//! }
//!
//! fn assert_handler<H: Handler>(_: H) {}
//! assert_handler(get_user);
//! ```

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::Request;

use orbit_extract::{ResolvedBody, ResolvedParams};

use crate::response::{HttpResponse, IntoResponse};

/// Boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that can answer a dispatched request.
///
/// Implemented for every `Fn(Request<Bytes>, ResolvedParams, ResolvedBody)`
/// returning a future of an [`IntoResponse`] value, so plain `async fn`s
/// work directly.
pub trait Handler: Send + Sync + 'static {
    /// Handles one request.
    fn call(
        &self,
        request: Request<Bytes>,
        params: ResolvedParams,
        body: ResolvedBody,
    ) -> BoxFuture<'static, HttpResponse>;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request<Bytes>, ResolvedParams, ResolvedBody) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(
        &self,
        request: Request<Bytes>,
        params: ResolvedParams,
        body: ResolvedBody,
    ) -> BoxFuture<'static, HttpResponse> {
        let fut = self(request, params, body);
        Box::pin(async move { fut.await.into_response() })
    }
}
