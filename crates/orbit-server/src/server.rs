//! HTTP server.
//!
//! [`Server`] owns a baked [`Router`] and serves it over HTTP/1.1 with
//! Hyper. Each request body is buffered, subject to the configured size
//! limit and request timeout, before it reaches the router.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Request, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use orbit_core::BoxError;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::response::{error_response, HttpResponse};
use crate::router::Router;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Pause after a failed `accept` before trying again.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Serves a [`Router`] over HTTP/1.1.
///
/// # Example
///
/// ```rust,no_run
/// use orbit_server::{Router, Server, ServerConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let router = Router::builder().bake()?;
/// let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();
///
/// Server::new(config, router).run().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    router: Router,
}

impl Server {
    /// Creates a server for `router`.
    #[must_use]
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self { config, router }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the route table.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Binds the configured address and serves until SIGTERM or Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and serves until `shutdown` triggers.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// triggers, then waits for open connections to drain.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's local address cannot be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, routes = self.router.len(), "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => match result {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            server.serve_connection(stream, remote_addr, shutdown).await;
                            drop(token);
                        });
                    }
                    Err(err) => accept_error_backoff(&err).await,
                },
                () = shutdown.recv() => {
                    tracing::info!("stopping accept loop");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            timeout = ?shutdown_timeout,
            connections = tracker.active_connections(),
            "draining connections"
        );

        tokio::select! {
            () = tracker.wait_idle() => {
                tracing::info!("all connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    connections = tracker.active_connections(),
                    "shutdown timeout reached"
                );
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn serve_connection(
        self: Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) {
        let service = service_fn(move |request: Request<Incoming>| {
            let server = Arc::clone(&self);
            async move { Ok::<_, Infallible>(server.handle(request).await) }
        });

        let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
        let mut conn = std::pin::pin!(conn);

        let result = tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!(remote = %remote_addr, "closing connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        };

        if let Err(err) = result {
            tracing::debug!(remote = %remote_addr, error = %err, "connection error");
        }
    }

    /// Buffers the body of `request` and hands it to the router.
    ///
    /// Bodies over the size limit get 413, unreadable bodies 400, and a
    /// body or handler that exceeds the request timeout gets 408 or 504.
    pub async fn handle<B>(&self, request: Request<B>) -> HttpResponse
    where
        B: Body<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = request.into_parts();
        let limit = self.config.max_body_size();
        let timeout = self.config.request_timeout();

        let collected = tokio::time::timeout(timeout, Limited::new(body, limit).collect()).await;
        let body = match collected {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(err)) if err.downcast_ref::<LengthLimitError>().is_some() => {
                tracing::warn!(limit, path = parts.uri.path(), "request body too large");
                return error_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "PAYLOAD_TOO_LARGE",
                    &format!("request body exceeds {limit} bytes"),
                );
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "failed to read request body");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "BODY_READ_ERROR",
                    &format!("failed to read request body: {err}"),
                );
            }
            Err(_) => {
                tracing::warn!(path = parts.uri.path(), "request body timed out");
                return error_response(
                    StatusCode::REQUEST_TIMEOUT,
                    "REQUEST_TIMEOUT",
                    "request body collection timed out",
                );
            }
        };

        let method = parts.method.clone();
        let path = parts.uri.path().to_owned();
        let request = Request::from_parts(parts, body);

        match tokio::time::timeout(timeout, self.router.handle(request)).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(%method, path = %path, "handler timed out");
                error_response(
                    StatusCode::GATEWAY_TIMEOUT,
                    "HANDLER_TIMEOUT",
                    "handler execution timed out",
                )
            }
        }
    }
}

/// Logs a failed `accept` and pauses before the next attempt.
async fn accept_error_backoff(err: &std::io::Error) {
    tracing::error!(error = %err, backoff = ?ACCEPT_ERROR_BACKOFF, "failed to accept connection");
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use orbit_extract::{ResolvedBody, ResolvedParams};

    use crate::route::RouteDefinition;

    async fn echo(request: Request<Bytes>, _: ResolvedParams, _: ResolvedBody) -> Bytes {
        request.into_body()
    }

    fn server(config: ServerConfig) -> Server {
        let router = Router::builder()
            .route(RouteDefinition::new("/echo", echo))
            .bake()
            .unwrap();
        Server::new(config, router)
    }

    #[tokio::test]
    async fn test_handle_buffers_body() {
        let server = server(ServerConfig::default());
        let request = Request::post("/echo")
            .body(Full::new(Bytes::from_static(b"payload")))
            .unwrap();

        let response = server.handle(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"payload");
    }

    #[tokio::test]
    async fn test_handle_rejects_large_body() {
        let server = server(ServerConfig::builder().max_body_size(4).build());
        let request = Request::post("/echo")
            .body(Full::new(Bytes::from_static(b"too large")))
            .unwrap();

        let response = server.handle(request).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_handler_timeout() {
        async fn slow(_: Request<Bytes>, _: ResolvedParams, _: ResolvedBody) -> StatusCode {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }

        let router = Router::builder()
            .route(RouteDefinition::new("/slow", slow))
            .bake()
            .unwrap();
        let config = ServerConfig::builder()
            .request_timeout(Duration::from_millis(50))
            .build();
        let server = Server::new(config, router);

        let request = Request::get("/slow").body(Full::new(Bytes::new())).unwrap();
        let response = server.handle(request).await;
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_run_with_bad_address() {
        let config = ServerConfig::builder().http_addr("not an address").build();
        let result = server(config).run_with_shutdown(ShutdownSignal::new()).await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[tokio::test]
    async fn test_accept_error_waits_before_retry() {
        let err = std::io::Error::from_raw_os_error(24);
        let started = tokio::time::Instant::now();

        accept_error_backoff(&err).await;
        assert!(started.elapsed() >= ACCEPT_ERROR_BACKOFF);
    }
}
