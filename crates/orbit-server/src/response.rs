//! Response types and builders.
//!
//! Handlers return anything implementing [`IntoResponse`]. Error responses
//! share one JSON envelope:
//!
//! ```json
//! {"error": {"code": "ROUTE_NOT_FOUND", "message": "...", "category": "no_match"}, "request_id": "..."}
//! ```

use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::{Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

use orbit_core::{RequestId, RouteError};

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Conversion into an [`HttpResponse`].
///
/// # Example
///
/// ```rust
/// use http::StatusCode;
/// use orbit_server::IntoResponse;
///
/// let response = (StatusCode::CREATED, "made it").into_response();
/// assert_eq!(response.status(), StatusCode::CREATED);
/// ```
pub trait IntoResponse {
    /// Builds the response.
    fn into_response(self) -> HttpResponse;
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> HttpResponse {
        self
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> HttpResponse {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = self;
        response
    }
}

impl IntoResponse for Bytes {
    fn into_response(self) -> HttpResponse {
        Response::new(Full::new(self))
    }
}

impl IntoResponse for String {
    fn into_response(self) -> HttpResponse {
        text(Bytes::from(self))
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> HttpResponse {
        text(Bytes::from_static(self.as_bytes()))
    }
}

impl IntoResponse for () {
    fn into_response(self) -> HttpResponse {
        StatusCode::OK.into_response()
    }
}

impl<T: IntoResponse> IntoResponse for (StatusCode, T) {
    fn into_response(self) -> HttpResponse {
        let mut response = self.1.into_response();
        *response.status_mut() = self.0;
        response
    }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> HttpResponse {
        match self {
            Ok(value) => value.into_response(),
            Err(err) => err.into_response(),
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> HttpResponse {
        route_error_response(&self, None)
    }
}

fn text(body: Bytes) -> HttpResponse {
    let mut response = Response::new(Full::new(body));
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

fn json_bytes(status: StatusCode, body: Vec<u8>) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// JSON response builder.
///
/// # Example
///
/// ```rust
/// use orbit_server::{IntoResponse, JsonResponse};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Event {
///     id: i64,
/// }
///
/// let response = JsonResponse::created(Event { id: 7 }).into_response();
/// assert_eq!(response.status(), http::StatusCode::CREATED);
/// ```
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// Creates a new JSON response with status 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Creates a JSON response with status 201 Created.
    #[must_use]
    pub fn created(data: T) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> HttpResponse {
        match serde_json::to_vec(&self.data) {
            Ok(body) => json_bytes(self.status, body),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response body");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERIALIZATION_ERROR",
                    "failed to serialize response body",
                )
            }
        }
    }
}

/// Creates a standard JSON error response.
#[must_use]
pub fn error_response(status: StatusCode, code: &str, message: &str) -> HttpResponse {
    let body = serde_json::json!({
        "error": {
            "code": code,
            "message": message
        }
    });
    json_bytes(status, body.to_string().into_bytes())
}

/// Creates the JSON error response for a routing failure.
///
/// The status comes from the error's category: 404 when nothing matched,
/// 503 for misconfiguration and resolution failures.
#[must_use]
pub fn route_error_response(err: &RouteError, request_id: Option<RequestId>) -> HttpResponse {
    let request_id = request_id.map(|id| id.to_string());
    let envelope = err.to_envelope(request_id.as_deref());
    match serde_json::to_vec(&envelope) {
        Ok(body) => json_bytes(err.status_code(), body),
        Err(_) => error_response(err.status_code(), err.error_code(), &err.to_string()),
    }
}
