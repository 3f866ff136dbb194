//! End-to-end dispatch behaviour through a baked router.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use orbit_core::{BakeError, BoxError, ErrorCategory};
use orbit_extract::{
    AnyValue, BasicInt, BasicString, ExpectedType, Json, ParamResolver, ParamSpec, ResolvedBody,
    ResolvedParams,
};
use orbit_server::{
    DispatchOutcome, HttpResponse, RouteDefinition, Router, Server, ServerConfig, ShutdownSignal,
};

#[derive(Debug, Deserialize)]
struct Payload {
    field_one: String,
    field_two: i64,
}

fn request(method: Method, path: &str, body: &'static [u8]) -> Request<Bytes> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Bytes::from_static(body))
        .unwrap()
}

async fn body_text(response: HttpResponse) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn echo_params(_: Request<Bytes>, params: ResolvedParams, _: ResolvedBody) -> String {
    params
        .raw_params()
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[tokio::test]
async fn post_route_receives_params() {
    let router = Router::builder()
        .route(RouteDefinition::new("/a/b/{foo}/d/{bar}", echo_params).methods(["POST"]))
        .bake()
        .unwrap();

    let response = router.handle(request(Method::POST, "/a/b/hello/d/123", b"")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "foo=hello,bar=123");
}

#[tokio::test]
async fn method_mismatch_falls_through() {
    async fn fallback(_: Request<Bytes>, _: ResolvedParams, _: ResolvedBody) -> &'static str {
        "fallback"
    }

    let only_post = Router::builder()
        .route(RouteDefinition::new("/a/b/{foo}/d/{bar}", echo_params).methods(["POST"]))
        .bake()
        .unwrap();
    let outcome = only_post
        .dispatch(request(Method::GET, "/a/b/hello/d/123", b""))
        .await;
    assert!(matches!(outcome, DispatchOutcome::NotFound));

    let with_fallback = Router::builder()
        .route(RouteDefinition::new("/a/b/{foo}/d/{bar}", echo_params).methods(["POST"]))
        .route(RouteDefinition::new("/a/b/{foo}/d/{bar}", fallback))
        .bake()
        .unwrap();
    let response = with_fallback
        .handle(request(Method::GET, "/a/b/hello/d/123", b""))
        .await;
    assert_eq!(body_text(response).await, "fallback");
}

#[tokio::test]
async fn failed_resolution_skips_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let handler = move |_: Request<Bytes>, _: ResolvedParams, _: ResolvedBody| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { StatusCode::OK }
    };

    let params = ParamSpec::new().param_with("foo", |raw: &str| {
        if raw == "bad" {
            Err("lookup failed")
        } else {
            Ok(raw.to_uppercase())
        }
    });
    let router = Router::builder()
        .route(RouteDefinition::new("/a/b/{foo}", handler).params(params))
        .route(RouteDefinition::new("/a/b/{foo}", echo_params))
        .bake()
        .unwrap();

    match router.dispatch(request(Method::GET, "/a/b/bad", b"")).await {
        DispatchOutcome::Failed(err) => {
            assert_eq!(err.category(), ErrorCategory::Resolution);
            assert_eq!(err.param(), Some("foo"));
            assert!(err.to_string().contains("lookup failed"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let response = router.handle(request(Method::GET, "/a/b/bad", b"")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let response = router.handle(request(Method::GET, "/a/b/good", b"")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn unbalanced_template_fails_bake() {
    let err = Router::builder()
        .route(RouteDefinition::new("/a/b/{c/d/{e}", echo_params))
        .bake()
        .unwrap_err();

    assert!(matches!(err, BakeError::Template { .. }));
    assert!(err.to_string().contains("/a/b/{c/d/{e}"));
}

#[tokio::test]
async fn unmatched_path_is_not_found() {
    let router = Router::builder()
        .route(RouteDefinition::new("/a/{b}", echo_params))
        .bake()
        .unwrap();

    let response = router.handle(request(Method::GET, "/x/y/z", b"")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["error"]["code"], "ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn json_body_is_decoded() {
    async fn create(_: Request<Bytes>, _: ResolvedParams, body: ResolvedBody) -> String {
        match body.get::<Json<Payload>>() {
            Some(payload) => format!("{}:{}", payload.field_one, payload.field_two),
            None => "no body".to_string(),
        }
    }

    let router = Router::builder()
        .route(
            RouteDefinition::new("/things", create)
                .methods(["POST"])
                .body::<Json<Payload>>(),
        )
        .bake()
        .unwrap();

    let ok = request(Method::POST, "/things", br#"{"field_one":"A","field_two":1}"#);
    let response = router.handle(ok).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "A:1");

    let bad = request(Method::POST, "/things", b"{\"field_one\":");
    let response = router.handle(bad).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["error"]["code"], "BODY_RESOLUTION_FAILED");
}

#[tokio::test]
async fn handler_sees_original_body() {
    async fn raw(request: Request<Bytes>, _: ResolvedParams, body: ResolvedBody) -> Bytes {
        assert!(body.is_present());
        request.into_body()
    }

    let router = Router::builder()
        .route(RouteDefinition::new("/raw", raw).body::<Json<Payload>>())
        .bake()
        .unwrap();

    let payload: &'static [u8] = br#"{"field_one":"B","field_two":2}"#;
    let response = router.handle(request(Method::PUT, "/raw", payload)).await;
    assert_eq!(body_text(response).await.as_bytes(), payload);
}

#[tokio::test]
async fn first_registered_route_wins() {
    async fn first(_: Request<Bytes>, _: ResolvedParams, _: ResolvedBody) -> &'static str {
        "first"
    }
    async fn second(_: Request<Bytes>, _: ResolvedParams, _: ResolvedBody) -> &'static str {
        "second"
    }

    let router = Router::builder()
        .route(RouteDefinition::new("/users/{id}", first))
        .route(RouteDefinition::new("/users/admin", second))
        .bake()
        .unwrap();

    let response = router.handle(request(Method::GET, "/users/admin", b"")).await;
    assert_eq!(body_text(response).await, "first");
}

#[tokio::test]
async fn baking_twice_behaves_the_same() {
    let builder = Router::builder()
        .route(RouteDefinition::new("/u/{user}", echo_params).param::<BasicInt>("user"))
        .route(RouteDefinition::new("/e/{event}", echo_params).param::<BasicString>("event"));

    let once = builder.bake().unwrap();
    let twice = builder.bake().unwrap();

    for (path, status) in [
        ("/u/1", StatusCode::OK),
        ("/u/one", StatusCode::SERVICE_UNAVAILABLE),
        ("/e/launch", StatusCode::OK),
        ("/nope", StatusCode::NOT_FOUND),
    ] {
        let a = once.handle(request(Method::GET, path, b"")).await;
        let b = twice.handle(request(Method::GET, path, b"")).await;
        assert_eq!(a.status(), status, "{path}");
        assert_eq!(b.status(), status, "{path}");
    }
}

struct WrongType;

impl ParamResolver for WrongType {
    fn expected(&self) -> ExpectedType {
        ExpectedType::of::<BasicInt>()
    }

    fn resolve(&self, raw: &str) -> Result<AnyValue, BoxError> {
        Ok(AnyValue::new(BasicString(raw.to_string())))
    }
}

#[tokio::test]
async fn wrong_resolver_type_is_misconfigured() {
    let router = Router::builder()
        .route(
            RouteDefinition::new("/u/{user}", echo_params)
                .params(ParamSpec::new().with_resolver("user", WrongType)),
        )
        .bake()
        .unwrap();

    match router.dispatch(request(Method::GET, "/u/7", b"")).await {
        DispatchOutcome::Failed(err) => assert_eq!(err.category(), ErrorCategory::Misconfigured),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn undeclared_param_fails_bake() {
    let err = Router::builder()
        .route(RouteDefinition::new("/u/{user}", echo_params).param::<BasicInt>("usr"))
        .bake()
        .unwrap_err();

    match err {
        BakeError::UnknownParam { template, param } => {
            assert_eq!(template, "/u/{user}");
            assert_eq!(param, "usr");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn adjacent_placeholders_capture_greedily() {
    let router = Router::builder()
        .route(RouteDefinition::new("/pair/{foo}{bar}", echo_params))
        .bake()
        .unwrap();

    let response = router.handle(request(Method::GET, "/pair/abcd", b"")).await;
    assert_eq!(body_text(response).await, "foo=abc,bar=d");
}

#[tokio::test]
async fn serves_over_tcp() {
    let router = Router::builder()
        .route(
            RouteDefinition::new("/user/{user}", echo_params)
                .methods(["GET"])
                .param::<BasicInt>("user"),
        )
        .bake()
        .unwrap();
    let config = ServerConfig::builder()
        .shutdown_timeout(Duration::from_secs(1))
        .build();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();
    let server = tokio::spawn(Server::new(config, router).serve(listener, shutdown.clone()));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /user/42 HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    assert!(raw.starts_with("HTTP/1.1 200"), "{raw}");
    assert!(raw.ends_with("user=42"), "{raw}");
    assert!(raw.to_ascii_lowercase().contains("x-request-id:"));

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}
