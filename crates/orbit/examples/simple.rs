//! Typed users and events over a single route.
//!
//! Run with:
//!
//! ```text
//! cargo run -p orbit --example simple
//! curl -XPOST http://localhost:8080/user/123/event/my-new-event \
//!     --data '{"event_id": 123, "attendees": ["Amy", "Betty", "Cressida"]}'
//! ```

use std::num::ParseIntError;

use orbit::prelude::*;
use serde::{Deserialize, Serialize};

/// A user looked up from the `{user}` placeholder.
#[derive(Debug, Clone, Serialize)]
struct User {
    uid: i64,
    name: String,
}

impl FromParam for User {
    type Rejection = ParseIntError;

    fn from_param(raw: &str) -> Result<Self, Self::Rejection> {
        // A real service would hit its user store here.
        Ok(Self {
            uid: raw.parse()?,
            name: "Joe Bloggs".to_string(),
        })
    }
}

/// An event decoded from the JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Event {
    event_id: i64,
    #[serde(rename = "attendees")]
    attendee_names: Vec<String>,
}

impl FromBody for Event {
    type Rejection = serde_json::Error;

    fn from_body(body: BodyStream) -> Result<Self, Self::Rejection> {
        serde_json::from_reader(body)
    }
}

async fn create_event(
    request: Request<Bytes>,
    params: ResolvedParams,
    body: ResolvedBody,
) -> Result<JsonResponse<serde_json::Value>, StatusCode> {
    let user = params
        .get::<User>("user")
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let key = params
        .get::<BasicString>("event")
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let event = body.get::<Event>().ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let request_id = request.extensions().get::<RequestId>().copied();

    tracing::info!(?user, event_key = %key, ?event, "event received");

    Ok(JsonResponse::created(serde_json::json!({
        "user": user,
        "event_key": key.as_str(),
        "event": event,
        "request_id": request_id.map(|id| id.to_string()),
    })))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(&LogConfig::development())?;

    let router = Router::builder()
        .route(
            RouteDefinition::new("/user/{user}/event/{event}", create_event)
                .methods(["POST"])
                .param::<User>("user")
                .param::<BasicString>("event")
                .body::<Event>(),
        )
        .bake()?;

    let config = ServerConfig::builder().with_env()?.build();
    Server::new(config, router).run().await?;
    Ok(())
}
