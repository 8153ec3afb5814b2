//! `POST /converse`: dispatches one agent run and streams its chunks back as SSE.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::Json;
use futures::stream::{self, Stream};
use serde::Deserialize;
use uuid::Uuid;

use converse_core::dispatch::{dispatch, AgentConfig, AgentInput, DispatchMode};
use converse_core::{BrokerSubscription, ReactBuildConfig, VirtualKey};

use super::app::AppState;

/// The common pre-stream error envelope (spec §6/§7): `{error, args?}` plus an HTTP
/// status, returned as a plain JSON response before any SSE framing begins.
fn invalid_request(message: &str) -> axum::response::Response {
    let body = serde_json::json!({
        "error": "invalid_request",
        "args": [{"message": message}],
    });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConverseQuery {
    #[allow(dead_code)]
    pub project_id: Option<String>,
    #[allow(dead_code)]
    pub agent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConverseRequestBody {
    pub message: String,
    pub namespace: String,
    pub message_id: String,
    #[serde(default)]
    pub previous_message_id: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub context: Option<serde_json::Value>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Reinterprets the caller-supplied `message_id` UUID's 16 bytes as an OpenTelemetry
/// trace id (32 lowercase hex chars, no hyphens). Falls back to a fresh random id when
/// `message_id` isn't a valid UUID, so a malformed id never fails the request.
fn trace_id(message_id: &str) -> String {
    Uuid::parse_str(message_id)
        .unwrap_or_else(|_| Uuid::new_v4())
        .simple()
        .to_string()
}

pub(crate) async fn converse_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConverseQuery>,
    request_headers: HeaderMap,
    Json(body): Json<ConverseRequestBody>,
) -> impl IntoResponse {
    // spec.md §4.1 step 3 / §8 S5: project default key isn't modeled here (virtual-key
    // CRUD is an out-of-scope collaborator), so `x-virtual-key` is the only source.
    match request_headers
        .get("x-virtual-key")
        .and_then(|v| v.to_str().ok())
    {
        None => return invalid_request("missing x-virtual-key header"),
        Some(key) => {
            if let Err(e) = VirtualKey::validate_format(key) {
                return invalid_request(&format!("malformed x-virtual-key: {e}"));
            }
        }
    };

    let trace_id = trace_id(&body.message_id);

    let mcp_context = serde_json::json!({
        "namespace": body.namespace.clone(),
        "session_id": body.session_id.clone(),
    });
    let build_config = ReactBuildConfig {
        thread_id: Some(body.namespace.clone()),
        agent_name: query.agent_id.unwrap_or_else(|| "agent".to_string()),
        mcp_context,
        ..ReactBuildConfig::from_env()
    };

    let config = AgentConfig {
        build_config,
        dispatch_mode: DispatchMode::Inline,
        llm: None,
    };
    let input = AgentInput {
        namespace: body.namespace,
        previous_message_id: body.previous_message_id,
        user_message: body.message,
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        "x-trace-id",
        HeaderValue::from_str(&trace_id).unwrap_or_else(|_| HeaderValue::from_static("invalid")),
    );
    headers.insert("cache-control", HeaderValue::from_static("no-cache"));

    match dispatch(config, input, Arc::clone(&state.broker)).await {
        Ok((_run_id, subscription)) => {
            let sse = Sse::new(chunk_stream(subscription))
                .keep_alive(axum::response::sse::KeepAlive::default());
            (headers, sse).into_response()
        }
        Err(e) => {
            tracing::warn!("dispatch failed: {}", e);
            let sse = Sse::new(stream::once(async move {
                Result::<Event, Infallible>::Ok(
                    Event::default()
                        .event("error")
                        .data(serde_json::json!({"message": e.to_string()}).to_string()),
                )
            }));
            (headers, sse).into_response()
        }
    }
}

/// Turns a broker subscription into an SSE stream, stopping right after the first
/// terminal chunk (run_completed/paused/failed/cancelled) rather than waiting for the
/// broker channel to close behind it.
fn chunk_stream<S>(subscription: S) -> impl Stream<Item = Result<Event, Infallible>>
where
    S: BrokerSubscription<stream_event::ConverseChunk> + Send + 'static,
{
    stream::unfold((subscription, false), |(mut sub, done)| async move {
        if done {
            return None;
        }
        let chunk = sub.recv().await?;
        let terminal = chunk.is_terminal();
        let event = match chunk.to_value() {
            Ok(value) => Event::default().event(chunk.event_name()).data(value.to_string()),
            Err(e) => Event::default().event("error").data(
                serde_json::json!({"message": format!("serialization error: {e}")}).to_string(),
            ),
        };
        Some((Ok(event), (sub, terminal)))
    })
}
