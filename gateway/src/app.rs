//! Axum app: state, router, and the WebSocket upgrade / `/converse` SSE handlers.

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use converse_core::InMemoryBroker;
use stream_event::ConverseChunk;

use super::connection::handle_socket;
use super::converse::converse_handler;

/// Bounded queue sizing and display truncation, read once at startup. Separated from
/// the per-request `RunRequest`/`ConverseRequestBody` so ops can tune throughput
/// without touching request shapes.
#[derive(Clone, Debug)]
pub(crate) struct RunConfig {
    /// Max characters of a run's reply echoed into non-streaming responses/logs.
    pub display_max_len: usize,
    /// Bounded channel size for protocol-event forwarding within one WS run.
    pub event_queue_capacity: usize,
    /// Bounded channel size for message-store append forwarding within one WS run.
    pub append_queue_capacity: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            display_max_len: 2000,
            event_queue_capacity: 128,
            append_queue_capacity: 64,
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub(crate) fn run_config_from_env() -> RunConfig {
    let defaults = RunConfig::default();
    RunConfig {
        display_max_len: env_usize("DISPLAY_MAX_LEN", defaults.display_max_len),
        event_queue_capacity: env_usize("EVENT_QUEUE_CAPACITY", defaults.event_queue_capacity),
        append_queue_capacity: env_usize("APPEND_QUEUE_CAPACITY", defaults.append_queue_capacity),
    }
}

/// Shared server state: the WebSocket transport (`/`, legacy/CLI remote mode) and the
/// HTTP/SSE transport (`POST /converse`) both read from this.
#[derive(Clone)]
pub(crate) struct AppState {
    /// When set, the first WebSocket connection to close will send on this to signal
    /// server exit (once mode).
    pub(crate) shutdown_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
    pub(crate) workspace_store: Option<Arc<converse_workspace::Store>>,
    pub(crate) user_message_store: Option<Arc<dyn converse_core::UserMessageStore>>,
    pub(crate) run_config: RunConfig,
    /// Stream broker backing `/converse`: the gateway subscribes to a run's channel
    /// before dispatching it, then relays published chunks as SSE frames.
    pub(crate) broker: Arc<InMemoryBroker<ConverseChunk>>,
}

pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/converse", post(converse_handler))
        .with_state(state)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    let shutdown_tx = state.shutdown_tx.lock().ok().and_then(|mut g| g.take());
    let workspace_store = state.workspace_store.clone();
    let user_message_store = state.user_message_store.clone();
    let run_config = state.run_config.clone();
    ws.on_upgrade(move |socket| {
        handle_socket(socket, shutdown_tx, workspace_store, user_message_store, run_config)
    })
}
