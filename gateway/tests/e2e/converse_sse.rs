//! Exercises `POST /converse` end to end: dispatch, SSE framing, trace-id propagation.
//! Skipped unless OPENAI_API_KEY or LOOM_E2E_RUN_AGENT is set.

use super::common;
use futures_util::StreamExt;
use reqwest_eventsource::{Event, EventSource};
use std::time::Duration;
use tokio::time::timeout;
use uuid::Uuid;

#[tokio::test]
async fn e2e_converse_sse_happy_path() {
    common::load_dotenv();
    let run_e2e =
        std::env::var("OPENAI_API_KEY").is_ok() || std::env::var("LOOM_E2E_RUN_AGENT").is_ok();
    if !run_e2e {
        eprintln!("skipping e2e_converse_sse_happy_path (set OPENAI_API_KEY or LOOM_E2E_RUN_AGENT to run)");
        return;
    }

    let (ws_url, server_handle) = common::spawn_server_once().await;
    let http_url = ws_url.replacen("ws://", "http://", 1);

    let message_id = Uuid::new_v4().to_string();
    let body = serde_json::json!({
        "message": "Reply with exactly the word: OK",
        "namespace": "converse-sse-test",
        "message_id": message_id,
        "session_id": "sess-1",
    });

    let virtual_key = converse_core::VirtualKey::generate(vec![], vec![], vec![]).secret;

    let client = reqwest::Client::new();
    let request = client
        .post(format!("{}/converse?project_id=p1&agent_id=a1", http_url))
        .header("x-virtual-key", virtual_key)
        .json(&body);

    let mut source = EventSource::new(request).unwrap();
    let mut event_names = Vec::new();
    let mut saw_run_completed = false;

    let run = async {
        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(msg)) => {
                    eprintln!("[e2e] sse event={} data={}", msg.event, msg.data);
                    event_names.push(msg.event.clone());
                    if msg.event == "run_completed" {
                        saw_run_completed = true;
                        break;
                    }
                    if msg.event == "run_failed" || msg.event == "error" {
                        panic!("run failed: {}", msg.data);
                    }
                }
                Err(e) => {
                    source.close();
                    panic!("sse stream error: {}", e);
                }
            }
        }
    };
    timeout(Duration::from_secs(120), run).await.unwrap();

    assert!(
        event_names.first().map(String::as_str) == Some("run_started"),
        "expected first event run_started, got {:?}",
        event_names
    );
    assert!(saw_run_completed, "expected a run_completed event, got {:?}", event_names);

    drop(source);
    let _ = timeout(Duration::from_secs(5), server_handle).await;
}
