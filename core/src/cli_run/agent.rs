//! Unified agent runner entry point (ReAct).

use crate::cli_run::build_helve_config;
use crate::export::stream_event_to_format_a;
use crate::protocol::stream::stream_event_to_protocol_envelope;
use crate::protocol::EnvelopeState;
use crate::protocol::ProtocolEventEnvelope;
use crate::{build_react_runner, ReActState, ReactBuildConfig, ReactRunner, StreamEvent};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info_span, Instrument};

/// Options for running the agent.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub message: String,
    pub working_folder: Option<PathBuf>,
    pub thread_id: Option<String>,
    /// When set, path to a file whose content is used as the agent's role/persona (SOUL).
    /// Overrides SOUL.md and the built-in default. Read at build_helve_config time.
    pub role_file: Option<PathBuf>,
    pub verbose: bool,
    pub display_max_len: usize,
    /// When true, stream events are collected and returned as JSON (CLI --json).
    pub output_json: bool,
}

/// Error type for run operations.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("build runner: {0}")]
    Build(#[from] crate::BuildRunnerError),
    #[error("run: {0}")]
    Run(#[from] crate::agent::react::RunError),
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    #[error("remote: {0}")]
    Remote(String),
}

/// Command mode for running an agent. Only ReAct is implemented.
#[derive(Clone, Debug)]
pub enum RunCmd {
    React,
}

/// Type-erased runner for any agent pattern.
pub enum AnyRunner {
    React(ReactRunner),
}

/// Type-erased stream event for all agent types.
pub enum AnyStreamEvent {
    React(StreamEvent<ReActState>),
}

impl AnyStreamEvent {
    /// Converts to format A JSON (EXPORT_SPEC §2).
    pub fn to_format_a(&self) -> Result<Value, serde_json::Error> {
        match self {
            AnyStreamEvent::React(ev) => stream_event_to_format_a(ev),
        }
    }

    /// Converts to protocol format with envelope as a typed event object.
    pub fn to_protocol_event(
        &self,
        state: &mut EnvelopeState,
    ) -> Result<ProtocolEventEnvelope, serde_json::Error> {
        match self {
            AnyStreamEvent::React(ev) => stream_event_to_protocol_envelope(ev, state),
        }
    }

    /// Converts to protocol format (protocol_spec §4: type + payload) and injects envelope.
    /// Returns the JSON value to send in `RunStreamEventResponse.event`.
    pub fn to_protocol_format(
        &self,
        state: &mut EnvelopeState,
    ) -> Result<Value, serde_json::Error> {
        let event = self.to_protocol_event(state)?;
        event.to_value()
    }
}

/// Runs the agent. When `on_event` is Some, it is invoked for each stream event.
/// The server can pass a closure that converts to format A via `ev.to_format_a()` and sends over WebSocket.
/// The CLI can pass a closure that formats to stderr.
pub async fn run_agent(
    opts: &RunOptions,
    cmd: &RunCmd,
    on_event: Option<Box<dyn FnMut(AnyStreamEvent) + Send>>,
) -> Result<String, RunError> {
    let (_helve, config) = build_helve_config(opts);
    let thread_id_log = config.thread_id.as_deref().unwrap_or("").to_string();
    let kind = match cmd {
        RunCmd::React => "react",
    };
    let span = info_span!("run", kind = kind, thread_id = %thread_id_log);
    tracing::info!(parent: &span, thread_id = %thread_id_log, "run started");

    let runner = build_runner(&config, opts, cmd)
        .instrument(span.clone())
        .await?;

    let on_event: Option<Arc<Mutex<Box<dyn FnMut(AnyStreamEvent) + Send>>>> =
        on_event.map(|b| Arc::new(Mutex::new(b)));

    let reply = match &runner {
        AnyRunner::React(r) => {
            let sink = on_event.clone();
            let on_ev = sink.map(|s| {
                move |ev: StreamEvent<ReActState>| {
                    if let Ok(mut f) = s.lock() {
                        f(AnyStreamEvent::React(ev));
                    }
                }
            });
            let state = r
                .stream_with_config(opts.message.as_str(), None, on_ev)
                .instrument(span.clone())
                .await?;
            state.last_assistant_reply().unwrap_or_default()
        }
    };

    Ok(reply)
}

/// Builds the runner for the given command.
pub async fn build_runner(
    config: &ReactBuildConfig,
    opts: &RunOptions,
    cmd: &RunCmd,
) -> Result<AnyRunner, RunError> {
    match cmd {
        RunCmd::React => {
            let r = build_react_runner(config, None, opts.verbose, None).await?;
            Ok(AnyRunner::React(r))
        }
    }
}
