//! Durable-workflow dispatch: routes an agent run to one of the supported execution
//! targets and exposes its output as a broker channel the gateway can subscribe to.
//!
//! [`dispatch`] is a tagged-variant function, not a trait object: the three targets
//! (inline, and two durable-workflow engines) have different runtime requirements, and
//! a sum type keeps that visible at the call site rather than hidden behind a `Box<dyn
//! Dispatcher>`. Only [`DispatchMode::Inline`] runs an agent directly in this process;
//! the durable variants describe the workflow to invoke but require an engine client
//! this build doesn't carry (see `DESIGN.md`), so they return
//! [`DispatchError::EngineUnavailable`] rather than pretending to run anything.

mod chunks;

use std::sync::Arc;

use stream_event::ConverseChunk;

use crate::agent::react::{build_react_runner, ReactBuildConfig};
use crate::broker::{Broker, BrokerError};
use crate::llm::LlmClient;

use chunks::ChunkMapper;

/// Which engine should run this request.
#[derive(Clone, Debug)]
pub enum DispatchMode {
    /// Run the agent in this process; chunks are published to the broker as they're
    /// produced by the ReAct loop.
    Inline,
    /// Hand the run to a durable workflow engine ("A") identified by `workflow_id`.
    /// Not wired to a real engine in this build.
    DurableA { workflow_id: String },
    /// Hand the run to a durable workflow engine ("B") identified by `workflow_id`.
    /// Not wired to a real engine in this build.
    DurableB { workflow_id: String },
}

/// What to run: the built agent configuration plus which target executes it.
pub struct AgentConfig {
    pub build_config: ReactBuildConfig,
    pub dispatch_mode: DispatchMode,
    /// Pre-resolved LLM client (e.g. from virtual-key/model-alias resolution).
    /// `None` falls back to `build_react_runner`'s env-driven default.
    pub llm: Option<Box<dyn LlmClient>>,
}

/// Input to a single run.
pub struct AgentInput {
    pub namespace: String,
    pub previous_message_id: Option<String>,
    /// The new user turn. History prior to `previous_message_id` is the caller's
    /// responsibility to fold into `build_config.system_prompt`/initial state before
    /// calling `dispatch` (loaded via `converse_workspace::Store::load_messages_till_run`).
    pub user_message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("broker error: {0}")]
    Broker(#[from] BrokerError),
    #[error("agent build failed: {0}")]
    Build(String),
    #[error("{0} dispatch requires a workflow engine client not wired into this build")]
    EngineUnavailable(&'static str),
}

/// Dispatches a run, returning its `run_id` and a broker subscription over its chunk
/// stream. The subscription is created before anything starts running (subscribe
/// happens before the first publish), so the caller never misses `RunStarted`.
pub async fn dispatch<B>(
    config: AgentConfig,
    input: AgentInput,
    broker: Arc<B>,
) -> Result<(String, B::Subscription), DispatchError>
where
    B: Broker<ConverseChunk> + 'static,
{
    match config.dispatch_mode {
        DispatchMode::Inline => {
            dispatch_inline(config.build_config, config.llm, input, broker).await
        }
        DispatchMode::DurableA { .. } => Err(DispatchError::EngineUnavailable("durable-a")),
        DispatchMode::DurableB { .. } => Err(DispatchError::EngineUnavailable("durable-b")),
    }
}

async fn dispatch_inline<B>(
    build_config: ReactBuildConfig,
    llm: Option<Box<dyn LlmClient>>,
    input: AgentInput,
    broker: Arc<B>,
) -> Result<(String, B::Subscription), DispatchError>
where
    B: Broker<ConverseChunk> + 'static,
{
    let run_id = uuid::Uuid::new_v4().to_string();
    let subscription = broker.subscribe(&run_id).await?;

    let runner = build_react_runner(&build_config, llm, false, None)
        .await
        .map_err(|e| DispatchError::Build(e.to_string()))?;

    let task_broker = Arc::clone(&broker);
    let task_run_id = run_id.clone();
    let user_message = input.user_message;

    tokio::spawn(async move {
        let runner = runner;
        run_inline(&runner, &user_message, &task_run_id, task_broker.as_ref()).await;
    });

    Ok((run_id, subscription))
}

async fn run_inline<B>(
    runner: &crate::agent::react::ReactRunner,
    user_message: &str,
    run_id: &str,
    broker: &B,
) where
    B: Broker<ConverseChunk>,
{
    use crate::state::ReActState;
    use crate::stream::StreamEvent;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<StreamEvent<ReActState>>();

    let forward = async {
        let mut mapper = ChunkMapper::new(run_id.to_string());
        for chunk in mapper.start() {
            let _ = broker.publish(run_id, chunk).await;
        }
        while let Some(event) = rx.recv().await {
            for chunk in mapper.on_event(event) {
                let _ = broker.publish(run_id, chunk).await;
            }
        }
        mapper
    };

    let run = runner.stream_with_callback(
        user_message,
        Some(move |event: StreamEvent<ReActState>| {
            let _ = tx.send(event);
        }),
    );

    let (result, mut mapper) = tokio::join!(run, forward);

    if let Some(chunk) = mapper.message_completed() {
        let _ = broker.publish(run_id, chunk).await;
    }
    let terminal = match result {
        Ok(state) => mapper.finish_ok(&state),
        Err(err) => mapper.finish_err(&err),
    };
    if let Some(chunk) = terminal {
        let _ = broker.publish(run_id, chunk).await;
    }
    let _ = broker.close(run_id).await;
}

pub use chunks::stream_event_to_chunks;
