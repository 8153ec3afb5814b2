//! Converse CLI library: CLI parsing and run orchestration for the ReAct agent.
//!
//! Used by the `converse` binary. Builds a [`ReactRunner`](converse_core::ReactRunner) from
//! config (env, working folder, etc.) and runs or streams the graph, either in-process
//! ([`LocalBackend`]) or over WebSocket against a gateway ([`RemoteBackend`]).

pub mod backend;
pub mod run;
pub mod tool_cmd;

pub use backend::{
    ensure_server_or_spawn, LocalBackend, RemoteBackend, RunBackend, RunOutput, StreamOut,
};
pub use run::{run_agent_wrapper as run_agent, RunAgentResult, RunCmd, RunError, RunOptions};
pub use tool_cmd::{format_tool_show_output, format_tools_list, list_tools, show_tool, ToolShowFormat};
