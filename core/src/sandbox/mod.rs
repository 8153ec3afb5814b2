//! Sandbox Session Manager: per-session isolated containers for code execution tools.
//!
//! [`SandboxManager`] owns one container per `session_id`, launched from a fixed
//! volume layout (`/skills` shared per agent, `/workspace` exclusive per session)
//! and gated on the in-container daemon's `/health` endpoint. [`SandboxClient`]
//! then drives that daemon's `/exec/bash`, `/exec/python`, and `/files/<relpath>`
//! contract.

mod client;
mod error;
mod manager;
mod runtime;

pub use client::{ExecRequest, ExecResult, SandboxClient};
pub use error::SandboxError;
pub use manager::{reject_path_escape, SandboxHandle, SandboxManager, SandboxPaths};
pub use runtime::{detect_runtime, CliContainerRuntime, ContainerConfig, ContainerRuntime, LaunchedContainer};
