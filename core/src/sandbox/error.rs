//! Sandbox-related errors.

use thiserror::Error;

/// Errors from creating, reaching, or calling into a sandbox session.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// `/health` did not return 200 within the 30-second launch deadline.
    #[error("sandbox health check timed out after {0:?}")]
    HealthTimeout(std::time::Duration),

    /// The container runtime (docker/podman) rejected the operation.
    #[error("container runtime error: {0}")]
    Runtime(String),

    /// HTTP call to the in-container daemon failed (network, decode, non-2xx).
    #[error("sandbox transport error: {0}")]
    Transport(String),

    /// A requested path escaped the sandbox root (`..` component or resolved escape).
    #[error("path escapes sandbox root: {0}")]
    PathEscape(String),

    /// `Get` was called for a session with no cached handle.
    #[error("no sandbox session for {0}")]
    NotFound(String),

    /// No container runtime (docker/podman) was found on `$PATH`.
    #[error("no container runtime available")]
    NoRuntime,
}
