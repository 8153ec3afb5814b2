//! HTTP client for the daemon running inside a sandbox container.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::SandboxError;
use super::manager::SandboxHandle;

/// Arguments accepted by `POST /exec/bash` and `/exec/python`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecRequest {
    pub command: Option<String>,
    pub script: Option<String>,
    pub args: Option<Vec<String>>,
    pub timeout_seconds: Option<u64>,
    pub workdir: Option<String>,
    pub env: Option<std::collections::HashMap<String, String>>,
}

/// Response shared by `/exec/bash` and `/exec/python`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration_ms: u64,
}

/// Talks to one session's daemon over HTTP. Stateless — holds only the client
/// and the handle's base URL, so callers can build a fresh one per call.
pub struct SandboxClient {
    http: reqwest::Client,
    base_url: String,
}

impl SandboxClient {
    pub fn new(handle: &SandboxHandle) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: handle.base_url.clone(),
        }
    }

    fn timeout_for(req_timeout: Option<u64>) -> Duration {
        // Give the HTTP call a little headroom over the command's own timeout.
        Duration::from_secs(req_timeout.unwrap_or(60) + 10)
    }

    pub async fn exec_bash(&self, req: ExecRequest) -> Result<ExecResult, SandboxError> {
        let timeout = Self::timeout_for(req.timeout_seconds);
        self.http
            .post(format!("{}/exec/bash", self.base_url))
            .json(&req)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| SandboxError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| SandboxError::Transport(e.to_string()))?
            .json::<ExecResult>()
            .await
            .map_err(|e| SandboxError::Transport(e.to_string()))
    }

    pub async fn exec_python(&self, req: ExecRequest) -> Result<ExecResult, SandboxError> {
        let timeout = Self::timeout_for(req.timeout_seconds);
        self.http
            .post(format!("{}/exec/python", self.base_url))
            .json(&req)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| SandboxError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| SandboxError::Transport(e.to_string()))?
            .json::<ExecResult>()
            .await
            .map_err(|e| SandboxError::Transport(e.to_string()))
    }

    fn validate_relpath(relpath: &str) -> Result<(), SandboxError> {
        if Path::new(relpath)
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(SandboxError::PathEscape(relpath.to_string()));
        }
        Ok(())
    }

    pub async fn read_file(&self, relpath: &str) -> Result<Vec<u8>, SandboxError> {
        Self::validate_relpath(relpath)?;
        let resp = self
            .http
            .get(format!("{}/files/{}", self.base_url, relpath))
            .send()
            .await
            .map_err(|e| SandboxError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| SandboxError::Transport(e.to_string()))?;
        Ok(resp.bytes().await.map_err(|e| SandboxError::Transport(e.to_string()))?.to_vec())
    }

    pub async fn write_file(&self, relpath: &str, contents: Vec<u8>) -> Result<(), SandboxError> {
        Self::validate_relpath(relpath)?;
        self.http
            .put(format!("{}/files/{}", self.base_url, relpath))
            .body(contents)
            .send()
            .await
            .map_err(|e| SandboxError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| SandboxError::Transport(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_file(&self, relpath: &str) -> Result<(), SandboxError> {
        Self::validate_relpath(relpath)?;
        self.http
            .delete(format!("{}/files/{}", self.base_url, relpath))
            .send()
            .await
            .map_err(|e| SandboxError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| SandboxError::Transport(e.to_string()))?;
        Ok(())
    }
}
