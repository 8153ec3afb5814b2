//! Sandbox Session Manager: per-session container lifecycle.
//!
//! `CreateOrGet` is the only entry point callers normally need — it is
//! idempotent, serialises concurrent first-creation for the same session, and
//! only returns once the daemon's `/health` is reachable.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use super::error::SandboxError;
use super::runtime::{ContainerConfig, ContainerRuntime};

const HEALTH_DEADLINE: Duration = Duration::from_secs(30);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A live sandbox session: its container id and the daemon's base URL.
#[derive(Debug, Clone)]
pub struct SandboxHandle {
    pub session_id: String,
    pub container_id: String,
    pub base_url: String,
}

/// Where session/agent data lives on the host, mounted into containers.
#[derive(Debug, Clone)]
pub struct SandboxPaths {
    /// `<agent_data>` — parent of `<agent_name>/skills`, mounted read-only at `/skills`.
    pub agent_data_root: std::path::PathBuf,
    /// `<session_data>` — parent of `<session_id>`, mounted read-write at `/workspace`.
    pub session_data_root: std::path::PathBuf,
}

/// Tracks one [`SandboxHandle`] per `session_id`, serialising first-creation.
pub struct SandboxManager {
    runtime: Arc<dyn ContainerRuntime>,
    paths: SandboxPaths,
    default_image: String,
    handles: DashMap<String, SandboxHandle>,
    creation_locks: DashMap<String, Arc<AsyncMutex<()>>>,
    http: reqwest::Client,
}

impl SandboxManager {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, paths: SandboxPaths, default_image: String) -> Self {
        Self {
            runtime,
            paths,
            default_image,
            handles: DashMap::new(),
            creation_locks: DashMap::new(),
            http: reqwest::Client::new(),
        }
    }

    fn creation_lock(&self, session_id: &str) -> Arc<AsyncMutex<()>> {
        self.creation_locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    async fn await_health(&self, base_url: &str) -> Result<(), SandboxError> {
        let deadline = Instant::now() + HEALTH_DEADLINE;
        loop {
            let ok = self
                .http
                .get(format!("{base_url}/health"))
                .timeout(Duration::from_secs(2))
                .send()
                .await
                .map(|r| r.status().is_success())
                .unwrap_or(false);
            if ok {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SandboxError::HealthTimeout(HEALTH_DEADLINE));
            }
            tokio::time::sleep(HEALTH_POLL_INTERVAL).await;
        }
    }

    fn container_config(&self, session_id: &str, image: &str, agent_name: &str) -> ContainerConfig {
        let skills_host = self.paths.agent_data_root.join(agent_name).join("skills");
        let workspace_host = self.paths.session_data_root.join(session_id);
        ContainerConfig {
            image: image.to_string(),
            env: HashMap::new(),
            volumes: vec![
                format!("{}:/skills:ro", skills_host.display()),
                format!("{}:/workspace:rw", workspace_host.display()),
            ],
            memory_limit_mb: None,
        }
    }

    /// Idempotent: returns the cached handle if healthy; restarts a stopped
    /// container; launches fresh if none exists. Concurrent first-creation for
    /// the same `session_id` is serialised via a per-session lock.
    pub async fn create_or_get(
        &self,
        session_id: &str,
        image: Option<&str>,
        agent_name: &str,
    ) -> Result<SandboxHandle, SandboxError> {
        if let Some(handle) = self.handles.get(session_id) {
            if self.runtime.is_running(&handle.container_id).await.unwrap_or(false) {
                return Ok(handle.clone());
            }
        }

        let lock = self.creation_lock(session_id);
        let _guard = lock.lock().await;

        // Re-check: another caller may have created it while we waited for the lock.
        if let Some(handle) = self.handles.get(session_id) {
            if self.runtime.is_running(&handle.container_id).await.unwrap_or(false) {
                return Ok(handle.clone());
            }
            info!(session_id, "sandbox container stopped, restarting");
            let base_url = self.runtime.start(&handle.container_id).await?;
            self.await_health(&base_url).await?;
            let refreshed = SandboxHandle {
                session_id: session_id.to_string(),
                container_id: handle.container_id.clone(),
                base_url,
            };
            drop(handle);
            self.handles.insert(session_id.to_string(), refreshed.clone());
            return Ok(refreshed);
        }

        let image = image.unwrap_or(&self.default_image);
        let config = self.container_config(session_id, image, agent_name);
        info!(session_id, image, "launching sandbox container");
        let launched = self.runtime.launch(&config).await?;
        self.await_health(&launched.base_url).await?;

        let handle = SandboxHandle {
            session_id: session_id.to_string(),
            container_id: launched.container_id,
            base_url: launched.base_url,
        };
        self.handles.insert(session_id.to_string(), handle.clone());
        Ok(handle)
    }

    /// Returns the cached handle, attempting a restart if the container died.
    pub async fn get(&self, session_id: &str) -> Result<SandboxHandle, SandboxError> {
        let handle = self
            .handles
            .get(session_id)
            .map(|h| h.clone())
            .ok_or_else(|| SandboxError::NotFound(session_id.to_string()))?;
        if self.runtime.is_running(&handle.container_id).await.unwrap_or(false) {
            return Ok(handle);
        }
        let base_url = self.runtime.start(&handle.container_id).await?;
        self.await_health(&base_url).await?;
        let refreshed = SandboxHandle {
            base_url,
            ..handle
        };
        self.handles.insert(session_id.to_string(), refreshed.clone());
        Ok(refreshed)
    }

    /// Force-removes the container and clears the cache entry.
    pub async fn delete(&self, session_id: &str) -> Result<(), SandboxError> {
        if let Some((_, handle)) = self.handles.remove(session_id) {
            if let Err(e) = self.runtime.remove(&handle.container_id).await {
                warn!(session_id, error = %e, "failed to remove sandbox container");
                return Err(e);
            }
        }
        self.creation_locks.remove(session_id);
        Ok(())
    }
}

/// Rejects any path with a `..` component or that resolves outside `root`.
pub fn reject_path_escape(root: &Path, relpath: &str) -> Result<std::path::PathBuf, SandboxError> {
    if Path::new(relpath)
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(SandboxError::PathEscape(relpath.to_string()));
    }
    let joined = root.join(relpath);
    let normalized = normalize(&joined);
    let normalized_root = normalize(root);
    if !normalized.starts_with(&normalized_root) {
        return Err(SandboxError::PathEscape(relpath.to_string()));
    }
    Ok(joined)
}

/// Lexical normalization (no filesystem access) so the check works even when
/// the target file does not yet exist (write/create case).
fn normalize(path: &Path) -> std::path::PathBuf {
    let mut out = std::path::PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}
