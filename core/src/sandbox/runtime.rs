//! Container runtime abstraction: docker/podman, auto-detected.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::process::Command;

use super::error::SandboxError;

/// Configuration for launching one sandbox session's container.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    pub image: String,
    pub env: HashMap<String, String>,
    /// `"host_path:container_path"` mounts — `/skills` (shared, read-only) and
    /// `/workspace` (exclusive, read-write) per session.
    pub volumes: Vec<String>,
    pub memory_limit_mb: Option<u64>,
}

/// A launched container: id plus the daemon's reachable base URL.
#[derive(Debug, Clone)]
pub struct LaunchedContainer {
    pub container_id: String,
    pub base_url: String,
}

/// Abstraction over container runtimes (Docker, Podman, …).
///
/// Session lifecycle only needs detached launch + liveness + removal; the
/// interactive-stdio shape used for sidecar modules elsewhere doesn't apply here
/// since the sandbox talks HTTP to its own in-container daemon.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// CLI binary name used by this runtime (e.g. `"docker"`).
    fn binary_name(&self) -> &str;

    /// `true` if the runtime binary is reachable on `$PATH`.
    fn is_available(&self) -> bool;

    /// Launches a detached container exposing the daemon on port 8080, returning
    /// its id and the base URL to reach `/health`, `/exec/*`, `/files/*`.
    async fn launch(&self, config: &ContainerConfig) -> Result<LaunchedContainer, SandboxError>;

    /// `true` if the container is currently running.
    async fn is_running(&self, container_id: &str) -> Result<bool, SandboxError>;

    /// Starts a previously-stopped container back up, returning its base URL.
    async fn start(&self, container_id: &str) -> Result<String, SandboxError>;

    /// Force-removes a container (running or stopped).
    async fn remove(&self, container_id: &str) -> Result<(), SandboxError>;
}

fn binary_on_path(name: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                let candidate = dir.join(name);
                candidate.is_file()
            })
        })
        .unwrap_or(false)
}

/// Runs a container CLI (docker/podman) detached and resolves its assigned IP.
pub struct CliContainerRuntime {
    binary: &'static str,
}

impl CliContainerRuntime {
    pub fn docker() -> Self {
        Self { binary: "docker" }
    }

    pub fn podman() -> Self {
        Self { binary: "podman" }
    }

    async fn run(&self, args: &[&str]) -> Result<String, SandboxError> {
        let output = Command::new(self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| SandboxError::Runtime(e.to_string()))?;
        if !output.status.success() {
            return Err(SandboxError::Runtime(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl ContainerRuntime for CliContainerRuntime {
    fn binary_name(&self) -> &str {
        self.binary
    }

    fn is_available(&self) -> bool {
        binary_on_path(self.binary)
    }

    async fn launch(&self, config: &ContainerConfig) -> Result<LaunchedContainer, SandboxError> {
        let mut args: Vec<String> = vec!["run".into(), "-d".into(), "-P".into()];
        for (k, v) in &config.env {
            args.push("-e".into());
            args.push(format!("{k}={v}"));
        }
        for vol in &config.volumes {
            args.push("-v".into());
            args.push(vol.clone());
        }
        if let Some(mb) = config.memory_limit_mb {
            args.push("--memory".into());
            args.push(format!("{mb}m"));
        }
        args.push(config.image.clone());
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let container_id = self.run(&arg_refs).await?;

        let ip = self
            .run(&[
                "inspect",
                "-f",
                "{{range .NetworkSettings.Networks}}{{.IPAddress}}{{end}}",
                &container_id,
            ])
            .await?;
        if ip.is_empty() {
            return Err(SandboxError::Runtime(format!(
                "container {container_id} has no assigned IP"
            )));
        }
        Ok(LaunchedContainer {
            container_id,
            base_url: format!("http://{ip}:8080"),
        })
    }

    async fn is_running(&self, container_id: &str) -> Result<bool, SandboxError> {
        let status = self
            .run(&["inspect", "-f", "{{.State.Running}}", container_id])
            .await
            .unwrap_or_else(|_| "false".to_string());
        Ok(status == "true")
    }

    async fn start(&self, container_id: &str) -> Result<String, SandboxError> {
        self.run(&["start", container_id]).await?;
        let ip = self
            .run(&[
                "inspect",
                "-f",
                "{{range .NetworkSettings.Networks}}{{.IPAddress}}{{end}}",
                container_id,
            ])
            .await?;
        Ok(format!("http://{ip}:8080"))
    }

    async fn remove(&self, container_id: &str) -> Result<(), SandboxError> {
        let args = ["rm", "-f", container_id];
        let output = Command::new(self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| SandboxError::Runtime(e.to_string()))?;
        if !output.status.success() {
            return Err(SandboxError::Runtime(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }
}

/// Detects the best available runtime: podman preferred (rootless), docker fallback.
pub fn detect_runtime() -> Option<Box<dyn ContainerRuntime>> {
    let podman = CliContainerRuntime::podman();
    if podman.is_available() {
        return Some(Box::new(podman));
    }
    let docker = CliContainerRuntime::docker();
    if docker.is_available() {
        return Some(Box::new(docker));
    }
    None
}
