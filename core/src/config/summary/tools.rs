//! Tools config block for run config summary.
//!
//! Implements [`ConfigSection`](super::ConfigSection). Used by CLI or other callers
//! to build the "Tools" line: which tool sources are wired up (MCP servers, sandbox
//! code execution, image generation), without exposing secrets.

use super::ConfigSection;

/// Tools configuration summary: which tool sources are active for the run.
pub struct ToolConfigSummary {
    /// Number of configured MCP servers.
    pub mcp_server_count: usize,
    /// Whether the sandbox code-execution tool is enabled.
    pub sandbox_enabled: bool,
    /// Whether the image-generation tool is enabled.
    pub image_generation_enabled: bool,
}

impl ConfigSection for ToolConfigSummary {
    fn section_name(&self) -> &str {
        "Tools"
    }

    fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mcp_servers", self.mcp_server_count.to_string()),
            ("sandbox", self.sandbox_enabled.to_string()),
            ("image_generation", self.image_generation_enabled.to_string()),
        ]
    }
}
