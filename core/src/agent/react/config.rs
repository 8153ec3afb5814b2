//! Config-driven construction of a [`super::ReactRunner`]: reads process env by
//! default, or can be built programmatically (e.g. per-tenant, from gateway config).

use std::path::PathBuf;

use crate::compress::CompactionConfig;
use crate::helve::ApprovalPolicy;
use crate::tool_source::McpServerConfig;

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.trim(), "1" | "true" | "TRUE" | "yes"),
        Err(_) => default,
    }
}

/// Inputs to [`super::build_react_run_context`]/[`super::build_react_runner`]: where
/// state is persisted, which provider/model to call, and which tools to expose.
#[derive(Debug, Clone)]
pub struct ReactBuildConfig {
    /// SQLite path for checkpoints and the long-term-memory fallback db. Defaults to `"memory.db"`.
    pub db_path: Option<String>,
    /// Thread/session id. Checkpointing only activates when this is set.
    pub thread_id: Option<String>,
    /// User id, used for store namespacing and `RunnableConfig::user_id`.
    pub user_id: Option<String>,
    /// Overrides the assembled system prompt entirely when set.
    pub system_prompt: Option<String>,

    /// Exa API key; when set, registers Exa web/code search as MCP tools.
    pub exa_api_key: Option<String>,
    /// Exa MCP endpoint. Used as Streamable HTTP when it starts with `http(s)://`.
    pub mcp_exa_url: String,
    /// Command used to spawn a local `mcp-remote` bridge when `mcp_exa_url` is not HTTP.
    pub mcp_remote_cmd: String,
    /// Space-separated args for `mcp_remote_cmd`.
    pub mcp_remote_args: String,
    /// When true, MCP child process stderr is not discarded.
    pub mcp_verbose: bool,
    /// MCP servers referenced by the agent config (spec.md §3/§4.1 step 5), built
    /// over Streamable HTTP with header templates rendered per request.
    pub mcp_servers: Vec<McpServerConfig>,
    /// `Context` namespace for `mcp_servers` header templates (e.g. the request's
    /// `namespace`/`session_id`), distinct from `Env` (process env) and `Header`
    /// (the caller's inbound request headers, not modeled here).
    pub mcp_context: serde_json::Value,

    /// API key for the chat model provider.
    pub openai_api_key: Option<String>,
    /// Base URL override for the chat model provider (Azure, self-hosted gateway, ...).
    pub openai_base_url: Option<String>,
    /// Chat model name, e.g. `"gpt-4o"`.
    pub model: Option<String>,

    /// API key for the embedding provider. Falls back to `openai_api_key`.
    pub embedding_api_key: Option<String>,
    /// Base URL for the embedding provider. Falls back to `openai_base_url`.
    pub embedding_base_url: Option<String>,
    /// Embedding model name. Defaults to `"text-embedding-3-small"`.
    pub embedding_model: Option<String>,

    /// Working folder mounted into the sandbox; also enables the `bash` tool when set.
    pub working_folder: Option<PathBuf>,
    /// Container image for sandboxed `bash` execution. Defaults to the runtime's built-in default.
    pub sandbox_image: Option<String>,
    /// Name under which this agent's skills/config live (sandbox mount naming).
    pub agent_name: String,

    /// Base URL, API key and model for the image-generation tool. All three must be set to enable it.
    pub image_generation_base_url: Option<String>,
    pub image_generation_api_key: Option<String>,
    pub image_generation_model: Option<String>,

    pub approval_policy: Option<ApprovalPolicy>,
    /// Tool names that must be approved (via a matching `ApprovalResult`) before
    /// `ActNode` will execute them. This is the mechanism `ActNode` actually gates
    /// on; `approval_policy` is only a preset that `to_react_build_config` resolves
    /// into this list.
    pub tools_requiring_human_approval: Vec<String>,
    pub compaction_config: Option<CompactionConfig>,
}

impl Default for ReactBuildConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            thread_id: None,
            user_id: None,
            system_prompt: None,
            exa_api_key: None,
            mcp_exa_url: "https://mcp.exa.ai/mcp".to_string(),
            mcp_remote_cmd: "npx".to_string(),
            mcp_remote_args: "-y mcp-remote".to_string(),
            mcp_verbose: false,
            mcp_servers: Vec::new(),
            mcp_context: serde_json::Value::Null,
            openai_api_key: None,
            openai_base_url: None,
            model: None,
            embedding_api_key: None,
            embedding_base_url: None,
            embedding_model: None,
            working_folder: None,
            sandbox_image: None,
            agent_name: "agent".to_string(),
            image_generation_base_url: None,
            image_generation_api_key: None,
            image_generation_model: None,
            approval_policy: None,
            tools_requiring_human_approval: Vec::new(),
            compaction_config: None,
        }
    }
}

impl ReactBuildConfig {
    /// Reads configuration from process environment, falling back to defaults
    /// for anything unset. Used by the CLI and as the base layer before a
    /// per-request [`crate::helve::HelveConfig`] is merged in.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env_string("DB_PATH"),
            thread_id: env_string("THREAD_ID"),
            user_id: env_string("USER_ID"),
            system_prompt: env_string("SYSTEM_PROMPT"),
            exa_api_key: env_string("EXA_API_KEY"),
            mcp_exa_url: env_string("MCP_EXA_URL").unwrap_or(defaults.mcp_exa_url),
            mcp_remote_cmd: env_string("MCP_REMOTE_CMD").unwrap_or(defaults.mcp_remote_cmd),
            mcp_remote_args: env_string("MCP_REMOTE_ARGS").unwrap_or(defaults.mcp_remote_args),
            mcp_verbose: env_bool("MCP_VERBOSE", defaults.mcp_verbose),
            mcp_servers: defaults.mcp_servers,
            mcp_context: defaults.mcp_context,
            openai_api_key: env_string("OPENAI_API_KEY"),
            openai_base_url: env_string("OPENAI_BASE_URL"),
            model: env_string("OPENAI_MODEL"),
            embedding_api_key: env_string("EMBEDDING_API_KEY"),
            embedding_base_url: env_string("EMBEDDING_BASE_URL"),
            embedding_model: env_string("EMBEDDING_MODEL"),
            working_folder: env_string("WORKING_FOLDER").map(PathBuf::from),
            sandbox_image: env_string("SANDBOX_IMAGE"),
            agent_name: env_string("AGENT_NAME").unwrap_or(defaults.agent_name),
            image_generation_base_url: env_string("IMAGE_GENERATION_BASE_URL"),
            image_generation_api_key: env_string("IMAGE_GENERATION_API_KEY"),
            image_generation_model: env_string("IMAGE_GENERATION_MODEL"),
            approval_policy: None,
            tools_requiring_human_approval: Vec::new(),
            compaction_config: None,
        }
    }

    /// Splits `mcp_remote_args` on whitespace, as `McpToolSource::new_with_env` expects `Vec<String>`.
    pub fn mcp_remote_args_vec(&self) -> Vec<String> {
        self.mcp_remote_args
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}
