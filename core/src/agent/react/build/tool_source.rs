//! Builds the tool source from `ReactBuildConfig`: bash (sandboxed), Exa (MCP),
//! any `mcp_servers`-configured MCP tool source, and image generation, aggregated
//! behind one `ToolSource`.

use std::sync::Arc;

use crate::error::AgentError;
use crate::sandbox::{detect_runtime, SandboxManager, SandboxPaths};
use crate::tool_source::{
    BashToolsSource, CompositeToolSource, McpToolSource, TemplateContext, ToolSource,
};
use crate::tools::{register_mcp_tools, AggregateToolSource, ImageGenerationTool};

use super::super::config::ReactBuildConfig;

fn to_agent_error(e: impl std::fmt::Display) -> AgentError {
    AgentError::ExecutionFailed(e.to_string())
}

async fn build_exa_mcp_source(config: &ReactBuildConfig) -> Result<Option<McpToolSource>, AgentError> {
    let Some(api_key) = config.exa_api_key.clone() else {
        return Ok(None);
    };

    let source = if config.mcp_exa_url.starts_with("http://") || config.mcp_exa_url.starts_with("https://") {
        McpToolSource::new_http(config.mcp_exa_url.clone(), vec![("x-api-key".to_string(), api_key)])
            .await
            .map_err(to_agent_error)?
    } else {
        McpToolSource::new_with_env(
            config.mcp_remote_cmd.clone(),
            config.mcp_remote_args_vec(),
            vec![("EXA_API_KEY".to_string(), api_key)],
            config.mcp_verbose,
        )
        .map_err(to_agent_error)?
    };
    Ok(Some(source))
}

/// Builds every `config.mcp_servers` entry (spec.md §4.1 step 5): renders header
/// templates against `{Env, Context, Header}` and opens an HTTP MCP session per
/// server. `Header` is left empty; nothing here forwards the caller's inbound
/// request headers into a tool-server template.
async fn build_configured_mcp_sources(
    config: &ReactBuildConfig,
) -> Result<Vec<McpToolSource>, AgentError> {
    let ctx = TemplateContext {
        env: std::env::vars().collect(),
        context: config.mcp_context.clone(),
        headers: Default::default(),
    };
    let mut sources = Vec::with_capacity(config.mcp_servers.len());
    for server in &config.mcp_servers {
        let source = server.build(&ctx).await.map_err(to_agent_error)?;
        sources.push(source);
    }
    Ok(sources)
}

fn build_bash_source(config: &ReactBuildConfig) -> Option<BashToolsSource> {
    let working_folder = config.working_folder.as_ref()?;
    let runtime = detect_runtime()?;
    let paths = SandboxPaths {
        agent_data_root: working_folder.clone(),
        session_data_root: working_folder.clone(),
    };
    let default_image = config
        .sandbox_image
        .clone()
        .unwrap_or_else(|| "converse-sandbox:latest".to_string());
    let manager = Arc::new(SandboxManager::new(Arc::from(runtime), paths, default_image));
    let session_id = config.thread_id.clone().unwrap_or_else(|| "default".to_string());
    Some(BashToolsSource::new(
        manager,
        session_id,
        config.agent_name.clone(),
        config.sandbox_image.clone(),
    ))
}

fn build_image_generation_tool(config: &ReactBuildConfig) -> Option<ImageGenerationTool> {
    let base_url = config.image_generation_base_url.clone()?;
    let api_key = config.image_generation_api_key.clone()?;
    let model = config.image_generation_model.clone()?;
    Some(ImageGenerationTool::new(base_url, api_key, model))
}

/// Assembles every configured tool source into one `ToolSource`.
///
/// - `bash`, when `working_folder` is set and a container runtime is detected.
/// - Exa web/code search over MCP, when `exa_api_key` is set.
/// - one MCP tool source per `mcp_servers` entry, header templates rendered first.
/// - `image_generation`, when all three image-generation fields are set.
///
/// None of these are required; an empty `CompositeToolSource` is a valid (if
/// useless) result when no tool is configured.
pub(crate) async fn build_tool_source(
    config: &ReactBuildConfig,
    _store: &Option<Arc<dyn crate::memory::Store>>,
) -> Result<Box<dyn ToolSource>, AgentError> {
    let mut sources: Vec<Box<dyn ToolSource>> = Vec::new();

    if let Some(bash) = build_bash_source(config) {
        sources.push(Box::new(bash));
    }

    let aggregate = AggregateToolSource::new();
    let mut has_local_tools = false;

    if let Some(image_tool) = build_image_generation_tool(config) {
        aggregate.register_async(Box::new(image_tool)).await;
        has_local_tools = true;
    }

    if let Some(exa) = build_exa_mcp_source(config).await? {
        let exa = Arc::new(exa);
        register_mcp_tools(&aggregate, exa)
            .await
            .map_err(to_agent_error)?;
        has_local_tools = true;
    }

    for mcp in build_configured_mcp_sources(config).await? {
        register_mcp_tools(&aggregate, Arc::new(mcp))
            .await
            .map_err(to_agent_error)?;
        has_local_tools = true;
    }

    if has_local_tools {
        sources.push(Box::new(aggregate));
    }

    let composite = CompositeToolSource::new(sources).await.map_err(to_agent_error)?;
    Ok(Box::new(composite))
}
