//! Builds the default chat-model client when the caller doesn't supply one.

use async_openai::config::OpenAIConfig;

use crate::llm::{ChatOpenAI, OpenAiTool};
use crate::tool_source::ToolSource;
use crate::LlmClient;

use super::super::config::ReactBuildConfig;
use super::error::BuildRunnerError;

/// Builds a [`ChatOpenAI`] client from `config.openai_api_key`/`model`, advertising
/// every tool `tool_source` currently lists.
///
/// Returns [`BuildRunnerError::MissingLlmConfig`] when no API key or model is set;
/// callers that want a default client must configure at least those two.
pub(crate) async fn build_default_llm_with_tool_source(
    config: &ReactBuildConfig,
    tool_source: &dyn ToolSource,
) -> Result<Box<dyn LlmClient>, BuildRunnerError> {
    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or_else(|| BuildRunnerError::MissingLlmConfig("OPENAI_API_KEY is not set".to_string()))?;
    let model = config
        .model
        .as_deref()
        .ok_or_else(|| BuildRunnerError::MissingLlmConfig("OPENAI_MODEL is not set".to_string()))?;

    let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base) = config.openai_base_url.as_deref().filter(|s| !s.is_empty()) {
        openai_config = openai_config.with_api_base(base.trim_end_matches('/'));
    }

    let specs = tool_source
        .list_tools()
        .await
        .map_err(|e| BuildRunnerError::MissingLlmConfig(e.to_string()))?;
    let tools: Vec<OpenAiTool> = specs.iter().map(OpenAiTool::from).collect();

    let client = ChatOpenAI::with_config(openai_config, model).with_tools(tools);
    Ok(Box::new(client))
}
