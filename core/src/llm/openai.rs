//! `LlmClient` backed by an OpenAI-compatible Chat Completions endpoint.
//!
//! Works against any provider that speaks the OpenAI wire format (OpenAI
//! itself, Azure OpenAI via `OpenAIConfig`, or a self-hosted gateway with a
//! custom `api_base`) since `async_openai::config::OpenAIConfig` is generic
//! over the base URL and key.

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionToolArgs, ChatCompletionToolType, CreateChatCompletionRequestArgs,
    FunctionObjectArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::message::Message;
use crate::state::ToolCall;
use crate::stream::MessageChunk;
use crate::tool_source::ToolSpec;

use super::{LlmClient, LlmResponse, LlmUsage};

/// One callable tool to advertise to the model, alongside its JSON Schema.
#[derive(Clone, Debug)]
pub struct OpenAiTool {
    pub name: String,
    pub description: Option<String>,
    pub parameters: serde_json::Value,
}

impl From<&ToolSpec> for OpenAiTool {
    fn from(spec: &ToolSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: spec.input_schema.clone(),
        }
    }
}

/// Chat Completions client for any OpenAI-compatible provider.
///
/// Tools are fixed at construction time (`with_tools`); a fresh `ThinkNode`
/// round always offers the model the same tool set, matching how
/// `build_default_llm_with_tool_source` wires one client per run.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    tools: Vec<OpenAiTool>,
}

impl ChatOpenAI {
    /// Builds a client from an explicit `OpenAIConfig` (base URL + key already set).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            tools: Vec::new(),
        }
    }

    /// Returns a copy of this client advertising `tools` to the model.
    pub fn with_tools(mut self, tools: Vec<OpenAiTool>) -> Self {
        self.tools = tools;
        self
    }

    fn to_openai_messages(messages: &[Message]) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        messages
            .iter()
            .map(|m| match m {
                Message::System(content) => ChatCompletionRequestSystemMessageArgs::default()
                    .content(content.as_str())
                    .build()
                    .map(Into::into)
                    .map_err(to_agent_error),
                Message::User(content) => ChatCompletionRequestUserMessageArgs::default()
                    .content(content.as_str())
                    .build()
                    .map(Into::into)
                    .map_err(to_agent_error),
                Message::Assistant(content) => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(content.as_str())
                    .build()
                    .map(Into::into)
                    .map_err(to_agent_error),
            })
            .collect()
    }
}

fn to_agent_error(e: impl std::fmt::Display) -> AgentError {
    AgentError::ExecutionFailed(e.to_string())
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        self.invoke_stream(messages, None).await
    }

    async fn invoke_stream(
        &self,
        messages: &[Message],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, AgentError> {
        let openai_messages = Self::to_openai_messages(messages)?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(openai_messages);

        if !self.tools.is_empty() {
            let tools = self
                .tools
                .iter()
                .map(|t| {
                    let mut function = FunctionObjectArgs::default();
                    function.name(&t.name).parameters(t.parameters.clone());
                    if let Some(description) = &t.description {
                        function.description(description);
                    }
                    ChatCompletionToolArgs::default()
                        .r#type(ChatCompletionToolType::Function)
                        .function(function.build().map_err(to_agent_error)?)
                        .build()
                        .map_err(to_agent_error)
                })
                .collect::<Result<Vec<_>, AgentError>>()?;
            builder.tools(tools);
        }

        let request = builder.build().map_err(to_agent_error)?;
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(to_agent_error)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::ExecutionFailed("provider returned no choices".to_string()))?;

        let content = choice.message.content.unwrap_or_default();

        if let Some(tx) = &chunk_tx {
            if !content.is_empty() {
                let _ = tx
                    .send(MessageChunk {
                        content: content.clone(),
                    })
                    .await;
            }
        }

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: Some(tc.id),
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let usage = response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(LlmResponse {
            content,
            tool_calls,
            usage,
        })
    }
}
