//! Built-in image generation tool: OpenAI-compatible `images/generations`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};
use crate::tools::Tool;

pub const TOOL_IMAGE_GENERATION: &str = "image_generation";

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
    b64_json: Option<String>,
}

/// Generates images from a text prompt via an OpenAI-compatible `images/generations`
/// endpoint. Provider base URL and API key come from the resolved virtual key
/// (see `llm::gateway`), not from process environment.
pub struct ImageGenerationTool {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ImageGenerationTool {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Tool for ImageGenerationTool {
    fn name(&self) -> &str {
        TOOL_IMAGE_GENERATION
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_IMAGE_GENERATION.to_string(),
            description: Some("Generate an image from a text prompt.".to_string()),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "prompt": {"type": "string"},
                    "size": {"type": "string"},
                    "response_format": {"type": "string", "enum": ["url", "b64_json"]},
                },
                "required": ["prompt"],
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let prompt = args
            .get("prompt")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidArguments("missing \"prompt\"".to_string()))?;
        let size = args.get("size").and_then(|v| v.as_str()).unwrap_or("1024x1024");
        let response_format = args
            .get("response_format")
            .and_then(|v| v.as_str())
            .unwrap_or("url");

        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": size,
            "response_format": response_format,
        });

        let resp = self
            .http
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ToolSourceError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| ToolSourceError::Transport(e.to_string()))?
            .json::<ImagesResponse>()
            .await
            .map_err(|e| ToolSourceError::Transport(e.to_string()))?;

        let first = resp
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ToolSourceError::Transport("empty images response".to_string()))?;
        let text = first
            .url
            .or(first.b64_json)
            .ok_or_else(|| ToolSourceError::Transport("image response had neither url nor b64_json".to_string()))?;
        Ok(ToolCallContent { text })
    }
}
