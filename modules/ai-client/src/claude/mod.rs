mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use base64::Engine as _;

use crate::schema::StructuredOutput;
use client::ClaudeClient;
use types::*;

/// An image handed to the vision model: raw bytes plus MIME type.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub media_type: String,
    pub data: Vec<u8>,
}

// =============================================================================
// Claude Agent
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| anyhow!("ANTHROPIC_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> ClaudeClient {
        let client = ClaudeClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    // =========================================================================
    // Convenience methods
    // =========================================================================

    /// Extract structured data from a text prompt by forcing a tool call
    /// whose input schema is derived from `T`.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let message = WireMessage::user(user_prompt.into());
        self.extract_from_message(system_prompt, message).await
    }

    /// Extract structured data from a prompt plus attached images.
    pub async fn extract_with_images<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        images: &[ImageInput],
    ) -> Result<T> {
        let mut blocks: Vec<ContentBlock> = images
            .iter()
            .map(|img| ContentBlock::Image {
                source: ImageSource::base64(
                    &img.media_type,
                    base64::engine::general_purpose::STANDARD.encode(&img.data),
                ),
            })
            .collect();
        blocks.push(ContentBlock::Text {
            text: user_prompt.into(),
        });

        self.extract_from_message(system_prompt, WireMessage::user_blocks(blocks))
            .await
    }

    async fn extract_from_message<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        message: WireMessage,
    ) -> Result<T> {
        let schema = T::tool_schema();

        let tool_name = "structured_response";
        let mut request = ChatRequest::new(&self.model)
            .system(system_prompt)
            .message(message)
            .tool(ToolDefinitionWire {
                name: tool_name.to_string(),
                description: "Extract structured data from the input.".to_string(),
                input_schema: schema,
            });
        request.tool_choice = Some(serde_json::json!({
            "type": "tool",
            "name": tool_name,
        }));

        let response = self.client().chat(&request).await?;

        for block in &response.content {
            if let ContentBlock::ToolUse { input, .. } = block {
                return serde_json::from_value(input.clone())
                    .map_err(|e| anyhow!("Failed to deserialize response: {}", e));
            }
        }

        Err(anyhow!("No structured output in Claude response"))
    }

    /// Plain single-turn completion, deterministic settings.
    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .system(system)
            .message(WireMessage::user(user))
            .max_tokens(1024)
            .temperature(0.0);

        let response = self.client().chat(&request).await?;

        response
            .text()
            .ok_or_else(|| anyhow!("No response from Claude"))
    }
}
