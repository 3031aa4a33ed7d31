use crate::{
    config::QwenConfig,
    error::{GenerationError, Result},
    logger,
    models::{extract_qwen_text, GenerationResult, Message, QwenInput, QwenRequest},
};
use reqwest::Client;

const GENERATION_PATH: &str = "/services/aigc/text-generation/generation";

#[derive(Clone)]
pub struct QwenClient {
    client: Client,
    config: QwenConfig,
}

impl QwenClient {
    pub fn new(client: Client, config: QwenConfig) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.has_key()
    }

    /// Sends the whole conversation to DashScope and returns the completion.
    pub async fn generate(&self, messages: &[Message]) -> Result<GenerationResult> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::ConfigError("Qwen API key not configured".into()))?;

        let payload = QwenRequest {
            model: &self.config.model,
            input: QwenInput { messages },
        };
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), GENERATION_PATH);

        log::info!("Sending request to Qwen API ({})", self.config.model);
        let _timer = logger::timer("qwen generation");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Qwen API returned status {}", status.as_u16());
            return Err(GenerationError::UpstreamHttp {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        log::debug!("Qwen API response received ({} bytes)", body.len());

        let parsed: Option<serde_json::Value> = serde_json::from_slice(&body).ok();
        parsed
            .as_ref()
            .and_then(extract_qwen_text)
            .map(GenerationResult::text_only)
            .ok_or_else(|| {
                log::error!("Unexpected Qwen API response format");
                GenerationError::InvalidResponseFormat("Qwen API".into())
            })
    }
}
