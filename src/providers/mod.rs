pub mod gemini_client;
pub mod image_pipeline;
pub mod qwen_client;
pub mod virtual_client;

use crate::{
    config::Config,
    error::{GenerationError, Result},
    models::{GenerationResult, Message, ModelId},
};
use reqwest::Client;

pub use gemini_client::GeminiClient;
pub use image_pipeline::{FallbackImagePipeline, ImageGenerator, PipelineStage};
pub use qwen_client::QwenClient;
pub use virtual_client::VirtualClient;

pub const PLANNING_INSTRUCTION: &str = "You are a game design expert helping to create game plans.";
pub const ASSETS_INSTRUCTION: &str = "You are a game asset creation expert.";
pub const DEVELOPMENT_INSTRUCTION: &str =
    "You are a game development expert providing technical guidance.";

/// Routes prompts to the selected backend and returns a uniform envelope.
///
/// Cheap to clone; the underlying HTTP connection pool is shared.
#[derive(Clone)]
pub struct GenerationClient {
    qwen_client: QwenClient,
    gemini_client: GeminiClient,
    virtual_client: VirtualClient,
}

impl GenerationClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GenerationError::RequestError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            qwen_client: QwenClient::new(client.clone(), config.qwen.clone()),
            gemini_client: GeminiClient::new(client, config.gemini.clone()),
            virtual_client: VirtualClient::new(),
        })
    }

    pub fn qwen(&self) -> &QwenClient {
        &self.qwen_client
    }

    pub fn gemini(&self) -> &GeminiClient {
        &self.gemini_client
    }

    /// Resolves `selected_model` (absent means qwen) and generates.
    pub async fn generate_response(
        &self,
        messages: &[Message],
        selected_model: Option<&str>,
    ) -> Result<GenerationResult> {
        let model = ModelId::resolve(selected_model).map_err(|e| {
            log::error!("Rejected request: {}", e);
            e
        })?;
        self.generate(messages, model).await
    }

    pub async fn generate(&self, messages: &[Message], model: ModelId) -> Result<GenerationResult> {
        log::info!("Processing request with model: {}", model);

        self.dispatch(messages, model).await.map_err(|e| {
            match &e {
                GenerationError::UpstreamHttp { status } => {
                    log::error!("Error in {} API call: upstream status {}", model, status)
                }
                other => log::error!("Error in {} API call ({}): {}", model, other.kind(), other),
            }
            e
        })
    }

    async fn dispatch(&self, messages: &[Message], model: ModelId) -> Result<GenerationResult> {
        match model {
            ModelId::Qwen => self.qwen_client.generate(messages).await,
            ModelId::Gemini => {
                let prompt = last_content(messages)?;
                self.gemini_client.generate_image(prompt).await
            }
            ModelId::IegGuangzi | ModelId::Hunyuan | ModelId::Deepseek => {
                let prompt = last_content(messages)?;
                Ok(self.virtual_client.generate(model, prompt))
            }
        }
    }

    pub async fn generate_plan(
        &self,
        task_description: &str,
        selected_model: Option<&str>,
    ) -> Result<GenerationResult> {
        self.generate_with_instruction(PLANNING_INSTRUCTION, task_description, selected_model)
            .await
    }

    pub async fn generate_assets(
        &self,
        model_data: &str,
        selected_model: Option<&str>,
    ) -> Result<GenerationResult> {
        self.generate_with_instruction(ASSETS_INSTRUCTION, model_data, selected_model)
            .await
    }

    pub async fn start_development(
        &self,
        task_data: &str,
        selected_model: Option<&str>,
    ) -> Result<GenerationResult> {
        self.generate_with_instruction(DEVELOPMENT_INSTRUCTION, task_data, selected_model)
            .await
    }

    async fn generate_with_instruction(
        &self,
        instruction: &str,
        prompt: &str,
        selected_model: Option<&str>,
    ) -> Result<GenerationResult> {
        let messages = [Message::system(instruction), Message::user(prompt)];
        self.generate_response(&messages, selected_model).await
    }
}

/// Image and virtual models only look at the most recent message.
fn last_content(messages: &[Message]) -> Result<&str> {
    messages
        .last()
        .map(|m| m.content.as_str())
        .ok_or_else(|| GenerationError::RequestError("no messages to generate from".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeminiConfig, QwenConfig};
    use crate::models::GenerationStatus;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn offline_client() -> GenerationClient {
        GenerationClient::new(&Config::new()).unwrap()
    }

    #[tokio::test]
    async fn test_every_model_returns_success_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/aigc/text-generation/generation"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": {"text": "plan"}})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash-preview-image-generation:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"data": "aW1n"}]}}]
            })))
            .mount(&server)
            .await;

        let config = Config::new()
            .with_qwen(QwenConfig::new().with_base_url(server.uri()).with_api_key("q"))
            .with_gemini(GeminiConfig::new().with_base_url(server.uri()).with_api_key("g"));
        let client = GenerationClient::new(&config).unwrap();

        for model in ModelId::ALL {
            let result = client
                .generate_plan("a racing game", Some(model.as_str()))
                .await
                .unwrap();
            assert_eq!(result.status(), GenerationStatus::Success);
            assert!(!result.text().is_empty(), "{} returned empty text", model);
        }
    }

    #[tokio::test]
    async fn test_unknown_model_is_rejected() {
        let err = offline_client()
            .generate_assets("a tree", Some("midjourney"))
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::UnsupportedModel("midjourney".into()));
    }

    #[tokio::test]
    async fn test_absent_model_defaults_to_qwen() {
        let err = offline_client().generate_plan("anything", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Qwen API key not configured");
    }

    #[tokio::test]
    async fn test_gemini_without_key_is_config_error() {
        let err = offline_client()
            .generate_assets("a tree", Some("gemini"))
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::ConfigError("Gemini API key not configured".into()));
    }

    #[tokio::test]
    async fn test_hunyuan_plan_example() {
        let result = offline_client()
            .generate_plan("design a jump mechanic", Some("hunyuan"))
            .await
            .unwrap();
        assert!(result.text().starts_with("[Hunyuan 虚拟AI回复]"));
        assert!(result.text().contains("design a jump mechanic"));
    }

    #[tokio::test]
    async fn test_virtual_models_read_last_message_only() {
        let messages = [
            Message::system(DEVELOPMENT_INSTRUCTION),
            Message::user("first"),
            Message::user("netcode rollback"),
        ];
        let result = offline_client()
            .generate(&messages, ModelId::Deepseek)
            .await
            .unwrap();
        assert!(result.text().contains("netcode rollback"));
        assert!(!result.text().contains(DEVELOPMENT_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_empty_conversation_is_request_error() {
        let err = offline_client()
            .generate(&[], ModelId::Hunyuan)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::RequestError(_)));
    }

    #[tokio::test]
    async fn test_entry_points_prepend_their_instruction() {
        let server = MockServer::start().await;
        for instruction in [PLANNING_INSTRUCTION, ASSETS_INSTRUCTION, DEVELOPMENT_INSTRUCTION] {
            Mock::given(method("POST"))
                .and(body_partial_json(json!({"input": {"messages": [
                    {"role": "system", "content": instruction},
                    {"role": "user", "content": "boss fight"}
                ]}})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": instruction})))
                .expect(1)
                .mount(&server)
                .await;
        }

        let config = Config::new()
            .with_qwen(QwenConfig::new().with_base_url(server.uri()).with_api_key("q"));
        let client = GenerationClient::new(&config).unwrap();

        let plan = client.generate_plan("boss fight", None).await.unwrap();
        let assets = client.generate_assets("boss fight", Some("qwen")).await.unwrap();
        let dev = client.start_development("boss fight", None).await.unwrap();
        assert_eq!(plan.text(), PLANNING_INSTRUCTION);
        assert_eq!(assets.text(), ASSETS_INSTRUCTION);
        assert_eq!(dev.text(), DEVELOPMENT_INSTRUCTION);
    }
}
