use crate::{
    config::GeminiConfig,
    error::{GenerationError, Result},
    logger,
    models::{
        GenerateContentRequest, GenerateContentResponse, GenerateImagesRequest,
        GenerateImagesResponse, GenerationResult,
    },
    providers::image_pipeline::{FallbackImagePipeline, ImageGenerator},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

pub const IMAGE_READY_TEXT: &str = "✨ 图像已成功生成！";
pub const BACKUP_IMAGE_READY_TEXT: &str = "✨ 图像已通过Imagen成功生成！";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.has_key()
    }

    /// Produces a game asset image for `prompt`, falling back to Imagen and
    /// finally to written design advice.
    ///
    /// Only a missing API key is reported as an error; upstream failures are
    /// absorbed by the fallback chain.
    pub async fn generate_image(&self, prompt: &str) -> Result<GenerationResult> {
        let api_key = self
            .config
            .api_key
            .clone()
            .ok_or_else(|| GenerationError::ConfigError("Gemini API key not configured".into()))?;

        let endpoint = GeminiEndpoint {
            client: self.client.clone(),
            base_url: self.config.base_url.trim_end_matches('/').to_string(),
            api_key,
        };
        let primary = FlashImageGenerator {
            endpoint: endpoint.clone(),
            model: self.config.image_model.clone(),
        };
        let backup = ImagenGenerator {
            endpoint,
            model: self.config.backup_model.clone(),
        };

        Ok(FallbackImagePipeline::new(&primary, &backup).run(prompt).await)
    }
}

#[derive(Clone)]
struct GeminiEndpoint {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiEndpoint {
    async fn post<B, R>(&self, model: &str, method: &str, body: &B, label: &str) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/models/{}:{}", self.base_url, model, method);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("{} returned status {}", label, status.as_u16());
            return Err(GenerationError::UpstreamHttp {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        log::debug!("{} response received ({} bytes)", label, bytes.len());
        serde_json::from_slice(&bytes).map_err(|e| {
            log::error!("Could not parse {} response: {}", label, e);
            GenerationError::InvalidResponseFormat(label.to_string())
        })
    }
}

/// Primary stage: multi-modal `generateContent` returning text and image parts.
struct FlashImageGenerator {
    endpoint: GeminiEndpoint,
    model: String,
}

#[async_trait]
impl ImageGenerator for FlashImageGenerator {
    fn label(&self) -> &'static str {
        "Gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let request = GenerateContentRequest::text_and_image(format!(
            "Generate a high-quality game asset image: {}. Create a detailed, professional game art suitable for use in game development. Please generate an image.",
            prompt
        ));

        log::info!("Sending request to Gemini API for image generation");
        let _timer = logger::timer("gemini image generation");

        let response: GenerateContentResponse = self
            .endpoint
            .post(&self.model, "generateContent", &request, "Gemini API")
            .await?;

        let candidate = response.candidates.first().ok_or_else(|| {
            log::error!("Gemini response carried no candidates");
            GenerationError::InvalidResponseFormat("Gemini API".into())
        })?;

        let output = candidate.collect_output();
        let text = if output.text.is_empty() {
            IMAGE_READY_TEXT.to_string()
        } else {
            output.text
        };

        let result = match output.image_data {
            Some(image_data) => {
                log::info!("Gemini returned an image ({} base64 chars)", image_data.len());
                GenerationResult::with_image(text, image_data)
            }
            None => {
                log::warn!("Gemini answered without an image part");
                GenerationResult::text_only(text)
            }
        };
        Ok(result)
    }
}

/// Backup stage: image-only `generateImages`.
struct ImagenGenerator {
    endpoint: GeminiEndpoint,
    model: String,
}

#[async_trait]
impl ImageGenerator for ImagenGenerator {
    fn label(&self) -> &'static str {
        "Imagen"
    }

    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let request =
            GenerateImagesRequest::single_square(format!("High-quality game asset: {}", prompt));

        log::info!("Trying Imagen API as backup");
        let _timer = logger::timer("imagen image generation");

        let response: GenerateImagesResponse = self
            .endpoint
            .post(&self.model, "generateImages", &request, "Imagen API")
            .await?;

        response
            .generated_images
            .into_iter()
            .next()
            .and_then(|image| image.image)
            .filter(|data| !data.is_empty())
            .map(|data| GenerationResult::with_image(BACKUP_IMAGE_READY_TEXT, data))
            .ok_or_else(|| GenerationError::InvalidResponseFormat("Imagen API".into()))
    }
}
