use crate::error::{GenerationError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const IMAGE_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Text,
    Image,
    Virtual,
}

/// Every backend a caller may select. Anything else is rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum ModelId {
    #[default]
    Qwen,
    Gemini,
    IegGuangzi,
    Hunyuan,
    Deepseek,
}

impl ModelId {
    pub const ALL: [ModelId; 5] = [
        ModelId::Qwen,
        ModelId::Gemini,
        ModelId::IegGuangzi,
        ModelId::Hunyuan,
        ModelId::Deepseek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Qwen => "qwen",
            ModelId::Gemini => "gemini",
            ModelId::IegGuangzi => "iegGuangzi",
            ModelId::Hunyuan => "hunyuan",
            ModelId::Deepseek => "deepseek",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelId::Qwen => "Qwen",
            ModelId::Gemini => "Gemini",
            ModelId::IegGuangzi => "IEGGuangzi",
            ModelId::Hunyuan => "Hunyuan",
            ModelId::Deepseek => "Deepseek",
        }
    }

    pub fn category(&self) -> ModelCategory {
        match self {
            ModelId::Qwen => ModelCategory::Text,
            ModelId::Gemini => ModelCategory::Image,
            ModelId::IegGuangzi | ModelId::Hunyuan | ModelId::Deepseek => ModelCategory::Virtual,
        }
    }

    /// `(id, display name, category)` for each selectable model.
    pub fn supported_models() -> Vec<(&'static str, &'static str, ModelCategory)> {
        Self::ALL
            .iter()
            .map(|m| (m.as_str(), m.display_name(), m.category()))
            .collect()
    }

    /// Resolves a caller-supplied identifier; `None` means the default model.
    pub fn resolve(selected: Option<&str>) -> Result<Self> {
        match selected {
            None => Ok(ModelId::default()),
            Some(id) => id.parse(),
        }
    }
}

impl FromStr for ModelId {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self> {
        ModelId::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| GenerationError::UnsupportedModel(s.to_string()))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Success,
}

/// Uniform envelope returned for every model.
///
/// Fields are private so `has_image`, `image_data` and `image_url` can only
/// be set together.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    text: String,
    status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    has_image: bool,
}

impl GenerationResult {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: GenerationStatus::Success,
            image_data: None,
            image_url: None,
            has_image: false,
        }
    }

    /// `image_data` is the raw base64 payload, without a data-URI prefix.
    pub fn with_image(text: impl Into<String>, image_data: impl Into<String>) -> Self {
        let image_data = image_data.into();
        Self {
            text: text.into(),
            status: GenerationStatus::Success,
            image_url: Some(format!("{}{}", IMAGE_DATA_URI_PREFIX, image_data)),
            image_data: Some(image_data),
            has_image: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn image_data(&self) -> Option<&str> {
        self.image_data.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn has_image(&self) -> bool {
        self.has_image
    }

    /// Decodes the base64 image payload, if any.
    pub fn decode_image(&self) -> Option<Result<Vec<u8>>> {
        self.image_data.as_ref().map(|data| {
            STANDARD
                .decode(data)
                .map_err(|e| GenerationError::RequestError(format!("invalid image payload: {}", e)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_ids_parse_exactly() {
        for model in ModelId::ALL {
            assert_eq!(model.as_str().parse::<ModelId>().unwrap(), model);
        }
        assert_eq!(
            "Qwen".parse::<ModelId>().unwrap_err(),
            GenerationError::UnsupportedModel("Qwen".into())
        );
        assert_eq!(
            "gpt-4".parse::<ModelId>().unwrap_err().to_string(),
            "Unsupported model: gpt-4"
        );
    }

    #[test]
    fn test_resolve_defaults_only_when_absent() {
        assert_eq!(ModelId::resolve(None).unwrap(), ModelId::Qwen);
        assert_eq!(ModelId::resolve(Some("hunyuan")).unwrap(), ModelId::Hunyuan);
        assert!(ModelId::resolve(Some("")).is_err());
    }

    #[test]
    fn test_model_id_serde_names() {
        assert_eq!(serde_json::to_value(ModelId::IegGuangzi).unwrap(), json!("iegGuangzi"));
        let parsed: ModelId = serde_json::from_value(json!("deepseek")).unwrap();
        assert_eq!(parsed, ModelId::Deepseek);
    }

    #[test]
    fn test_supported_models_lists_all() {
        let models = ModelId::supported_models();
        assert_eq!(models.len(), 5);
        assert!(models.contains(&("gemini", "Gemini", ModelCategory::Image)));
    }

    #[test]
    fn test_text_only_envelope_has_no_image_fields() {
        let result = GenerationResult::text_only("hello");
        assert!(!result.has_image());
        assert!(result.image_data().is_none());
        assert!(result.image_url().is_none());
        assert!(result.decode_image().is_none());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"text": "hello", "status": "success", "hasImage": false})
        );
    }

    #[test]
    fn test_image_envelope_builds_data_uri() {
        let result = GenerationResult::with_image("done", "aGVsbG8=");
        assert!(result.has_image());
        assert_eq!(result.image_data(), Some("aGVsbG8="));
        assert_eq!(
            result.image_url(),
            Some(format!("{}{}", IMAGE_DATA_URI_PREFIX, "aGVsbG8=").as_str())
        );
        assert_eq!(result.decode_image().unwrap().unwrap(), b"hello".to_vec());

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["imageUrl"], json!("data:image/png;base64,aGVsbG8="));
        assert_eq!(value["hasImage"], json!(true));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = GenerationResult::with_image("done", "***");
        assert!(result.decode_image().unwrap().is_err());
    }
}
