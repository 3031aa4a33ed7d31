use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_QWEN_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";
pub const DEFAULT_QWEN_MODEL: &str = "qwen-turbo";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const DEFAULT_GEMINI_BACKUP_MODEL: &str = "imagen-3.0-generate-001";

/// Reads an env var, treating empty values as unset.
fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct QwenConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_model: String,
    pub backup_model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: Option<u16>,
    pub request_timeout: Option<Duration>,
    pub qwen: QwenConfig,
    pub gemini: GeminiConfig,
}

impl Default for QwenConfig {
    fn default() -> Self {
        QwenConfig {
            api_key: None,
            base_url: DEFAULT_QWEN_BASE_URL.to_string(),
            model: DEFAULT_QWEN_MODEL.to_string(),
        }
    }
}

impl QwenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        QwenConfig {
            api_key: env_non_empty("QWEN_API_KEY"),
            base_url: env_non_empty("QWEN_BASE_URL")
                .unwrap_or_else(|| DEFAULT_QWEN_BASE_URL.to_string()),
            model: env_non_empty("QWEN_MODEL").unwrap_or_else(|| DEFAULT_QWEN_MODEL.to_string()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into()).filter(|k: &String| !k.is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            image_model: DEFAULT_GEMINI_IMAGE_MODEL.to_string(),
            backup_model: DEFAULT_GEMINI_BACKUP_MODEL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        GeminiConfig {
            api_key: env_non_empty("Gemini_API_KEY").or_else(|| env_non_empty("GEMINI_API_KEY")),
            base_url: env_non_empty("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            image_model: env_non_empty("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_IMAGE_MODEL.to_string()),
            backup_model: env_non_empty("GEMINI_BACKUP_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BACKUP_MODEL.to_string()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into()).filter(|k: &String| !k.is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_models(
        mut self,
        image_model: impl Into<String>,
        backup_model: impl Into<String>,
    ) -> Self {
        self.image_model = image_model.into();
        self.backup_model = backup_model.into();
        self
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: None,
            request_timeout: None,
            qwen: QwenConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env_non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = env_non_empty("PORT").and_then(|port| port.parse().ok());
        let request_timeout = env_non_empty("HTTP_TIMEOUT_SECS")
            .and_then(|secs| secs.parse().ok())
            .map(Duration::from_secs);

        Config {
            host,
            port,
            request_timeout,
            qwen: QwenConfig::from_env(),
            gemini: GeminiConfig::from_env(),
        }
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_qwen(mut self, config: QwenConfig) -> Self {
        self.qwen = config;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }
}
