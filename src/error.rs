use thiserror::Error;

/// Failure classes surfaced to callers of the generation client.
///
/// Messages are safe to show to end users: upstream bodies and credentials
/// never end up in them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A required credential or setting is missing.
    #[error("{0}")]
    ConfigError(String),

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// The provider answered with a non-2xx status. Only the status is kept.
    #[error("API Error: {status}")]
    UpstreamHttp { status: u16 },

    /// The request went out but nothing came back (connect failure, timeout).
    #[error("No response received from API")]
    NoResponse,

    /// 2xx response whose body did not match any known shape.
    #[error("Invalid response format from {0}")]
    InvalidResponseFormat(String),

    #[error("Request error: {0}")]
    RequestError(String),
}

impl GenerationError {
    /// Short machine-friendly label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::ConfigError(_) => "configuration",
            GenerationError::UnsupportedModel(_) => "unsupported_model",
            GenerationError::UpstreamHttp { .. } => "upstream_http",
            GenerationError::NoResponse => "no_response",
            GenerationError::InvalidResponseFormat(_) => "invalid_response_format",
            GenerationError::RequestError(_) => "request",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return GenerationError::UpstreamHttp {
                status: status.as_u16(),
            };
        }
        if e.is_connect() || e.is_timeout() || e.is_request() || e.is_body() {
            return GenerationError::NoResponse;
        }
        if e.is_decode() {
            return GenerationError::InvalidResponseFormat("provider API".into());
        }
        // Gemini carries its key in the query string.
        GenerationError::RequestError(e.without_url().to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
