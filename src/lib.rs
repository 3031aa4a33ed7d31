//! GameGen relays game planning, asset and development prompts to a text
//! model (Qwen), an image model with fallbacks (Gemini, then Imagen) or a
//! built-in virtual model, and returns one [`GenerationResult`] shape for all
//! of them.

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;

pub use config::{Config, GeminiConfig, QwenConfig};
pub use error::{GenerationError, Result};
pub use models::{GenerationResult, GenerationStatus, Message, ModelCategory, ModelId, Role};
pub use providers::{
    FallbackImagePipeline, GeminiClient, GenerationClient, ImageGenerator, PipelineStage,
    QwenClient, VirtualClient,
};
