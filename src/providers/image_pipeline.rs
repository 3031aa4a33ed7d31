use crate::{error::Result, models::GenerationResult};
use async_trait::async_trait;

/// One image-producing attempt inside a [`FallbackImagePipeline`].
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    fn label(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<GenerationResult>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Primary,
    Backup,
    DegradedText,
}

/// Primary model, then backup model, then plain design advice.
///
/// A stage is abandoned only when it returns an error. The last stage
/// cannot fail, so [`run`](Self::run) always yields a result.
pub struct FallbackImagePipeline<'a> {
    primary: &'a dyn ImageGenerator,
    backup: &'a dyn ImageGenerator,
}

impl<'a> FallbackImagePipeline<'a> {
    pub fn new(primary: &'a dyn ImageGenerator, backup: &'a dyn ImageGenerator) -> Self {
        Self { primary, backup }
    }

    pub async fn run(&self, prompt: &str) -> GenerationResult {
        self.run_with_stage(prompt).await.1
    }

    /// Like [`run`](Self::run) but also reports which stage produced the result.
    pub async fn run_with_stage(&self, prompt: &str) -> (PipelineStage, GenerationResult) {
        match self.primary.generate(prompt).await {
            Ok(result) => return (PipelineStage::Primary, result),
            Err(e) => log::error!("{} image generation failed: {}", self.primary.label(), e),
        }

        log::warn!("Trying {} as backup", self.backup.label());
        match self.backup.generate(prompt).await {
            Ok(result) => return (PipelineStage::Backup, result),
            Err(e) => log::error!("{} backup also failed: {}", self.backup.label(), e),
        }

        log::warn!("All image generators failed, returning design advice instead");
        (PipelineStage::DegradedText, degraded_advice(prompt))
    }
}

/// Terminal fallback: textual art direction built around the prompt.
pub fn degraded_advice(prompt: &str) -> GenerationResult {
    GenerationResult::text_only(format!(
        "🎨 图像生成服务暂时不可用，但我为您提供了详细的素材设计建议：\n\n\
         基于您的描述\"{}\"，建议的设计要素：\n\
         • 色彩方案：选择符合游戏风格的主色调\n\
         • 构图布局：确保主要元素突出且平衡\n\
         • 细节处理：添加适当的纹理和光影效果\n\
         • 风格一致性：与游戏整体美术风格保持统一\n\n\
         您可以将这些建议提供给美术团队进行创作。",
        prompt
    ))
}
