use crate::models::{GenerationResult, ModelId};

/// Offline stand-ins for iegGuangzi, hunyuan and deepseek.
///
/// Replies are a pure function of the model and the prompt; nothing leaves
/// the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualClient;

impl VirtualClient {
    pub fn new() -> Self {
        Self
    }

    pub fn reply(&self, model: ModelId, prompt: &str) -> String {
        match model {
            ModelId::IegGuangzi => format!(
                "[IEGGuangzi 虚拟AI回复] 基于您的描述\"{}\"，我为您生成了相应的游戏素材建议。这是一个模拟回复，展示了AI助手的响应格式。",
                prompt
            ),
            ModelId::Hunyuan => format!(
                "[Hunyuan 虚拟AI回复] 根据您的需求\"{}\"，我为您提供以下游戏策划建议：\n\n1. 核心玩法设计\n2. 系统架构规划\n3. 用户体验优化\n\n这是混元AI的模拟响应，实际使用时会调用真实API。",
                prompt
            ),
            ModelId::Deepseek => format!(
                "[Deepseek 虚拟AI回复] 针对您的描述\"{}\"，我从技术角度为您分析：\n\n• 技术实现方案\n• 性能优化建议\n• 代码架构设计\n\n这是DeepSeek AI的模拟回复，展示了深度思考的技术建议。",
                prompt
            ),
            other => format!(
                "[{} 虚拟AI回复] 基于您的描述\"{}\"，我为您生成了相应的回复。",
                other, prompt
            ),
        }
    }

    pub fn generate(&self, model: ModelId, prompt: &str) -> GenerationResult {
        log::debug!("Answering {} locally with a virtual reply", model);
        GenerationResult::text_only(self.reply(model, prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationStatus;

    #[test]
    fn test_hunyuan_reply_is_tagged_and_quotes_prompt() {
        let result = VirtualClient::new().generate(ModelId::Hunyuan, "design a jump mechanic");
        assert!(result.text().starts_with("[Hunyuan 虚拟AI回复]"));
        assert!(result.text().contains("design a jump mechanic"));
        assert_eq!(result.status(), GenerationStatus::Success);
        assert!(!result.has_image());
    }

    #[test]
    fn test_each_virtual_model_has_its_own_tag() {
        let client = VirtualClient::new();
        assert!(client
            .reply(ModelId::IegGuangzi, "sword")
            .starts_with("[IEGGuangzi 虚拟AI回复]"));
        assert!(client
            .reply(ModelId::Deepseek, "netcode")
            .starts_with("[Deepseek 虚拟AI回复]"));
    }

    #[test]
    fn test_replies_are_deterministic() {
        let client = VirtualClient::new();
        for model in [ModelId::IegGuangzi, ModelId::Hunyuan, ModelId::Deepseek] {
            assert_eq!(client.reply(model, "same"), client.reply(model, "same"));
            assert_ne!(client.reply(model, "same"), client.reply(model, "other"));
        }
    }
}
