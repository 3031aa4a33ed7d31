use super::common::Message;
use serde::Serialize;
use serde_json::Value;

/// DashScope text-generation request body.
#[derive(Debug, Serialize)]
pub struct QwenRequest<'a> {
    pub model: &'a str,
    pub input: QwenInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct QwenInput<'a> {
    pub messages: &'a [Message],
}

/// JSON pointers to the completion text, in lookup order. DashScope has
/// answered with both layouts.
pub const QWEN_TEXT_POINTERS: [&str; 2] = ["/output/text", "/text"];

/// Returns the first non-empty completion text found in a DashScope body.
pub fn extract_qwen_text(body: &Value) -> Option<&str> {
    QWEN_TEXT_POINTERS.iter().find_map(|pointer| {
        body.pointer(pointer)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    })
}
