use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Locations of an inline image payload inside a `generateContent` part, in
/// lookup order.
///
/// Compatibility shim: the API has shipped several spellings across versions
/// and none is documented as the current one.
pub const IMAGE_FIELD_PATHS: [&[&str]; 4] = [
    &["inline_data", "data"],
    &["inlineData", "data"],
    &["image", "data"],
    &["data"],
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

impl GenerateContentRequest {
    pub fn text_and_image(prompt: String) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

/// Parts stay untyped because the image field name varies.
#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Value>,
}

/// Text and image pulled out of a candidate's parts.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CandidateOutput {
    pub text: String,
    pub image_data: Option<String>,
}

/// Returns the image payload of a single part, checking [`IMAGE_FIELD_PATHS`]
/// in order.
pub fn extract_image_payload(part: &Value) -> Option<&str> {
    IMAGE_FIELD_PATHS.iter().find_map(|path| {
        path.iter()
            .try_fold(part, |node, key| node.get(*key))
            .and_then(Value::as_str)
            .filter(|data| !data.is_empty())
    })
}

impl Candidate {
    /// Concatenates all text parts and keeps the first image payload.
    pub fn collect_output(&self) -> CandidateOutput {
        let mut output = CandidateOutput::default();
        let parts = self.content.as_ref().map(|c| c.parts.as_slice()).unwrap_or(&[]);

        for part in parts {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                output.text.push_str(text);
            }
            if output.image_data.is_none() {
                output.image_data = extract_image_payload(part).map(str::to_string);
            }
        }
        output
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateImagesRequest {
    pub prompt: String,
    pub number_of_images: u32,
    pub aspect_ratio: String,
}

impl GenerateImagesRequest {
    pub fn single_square(prompt: String) -> Self {
        Self {
            prompt,
            number_of_images: 1,
            aspect_ratio: "1:1".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateImagesResponse {
    #[serde(default)]
    pub generated_images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_four_field_spellings_are_recognized() {
        let parts = [
            json!({"inline_data": {"mime_type": "image/png", "data": "AAA"}}),
            json!({"inlineData": {"mimeType": "image/png", "data": "BBB"}}),
            json!({"image": {"data": "CCC"}}),
            json!({"data": "DDD"}),
        ];
        let found: Vec<_> = parts.iter().map(extract_image_payload).collect();
        assert_eq!(found, vec![Some("AAA"), Some("BBB"), Some("CCC"), Some("DDD")]);
    }

    #[test]
    fn test_field_order_decides_between_spellings() {
        let part = json!({"data": "late", "inlineData": {"data": "early"}});
        assert_eq!(extract_image_payload(&part), Some("early"));
    }

    #[test]
    fn test_text_part_has_no_image() {
        assert_eq!(extract_image_payload(&json!({"text": "hi"})), None);
        assert_eq!(extract_image_payload(&json!({"inlineData": {"data": 3}})), None);
    }

    #[test]
    fn test_candidate_concatenates_text_and_keeps_first_image() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "A knight "},
                        {"inlineData": {"data": "FIRST"}},
                        {"text": "in armor"},
                        {"inline_data": {"data": "SECOND"}}
                    ]
                }
            }]
        }))
        .unwrap();

        let output = response.candidates[0].collect_output();
        assert_eq!(output.text, "A knight in armor");
        assert_eq!(output.image_data.as_deref(), Some("FIRST"));
    }

    #[test]
    fn test_candidate_without_content_is_empty() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert_eq!(response.candidates[0].collect_output(), CandidateOutput::default());
    }

    #[test]
    fn test_request_bodies_use_wire_names() {
        let body = serde_json::to_value(GenerateContentRequest::text_and_image("p".into())).unwrap();
        assert_eq!(body["generationConfig"]["responseModalities"], json!(["TEXT", "IMAGE"]));
        assert_eq!(body["contents"][0]["parts"][0]["text"], json!("p"));

        let body = serde_json::to_value(GenerateImagesRequest::single_square("q".into())).unwrap();
        assert_eq!(
            body,
            json!({"prompt": "q", "number_of_images": 1, "aspect_ratio": "1:1"})
        );
    }
}
