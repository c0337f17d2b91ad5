//! Live adapter for the Google Generative Language API (Gemini and Imagen).

use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::NodeError;
use crate::ports::{
    ContentPart, ContentRequest, EncodedImage, GenerationService, ImagesRequest, ResponsePart,
    ServiceFuture,
};

/// Live service that calls the Google AI REST endpoints.
pub struct GeminiService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiService {
    /// Create a service from a configured HTTP client.
    #[must_use]
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self { client, api_key, base_url }
    }

    async fn post<T: DeserializeOwned>(
        &self,
        model: &str,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, NodeError> {
        let url = format!("{}/models/{model}:{method}", self.base_url.trim_end_matches('/'));
        debug!(url = %url, "Sending request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(NodeError::Api { status: status.as_u16(), message: response_text });
        }

        serde_json::from_str(&response_text).map_err(|e| NodeError::Api {
            status: status.as_u16(),
            message: format!("Failed to parse response: {e}"),
        })
    }

    async fn predict(&self, request: ImagesRequest) -> Result<Vec<EncodedImage>, NodeError> {
        let body = serde_json::json!({
            "instances": [{ "prompt": request.prompt }],
            "parameters": {
                "sampleCount": request.count,
                "aspectRatio": request.aspect_ratio,
            }
        });

        let parsed: PredictResponse = self.post(&request.model, "predict", &body).await?;

        let mut images = Vec::new();
        for prediction in parsed.predictions {
            // Filtered predictions carry a reason instead of bytes.
            if let Some(data) = prediction.bytes_base64_encoded {
                images.push(EncodedImage {
                    data: decode_base64(&data)?,
                    mime_type: prediction.mime_type.unwrap_or_else(|| "image/png".into()),
                });
            }
        }
        Ok(images)
    }

    async fn generate(&self, request: ContentRequest) -> Result<Vec<ResponsePart>, NodeError> {
        let parts: Vec<serde_json::Value> = request.contents.iter().map(content_part_json).collect();
        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
        });

        let parsed: GeminiResponse = self.post(&request.model, "generateContent", &body).await?;

        let mut out = Vec::new();
        for part in parsed.candidates.into_iter().flat_map(|c| c.content.parts) {
            if let Some(text) = part.text {
                out.push(ResponsePart::Text(text));
            } else if let Some(inline) = part.inline_data {
                out.push(ResponsePart::InlineImage(EncodedImage {
                    data: decode_base64(&inline.data)?,
                    mime_type: inline.mime_type,
                }));
            }
        }
        Ok(out)
    }
}

impl GenerationService for GeminiService {
    fn generate_images(&self, request: &ImagesRequest) -> ServiceFuture<'_, Vec<EncodedImage>> {
        Box::pin(self.predict(request.clone()))
    }

    fn generate_content(&self, request: &ContentRequest) -> ServiceFuture<'_, Vec<ResponsePart>> {
        Box::pin(self.generate(request.clone()))
    }
}

fn content_part_json(part: &ContentPart) -> serde_json::Value {
    match part {
        ContentPart::Text(text) => serde_json::json!({ "text": text }),
        ContentPart::Image(image) => serde_json::json!({
            "inlineData": {
                "mimeType": image.mime_type,
                "data": base64::engine::general_purpose::STANDARD.encode(&image.data),
            }
        }),
    }
}

fn decode_base64(data: &str) -> Result<Vec<u8>, NodeError> {
    base64::engine::general_purpose::STANDARD.decode(data).map_err(|e| NodeError::Api {
        status: 200,
        message: format!("Failed to decode base64: {e}"),
    })
}

// --- Imagen :predict response types ---

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

// --- Gemini :generateContent response types ---

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
}

#[derive(Default, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_part_json() {
        assert_eq!(content_part_json(&ContentPart::Text("hi".into())), serde_json::json!({"text": "hi"}));
    }

    #[test]
    fn image_part_json_is_inline_base64() {
        let part = ContentPart::Image(EncodedImage { data: vec![1, 2, 3], mime_type: "image/png".into() });
        let json = content_part_json(&part);
        assert_eq!(json["inlineData"]["mimeType"], "image/png");
        assert_eq!(json["inlineData"]["data"], "AQID");
    }

    #[test]
    fn parses_predict_response() {
        let parsed: PredictResponse = serde_json::from_str(
            r#"{"predictions":[{"bytesBase64Encoded":"AQID","mimeType":"image/png"},{"raiFilteredReason":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.predictions.len(), 2);
        assert_eq!(parsed.predictions[0].bytes_base64_encoded.as_deref(), Some("AQID"));
        assert!(parsed.predictions[1].bytes_base64_encoded.is_none());
    }

    #[test]
    fn parses_empty_predict_response() {
        let parsed: PredictResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.predictions.is_empty());
    }

    #[test]
    fn parses_generate_content_parts() {
        let parsed: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"hello"},
                {"inlineData":{"mimeType":"image/png","data":"AQID"}},
                {"thoughtSignature":"abc"}
            ]}}]}"#,
        )
        .unwrap();
        let parts = &parsed.candidates[0].content.parts;
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].text.as_deref(), Some("hello"));
        assert_eq!(parts[1].inline_data.as_ref().unwrap().data, "AQID");
        assert!(parts[2].text.is_none() && parts[2].inline_data.is_none());
    }

    #[test]
    fn bad_base64_is_api_error() {
        assert!(matches!(decode_base64("!!!"), Err(NodeError::Api { .. })));
    }
}
