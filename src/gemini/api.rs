use chrono::Timelike;
use serde::{
    Deserialize,
    Serialize,
};

use super::{
    analysis_prompt,
    analysis_response_schema,
    suggestion_prompt,
    GeminiConfig,
    SuggestionKind,
    ANALYSIS_INSTRUCTION,
    COACH_INSTRUCTION,
};
use crate::{
    capture::CapturedImage,
    core::{
        models::AnalysisResult,
        NutrilensError,
    },
};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn from_text(text: impl Into<String>) -> Self {
        Self { parts: vec![Part::Text { text: text.into() }] }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct Blob {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// First candidate's text parts, joined. None when the service produced no
/// usable text.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text),
            Part::InlineData { .. } => None,
        })
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Failure shape of one `generateContent` round trip; callers map it onto
/// the operation-specific error variants.
enum GatewayError {
    Transport(String),
    Empty,
}

pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Single-shot analysis of one meal image, optionally re-steered by a
    /// user correction. Exactly one outbound request per call.
    pub async fn analyze_meal(
        &self,
        image: &CapturedImage,
        correction: Option<&str>,
    ) -> Result<AnalysisResult, NutrilensError> {
        if image.is_empty() {
            return Err(NutrilensError::InvalidImage);
        }

        let request = GenerateContentRequest {
            system_instruction: Some(Content::from_text(ANALYSIS_INSTRUCTION)),
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: analysis_prompt(correction) },
                    Part::InlineData {
                        inline_data: Blob {
                            mime_type: image.mime().to_string(),
                            data: image.to_base64(),
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: analysis_response_schema(),
            }),
        };

        let text = self.generate(&request).await.map_err(|e| match e {
            GatewayError::Empty => NutrilensError::EmptyResponse,
            GatewayError::Transport(message) => NutrilensError::AnalysisFailed(message),
        })?;

        AnalysisResult::from_json(&text)
    }

    /// Free-form coaching text for a previously obtained result.
    pub async fn fetch_suggestion(
        &self,
        analysis: &AnalysisResult,
        kind: SuggestionKind,
    ) -> Result<String, NutrilensError> {
        let hour = chrono::Local::now().hour();
        let request = GenerateContentRequest {
            system_instruction: Some(Content::from_text(COACH_INSTRUCTION)),
            contents: vec![Content::from_text(suggestion_prompt(analysis, kind, hour))],
            generation_config: None,
        };

        self.generate(&request).await.map_err(|e| match e {
            GatewayError::Empty => NutrilensError::EmptyResponse,
            GatewayError::Transport(message) => NutrilensError::SuggestionFailed(message),
        })
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, GatewayError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            GatewayError::Transport(format!(
                "no API key configured; set {} or add one in the settings",
                super::API_KEY_ENV
            ))
        })?;

        let url = format!("{}/{}:generateContent", API_BASE, self.config.model);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies carry the upstream message; pass it through.
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) if !body.error.message.is_empty() => body.error.message,
                _ => status.to_string(),
            };
            return Err(GatewayError::Transport(message));
        }

        let body: GenerateContentResponse =
            response.json().await.map_err(|e| GatewayError::Transport(e.to_string()))?;

        extract_text(body).ok_or(GatewayError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_the_wire_shape() {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::from_text("instruction")),
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: "prompt".to_string() },
                    Part::InlineData {
                        inline_data: Blob {
                            mime_type: "image/png".to_string(),
                            data: "AAAA".to_string(),
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: analysis_response_schema(),
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "instruction");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(value["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn suggestion_request_omits_the_generation_config() {
        let request = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content::from_text("prompt")],
            generation_config: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("generationConfig").is_none());
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn extracts_joined_candidate_text() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "hello "}, {"text": "world"}], "role": "model"}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(extract_text(response).as_deref(), Some("hello world"));
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(response).is_none());

        let blank = r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(blank).unwrap();
        assert!(extract_text(response).is_none());
    }

    #[test]
    fn error_body_surfaces_the_upstream_message() {
        let body = r#"{"error": {"code": 429, "message": "quota exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "quota exhausted");
    }
}
