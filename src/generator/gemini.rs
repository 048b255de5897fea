use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{error::GenerationError, generator::TextGenerator};

const TEMPERATURE: f32 = 0.9;
const TOP_K: u32 = 32;
const TOP_P: f32 = 1.0;

/// Candidate finish reasons that mean the answer was withheld for content reasons.
const BLOCK_REASONS: [&str; 4] = ["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Thresholds per harm category, strictest for explicit content.
const SAFETY_SETTINGS: [(&str, &str); 4] = [
    ("HARM_CATEGORY_HARASSMENT", "BLOCK_ONLY_HIGH"),
    ("HARM_CATEGORY_HATE_SPEECH", "BLOCK_ONLY_HIGH"),
    ("HARM_CATEGORY_SEXUALLY_EXPLICIT", "BLOCK_LOW_AND_ABOVE"),
    ("HARM_CATEGORY_DANGEROUS_CONTENT", "BLOCK_MEDIUM_AND_ABOVE"),
];

/// Gemini `generateContent` REST client.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn request_body(instruction: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: instruction.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
            },
            safety_settings: SAFETY_SETTINGS
                .iter()
                .map(|(category, threshold)| SafetySetting {
                    category: category.to_string(),
                    threshold: threshold.to_string(),
                })
                .collect(),
        }
    }
}

impl TextGenerator for GeminiGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        let url = format!("{}/{}:generateContent", self.api_url, self.model);

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(instruction))
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        extract_text(parsed)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerationError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .ok_or_else(|| GenerationError::Malformed("no candidates in response".to_string()))?;

    if let Some(reason) = candidate
        .finish_reason
        .filter(|reason| BLOCK_REASONS.contains(&reason.as_str()))
    {
        return Err(GenerationError::Blocked(reason));
    }

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::Malformed("empty response text".to_string()));
    }
    Ok(text)
}

/// Maps a non-success response to an error, using the `error` object Gemini returns.
fn api_error(status: reqwest::StatusCode, text: &str) -> GenerationError {
    let Ok(body) = serde_json::from_str::<ErrorResponse>(text) else {
        return GenerationError::Network(format!("{} - {}", status, text));
    };

    let mentions_block = |value: &str| BLOCK_REASONS.iter().any(|reason| value.contains(reason));
    if mentions_block(&body.error.status) || mentions_block(&body.error.message) {
        return GenerationError::Blocked(body.error.message);
    }
    GenerationError::Network(format!("{} - {}", status, body.error.message))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
}

#[derive(Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentResponse>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}
