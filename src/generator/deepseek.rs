use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{error::GenerationError, generator::TextGenerator};

const MODEL: &str = "deepseek-chat";
const SYSTEM_PROMPT: &str = "You are a music expert. Answer only with the requested JSON.";

/// DeepSeek chat completions client.
#[derive(Clone)]
pub struct DeepSeekGenerator {
    client: Client,
    api_url: String,
    api_key: String,
}

impl DeepSeekGenerator {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl TextGenerator for DeepSeekGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: instruction.to_string(),
                },
            ],
            temperature: 0.9,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Network(format!("{} - {}", status, text)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::Malformed("no choices in response".to_string()))?;

        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(GenerationError::Blocked("content_filter".to_string()));
        }
        Ok(choice.message.content)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}
