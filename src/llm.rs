use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::AnalysisError;

/// Source of free-text engagement suggestions for a post.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn suggest(&self, text: &str) -> Result<String, AnalysisError>;
}

#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f64,
}

impl LlmClient {
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>, String> {
        let api_key = match config.api_key.as_ref() {
            Some(key) => key.clone(),
            None => return Ok(None),
        };
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| format!("failed to build AI client: {}", err))?;
        Ok(Some(Self {
            client,
            api_key,
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: String) -> Result<String, String> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| format!("AI request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("AI API error: {}", status));
            }
            return Err(format!("AI API error: {} {}", status, detail));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| format!("AI response parse failed: {}", err))?;

        let content = body
            .choices
            .first()
            .ok_or_else(|| "AI response missing choices".to_string())?
            .message
            .content
            .trim()
            .to_string();
        if content.is_empty() {
            return Err("AI response was empty".to_string());
        }
        Ok(content)
    }
}

#[async_trait]
impl SuggestionProvider for LlmClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn suggest(&self, text: &str) -> Result<String, AnalysisError> {
        tracing::debug!(model = %self.model, text_len = text.len(), "requesting AI suggestions");
        let content = self
            .complete(suggestion_prompt(text))
            .await
            .map_err(AnalysisError::ExternalServiceUnavailable)?;
        tracing::debug!(response_len = content.len(), "AI suggestions received");
        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

pub fn suggestion_prompt(text: &str) -> String {
    format!(
        r#"Analyze this social media content and give 3-5 specific suggestions to improve engagement:

Content: "{}"

Give suggestions in this format:
1. [Specific suggestion]
2. [Specific suggestion]
3. [Specific suggestion]

Focus on: hashtags, call-to-action, emotional appeal, formatting, and audience engagement."#,
        text
    )
}
