use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError, LlmReply};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: Option<String>, model: String) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        );
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
        }
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Content parts of the first candidate.
    fn into_reply(self) -> Result<LlmReply, LlmClientError> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmClientError::InvalidResponse("no candidates".to_string()))?
            .content
            .ok_or_else(|| {
                LlmClientError::InvalidResponse("candidate has no content".to_string())
            })?;

        Ok(LlmReply::new(
            content.parts.into_iter().map(|p| p.text).collect(),
        ))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<LlmReply, LlmClientError> {
        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, "Sending prompt to Gemini");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                LlmClientError::ApiRequestFailed(format!("request: {}", e.without_url()))
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LlmClientError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                LlmClientError::InvalidResponse(format!("parse response: {}", e.without_url()))
            })?;

        let reply = parsed.into_reply()?;

        tracing::info!(model = %self.model, "Gemini completion received");

        Ok(reply)
    }
}
