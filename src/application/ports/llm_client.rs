use async_trait::async_trait;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends a single prompt and returns the content parts of the first candidate.
    async fn generate(&self, prompt: &str) -> Result<LlmReply, LlmClientError>;
}

/// Content parts of one model candidate. A part without text is kept as `None`
/// so its position still counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmReply {
    parts: Vec<Option<String>>,
}

impl LlmReply {
    pub fn new(parts: Vec<Option<String>>) -> Self {
        Self { parts }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![Some(text.into())])
    }

    /// Text of the first part only.
    pub fn first_part(&self) -> Result<&str, LlmClientError> {
        match self.parts.first() {
            Some(Some(text)) => Ok(text),
            Some(None) => Err(LlmClientError::InvalidResponse(
                "first part has no text".to_string(),
            )),
            None => Err(LlmClientError::InvalidResponse(
                "candidate has no parts".to_string(),
            )),
        }
    }

    /// Every text part, joined with newlines.
    pub fn text(&self) -> Result<String, LlmClientError> {
        let texts: Vec<&str> = self.parts.iter().flatten().map(String::as_str).collect();
        if texts.is_empty() {
            return Err(LlmClientError::InvalidResponse(
                "candidate has no text parts".to_string(),
            ));
        }
        Ok(texts.join("\n"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
