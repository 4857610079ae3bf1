use std::path::Path;

use async_trait::async_trait;

use crate::domain::Transcript;

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, waveform: &Path) -> Result<Transcript, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("speech model unavailable: {0}")]
    Unavailable(String),
}
