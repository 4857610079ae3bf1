use std::path::Path;

use async_trait::async_trait;

/// Converts an uploaded audio container into a waveform file.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    async fn to_waveform(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("failed to launch transcoder: {0}")]
    Spawn(String),
    #[error("transcoder exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("transcoder produced no output at {0}")]
    MissingOutput(String),
}
