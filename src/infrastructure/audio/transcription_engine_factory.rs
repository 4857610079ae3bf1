use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::Transcript;
use crate::presentation::config::SpeechSettings;

use super::candle_whisper_engine::CandleWhisperEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    /// Prepares the speech model once. A model that cannot be loaded leaves the
    /// service running with an engine that always reports itself unavailable.
    pub async fn create(settings: &SpeechSettings) -> Arc<dyn TranscriptionEngine> {
        if !settings.enabled {
            tracing::warn!("Speech recognition disabled by configuration");
            return Arc::new(UnavailableTranscriptionEngine::new("disabled by configuration"));
        }

        let owned = settings.clone();
        match tokio::task::spawn_blocking(move || CandleWhisperEngine::load(&owned)).await {
            Ok(Ok(engine)) => Arc::new(engine),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Speech model could not be prepared");
                Arc::new(UnavailableTranscriptionEngine::new(e.to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, "Speech model loader panicked");
                Arc::new(UnavailableTranscriptionEngine::new(e.to_string()))
            }
        }
    }
}

/// Stand-in used when no speech model is loaded.
pub struct UnavailableTranscriptionEngine {
    reason: String,
}

impl UnavailableTranscriptionEngine {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TranscriptionEngine for UnavailableTranscriptionEngine {
    async fn transcribe(&self, _waveform: &Path) -> Result<Transcript, TranscriptionError> {
        Err(TranscriptionError::Unavailable(self.reason.clone()))
    }
}
