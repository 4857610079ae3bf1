use std::sync::Arc;

use crate::application::ports::{
    AudioTranscoder, LlmClient, StagingStore, StagingStoreError, TranscriptionEngine,
};
use crate::domain::{MoodLabel, StoragePath, Transcript};

use super::prompts::MoodPrompt;

const WAVEFORM_EXTENSION: &str = "wav";

/// Turns recordings and free text into a mood label.
///
/// Every external failure degrades to [`MoodLabel::unknown`]; nothing here
/// returns an error to the caller.
pub struct MoodService {
    transcoder: Arc<dyn AudioTranscoder>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    llm_client: Arc<dyn LlmClient>,
    staging_store: Arc<dyn StagingStore>,
}

impl MoodService {
    pub fn new(
        transcoder: Arc<dyn AudioTranscoder>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        llm_client: Arc<dyn LlmClient>,
        staging_store: Arc<dyn StagingStore>,
    ) -> Self {
        Self {
            transcoder,
            transcription_engine,
            llm_client,
            staging_store,
        }
    }

    /// Runs the full voice pipeline for a staged upload.
    ///
    /// The upload and its waveform are removed before this returns, whatever
    /// stage failed.
    #[tracing::instrument(skip(self), fields(upload = %upload))]
    pub async fn detect_from_audio(&self, upload: &StoragePath) -> MoodLabel {
        let waveform = upload.with_extension(WAVEFORM_EXTENSION);

        let transcript = self.transcribe_upload(upload, &waveform).await;

        self.discard(&waveform).await;
        self.discard(upload).await;

        if transcript.is_empty() {
            tracing::info!("Empty transcript, skipping mood extraction");
            return MoodLabel::unknown();
        }

        self.extract(transcript.as_str(), MoodPrompt::Emotion).await
    }

    pub async fn detect_from_text(&self, text: &str) -> MoodLabel {
        self.extract(text, MoodPrompt::Topic).await
    }

    /// Asks the model for a one-word label. Blank text never reaches the model.
    pub async fn extract(&self, text: &str, prompt: MoodPrompt) -> MoodLabel {
        if text.trim().is_empty() {
            return MoodLabel::unknown();
        }

        tracing::debug!(chars = text.len(), kind = ?prompt, "Extracting mood");

        let reply = self.llm_client.generate(&prompt.render(text)).await;
        match reply.and_then(|r| r.first_part().map(MoodLabel::from_reply)) {
            Ok(mood) => {
                tracing::info!(mood = %mood, "Mood detected");
                mood
            }
            Err(e) => {
                tracing::error!(error = %e, "Mood extraction failed");
                MoodLabel::unknown()
            }
        }
    }

    /// Removes an upload that never made it into the pipeline.
    pub async fn discard_upload(&self, upload: &StoragePath) {
        self.discard(upload).await;
    }

    async fn transcribe_upload(&self, upload: &StoragePath, waveform: &StoragePath) -> Transcript {
        let (input, output) = match (
            self.staging_store.local_path(upload),
            self.staging_store.local_path(waveform),
        ) {
            (Ok(input), Ok(output)) => (input, output),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(error = %e, "Could not resolve staging paths");
                return Transcript::empty();
            }
        };

        if let Err(e) = self.transcoder.to_waveform(&input, &output).await {
            tracing::error!(error = %e, "Audio conversion failed");
            return Transcript::empty();
        }
        tracing::info!(waveform = %waveform, "Converted upload to waveform");

        match self.transcription_engine.transcribe(&output).await {
            Ok(transcript) => {
                tracing::info!(chars = transcript.as_str().len(), "Transcription finished");
                transcript
            }
            Err(e) => {
                tracing::error!(error = %e, "Speech-to-text failed");
                Transcript::empty()
            }
        }
    }

    async fn discard(&self, path: &StoragePath) {
        match self.staging_store.delete(path).await {
            Ok(()) => tracing::debug!(path = %path, "Cleaned up staged file"),
            Err(StagingStoreError::NotFound(_)) => {}
            Err(e) => tracing::warn!(path = %path, error = %e, "Failed to remove staged file"),
        }
    }
}
