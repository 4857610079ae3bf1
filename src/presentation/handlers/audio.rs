use std::io;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Response;
use futures::StreamExt;

use crate::application::ports::StagingStoreError;
use crate::domain::{MoodLabel, StoragePath};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::responses::{bad_request, mood_detected};

pub const AUDIO_FIELD: &str = "audio_blob";

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_audio_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, "Audio upload without multipart body");
            return bad_request("No audio file in request.");
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => {
                tracing::warn!("Audio upload missing {} field", AUDIO_FIELD);
                return bad_request("No audio file in request.");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart");
                return bad_request(format!("Failed to read multipart: {}", e));
            }
        };

        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return bad_request("No file selected.");
        }

        let upload = StoragePath::new_recording();
        tracing::info!(
            filename = %sanitize_prompt(&filename),
            upload = %upload,
            "Audio received for processing"
        );

        let stream = field.map(|chunk| chunk.map_err(io::Error::other)).boxed();

        match state.staging_store.store(&upload, stream).await {
            Ok(bytes) => tracing::debug!(bytes, "Audio staged"),
            Err(StagingStoreError::Io(e)) => {
                tracing::warn!(error = %e, "Audio upload interrupted");
                state.mood_service.discard_upload(&upload).await;
                return bad_request(format!("Failed to read audio upload: {}", e));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to stage audio");
                state.mood_service.discard_upload(&upload).await;
                return mood_detected(MoodLabel::unknown());
            }
        }

        let mood = state.mood_service.detect_from_audio(&upload).await;
        return mood_detected(mood);
    }
}
