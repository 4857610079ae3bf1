use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use serde::Deserialize;

use crate::domain::MoodLabel;
use crate::infrastructure::observability::sanitize_prompt;

use super::responses::{bad_request, mood_detected};

#[derive(Debug, Deserialize)]
pub struct QuickMoodRequest {
    #[serde(default)]
    pub mood: Option<String>,
}

/// Echoes a picked mood back as the detected one, without calling anything external.
pub async fn quick_mood_handler(
    payload: Result<Json<QuickMoodRequest>, JsonRejection>,
) -> Response {
    let key = payload.ok().and_then(|Json(request)| request.mood);

    match key.as_deref().and_then(MoodLabel::normalize) {
        Some(mood) => {
            tracing::info!(mood = %sanitize_prompt(mood.as_str()), "Quick mood selected");
            mood_detected(mood)
        }
        None => bad_request("No mood selected."),
    }
}
