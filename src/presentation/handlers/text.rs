use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use serde::Deserialize;

use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::responses::{bad_request, mood_detected};

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text_input: Option<String>,
}

#[tracing::instrument(skip(state, payload))]
pub async fn process_text_handler(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Response {
    let text = match payload {
        Ok(Json(request)) => request.text_input.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Rejected text payload");
            String::new()
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return bad_request("No text provided.");
    }

    tracing::debug!(text = %sanitize_prompt(text), "Processing text input");

    let mood = state.mood_service.detect_from_text(text).await;
    mood_detected(mood)
}
