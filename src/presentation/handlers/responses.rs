use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::MoodLabel;

#[derive(Debug, Serialize)]
pub struct MoodResponse {
    pub success: bool,
    pub emotion: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

pub fn mood_detected(mood: MoodLabel) -> Response {
    (
        StatusCode::OK,
        Json(MoodResponse {
            success: true,
            emotion: mood.into_string(),
        }),
    )
        .into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            message: message.into(),
        }),
    )
        .into_response()
}
