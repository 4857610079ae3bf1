use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::response::Html;
use serde::Deserialize;

use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;
use crate::presentation::views::render_results;

#[derive(Debug, Deserialize)]
pub struct SongForm {
    #[serde(default)]
    pub mood: String,
}

#[tracing::instrument(skip(state, form))]
pub async fn generate_songs_handler(
    State(state): State<AppState>,
    form: Result<Form<SongForm>, FormRejection>,
) -> Html<String> {
    let mood = match form {
        Ok(Form(form)) => form.mood,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected song form");
            String::new()
        }
    };

    tracing::info!(mood = %sanitize_prompt(&mood), "Song recommendation requested");

    let recommendation = state.song_service.recommend(&mood).await;
    Html(render_results(&recommendation))
}
