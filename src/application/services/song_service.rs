use std::sync::Arc;

use crate::application::ports::LlmClient;
use crate::domain::{MoodLabel, SongList};

use super::prompts::song_prompt;

pub const MISSING_MOOD_MESSAGE: &str = "No mood provided.";
pub const FETCH_FAILED_MESSAGE: &str = "Could not fetch recommendations. \
    Please check your API key, internet connection, and Gemini API access.";

pub struct SongService {
    llm_client: Arc<dyn LlmClient>,
}

impl SongService {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    /// Asks the model for five songs matching `mood`.
    ///
    /// A blank mood is answered locally with an error and no remote call.
    #[tracing::instrument(skip(self, mood), fields(mood_chars = mood.chars().count()))]
    pub async fn recommend(&self, mood: &str) -> SongRecommendation {
        let mood = mood.trim();
        if mood.is_empty() {
            return SongRecommendation {
                mood: MoodLabel::unknown().into_string(),
                songs: SongList::empty(),
                error: Some(MISSING_MOOD_MESSAGE.to_string()),
            };
        }

        let reply = self.llm_client.generate(&song_prompt(mood)).await;
        let reply = match reply.and_then(|r| r.text()) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("Model returned no recommendation text");
                return SongRecommendation::failed(mood);
            }
            Err(e) => {
                tracing::error!(error = %e, "Song recommendation failed");
                return SongRecommendation::failed(mood);
            }
        };

        let songs = SongList::parse(reply.trim());
        tracing::info!(songs = songs.len(), "Song recommendations parsed");

        SongRecommendation {
            mood: mood.to_string(),
            songs,
            error: None,
        }
    }
}

/// What the results page shows. An empty list without an error is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecommendation {
    pub mood: String,
    pub songs: SongList,
    pub error: Option<String>,
}

impl SongRecommendation {
    fn failed(mood: &str) -> Self {
        Self {
            mood: mood.to_string(),
            songs: SongList::empty(),
            error: Some(FETCH_FAILED_MESSAGE.to_string()),
        }
    }
}
