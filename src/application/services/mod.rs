mod mood_service;
mod prompts;
mod song_service;

pub use mood_service::MoodService;
pub use prompts::{MoodPrompt, song_prompt};
pub use song_service::{
    FETCH_FAILED_MESSAGE, MISSING_MOOD_MESSAGE, SongRecommendation, SongService,
};
