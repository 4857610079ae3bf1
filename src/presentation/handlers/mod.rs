mod audio;
mod health;
mod pages;
mod quick_mood;
pub mod responses;
mod songs;
mod text;

pub use audio::{AUDIO_FIELD, upload_audio_handler};
pub use health::health_handler;
pub use pages::index_handler;
pub use quick_mood::quick_mood_handler;
pub use songs::generate_songs_handler;
pub use text::process_text_handler;
