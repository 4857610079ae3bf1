mod mood;
mod song_list;
mod storage_path;
mod transcript;

pub use mood::{MoodLabel, UNKNOWN_MOOD, capitalize};
pub use song_list::SongList;
pub use storage_path::StoragePath;
pub use transcript::Transcript;
