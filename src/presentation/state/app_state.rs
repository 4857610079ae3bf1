use std::sync::Arc;

use crate::application::ports::StagingStore;
use crate::application::services::{MoodService, SongService};

#[derive(Clone)]
pub struct AppState {
    pub mood_service: Arc<MoodService>,
    pub song_service: Arc<SongService>,
    pub staging_store: Arc<dyn StagingStore>,
    pub max_upload_size_bytes: usize,
}
