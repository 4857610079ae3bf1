mod audio_transcoder;
mod llm_client;
mod staging_store;
mod transcription_engine;

pub use audio_transcoder::{AudioTranscoder, TranscodeError};
pub use llm_client::{LlmClient, LlmClientError, LlmReply};
pub use staging_store::{StagingStore, StagingStoreError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
