#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;

use moodtune::application::ports::{
    AudioTranscoder, LlmClient, LlmClientError, LlmReply, StagingStore, TranscodeError,
    TranscriptionEngine, TranscriptionError,
};
use moodtune::application::services::{MoodService, SongService};
use moodtune::domain::{StoragePath, Transcript};
use moodtune::infrastructure::storage::LocalStagingStore;
use moodtune::presentation::AppState;

pub const TEST_UPLOAD_LIMIT: usize = 1024 * 1024;

pub struct MockLlmClient {
    reply: Option<LlmReply>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn replying(reply: &str) -> Self {
        Self::replying_parts(&[reply])
    }

    pub fn replying_parts(parts: &[&str]) -> Self {
        Self {
            reply: Some(LlmReply::new(
                parts.iter().map(|p| Some(p.to_string())).collect(),
            )),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, prompt: &str) -> Result<LlmReply, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| LlmClientError::ApiRequestFailed("connection refused".to_string()))
    }
}

/// Pretends to transcode by copying the upload byte for byte.
pub struct CopyTranscoder;

#[async_trait]
impl AudioTranscoder for CopyTranscoder {
    async fn to_waveform(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        tokio::fs::copy(input, output)
            .await
            .map(|_| ())
            .map_err(|e| TranscodeError::Spawn(e.to_string()))
    }
}

/// Leaves a half-written waveform behind and then reports failure.
pub struct FailingTranscoder;

#[async_trait]
impl AudioTranscoder for FailingTranscoder {
    async fn to_waveform(&self, _input: &Path, output: &Path) -> Result<(), TranscodeError> {
        tokio::fs::write(output, b"RIFF").await.ok();
        Err(TranscodeError::Failed {
            status: "exit status: 1".to_string(),
            stderr: "Invalid data found when processing input".to_string(),
        })
    }
}

pub struct FixedTranscriptionEngine {
    result: Result<String, String>,
    seen_waveforms: Mutex<Vec<PathBuf>>,
}

impl FixedTranscriptionEngine {
    pub fn hearing(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            seen_waveforms: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            seen_waveforms: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_waveforms(&self) -> Vec<PathBuf> {
        self.seen_waveforms.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionEngine for FixedTranscriptionEngine {
    async fn transcribe(&self, waveform: &Path) -> Result<Transcript, TranscriptionError> {
        assert!(waveform.exists(), "waveform must exist while transcribing");
        self.seen_waveforms
            .lock()
            .unwrap()
            .push(waveform.to_path_buf());
        self.result
            .clone()
            .map(Transcript::new)
            .map_err(TranscriptionError::DecodingFailed)
    }
}

pub fn staging_store() -> (tempfile::TempDir, Arc<LocalStagingStore>) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalStagingStore::new(dir.path().to_path_buf()).unwrap();
    (dir, Arc::new(store))
}

pub fn staged_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub async fn stage_upload(store: &LocalStagingStore, data: &'static [u8]) -> StoragePath {
    let path = StoragePath::new_recording();
    let chunks: Vec<Result<Bytes, io::Error>> = vec![Ok(Bytes::from_static(data))];
    store
        .store(&path, Box::pin(stream::iter(chunks)))
        .await
        .unwrap();
    path
}

pub fn mood_service(
    transcoder: Arc<dyn AudioTranscoder>,
    engine: Arc<dyn TranscriptionEngine>,
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn StagingStore>,
) -> MoodService {
    MoodService::new(transcoder, engine, llm, store)
}

pub fn app_state(
    transcoder: Arc<dyn AudioTranscoder>,
    engine: Arc<dyn TranscriptionEngine>,
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn StagingStore>,
) -> AppState {
    AppState {
        mood_service: Arc::new(MoodService::new(
            transcoder,
            engine,
            Arc::clone(&llm),
            Arc::clone(&store),
        )),
        song_service: Arc::new(SongService::new(llm)),
        staging_store: store,
        max_upload_size_bytes: TEST_UPLOAD_LIMIT,
    }
}
