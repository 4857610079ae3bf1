use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::Transcript;
use crate::presentation::config::SpeechSettings;

use super::waveform_reader::{MonoResampler, TARGET_SAMPLE_RATE, WaveformReader};

/// Frames handed to the recognizer per read.
pub const FRAMES_PER_CHUNK: usize = 4000;
const MAX_TOKENS_PER_WINDOW: usize = 224;

/// Offline Whisper recognizer running on the CPU through candle.
pub struct CandleWhisperEngine {
    model: Arc<Mutex<WhisperModel>>,
}

struct WhisperModel {
    model: m::model::Whisper,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    mel_filters: Vec<f32>,
}

/// Outcome of a finished recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub text: String,
}

impl CandleWhisperEngine {
    /// Resolves the model under `settings.model_dir`, downloading it on first
    /// use, then loads the weights. Blocking.
    pub fn load(settings: &SpeechSettings) -> Result<Self, TranscriptionError> {
        let device = Device::Cpu;
        let model_dir = PathBuf::from(&settings.model_dir);

        tracing::info!(
            device = ?device,
            model = %settings.model_id,
            model_dir = %model_dir.display(),
            "Preparing Whisper speech model"
        );

        std::fs::create_dir_all(&model_dir)
            .map_err(|e| load_failed(format!("model dir {}", model_dir.display()), e))?;

        let api = ApiBuilder::new()
            .with_cache_dir(model_dir)
            .with_progress(false)
            .build()
            .map_err(|e| load_failed("hub client", e))?;
        let repo = api.repo(Repo::new(settings.model_id.clone(), RepoType::Model));

        let config_path = repo.get("config.json").map_err(|e| load_failed("config.json", e))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| load_failed("tokenizer.json", e))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| load_failed("model.safetensors", e))?;

        let mel_repo = api.repo(Repo::new(
            settings.mel_filters_repo.clone(),
            RepoType::Model,
        ));
        let mel_bytes_path = mel_repo
            .get("melfilters.bytes")
            .map_err(|e| load_failed("melfilters.bytes", e))?;

        let config_contents =
            std::fs::read_to_string(&config_path).map_err(|e| load_failed("read config", e))?;
        let config: Config =
            serde_json::from_str(&config_contents).map_err(|e| load_failed("parse config", e))?;

        let tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|e| load_failed("tokenizer", e))?;

        let mel_bytes =
            std::fs::read(&mel_bytes_path).map_err(|e| load_failed("mel filters", e))?;
        let mel_filters = read_mel_filters(&mel_bytes, &config)?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], m::DTYPE, &device)
                .map_err(|e| load_failed("weights", e))?
        };

        let model =
            m::model::Whisper::load(&vb, config.clone()).map_err(|e| load_failed("model", e))?;

        tracing::info!("Whisper speech model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(WhisperModel {
                model,
                tokenizer,
                config,
                device,
                mel_filters,
            })),
        })
    }
}

#[async_trait]
impl TranscriptionEngine for CandleWhisperEngine {
    async fn transcribe(&self, waveform: &Path) -> Result<Transcript, TranscriptionError> {
        let model = Arc::clone(&self.model);
        let path = waveform.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let mut model = lock_recovering(&model);
            recognize_file(&mut model, &path)
        })
        .await
        .map_err(|e| failed(format!("recognition worker: {}", e)))?
    }
}

fn recognize_file(model: &mut WhisperModel, path: &Path) -> Result<Transcript, TranscriptionError> {
    let mut reader = WaveformReader::open(path)?;
    let mut resampler = if reader.sample_rate() == TARGET_SAMPLE_RATE {
        None
    } else {
        tracing::debug!(from = reader.sample_rate(), "Resampling waveform to 16kHz");
        Some(MonoResampler::new(reader.sample_rate(), TARGET_SAMPLE_RATE)?)
    };

    let mut recognizer = Recognizer::new(model);

    loop {
        let frames = reader.read_frames(FRAMES_PER_CHUNK)?;
        if frames.is_empty() {
            break;
        }
        let samples = match resampler.as_mut() {
            Some(r) => r.process(&frames)?,
            None => frames,
        };
        recognizer.accept_waveform(&samples)?;
    }

    if let Some(r) = resampler.as_mut() {
        recognizer.accept_waveform(&r.flush()?)?;
    }

    let result = recognizer.finalize()?;

    tracing::info!(chars = result.text.len(), "Audio transcription completed");

    Ok(Transcript::new(result.text))
}

/// One recognition session: frames go in through `accept_waveform`, the
/// transcript comes out of `finalize`.
struct Recognizer<'a> {
    model: &'a mut WhisperModel,
    buffer: Vec<f32>,
    segments: Vec<String>,
}

impl<'a> Recognizer<'a> {
    fn new(model: &'a mut WhisperModel) -> Self {
        Self {
            model,
            buffer: Vec::with_capacity(m::N_SAMPLES),
            segments: Vec::new(),
        }
    }

    /// Buffers 16 kHz samples; returns true when a full window was decoded.
    fn accept_waveform(&mut self, samples: &[f32]) -> Result<bool, TranscriptionError> {
        self.buffer.extend_from_slice(samples);
        if self.buffer.len() < m::N_SAMPLES {
            return Ok(false);
        }

        let window: Vec<f32> = self.buffer.drain(..m::N_SAMPLES).collect();
        self.decode_window(&window)?;
        Ok(true)
    }

    fn finalize(mut self) -> Result<RecognitionResult, TranscriptionError> {
        if !self.buffer.is_empty() {
            let tail = std::mem::take(&mut self.buffer);
            self.decode_window(&tail)?;
        }

        Ok(RecognitionResult {
            text: self.segments.join(" "),
        })
    }

    fn decode_window(&mut self, samples: &[f32]) -> Result<(), TranscriptionError> {
        let text = self.model.decode_window(samples)?;
        tracing::debug!(
            segment = self.segments.len(),
            chars = text.len(),
            "Decoded audio window"
        );
        if !text.is_empty() {
            self.segments.push(text);
        }
        Ok(())
    }
}

impl WhisperModel {
    fn decode_window(&mut self, samples: &[f32]) -> Result<String, TranscriptionError> {
        let mut padded = samples.to_vec();
        padded.resize(m::N_SAMPLES, 0.0);

        let mel_data = m::audio::pcm_to_mel(&self.config, &padded, &self.mel_filters);
        let n_mel = self.config.num_mel_bins;
        let n_frames = mel_data.len() / n_mel;

        let mel = Tensor::from_vec(mel_data, (1, n_mel, n_frames), &self.device)
            .map_err(|e| failed(format!("mel tensor: {}", e)))?;

        let text = self.decode_segment(&mel);
        self.model.reset_kv_cache();
        text
    }

    fn decode_segment(&mut self, mel: &Tensor) -> Result<String, TranscriptionError> {
        let sot_token = token_id(&self.tokenizer, m::SOT_TOKEN)?;
        let transcribe_token = token_id(&self.tokenizer, m::TRANSCRIBE_TOKEN)?;
        let no_timestamps_token = token_id(&self.tokenizer, m::NO_TIMESTAMPS_TOKEN)?;
        let eot_token = token_id(&self.tokenizer, m::EOT_TOKEN)?;

        let audio_features = self
            .model
            .encoder
            .forward(mel, true)
            .map_err(|e| failed(format!("encoder: {}", e)))?;

        let mut tokens = vec![sot_token, transcribe_token, no_timestamps_token];
        let prompt_len = tokens.len();

        for _ in 0..MAX_TOKENS_PER_WINDOW {
            let token_tensor = Tensor::new(tokens.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(failed)?;

            let decoder_output = self
                .model
                .decoder
                .forward(&token_tensor, &audio_features, tokens.len() == prompt_len)
                .map_err(|e| failed(format!("decoder: {}", e)))?;

            let logits = decoder_output
                .squeeze(0)
                .and_then(|o| self.model.decoder.final_linear(&o))
                .map_err(|e| failed(format!("linear: {}", e)))?;

            let next_token = logits
                .dim(0)
                .and_then(|len| logits.get(len - 1))
                .and_then(|last| last.argmax(0))
                .and_then(|t| t.to_scalar::<u32>())
                .map_err(failed)?;

            if next_token == eot_token {
                break;
            }
            tokens.push(next_token);
        }

        let text = self
            .tokenizer
            .decode(&tokens[prompt_len..], true)
            .map_err(|e| failed(format!("detokenize: {}", e)))?;

        Ok(text.trim().to_string())
    }
}

/// Takes the model lock even after a panicked session. Each window starts by
/// flushing the decoder cache, so a half-finished session leaves nothing behind.
fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("Speech model lock was poisoned by an earlier failure, recovering");
        PoisonError::into_inner(poisoned)
    })
}

fn token_id(tokenizer: &Tokenizer, token: &str) -> Result<u32, TranscriptionError> {
    tokenizer
        .token_to_id(token)
        .ok_or_else(|| failed(format!("token not found: {}", token)))
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, TranscriptionError> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(TranscriptionError::ModelLoadFailed(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn failed(e: impl Display) -> TranscriptionError {
    TranscriptionError::TranscriptionFailed(e.to_string())
}

fn load_failed(what: impl Display, e: impl Display) -> TranscriptionError {
    TranscriptionError::ModelLoadFailed(format!("{}: {}", what, e))
}
