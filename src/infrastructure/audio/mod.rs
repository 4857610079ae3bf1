mod candle_whisper_engine;
mod ffmpeg_transcoder;
mod transcription_engine_factory;
pub mod waveform_reader;

pub use candle_whisper_engine::{CandleWhisperEngine, FRAMES_PER_CHUNK, RecognitionResult};
pub use ffmpeg_transcoder::{DEFAULT_FFMPEG_BINARY, FfmpegTranscoder};
pub use transcription_engine_factory::{
    TranscriptionEngineFactory, UnavailableTranscriptionEngine,
};
