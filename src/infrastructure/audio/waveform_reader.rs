use std::fs::File;
use std::path::Path;

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::TranscriptionError;

pub const TARGET_SAMPLE_RATE: u32 = 16_000;
const RESAMPLER_CHUNK: usize = 1024;

/// Streams mono `f32` frames out of a waveform file.
pub struct WaveformReader {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    pending: Vec<f32>,
    finished: bool,
}

impl WaveformReader {
    pub fn open(path: &Path) -> Result<Self, TranscriptionError> {
        let file = File::open(path).map_err(|e| {
            TranscriptionError::DecodingFailed(format!("open {}: {}", path.display(), e))
        })?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| TranscriptionError::DecodingFailed(format!("probe: {}", e)))?;

        let format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| TranscriptionError::DecodingFailed("no audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();
        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| TranscriptionError::DecodingFailed("unknown sample rate".to_string()))?;

        let decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| TranscriptionError::DecodingFailed(format!("codec: {}", e)))?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            pending: Vec::new(),
            finished: false,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns up to `frames` mono frames; an empty vector marks the end of the stream.
    pub fn read_frames(&mut self, frames: usize) -> Result<Vec<f32>, TranscriptionError> {
        while self.pending.len() < frames && !self.finished {
            self.decode_next_packet()?;
        }

        let take = frames.min(self.pending.len());
        Ok(self.pending.drain(..take).collect())
    }

    fn decode_next_packet(&mut self) -> Result<(), TranscriptionError> {
        let packet = match self.format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                self.finished = true;
                return Ok(());
            }
            Err(e) => {
                return Err(TranscriptionError::DecodingFailed(format!("packet: {}", e)));
            }
        };

        if packet.track_id() != self.track_id {
            return Ok(());
        }

        let decoded = match self.decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                return Ok(());
            }
            Err(e) => {
                return Err(TranscriptionError::DecodingFailed(format!("decode: {}", e)));
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        if num_frames == 0 {
            return Ok(());
        }

        let channels = spec.channels.count().max(1);
        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let samples = sample_buf.samples();

        if channels > 1 {
            for frame in samples.chunks(channels) {
                self.pending.push(frame.iter().sum::<f32>() / channels as f32);
            }
        } else {
            self.pending.extend_from_slice(samples);
        }

        Ok(())
    }
}

/// Incremental mono resampler; feed with [`process`](Self::process), finish with
/// [`flush`](Self::flush).
pub struct MonoResampler {
    inner: SincFixedIn<f32>,
    ratio: f64,
    pending: Vec<f32>,
    consumed: usize,
    produced: usize,
}

impl MonoResampler {
    pub fn new(from_rate: u32, to_rate: u32) -> Result<Self, TranscriptionError> {
        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let ratio = to_rate as f64 / from_rate as f64;
        let inner = SincFixedIn::<f32>::new(ratio, 2.0, params, RESAMPLER_CHUNK, 1)
            .map_err(|e| TranscriptionError::DecodingFailed(format!("resampler init: {}", e)))?;

        Ok(Self {
            inner,
            ratio,
            pending: Vec::new(),
            consumed: 0,
            produced: 0,
        })
    }

    pub fn process(&mut self, samples: &[f32]) -> Result<Vec<f32>, TranscriptionError> {
        self.consumed += samples.len();
        self.pending.extend_from_slice(samples);

        let mut output = Vec::new();
        while self.pending.len() >= RESAMPLER_CHUNK {
            let chunk: Vec<f32> = self.pending.drain(..RESAMPLER_CHUNK).collect();
            self.run_chunk(chunk, &mut output)?;
        }
        Ok(output)
    }

    /// Pads and converts whatever is left, trimming output to the expected length.
    pub fn flush(&mut self) -> Result<Vec<f32>, TranscriptionError> {
        let mut output = Vec::new();
        if !self.pending.is_empty() {
            let mut chunk = std::mem::take(&mut self.pending);
            chunk.resize(RESAMPLER_CHUNK, 0.0);
            self.run_chunk(chunk, &mut output)?;
        }

        let expected_total = (self.consumed as f64 * self.ratio) as usize;
        let produced_before = self.produced - output.len();
        let allowed = expected_total.saturating_sub(produced_before);
        output.truncate(allowed);
        self.produced = produced_before + output.len();
        Ok(output)
    }

    fn run_chunk(
        &mut self,
        chunk: Vec<f32>,
        output: &mut Vec<f32>,
    ) -> Result<(), TranscriptionError> {
        let result = self
            .inner
            .process(&[chunk], None)
            .map_err(|e| TranscriptionError::DecodingFailed(format!("resample: {}", e)))?;

        if let Some(channel) = result.first() {
            self.produced += channel.len();
            output.extend_from_slice(channel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_one_second_at_48khz_when_resampling_then_output_is_about_one_second_at_16khz() {
        let mut resampler = MonoResampler::new(48_000, TARGET_SAMPLE_RATE).unwrap();
        let input = vec![0.0f32; 48_000];

        let mut output = Vec::new();
        for chunk in input.chunks(4000) {
            output.extend(resampler.process(chunk).unwrap());
        }
        output.extend(resampler.flush().unwrap());

        assert!(output.len() <= 16_000);
        assert!(output.len() > 15_000);
    }
}
