use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioTranscoder, TranscodeError};

pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";
const TARGET_SAMPLE_RATE: &str = "16000";
const MAX_STDERR_CHARS: usize = 500;

/// Shells out to ffmpeg to produce 16 kHz mono WAV.
pub struct FfmpegTranscoder {
    binary: String,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Runs `ffmpeg -version`; used at startup to warn about a missing binary.
    pub async fn check_binary(&self) -> Result<(), TranscodeError> {
        let status = Command::new(&self.binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| TranscodeError::Spawn(format!("{}: {}", self.binary, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(TranscodeError::Failed {
                status: status.to_string(),
                stderr: String::new(),
            })
        }
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG_BINARY)
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn to_waveform(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            "Running ffmpeg"
        );

        let result = Command::new(&self.binary)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-ar", TARGET_SAMPLE_RATE, "-ac", "1", "-f", "wav"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TranscodeError::Spawn(format!("{}: {}", self.binary, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(TranscodeError::Failed {
                status: result.status.to_string(),
                stderr: stderr_tail(&stderr),
            });
        }

        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(TranscodeError::MissingOutput(output.display().to_string()));
        }

        Ok(())
    }
}

fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    let count = trimmed.chars().count();
    if count <= MAX_STDERR_CHARS {
        return trimmed.to_string();
    }
    trimmed.chars().skip(count - MAX_STDERR_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_long_stderr_when_trimming_then_keeps_the_end() {
        let stderr = format!("{}tail", "x".repeat(1000));
        let tail = stderr_tail(&stderr);
        assert_eq!(tail.chars().count(), MAX_STDERR_CHARS);
        assert!(tail.ends_with("tail"));
    }
}
