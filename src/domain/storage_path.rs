use std::fmt;

use chrono::Utc;
use rand::Rng;

const RECORDING_EXTENSION: &str = "webm";

/// Location of a staged file, relative to the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    /// Fresh upload name built from the current time and a random suffix.
    pub fn new_recording() -> Self {
        let suffix = rand::thread_rng().gen_range(100..1000);
        Self::recording(Utc::now().timestamp(), suffix)
    }

    pub fn recording(unix_secs: i64, suffix: u16) -> Self {
        Self(format!(
            "recording_{}_{}.{}",
            unix_secs, suffix, RECORDING_EXTENSION
        ))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Same name with its extension swapped (or appended when it has none).
    pub fn with_extension(&self, extension: &str) -> Self {
        let stem = match self.0.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() && !stem.ends_with('/') => stem,
            _ => self.0.as_str(),
        };
        Self(format!("{}.{}", stem, extension))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
