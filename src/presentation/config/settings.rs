use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

pub const API_KEY_VARIABLE: &str = "GEMINI_API_KEY";
const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub speech: SpeechSettings,
    pub transcoder: TranscoderSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Deserialize)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    pub enabled: bool,
    pub model_id: String,
    pub mel_filters_repo: String,
    pub model_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscoderSettings {
    pub ffmpeg_binary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub staging_dir: String,
    pub max_upload_size_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Layers defaults, the optional `appsettings.<env>` file and `APP__*`
    /// variables. `GEMINI_API_KEY` overrides `llm.api_key`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .set_override_option("llm.api_key", std::env::var(API_KEY_VARIABLE).ok())?
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only; no files or environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder(Environment::Test)?.build()?.try_deserialize()
    }

    fn builder(
        environment: Environment,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let log_level = match environment {
            Environment::Prod => "info",
            Environment::Local | Environment::Test => "debug",
        };

        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("llm.api_key", "")?
            .set_default("llm.model", "gemini-2.5-flash-preview-09-2025")?
            .set_default("speech.enabled", true)?
            .set_default("speech.model_id", "openai/whisper-tiny.en")?
            .set_default("speech.mel_filters_repo", "FL33TW00D-HF/whisper-base")?
            .set_default("speech.model_dir", "models")?
            .set_default("transcoder.ffmpeg_binary", "ffmpeg")?
            .set_default("storage.staging_dir", "uploads")?
            .set_default("storage.max_upload_size_bytes", 25 * 1024 * 1024)?
            .set_default("logging.level", log_level)?
            .set_default("logging.enable_json", false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_sources_when_loading_defaults_then_uses_gemini_flash_model() {
        let settings = Settings::defaults().unwrap();
        assert_eq!(settings.llm.model, "gemini-2.5-flash-preview-09-2025");
        assert!(settings.llm.base_url.is_none());
        assert_eq!(settings.storage.staging_dir, "uploads");
        assert_eq!(settings.server.port, 5000);
    }

    #[test]
    fn given_llm_settings_when_debug_printed_then_api_key_is_hidden() {
        let settings = LlmSettings {
            api_key: "super-secret".to_string(),
            base_url: None,
            model: "m".to_string(),
        };
        assert!(!format!("{:?}", settings).contains("super-secret"));
    }
}
