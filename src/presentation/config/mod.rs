mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    API_KEY_VARIABLE, LlmSettings, LoggingSettings, ServerSettings, Settings, SpeechSettings,
    StorageSettings, TranscoderSettings,
};
