// crates/config/src/lib.rs

use serde::{Deserialize, Serialize};

pub mod loader;
pub mod validator;

pub use loader::ConfigLoader;
pub use validator::ConfigValidator;

pub use contavoz_nlu::LlmConfig;
pub use contavoz_queries::BackendConfig;
pub use contavoz_voice::VoiceConfig;

/// Main configuration structure, one section per component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContavozConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub language: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: "pt-BR".to_string(),
            log_level: "info".to_string(),
        }
    }
}
