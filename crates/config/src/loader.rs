// crates/config/src/loader.rs

use std::path::Path;

use contavoz_core::{ContavozError, ContavozResult};
use tracing::info;

use crate::ContavozConfig;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_from_file(path: &Path) -> ContavozResult<ContavozConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ContavozError::Config(format!("Failed to read config: {e}")))?;

        let config: ContavozConfig = toml::from_str(&content)
            .map_err(|e| ContavozError::Config(format!("Failed to parse config: {e}")))?;

        Ok(config)
    }

    pub fn save_to_file(path: &Path, config: &ContavozConfig) -> ContavozResult<()> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| ContavozError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ContavozError::Config(format!("Failed to write config: {e}")))?;

        Ok(())
    }

    /// Load the file when it exists, otherwise fall back to defaults; then
    /// apply environment overrides either way.
    pub fn load_or_default(path: &Path) -> ContavozResult<ContavozConfig> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            info!(path = %path.display(), "config file not found, using defaults");
            ContavozConfig::default()
        };

        Self::apply_env_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_env_overrides(config: &mut ContavozConfig) {
        if let Ok(language) = std::env::var("CONTAVOZ_LANGUAGE") {
            config.app.language = language;
        }
        if let Ok(base_url) = std::env::var("CONTAVOZ_BASE_URL") {
            config.backend.base_url = base_url;
        }
        if let Ok(key_env) = std::env::var("CONTAVOZ_LLM_KEY_ENV") {
            config.llm.api_key_env = key_env;
        }
    }
}
