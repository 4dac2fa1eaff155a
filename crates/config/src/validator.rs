// crates/config/src/validator.rs

use contavoz_core::{ContavozError, ContavozResult};
use tracing::warn;

use crate::ContavozConfig;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &ContavozConfig) -> ContavozResult<()> {
        if config.app.language.is_empty() {
            return Err(ContavozError::Config("Language must not be empty".to_string()));
        }

        // Query paths are appended directly to the base URL.
        if config.backend.base_url.is_empty() || !config.backend.base_url.ends_with('/') {
            return Err(ContavozError::Config(
                "Backend base URL must end with a slash".to_string(),
            ));
        }
        if config.backend.timeout_s == 0 {
            return Err(ContavozError::Config(
                "Backend timeout must be > 0".to_string(),
            ));
        }

        if !config.llm.endpoint.ends_with('/') {
            return Err(ContavozError::Config(
                "LLM endpoint must end with a slash".to_string(),
            ));
        }
        if config.llm.api_key_env.is_empty() {
            return Err(ContavozError::Config(
                "LLM API key env var must be set".to_string(),
            ));
        }
        if config.llm.max_tokens == 0 {
            return Err(ContavozError::Config("LLM max_tokens must be > 0".to_string()));
        }
        if !(0.0..=2.0).contains(&config.llm.temperature) {
            return Err(ContavozError::Config(
                "LLM temperature must be 0.0-2.0".to_string(),
            ));
        }
        if config.llm.timeout_s == 0 {
            return Err(ContavozError::Config("LLM timeout must be > 0".to_string()));
        }

        if config.voice.enabled && config.voice.voice.is_empty() {
            warn!("No synthesis voice configured");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ConfigValidator::validate(&ContavozConfig::default()).is_ok());
    }

    #[test]
    fn base_url_without_trailing_slash_is_rejected() {
        let mut config = ContavozConfig::default();
        config.backend.base_url = "http://localhost:8080/v1".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = ContavozConfig::default();
        config.backend.timeout_s = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = ContavozConfig::default();
        config.llm.temperature = 3.5;
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
