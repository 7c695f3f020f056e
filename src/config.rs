use anyhow::{anyhow, Result};
use std::env;
use tracing::{info, warn};

use crate::catalog::DEFAULT_RESOURCE_NAME;
use crate::models::Category;
use crate::session::SessionSettings;
use crate::speech::{DEFAULT_PITCH_MULTIPLIER, DEFAULT_SPEECH_RATE, MAX_SPEECH_RATE, MIN_SPEECH_RATE};

// Import logging macros
use crate::{log_system_event, log_validation};

/// Complete host configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub speech: SpeechConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Where the bundled flashcard data lives
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub resource_dir: String,
    pub resource_name: String,
}

/// Initial speech preferences
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub rate: f32,
    pub autoplay: bool,
    pub pitch_multiplier: f32,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub default_category: Category,
}

/// Logging system configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file_enabled: bool,
    pub console_enabled: bool,
    pub log_directory: String,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Result<Self> {
        log_system_event!(config, "Loading configuration from environment variables");

        let config = Config {
            catalog: CatalogConfig::from_env()?,
            speech: SpeechConfig::from_env()?,
            session: SessionConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        };

        log_system_event!(config, "Configuration loaded successfully");
        config.log_configuration_summary();

        Ok(config)
    }

    fn log_configuration_summary(&self) {
        info!(
            resource_dir = %self.catalog.resource_dir,
            resource_name = %self.catalog.resource_name,
            speech_rate = self.speech.rate,
            autoplay = self.speech.autoplay,
            default_category = %self.session.default_category,
            log_level = %self.logging.level,
            "Configuration summary"
        );
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = self.check_values() {
            log_validation!(failure, "configuration", error = &e);
            return Err(e);
        }

        if !["trace", "debug", "info", "warn", "error"]
            .iter()
            .any(|level| self.logging.level.to_lowercase().starts_with(level))
            && !self.logging.level.contains('=')
        {
            warn!("Invalid log level '{}', using 'info' as fallback", self.logging.level);
        }

        log_validation!(success, "configuration", "Configuration validation completed successfully");
        Ok(())
    }

    fn check_values(&self) -> Result<()> {
        if self.catalog.resource_name.trim().is_empty() {
            return Err(anyhow!("FLASHCARDS_RESOURCE_NAME must not be empty"));
        }

        if !(MIN_SPEECH_RATE..=MAX_SPEECH_RATE).contains(&self.speech.rate) {
            return Err(anyhow!(
                "SPEECH_RATE must be between {} and {}, got {}",
                MIN_SPEECH_RATE,
                MAX_SPEECH_RATE,
                self.speech.rate
            ));
        }

        if self.speech.pitch_multiplier <= 0.0 {
            return Err(anyhow!("SPEECH_PITCH must be greater than 0"));
        }

        Ok(())
    }

    /// Starting preferences for a new session
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            default_category: self.session.default_category,
            speech_rate: self.speech.rate,
            autoplay_enabled: self.speech.autoplay,
            pitch_multiplier: self.speech.pitch_multiplier,
        }
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self> {
        let resource_dir = env::var("FLASHCARDS_RESOURCE_DIR")
            .unwrap_or_else(|_| "resources".to_string());

        let resource_name = env::var("FLASHCARDS_RESOURCE_NAME")
            .unwrap_or_else(|_| DEFAULT_RESOURCE_NAME.to_string());

        Ok(CatalogConfig {
            resource_dir,
            resource_name,
        })
    }
}

impl SpeechConfig {
    fn from_env() -> Result<Self> {
        let rate_str = env::var("SPEECH_RATE")
            .unwrap_or_else(|_| DEFAULT_SPEECH_RATE.to_string());

        let rate = rate_str.parse::<f32>()
            .map_err(|_| anyhow!("Invalid SPEECH_RATE value: '{}'. Must be a number", rate_str))?;

        let autoplay = env::var("SPEECH_AUTOPLAY")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let pitch_str = env::var("SPEECH_PITCH")
            .unwrap_or_else(|_| DEFAULT_PITCH_MULTIPLIER.to_string());

        let pitch_multiplier = pitch_str.parse::<f32>()
            .map_err(|_| anyhow!("Invalid SPEECH_PITCH value: '{}'. Must be a number", pitch_str))?;

        Ok(SpeechConfig {
            rate,
            autoplay,
            pitch_multiplier,
        })
    }
}

impl SessionConfig {
    fn from_env() -> Result<Self> {
        let default_category = match env::var("DEFAULT_CATEGORY") {
            Ok(label) => Category::from_label(&label).unwrap_or_else(|| {
                info!("Unknown category '{}', defaulting to {}", label, Category::default());
                Category::default()
            }),
            Err(_) => Category::default(),
        };

        Ok(SessionConfig { default_category })
    }
}

impl LoggingConfig {
    /// Read on its own so logging can start before the rest of the config
    pub fn from_env() -> Result<Self> {
        let level = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info,flashcards=debug".to_string());

        let file_enabled = env::var("LOG_FILE_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let console_enabled = env::var("LOG_CONSOLE_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        let log_directory = env::var("LOG_DIRECTORY")
            .unwrap_or_else(|_| "logs".to_string());

        Ok(LoggingConfig {
            level,
            file_enabled,
            console_enabled,
            log_directory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            catalog: CatalogConfig {
                resource_dir: "resources".to_string(),
                resource_name: "flashcards.json".to_string(),
            },
            speech: SpeechConfig {
                rate: 0.5,
                autoplay: false,
                pitch_multiplier: 1.2,
            },
            session: SessionConfig {
                default_category: Category::FoodAndDrink,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_enabled: false,
                console_enabled: true,
                log_directory: "logs".to_string(),
            },
        }
    }

    #[test]
    fn test_config_validation() {
        let config = valid_config();
        assert!(config.validate().is_ok());

        let mut invalid_config = config.clone();
        invalid_config.speech.rate = 1.5;
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = config.clone();
        invalid_config.catalog.resource_name = "  ".to_string();
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = config;
        invalid_config.speech.pitch_multiplier = 0.0;
        assert!(invalid_config.validate().is_err());
    }

    #[test]
    fn test_session_settings_from_config() {
        let mut config = valid_config();
        config.speech.autoplay = true;
        config.session.default_category = Category::Animals;

        let settings = config.session_settings();
        assert_eq!(settings.default_category, Category::Animals);
        assert!(settings.autoplay_enabled);
        assert_eq!(settings.speech_rate, 0.5);
        assert_eq!(settings.pitch_multiplier, 1.2);
    }
}
