//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::{Duration, ListenSettings};
use crate::domain::transcription::Language;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub timeout: Option<String>,
    pub phrase_limit: Option<String>,
    pub ambient_duration: Option<String>,
    pub output_dir: Option<String>,
    pub save_audio: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            language: Some("en-US".to_string()),
            timeout: Some("10s".to_string()),
            phrase_limit: Some("30s".to_string()),
            ambient_duration: Some("1s".to_string()),
            output_dir: Some(".".to_string()),
            save_audio: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            language: other.language.or(self.language),
            timeout: other.timeout.or(self.timeout),
            phrase_limit: other.phrase_limit.or(self.phrase_limit),
            ambient_duration: other.ambient_duration.or(self.ambient_duration),
            output_dir: other.output_dir.or(self.output_dir),
            save_audio: other.save_audio.or(self.save_audio),
        }
    }

    /// Get language as parsed Language, or default if not set/invalid
    pub fn language_or_default(&self) -> Language {
        self.language
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get timeout as parsed Duration, or default if not set/invalid
    pub fn timeout_or_default(&self) -> Duration {
        self.timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_timeout)
    }

    /// Get phrase_limit as parsed Duration, or default if not set/invalid
    pub fn phrase_limit_or_default(&self) -> Duration {
        self.phrase_limit
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_phrase_limit)
    }

    /// Get ambient_duration as parsed Duration, or default if not set/invalid
    pub fn ambient_or_default(&self) -> Duration {
        self.ambient_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_ambient)
    }

    /// Assemble the microphone listening settings
    pub fn listen_settings(&self) -> ListenSettings {
        ListenSettings::new(
            self.timeout_or_default(),
            self.phrase_limit_or_default(),
            self.ambient_or_default(),
        )
    }

    /// Get output directory, or the working directory if not set
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get save_audio setting, or false if not set
    pub fn save_audio_or_default(&self) -> bool {
        self.save_audio.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.api_key.is_none());
        assert_eq!(config.language, Some("en-US".to_string()));
        assert_eq!(config.timeout, Some("10s".to_string()));
        assert_eq!(config.phrase_limit, Some("30s".to_string()));
        assert_eq!(config.ambient_duration, Some("1s".to_string()));
        assert_eq!(config.output_dir, Some(".".to_string()));
        assert_eq!(config.save_audio, Some(false));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.api_key.is_none());
        assert!(config.language.is_none());
        assert!(config.timeout.is_none());
        assert!(config.output_dir.is_none());
        assert!(config.save_audio.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            api_key: Some("base_key".to_string()),
            timeout: Some("10s".to_string()),
            language: Some("en-US".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            api_key: Some("other_key".to_string()),
            timeout: None, // Should not override
            language: Some("fr-FR".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("other_key".to_string()));
        assert_eq!(merged.timeout, Some("10s".to_string())); // Kept from base
        assert_eq!(merged.language, Some("fr-FR".to_string()));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            api_key: Some("key".to_string()),
            save_audio: Some(true),
            ..Default::default()
        };

        let other = AppConfig::empty();
        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("key".to_string()));
        assert_eq!(merged.save_audio, Some(true));
    }

    #[test]
    fn timeout_or_default_parses() {
        let config = AppConfig {
            timeout: Some("5s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.timeout_or_default().as_secs(), 5);
    }

    #[test]
    fn timeout_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            timeout: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.timeout_or_default().as_secs(), 10);
    }

    #[test]
    fn language_or_default_parses() {
        let config = AppConfig {
            language: Some("ja-JP".to_string()),
            ..Default::default()
        };
        assert_eq!(config.language_or_default().as_str(), "ja-JP");
    }

    #[test]
    fn language_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            language: Some("not a tag".to_string()),
            ..Default::default()
        };
        assert_eq!(config.language_or_default().as_str(), "en-US");
    }

    #[test]
    fn listen_settings_assembled_from_fields() {
        let config = AppConfig {
            timeout: Some("5s".to_string()),
            phrase_limit: Some("1m".to_string()),
            ambient_duration: Some("2s".to_string()),
            ..Default::default()
        };
        let settings = config.listen_settings();
        assert_eq!(settings.timeout.as_secs(), 5);
        assert_eq!(settings.phrase_limit.as_secs(), 60);
        assert_eq!(settings.ambient.as_secs(), 2);
    }

    #[test]
    fn output_dir_defaults_to_working_directory() {
        let config = AppConfig::empty();
        assert_eq!(config.output_dir_or_default(), PathBuf::from("."));
    }

    #[test]
    fn output_dir_uses_configured_path() {
        let config = AppConfig {
            output_dir: Some("transcripts".to_string()),
            ..Default::default()
        };
        assert_eq!(config.output_dir_or_default(), PathBuf::from("transcripts"));
    }

    #[test]
    fn save_audio_defaults_to_false() {
        assert!(!AppConfig::empty().save_audio_or_default());
    }
}
