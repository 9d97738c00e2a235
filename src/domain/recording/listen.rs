//! Microphone listening settings

use super::Duration;

/// Settings governing one microphone listening session.
///
/// `timeout` bounds the wait for speech to begin, `phrase_limit` bounds the
/// phrase itself, and `ambient` is the length of the calibration pass that
/// sets the silence threshold before listening starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenSettings {
    pub timeout: Duration,
    pub phrase_limit: Duration,
    pub ambient: Duration,
}

impl ListenSettings {
    /// Create settings with explicit values
    pub const fn new(timeout: Duration, phrase_limit: Duration, ambient: Duration) -> Self {
        Self {
            timeout,
            phrase_limit,
            ambient,
        }
    }
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::default_timeout(),
            phrase_limit: Duration::default_phrase_limit(),
            ambient: Duration::default_ambient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_recognition_settings() {
        let settings = ListenSettings::default();
        assert_eq!(settings.timeout.as_secs(), 10);
        assert_eq!(settings.phrase_limit.as_secs(), 30);
        assert_eq!(settings.ambient.as_secs(), 1);
    }

    #[test]
    fn new_keeps_values() {
        let settings = ListenSettings::new(
            Duration::from_secs(5),
            Duration::from_secs(15),
            Duration::from_secs(2),
        );
        assert_eq!(settings.timeout.as_secs(), 5);
        assert_eq!(settings.phrase_limit.as_secs(), 15);
        assert_eq!(settings.ambient.as_secs(), 2);
    }
}
