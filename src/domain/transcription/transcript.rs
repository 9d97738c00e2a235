//! Transcript value object

/// Value object representing a recognized transcription.
/// Holds the text plus the backend's confidence score when one was reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    text: String,
    confidence: Option<f32>,
}

impl Transcript {
    /// Create a transcript from recognized text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    /// Create a transcript with a confidence score
    pub fn with_confidence(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence: Some(confidence),
        }
    }

    /// Get the transcribed text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume and return the text
    pub fn into_text(self) -> String {
        self.text
    }

    /// Get the backend confidence score, if reported
    pub fn confidence(&self) -> Option<f32> {
        self.confidence
    }

    /// Whether the transcript carries any text
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_no_confidence() {
        let t = Transcript::new("hello world");
        assert_eq!(t.text(), "hello world");
        assert!(t.confidence().is_none());
    }

    #[test]
    fn with_confidence_keeps_score() {
        let t = Transcript::with_confidence("hello", 0.92);
        assert_eq!(t.confidence(), Some(0.92));
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(Transcript::new("   ").is_empty());
        assert!(!Transcript::new("hi").is_empty());
    }

    #[test]
    fn into_text_consumes() {
        let t = Transcript::new("hello");
        assert_eq!(t.into_text(), "hello");
    }
}
