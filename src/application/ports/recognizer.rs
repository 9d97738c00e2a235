//! Speech recognition port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transcription::{Language, Transcript, Waveform};

/// Recognition errors
#[derive(Debug, Clone, Error)]
pub enum RecognizeError {
    #[error("Could not understand audio - speech was unclear or not detected")]
    Unintelligible,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Recognition request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse recognition response: {0}")]
    ParseError(String),

    #[error("Recognition service error: {0}")]
    ApiError(String),
}

/// Port for the remote speech-recognition backend.
///
/// The backend is an opaque capability: it takes a normalized waveform
/// and a language tag, and either returns a transcript or one of the
/// failure kinds above.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize speech in the waveform.
    ///
    /// # Arguments
    /// * `waveform` - The audio to transcribe
    /// * `language` - The recognition language
    ///
    /// # Returns
    /// The transcript or an error
    async fn recognize(
        &self,
        waveform: &Waveform,
        language: &Language,
    ) -> Result<Transcript, RecognizeError>;
}
