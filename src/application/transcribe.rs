//! Transcription workflow use case

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::recording::ListenSettings;
use crate::domain::transcription::{Language, OutputTarget};

use super::ports::{
    AudioDecoder, CaptureError, DecodeError, MicrophoneListener, OutputError, ProgressCallback,
    RecognizeError, SpeechRecognizer, TranscriptWriter,
};

/// Where the audio for an invocation comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// A readable audio file on disk
    File(PathBuf),
    /// The default input device
    Microphone,
}

/// Errors from the transcription workflow
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("No speech detected in the audio input")]
    NoSpeech,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Recognize(#[from] RecognizeError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Input parameters for one transcription invocation
#[derive(Debug, Clone)]
pub struct TranscribeInput {
    /// Audio source (file path or microphone)
    pub source: AudioSource,
    /// Recognition language
    pub language: Language,
    /// Microphone listening settings (ignored in file mode)
    pub listen: ListenSettings,
    /// Directory transcripts are written into
    pub output_dir: PathBuf,
    /// Whether to archive the captured audio as WAV (microphone mode)
    pub save_audio: bool,
}

impl Default for TranscribeInput {
    fn default() -> Self {
        Self {
            source: AudioSource::Microphone,
            language: Language::default(),
            listen: ListenSettings::default(),
            output_dir: PathBuf::from("."),
            save_audio: false,
        }
    }
}

/// Output from a successful invocation
#[derive(Debug, Clone)]
pub struct TranscribeOutput {
    /// The transcribed text
    pub text: String,
    /// Backend confidence score, if reported
    pub confidence: Option<f32>,
    /// Where the transcript was written
    pub transcript_path: PathBuf,
    /// Where the audio archive was written, if requested
    pub audio_path: Option<PathBuf>,
    /// Duration of the recognized audio in human-readable form
    pub audio_duration: String,
}

/// Callbacks for progress and status updates
#[derive(Default)]
pub struct TranscribeCallbacks {
    /// Called during listening with (elapsed_ms, phrase_limit_ms)
    pub on_progress: Option<ProgressCallback>,
    /// Called when a file is about to be decoded
    pub on_loading: Option<Box<dyn Fn(&Path) + Send + Sync>>,
    /// Called when microphone listening starts (after calibration)
    pub on_listening_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called when audio has been acquired, with its duration
    pub on_audio_ready: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called when recognition starts
    pub on_recognizing_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called when recognition ends
    pub on_recognizing_end: Option<Box<dyn Fn() + Send + Sync>>,
}

/// The single transcription workflow: acquire audio, recognize, persist.
///
/// Linear sequence per invocation; every failure kind is terminal and no
/// output file is written unless recognition succeeded.
pub struct TranscriptionWorkflow<D, M, R, W>
where
    D: AudioDecoder,
    M: MicrophoneListener,
    R: SpeechRecognizer,
    W: TranscriptWriter,
{
    decoder: D,
    listener: M,
    recognizer: R,
    writer: W,
}

impl<D, M, R, W> TranscriptionWorkflow<D, M, R, W>
where
    D: AudioDecoder,
    M: MicrophoneListener,
    R: SpeechRecognizer,
    W: TranscriptWriter,
{
    /// Create a new workflow instance
    pub fn new(decoder: D, listener: M, recognizer: R, writer: W) -> Self {
        Self {
            decoder,
            listener,
            recognizer,
            writer,
        }
    }

    /// Execute the transcription workflow
    pub async fn execute(
        &self,
        input: TranscribeInput,
        callbacks: TranscribeCallbacks,
    ) -> Result<TranscribeOutput, TranscribeError> {
        // Acquire audio
        let (waveform, target) = match &input.source {
            AudioSource::File(path) => {
                if let Some(ref cb) = callbacks.on_loading {
                    cb(path);
                }
                let waveform = self.decoder.decode(path).await?;
                let target = OutputTarget::for_file(path, &input.output_dir);
                (waveform, target)
            }
            AudioSource::Microphone => {
                if let Some(ref cb) = callbacks.on_listening_start {
                    cb();
                }
                let waveform = self
                    .listener
                    .listen(input.listen, callbacks.on_progress.clone())
                    .await?;
                let target = OutputTarget::for_microphone(&input.output_dir);
                (waveform, target)
            }
        };

        // Silent input never reaches the backend
        if waveform.is_silent() {
            return Err(TranscribeError::NoSpeech);
        }

        let audio_duration = waveform.human_readable_duration();

        if let Some(ref cb) = callbacks.on_audio_ready {
            cb(&audio_duration);
        }

        // Recognize
        if let Some(ref cb) = callbacks.on_recognizing_start {
            cb();
        }

        let transcript = self.recognizer.recognize(&waveform, &input.language).await?;

        if let Some(ref cb) = callbacks.on_recognizing_end {
            cb();
        }

        // Persist
        let transcript_path = target.transcript_path();
        self.writer
            .write_text(&transcript_path, transcript.text())
            .await?;

        let audio_path = if input.save_audio && input.source == AudioSource::Microphone {
            let path = target.audio_path();
            self.writer.write_audio(&path, &waveform).await?;
            Some(path)
        } else {
            None
        };

        Ok(TranscribeOutput {
            confidence: transcript.confidence(),
            text: transcript.into_text(),
            transcript_path,
            audio_path,
            audio_duration,
        })
    }
}
