//! Transcription domain module

mod language;
mod output_target;
mod transcript;
mod waveform;

pub use language::Language;
pub use output_target::OutputTarget;
pub use transcript::Transcript;
pub use waveform::{Waveform, RECOGNITION_SAMPLE_RATE};
