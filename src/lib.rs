//! SpeechScribe - speech-to-text transcription CLI
//!
//! This crate converts speech to text: it transcribes audio files or
//! records from the microphone, sends the audio to a remote recognition
//! backend, and writes the recognized text to a file.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: The transcription workflow and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (symphonia, cpal, the
//!   recognition API, filesystem output, config storage)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
