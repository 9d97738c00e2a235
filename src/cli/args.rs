//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::AudioSource;
use crate::domain::recording::ListenSettings;
use crate::domain::transcription::Language;

/// SpeechScribe - speech-to-text transcription
#[derive(Parser, Debug)]
#[command(name = "speech-scribe")]
#[command(version)]
#[command(about = "Speech-to-text transcription for audio files and the microphone")]
#[command(long_about = None)]
pub struct Cli {
    /// Audio file to transcribe; records from the microphone when omitted
    #[arg(value_name = "AUDIO_FILE")]
    pub audio_file: Option<PathBuf>,

    /// Recognition language tag (e.g. en-US, fr-FR)
    #[arg(short = 'l', long, value_name = "TAG")]
    pub language: Option<String>,

    /// Max wait for speech to start in microphone mode (e.g. 10s, 1m)
    #[arg(short = 't', long, value_name = "TIME", conflicts_with = "audio_file")]
    pub timeout: Option<String>,

    /// Max phrase length in microphone mode (e.g. 30s, 1m)
    #[arg(short = 'p', long, value_name = "TIME", conflicts_with = "audio_file")]
    pub phrase_limit: Option<String>,

    /// Directory transcripts are written into
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Keep the captured audio as a WAV file next to the transcript
    #[arg(long, conflicts_with = "audio_file")]
    pub save_audio: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed transcription options
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    pub source: AudioSource,
    pub language: Language,
    pub listen: ListenSettings,
    pub output_dir: PathBuf,
    pub save_audio: bool,
    pub api_key: Option<String>,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "language",
    "timeout",
    "phrase_limit",
    "ambient_duration",
    "output_dir",
    "save_audio",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
