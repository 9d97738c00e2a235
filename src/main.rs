//! SpeechScribe CLI entry point

use std::process::ExitCode;

use clap::Parser;

use speech_scribe::application::AudioSource;
use speech_scribe::cli::{
    app::{load_merged_config, run_transcription, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, TranscribeOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use speech_scribe::domain::config::AppConfig;
use speech_scribe::domain::recording::{Duration, ListenSettings};
use speech_scribe::domain::transcription::Language;
use speech_scribe::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        api_key: None, // API key comes from env/file only
        language: cli.language.clone(),
        timeout: cli.timeout.clone(),
        phrase_limit: cli.phrase_limit.clone(),
        ambient_duration: None,
        output_dir: cli
            .output_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        save_audio: if cli.save_audio { Some(true) } else { None },
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    // Parse language
    let language = match config.language.as_ref() {
        Some(s) => match s.parse::<Language>() {
            Ok(l) => l,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => Language::default(),
    };

    // Parse listening durations
    let timeout = match config.timeout.as_ref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => d,
            Err(e) => {
                presenter.error(&format!("Invalid timeout: {}", e));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => Duration::default_timeout(),
    };

    let phrase_limit = match config.phrase_limit.as_ref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => d,
            Err(e) => {
                presenter.error(&format!("Invalid phrase-limit: {}", e));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => Duration::default_phrase_limit(),
    };

    let listen = ListenSettings::new(timeout, phrase_limit, config.ambient_or_default());

    // Route by audio source
    let source = match cli.audio_file {
        Some(path) => AudioSource::File(path),
        None => AudioSource::Microphone,
    };

    let options = TranscribeOptions {
        source,
        language,
        listen,
        output_dir: config.output_dir_or_default(),
        save_audio: config.save_audio_or_default(),
        api_key: config.api_key.clone(),
    };

    run_transcription(options).await
}
