// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, SpeechProviderKind};
use crate::app_controller::{Controller, GenerationRequest};

mod app_config;
mod app_controller;
mod compositor;
mod errors;
mod file_utils;
mod providers;
mod slideshow;
mod subtitle_cues;
mod timing;

/// CLI wrapper for SpeechProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSpeechProvider {
    ElevenLabs,
    Mock,
}

impl From<CliSpeechProvider> for SpeechProviderKind {
    fn from(cli_provider: CliSpeechProvider) -> Self {
        match cli_provider {
            CliSpeechProvider::ElevenLabs => SpeechProviderKind::ElevenLabs,
            CliSpeechProvider::Mock => SpeechProviderKind::Mock,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a subtitle-burned narration video (default command)
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Generate shell completions for subvox
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Visual source files: one video, or one or more still images
    #[arg(value_name = "VISUALS", required = true)]
    visuals: Vec<PathBuf>,

    /// Narration text to synthesize
    #[arg(short = 'x', long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read the narration text from a file
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Directory receiving the finished video
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Speech provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliSpeechProvider>,

    /// Voice id for the TTS provider
    #[arg(long)]
    voice: Option<String>,

    /// Model name for the TTS provider
    #[arg(short, long)]
    model: Option<String>,

    /// Directory holding transition clips for slideshow mode
    #[arg(long)]
    transitions_dir: Option<PathBuf>,

    /// Seed for reproducible transition selection
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Subvox - narrated video generator with burned-in subtitles
///
/// Turns a block of text and a visual source (a base video or a set of
/// still images) into one video, voiced by a TTS provider and subtitled
/// word-group by word-group in sync with the speech.
#[derive(Parser, Debug)]
#[command(name = "subvox")]
#[command(version = "0.1.0")]
#[command(about = "Narrated video generator with synced, burned-in subtitles")]
#[command(long_about = "Subvox synthesizes narration for a text, extracts word timings from the
speech alignment, groups them into readable subtitle cues, and renders a
final video from either a looped base video or a planned image slideshow.

EXAMPLES:
    subvox base.mp4 -x \"Once upon a time...\"       # Base video + narration
    subvox a.jpg b.jpg c.jpg --text-file story.txt   # Slideshow from images
    subvox base.mp4 -x \"...\" -p mock               # No API key needed
    subvox a.jpg b.jpg -x \"...\" --seed 7           # Reproducible transitions
    subvox completions bash > subvox.bash            # Generate completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Visual source files: one video, or one or more still images
    #[arg(value_name = "VISUALS")]
    visuals: Vec<PathBuf>,

    /// Narration text to synthesize
    #[arg(short = 'x', long)]
    text: Option<String>,

    /// Read the narration text from a file
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Directory receiving the finished video
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Speech provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliSpeechProvider>,

    /// Voice id for the TTS provider
    #[arg(long)]
    voice: Option<String>,

    /// Model name for the TTS provider
    #[arg(short, long)]
    model: Option<String>,

    /// Directory holding transition clips for slideshow mode
    #[arg(long)]
    transitions_dir: Option<PathBuf>,

    /// Seed for reproducible transition selection
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subvox", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            if cli.visuals.is_empty() {
                return Err(anyhow!("VISUALS are required when no subcommand is specified"));
            }

            let args = GenerateArgs {
                visuals: cli.visuals,
                text: cli.text,
                text_file: cli.text_file,
                output_dir: cli.output_dir,
                provider: cli.provider,
                voice: cli.voice,
                model: cli.model,
                transitions_dir: cli.transitions_dir,
                seed: cli.seed,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_generate(args).await
        }
    }
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader::<_, Config>(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        file_utils::FileManager::write_to_file(config_path, &config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.tts.provider = provider.clone().into();
    }
    if let Some(voice) = &options.voice {
        config.tts.voice_id = voice.clone();
    }
    if let Some(model) = &options.model {
        config.tts.model_id = model.clone();
    }
    if let Some(transitions_dir) = &options.transitions_dir {
        config.transitions_dir = transitions_dir.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Allow the key to come from the environment instead of the config file
    if config.tts.api_key.is_empty() {
        if let Ok(key) = std::env::var("ELEVENLABS_API_KEY") {
            config.tts.api_key = key;
        }
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let text = match (&options.text, &options.text_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => file_utils::FileManager::read_to_string(path)
            .context(format!("Failed to read text file: {:?}", path))?,
        (None, None) => {
            return Err(anyhow!("Narration text is required (use --text or --text-file)"));
        }
    };

    let controller = Controller::with_config(config)?;

    let request = GenerationRequest {
        text,
        visuals: options.visuals.clone(),
        output_dir: options.output_dir.clone(),
        seed: options.seed,
    };

    match controller.run(request).await {
        Ok(path) => {
            println!("{}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(anyhow!("Video generation failed"))
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
