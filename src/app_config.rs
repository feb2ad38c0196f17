use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Output video settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Subtitle cue clustering settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Speech synthesis settings
    #[serde(default)]
    pub tts: TtsConfig,

    /// Directory holding the transition clip pool
    #[serde(default = "default_transitions_dir")]
    pub transitions_dir: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech synthesis provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProviderKind {
    // @provider: ElevenLabs
    #[default]
    ElevenLabs,
    // @provider: Mock (deterministic, for tests)
    Mock,
}

impl SpeechProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::ElevenLabs => "ElevenLabs",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::ElevenLabs => "elevenlabs".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for SpeechProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for SpeechProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "elevenlabs" => Ok(Self::ElevenLabs),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Output video geometry and encoding parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    // @field: Output width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    // @field: Output height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    // @field: Output frame rate
    #[serde(default = "default_fps")]
    pub fps: u32,

    // @field: Video codec passed to the backend
    #[serde(default = "default_codec")]
    pub codec: String,

    // @field: Audio bitrate passed to the backend
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            codec: default_codec(),
            audio_bitrate: default_audio_bitrate(),
        }
    }
}

/// Subtitle cue clustering parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Maximum number of words shown in a single cue
    #[serde(default = "default_max_words_per_cue")]
    pub max_words_per_cue: usize,

    /// Minimum duration (seconds) a cluster must reach before it is flushed
    #[serde(default = "default_min_cluster_span")]
    pub min_cluster_span: f64,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_words_per_cue: default_max_words_per_cue(),
            min_cluster_span: default_min_cluster_span(),
        }
    }
}

/// Speech synthesis service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TtsConfig {
    // @field: Provider type identifier
    #[serde(default)]
    pub provider: SpeechProviderKind,

    // @field: Voice identifier
    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    // @field: Model name
    #[serde(default = "default_tts_model")]
    pub model_id: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    // @field: Request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: SpeechProviderKind::default(),
            voice_id: default_voice_id(),
            model_id: default_tts_model(),
            api_key: String::new(),
            endpoint: default_tts_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_width() -> u32 {
    1080
}

fn default_height() -> u32 {
    1920
}

fn default_fps() -> u32 {
    30
}

fn default_codec() -> String {
    "libx264".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

fn default_max_words_per_cue() -> usize {
    3
}

fn default_min_cluster_span() -> f64 {
    0.5
}

fn default_voice_id() -> String {
    "9BWtsMINqrJLrRacOk9x".to_string()
}

fn default_tts_model() -> String {
    "eleven_flash_v2_5".to_string()
}

fn default_tts_endpoint() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_transitions_dir() -> PathBuf {
    PathBuf::from("transitions")
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.output.width == 0 || self.output.height == 0 {
            return Err(anyhow!(
                "Output resolution must be non-zero, got {}x{}",
                self.output.width,
                self.output.height
            ));
        }

        if self.output.fps == 0 {
            return Err(anyhow!("Output frame rate must be non-zero"));
        }

        if self.output.codec.is_empty() {
            return Err(anyhow!("Output codec must not be empty"));
        }

        if self.subtitles.max_words_per_cue == 0 {
            return Err(anyhow!("max_words_per_cue must be at least 1"));
        }

        if !self.subtitles.min_cluster_span.is_finite() || self.subtitles.min_cluster_span < 0.0 {
            return Err(anyhow!(
                "min_cluster_span must be a non-negative number, got {}",
                self.subtitles.min_cluster_span
            ));
        }

        // The mock provider needs no credentials
        if self.tts.provider == SpeechProviderKind::ElevenLabs && self.tts.api_key.is_empty() {
            return Err(anyhow!("TTS API key is required for the ElevenLabs provider"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output: OutputConfig::default(),
            subtitles: SubtitleConfig::default(),
            tts: TtsConfig::default(),
            transitions_dir: default_transitions_dir(),
            log_level: LogLevel::default(),
        }
    }
}
