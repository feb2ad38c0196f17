/*!
 * Error types for the subvox application.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a speech-synthesis provider
#[derive(Error, Debug)]
pub enum TtsError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The response carried no audio payload
    #[error("No audio data found in response")]
    MissingAudio,
}

/// Errors raised when the character alignment violates its structural contract
#[derive(Error, Debug)]
pub enum AlignmentError {
    /// The three parallel arrays differ in length
    #[error(
        "Alignment array length mismatch: {characters} characters, {starts} start times, {ends} end times"
    )]
    LengthMismatch {
        characters: usize,
        starts: usize,
        ends: usize,
    },

    /// Start times go backwards in sequence order
    #[error("Alignment start times are not monotonic at index {index}")]
    NonMonotonicTimes { index: usize },

    /// An entry ends before it starts
    #[error("Alignment entry {index} ends ({end}) before it starts ({start})")]
    InvalidSpan { index: usize, start: f64, end: f64 },

    /// The alignment does not cover the exact submitted text
    #[error("Alignment covers {alignment_chars} characters but the text has {text_chars}")]
    CoverageMismatch {
        text_chars: usize,
        alignment_chars: usize,
    },

    /// A word's first character does not match the alignment entry at the cursor
    #[error("Word '{word}' does not match alignment character '{found}' at index {index}")]
    CharacterMismatch {
        word: String,
        found: char,
        index: usize,
    },

    /// The cursor ran past the end of the alignment before all words were consumed
    #[error("Alignment exhausted while looking for word '{word}'")]
    Exhausted { word: String },
}

/// Errors that can occur while planning a slideshow timeline
#[derive(Error, Debug)]
pub enum PlanError {
    /// Slideshow mode requires at least one image
    #[error("Slideshow requires at least one image")]
    NoImages,

    /// More than one image was supplied but no transition clips are available
    #[error("Transition pool is empty but {images} images require {needed} transitions")]
    EmptyTransitionPool { images: usize, needed: usize },

    /// The chosen transitions alone exceed the audio length
    #[error(
        "Transitions ({transition_time:.3}s) leave no room for images within the audio duration ({audio_duration:.3}s)"
    )]
    InsufficientAudioDuration {
        transition_time: f64,
        audio_duration: f64,
    },
}

/// Errors raised while building or executing a render graph
#[derive(Error, Debug)]
pub enum RenderError {
    /// The constructed graph failed validation before execution
    #[error("Invalid render graph: {0}")]
    InvalidGraph(String),

    /// The rendering backend exited abnormally
    #[error("Render backend failed: {0}")]
    BackendFailure(String),

    /// The backend reported success but produced no artifact
    #[error("Render backend produced no output artifact at {0}")]
    MissingArtifact(PathBuf),

    /// The backend did not finish within the allotted time
    #[error("Render backend timed out after {0} seconds")]
    Timeout(u64),

    /// Error spawning or reaping the backend process
    #[error("Failed to run render backend: {0}")]
    Io(#[from] std::io::Error),
}

/// Request-facing error classification.
///
/// Callers only learn whether their input was bad or something failed
/// internally; backend diagnostics stay in the logs.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request itself was malformed
    #[error("Bad input: {0}")]
    BadInput(String),

    /// The pipeline or a collaborator failed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TtsError> for AppError {
    fn from(error: TtsError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<AlignmentError> for AppError {
    // The alignment comes from the TTS collaborator, not the caller.
    fn from(error: AlignmentError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<PlanError> for AppError {
    fn from(error: PlanError) -> Self {
        Self::BadInput(error.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(error: RenderError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Internal(error.to_string())
    }
}
