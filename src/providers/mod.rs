/*!
 * Provider implementations for speech synthesis services.
 *
 * This module contains client implementations for TTS providers:
 * - ElevenLabs: hosted API returning audio plus character-level timings
 * - Mock: deterministic in-process provider for tests
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::errors::TtsError;
use crate::timing::CharacterAlignment;

/// Result of one synthesis call: encoded audio plus character-level timings
/// covering the submitted text, spaces included.
#[derive(Debug, Clone)]
pub struct SpeechSynthesis {
    /// Encoded audio payload (mp3)
    pub audio: Bytes,

    /// Per-character timing data
    pub alignment: CharacterAlignment,
}

/// Common trait for all speech synthesis providers
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing them to be used interchangeably by the controller.
#[async_trait]
pub trait SpeechProvider: Send + Sync + Debug {
    /// Synthesize speech with character-level timestamps
    ///
    /// # Arguments
    /// * `text` - The text to speak
    ///
    /// # Returns
    /// * `Result<SpeechSynthesis, TtsError>` - Audio and alignment, or an error
    async fn synthesize(&self, text: &str) -> Result<SpeechSynthesis, TtsError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), TtsError>;
}

pub mod elevenlabs;
pub mod mock;
