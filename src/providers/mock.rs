/*!
 * Mock provider implementation for testing.
 *
 * The mock synthesizes deterministic alignments directly from the input
 * text, so the full pipeline can run without a network or an API key:
 * - `MockSpeechProvider::working()` - well-formed alignment, fixed pace
 * - `MockSpeechProvider::missing_spaces()` - alignment without whitespace
 *   entries, violating the coverage contract
 * - `MockSpeechProvider::failing()` - always fails with an error
 */

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::TtsError;
use crate::providers::{SpeechProvider, SpeechSynthesis};
use crate::timing::CharacterAlignment;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns a well-formed alignment at a fixed per-character pace
    Working,
    /// Drops whitespace entries from the alignment
    MissingSpaces,
    /// Returns audio with an empty alignment
    EmptyAlignment,
    /// Always fails with an error
    Failing,
}

/// Mock speech provider for exercising the pipeline in tests
#[derive(Debug)]
pub struct MockSpeechProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Seconds of speech per character
    per_char: f64,
}

impl MockSpeechProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            per_char: 0.05,
        }
    }

    /// Create a working mock provider
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock whose alignment omits whitespace entries
    pub fn missing_spaces() -> Self {
        Self::new(MockBehavior::MissingSpaces)
    }

    /// Create a mock returning an empty alignment
    pub fn empty_alignment() -> Self {
        Self::new(MockBehavior::EmptyAlignment)
    }

    /// Create a mock provider that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Override the per-character speech pace
    pub fn with_char_duration(mut self, per_char: f64) -> Self {
        self.per_char = per_char;
        self
    }

    /// Total audio length the mock reports for a text
    pub fn audio_duration(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.per_char
    }

    fn evenly_spaced(&self, characters: Vec<char>) -> CharacterAlignment {
        let starts: Vec<f64> = (0..characters.len())
            .map(|i| i as f64 * self.per_char)
            .collect();
        let ends: Vec<f64> = (0..characters.len())
            .map(|i| (i + 1) as f64 * self.per_char)
            .collect();
        CharacterAlignment::new(characters, starts, ends)
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    async fn synthesize(&self, text: &str) -> Result<SpeechSynthesis, TtsError> {
        // A tiny constant payload stands in for the encoded audio
        let audio = Bytes::from_static(&[0u8; 64]);

        match self.behavior {
            MockBehavior::Working => Ok(SpeechSynthesis {
                audio,
                alignment: self.evenly_spaced(text.chars().collect()),
            }),
            MockBehavior::MissingSpaces => Ok(SpeechSynthesis {
                audio,
                alignment: self
                    .evenly_spaced(text.chars().filter(|c| !c.is_whitespace()).collect()),
            }),
            MockBehavior::EmptyAlignment => Ok(SpeechSynthesis {
                audio,
                alignment: CharacterAlignment::new(Vec::new(), Vec::new(), Vec::new()),
            }),
            MockBehavior::Failing => Err(TtsError::RequestFailed(
                "mock provider configured to fail".to_string(),
            )),
        }
    }

    async fn test_connection(&self) -> Result<(), TtsError> {
        match self.behavior {
            MockBehavior::Failing => Err(TtsError::RequestFailed(
                "mock provider configured to fail".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
