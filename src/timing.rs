use serde::{Deserialize, Serialize};

use crate::errors::AlignmentError;

// @module: Character-alignment to word-span timing extraction

/// Character-level timing data returned alongside synthesized speech.
///
/// Three parallel arrays, one entry per character of the submitted text,
/// spaces included. Field names match the ElevenLabs response body so the
/// structure deserializes straight out of the API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterAlignment {
    // @field: Every character of the synthesized text, in order
    pub characters: Vec<char>,

    // @field: Per-character start times in seconds
    pub character_start_times_seconds: Vec<f64>,

    // @field: Per-character end times in seconds
    pub character_end_times_seconds: Vec<f64>,
}

impl CharacterAlignment {
    pub fn new(characters: Vec<char>, starts: Vec<f64>, ends: Vec<f64>) -> Self {
        CharacterAlignment {
            characters,
            character_start_times_seconds: starts,
            character_end_times_seconds: ends,
        }
    }

    /// Number of alignment entries
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    // @validates: Equal array lengths, monotonic start times, end >= start
    pub fn validate(&self) -> Result<(), AlignmentError> {
        let characters = self.characters.len();
        let starts = self.character_start_times_seconds.len();
        let ends = self.character_end_times_seconds.len();

        if characters != starts || characters != ends {
            return Err(AlignmentError::LengthMismatch {
                characters,
                starts,
                ends,
            });
        }

        for index in 1..starts {
            if self.character_start_times_seconds[index]
                < self.character_start_times_seconds[index - 1]
            {
                return Err(AlignmentError::NonMonotonicTimes { index });
            }
        }

        for index in 0..starts {
            let start = self.character_start_times_seconds[index];
            let end = self.character_end_times_seconds[index];
            if end < start {
                return Err(AlignmentError::InvalidSpan { index, start, end });
            }
        }

        Ok(())
    }
}

/// One word of the source text with its spoken time window.
///
/// Derived from the alignment, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSpan {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl WordSpan {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        WordSpan {
            word: word.into(),
            start,
            end,
        }
    }
}

/// Maps character-level alignment onto word-level spans for the source text.
pub struct TimingExtractor;

impl TimingExtractor {
    /// Extract one span per whitespace-delimited word of `text`.
    ///
    /// The alignment must hold one entry per character of the text, spaces
    /// interspersed exactly as in the source. The walk keeps a cursor into
    /// the alignment: for each word it skips spaces, reads the start time at
    /// the cursor, advances to the word's last character for the end time,
    /// then steps past the word.
    pub fn extract(
        text: &str,
        alignment: &CharacterAlignment,
    ) -> Result<Vec<WordSpan>, AlignmentError> {
        alignment.validate()?;

        // The alignment must cover the submitted text verbatim, spaces
        // included; a shorter or longer alignment cannot line up.
        let text_chars = text.chars().count();
        if alignment.len() != text_chars {
            return Err(AlignmentError::CoverageMismatch {
                text_chars,
                alignment_chars: alignment.len(),
            });
        }

        let mut spans = Vec::new();
        let mut cursor = 0usize;

        for word in text.split_whitespace() {
            // Skip the whitespace between words
            while cursor < alignment.len() && alignment.characters[cursor].is_whitespace() {
                cursor += 1;
            }

            if cursor >= alignment.len() {
                return Err(AlignmentError::Exhausted {
                    word: word.to_string(),
                });
            }

            let first_char = word.chars().next().unwrap_or(' ');
            if alignment.characters[cursor] != first_char {
                return Err(AlignmentError::CharacterMismatch {
                    word: word.to_string(),
                    found: alignment.characters[cursor],
                    index: cursor,
                });
            }

            let start = alignment.character_start_times_seconds[cursor];

            // One alignment entry per character, no internal gaps
            let last_index = cursor + word.chars().count() - 1;
            if last_index >= alignment.len() {
                return Err(AlignmentError::Exhausted {
                    word: word.to_string(),
                });
            }

            let end = alignment.character_end_times_seconds[last_index];
            spans.push(WordSpan::new(word, start, end));

            cursor = last_index + 1;
        }

        Ok(spans)
    }
}
