/*!
 * Tests for word-timing extraction from character alignments
 */

use subvox::errors::AlignmentError;
use subvox::timing::{CharacterAlignment, TimingExtractor};

use crate::common;

/// Test the coverage invariant: every whitespace token appears exactly once, in order
#[test]
fn test_extract_withWellFormedAlignment_shouldCoverEveryWord() {
    let text = "In a small village a young girl discovered time";
    let alignment = common::evenly_spaced_alignment(text, 0.08);

    let spans = TimingExtractor::extract(text, &alignment).unwrap();

    let extracted: Vec<&str> = spans.iter().map(|s| s.word.as_str()).collect();
    let expected: Vec<&str> = text.split_whitespace().collect();
    assert_eq!(extracted, expected);
}

/// Test that span times come from the word's first and last characters
#[test]
fn test_extract_withTwoWords_shouldReadBoundaryTimes() {
    let text = "Hi there";
    let alignment = common::evenly_spaced_alignment(text, 0.1);

    let spans = TimingExtractor::extract(text, &alignment).unwrap();

    assert_eq!(spans.len(), 2);
    // "Hi" covers characters 0..=1
    assert!((spans[0].start - 0.0).abs() < 1e-9);
    assert!((spans[0].end - 0.2).abs() < 1e-9);
    // "there" covers characters 3..=7, after the space at index 2
    assert!((spans[1].start - 0.3).abs() < 1e-9);
    assert!((spans[1].end - 0.8).abs() < 1e-9);
}

/// An alignment missing the space between words cannot line up
#[test]
fn test_extract_withMissingSpace_shouldFailWithMismatch() {
    let alignment = common::evenly_spaced_alignment("Hithere", 0.1);

    let result = TimingExtractor::extract("Hi there", &alignment);

    assert!(matches!(
        result,
        Err(AlignmentError::CoverageMismatch { .. })
    ));
}

/// Test that unequal array lengths are rejected up front
#[test]
fn test_extract_withUnequalArrayLengths_shouldFailWithLengthMismatch() {
    let alignment = CharacterAlignment::new(vec!['H', 'i'], vec![0.0, 0.1], vec![0.1]);

    let result = TimingExtractor::extract("Hi", &alignment);

    assert!(matches!(result, Err(AlignmentError::LengthMismatch { .. })));
}

/// Test that start times going backwards are rejected
#[test]
fn test_extract_withNonMonotonicStartTimes_shouldFail() {
    let alignment = CharacterAlignment::new(
        vec!['H', 'i'],
        vec![0.5, 0.1],
        vec![0.6, 0.7],
    );

    let result = TimingExtractor::extract("Hi", &alignment);

    assert!(matches!(
        result,
        Err(AlignmentError::NonMonotonicTimes { index: 1 })
    ));
}

/// Test that an entry ending before it starts is rejected
#[test]
fn test_extract_withEndBeforeStart_shouldFail() {
    let alignment = CharacterAlignment::new(
        vec!['H', 'i'],
        vec![0.0, 0.1],
        vec![0.1, 0.05],
    );

    let result = TimingExtractor::extract("Hi", &alignment);

    assert!(matches!(result, Err(AlignmentError::InvalidSpan { .. })));
}

/// Test that a wrong character under the cursor is a mismatch
#[test]
fn test_extract_withWrongFirstCharacter_shouldFailWithCharacterMismatch() {
    // Same length as "ab cd" but the second word starts with the wrong letter
    let alignment = common::evenly_spaced_alignment("ab xd", 0.1);

    let result = TimingExtractor::extract("ab cd", &alignment);

    assert!(matches!(
        result,
        Err(AlignmentError::CharacterMismatch { .. })
    ));
}

/// Test that empty text produces no spans rather than an error
#[test]
fn test_extract_withEmptyText_shouldYieldNoSpans() {
    let alignment = CharacterAlignment::new(Vec::new(), Vec::new(), Vec::new());

    let spans = TimingExtractor::extract("", &alignment).unwrap();

    assert!(spans.is_empty());
}

/// Test that punctuation stays attached to its token
#[test]
fn test_extract_withPunctuation_shouldKeepTokensVerbatim() {
    let text = "Hello, world!";
    let alignment = common::evenly_spaced_alignment(text, 0.05);

    let spans = TimingExtractor::extract(text, &alignment).unwrap();

    assert_eq!(spans[0].word, "Hello,");
    assert_eq!(spans[1].word, "world!");
}

/// Test that spans never overlap except at shared boundaries
#[test]
fn test_extract_withManyWords_shouldKeepSpansOrdered() {
    let text = "one two three four five six seven";
    let alignment = common::evenly_spaced_alignment(text, 0.04);

    let spans = TimingExtractor::extract(text, &alignment).unwrap();

    for pair in spans.windows(2) {
        assert!(pair[0].end <= pair[1].start + 1e-9);
        assert!(pair[0].start <= pair[0].end);
    }
}
