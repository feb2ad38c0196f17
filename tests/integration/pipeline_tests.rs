/*!
 * End-to-end pipeline tests driven by the mock speech provider.
 *
 * These cover the full data path from synthesis through cue-file writing
 * without touching the network or the rendering backend.
 */

use std::sync::Arc;

use anyhow::Result;
use subvox::app_config::{Config, SpeechProviderKind};
use subvox::app_controller::{Controller, GenerationRequest};
use subvox::errors::AppError;
use subvox::providers::mock::MockSpeechProvider;
use subvox::providers::SpeechProvider;
use subvox::subtitle_cues::CueBuilder;
use subvox::timing::TimingExtractor;

use crate::common;

fn mock_config() -> Config {
    let mut config = Config::default();
    config.tts.provider = SpeechProviderKind::Mock;
    config
}

/// Synthesis through cue-file writing produces a well-formed SRT document
#[tokio::test]
async fn test_pipeline_withWorkingMock_shouldProduceValidCueFile() -> Result<()> {
    let text = "In a small village a young girl discovered she could control time";
    let provider = MockSpeechProvider::working();

    let synthesis = provider.synthesize(text).await?;
    let spans = TimingExtractor::extract(text, &synthesis.alignment)?;
    let sheet = CueBuilder::new(&mock_config().subtitles).build(&spans);

    let temp_dir = common::create_temp_dir()?;
    let cue_path = temp_dir.path().join("cues.srt");
    sheet.write_to_srt(&cue_path)?;

    let content = std::fs::read_to_string(&cue_path)?;
    assert!(content.starts_with("1\n"));
    assert!(content.contains(" --> "));
    assert!(content.ends_with("\n\n"));

    // Every source word appears in the cue file, in order
    let covered: Vec<&str> = sheet
        .cues
        .iter()
        .flat_map(|c| c.text.split(' '))
        .collect();
    let expected: Vec<&str> = text.split_whitespace().collect();
    assert_eq!(covered, expected);

    Ok(())
}

/// Cues built from mock timings never overlap
#[tokio::test]
async fn test_pipeline_withWorkingMock_shouldKeepCuesOrdered() -> Result<()> {
    let text = "the quick brown fox jumps over the lazy dog again and again";
    let provider = MockSpeechProvider::working().with_char_duration(0.08);

    let synthesis = provider.synthesize(text).await?;
    let spans = TimingExtractor::extract(text, &synthesis.alignment)?;
    let sheet = CueBuilder::new(&mock_config().subtitles).build(&spans);

    assert!(!sheet.is_empty());
    for pair in sheet.cues.windows(2) {
        assert!(pair[0].end <= pair[1].start + 1e-9);
    }
    for (i, cue) in sheet.cues.iter().enumerate() {
        assert_eq!(cue.seq_num, i + 1);
    }

    Ok(())
}

/// A provider returning an alignment without spaces surfaces an alignment failure
#[tokio::test]
async fn test_pipeline_withMissingSpacesMock_shouldSurfaceAlignmentFailure() -> Result<()> {
    let text = "Hi there friend";
    let provider = MockSpeechProvider::missing_spaces();

    let synthesis = provider.synthesize(text).await?;
    let result = TimingExtractor::extract(text, &synthesis.alignment);

    assert!(result.is_err());
    let app_error: AppError = result.unwrap_err().into();
    assert!(matches!(app_error, AppError::Internal(_)));

    Ok(())
}

/// The mock's reported audio length agrees with its alignment
#[tokio::test]
async fn test_pipeline_withWorkingMock_shouldAlignSpeechToAudioLength() -> Result<()> {
    let text = "counting every single character";
    let provider = MockSpeechProvider::working().with_char_duration(0.1);

    let synthesis = provider.synthesize(text).await?;
    let spans = TimingExtractor::extract(text, &synthesis.alignment)?;

    let last_end = spans.last().map(|s| s.end).unwrap_or(0.0);
    assert!((last_end - provider.audio_duration(text)).abs() < 1e-9);

    Ok(())
}

/// An empty alignment against real text cannot cover it
#[tokio::test]
async fn test_pipeline_withEmptyAlignmentMock_shouldSurfaceAlignmentFailure() -> Result<()> {
    let text = "some words here";
    let provider = MockSpeechProvider::empty_alignment();

    let synthesis = provider.synthesize(text).await?;
    let result = TimingExtractor::extract(text, &synthesis.alignment);

    assert!(result.is_err());

    Ok(())
}

/// Text too short for an output name is rejected before any synthesis
#[tokio::test]
async fn test_controller_withShortText_shouldRejectAsBadInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let image = common::create_test_file(temp_dir.path(), "a.jpg", "")?;

    let controller =
        Controller::with_provider(mock_config(), Arc::new(MockSpeechProvider::failing()));

    let request = GenerationRequest {
        text: "two words".to_string(),
        visuals: vec![image],
        output_dir: temp_dir.path().to_path_buf(),
        seed: None,
    };

    let err = controller.run(request).await.unwrap_err();
    assert!(matches!(err, AppError::BadInput(_)));

    Ok(())
}

/// Missing visual files are rejected before any synthesis
#[tokio::test]
async fn test_controller_withMissingVisual_shouldRejectAsBadInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let controller =
        Controller::with_provider(mock_config(), Arc::new(MockSpeechProvider::failing()));

    let request = GenerationRequest {
        text: "a perfectly fine narration".to_string(),
        visuals: vec![temp_dir.path().join("nope.jpg")],
        output_dir: temp_dir.path().to_path_buf(),
        seed: None,
    };

    let err = controller.run(request).await.unwrap_err();
    assert!(matches!(err, AppError::BadInput(_)));

    Ok(())
}

/// Mixing a video with images is not a valid visual source
#[tokio::test]
async fn test_controller_withMixedVisuals_shouldRejectAsBadInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let image = common::create_test_file(temp_dir.path(), "a.jpg", "")?;
    let video = common::create_test_file(temp_dir.path(), "b.mp4", "")?;

    let controller =
        Controller::with_provider(mock_config(), Arc::new(MockSpeechProvider::failing()));

    let request = GenerationRequest {
        text: "a perfectly fine narration".to_string(),
        visuals: vec![image, video],
        output_dir: temp_dir.path().to_path_buf(),
        seed: None,
    };

    let err = controller.run(request).await.unwrap_err();
    assert!(matches!(err, AppError::BadInput(_)));

    Ok(())
}

/// A failing provider surfaces as an internal error, after input checks pass
#[tokio::test]
async fn test_controller_withFailingProvider_shouldSurfaceInternalError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let image = common::create_test_file(temp_dir.path(), "a.jpg", "")?;

    let controller =
        Controller::with_provider(mock_config(), Arc::new(MockSpeechProvider::failing()));

    let request = GenerationRequest {
        text: "a perfectly fine narration".to_string(),
        visuals: vec![image],
        output_dir: temp_dir.path().to_path_buf(),
        seed: None,
    };

    let err = controller.run(request).await.unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));

    Ok(())
}
