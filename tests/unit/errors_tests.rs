/*!
 * Tests for the error taxonomy and request-facing classification
 */

use std::path::PathBuf;

use subvox::errors::{AlignmentError, AppError, PlanError, RenderError, TtsError};

/// Plan precondition violations are the caller's fault
#[test]
fn test_app_error_fromPlanError_shouldClassifyAsBadInput() {
    let err: AppError = PlanError::NoImages.into();
    assert!(matches!(err, AppError::BadInput(_)));

    let err: AppError = PlanError::InsufficientAudioDuration {
        transition_time: 10.0,
        audio_duration: 8.0,
    }
    .into();
    assert!(matches!(err, AppError::BadInput(_)));
}

/// Alignment problems come from the TTS collaborator, not the caller
#[test]
fn test_app_error_fromAlignmentError_shouldClassifyAsInternal() {
    let err: AppError = AlignmentError::Exhausted {
        word: "missing".to_string(),
    }
    .into();
    assert!(matches!(err, AppError::Internal(_)));
}

/// Provider and backend failures are internal
#[test]
fn test_app_error_fromCollaboratorErrors_shouldClassifyAsInternal() {
    let err: AppError = TtsError::RequestFailed("connection refused".to_string()).into();
    assert!(matches!(err, AppError::Internal(_)));

    let err: AppError = RenderError::BackendFailure("missing filter".to_string()).into();
    assert!(matches!(err, AppError::Internal(_)));
}

/// Display output distinguishes only the two classes
#[test]
fn test_app_error_display_shouldPrefixClass() {
    let bad = AppError::BadInput("no visuals".to_string());
    assert!(bad.to_string().starts_with("Bad input:"));

    let internal = AppError::Internal("render failed".to_string());
    assert!(internal.to_string().starts_with("Internal error:"));
}

/// Error messages carry their diagnostic payload
#[test]
fn test_error_display_shouldIncludeDetails() {
    let err = PlanError::EmptyTransitionPool {
        images: 3,
        needed: 2,
    };
    let message = err.to_string();
    assert!(message.contains('3'));
    assert!(message.contains('2'));

    let err = AlignmentError::LengthMismatch {
        characters: 5,
        starts: 4,
        ends: 5,
    };
    assert!(err.to_string().contains("length mismatch"));

    let err = RenderError::MissingArtifact(PathBuf::from("/tmp/out.mp4"));
    assert!(err.to_string().contains("out.mp4"));

    let err = TtsError::ApiError {
        status_code: 429,
        message: "rate limited".to_string(),
    };
    assert!(err.to_string().contains("429"));
}
