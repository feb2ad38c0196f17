/*!
 * # Subvox
 *
 * A Rust library for generating subtitle-burned narration videos.
 *
 * ## Features
 *
 * - Text-to-speech synthesis with character-level timestamps (ElevenLabs)
 * - Word-level timing extraction from character alignments
 * - Readable subtitle cue clustering with SRT output
 * - Slideshow planning for still-image visual sources (durations,
 *   transition choice, crossfade offsets)
 * - Declarative render-graph construction executed by ffmpeg
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `timing`: Character-alignment to word-span extraction
 * - `subtitle_cues`: Cue clustering and SRT serialization
 * - `slideshow`: Slideshow timeline planning and crop geometry
 * - `compositor`: Render-graph construction and backend invocation
 * - `providers`: Speech synthesis clients:
 *   - `providers::elevenlabs`: ElevenLabs API client
 *   - `providers::mock`: Deterministic provider for tests
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod compositor;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod slideshow;
pub mod subtitle_cues;
pub mod timing;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, GenerationRequest, VisualSource};
pub use compositor::{Compositor, RenderGraph};
pub use errors::{AlignmentError, AppError, PlanError, RenderError, TtsError};
pub use slideshow::{SlideshowPlan, SlideshowPlanner, TransitionPool};
pub use subtitle_cues::{CueBuilder, CueSheet, SubtitleCue};
pub use timing::{CharacterAlignment, TimingExtractor, WordSpan};
