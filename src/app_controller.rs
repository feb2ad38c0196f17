use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::app_config::{Config, SpeechProviderKind};
use crate::compositor::Compositor;
use crate::errors::AppError;
use crate::file_utils::{FileManager, VisualKind};
use crate::providers::elevenlabs::ElevenLabs;
use crate::providers::mock::MockSpeechProvider;
use crate::providers::SpeechProvider;
use crate::slideshow::{ImageInput, SlideshowPlanner, TransitionPool};
use crate::subtitle_cues::CueBuilder;
use crate::timing::TimingExtractor;

// @module: Application controller for one video-generation request

/// What the caller supplied as the visual track
#[derive(Debug, Clone, PartialEq)]
pub enum VisualSource {
    /// One continuous base video, looped under the narration
    Video(PathBuf),
    /// An ordered set of still images turned into a slideshow
    Images(Vec<PathBuf>),
}

/// A single video-generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The narration text
    pub text: String,

    /// Visual source files, one video or one or more images
    pub visuals: Vec<PathBuf>,

    /// Directory receiving the finished video
    pub output_dir: PathBuf,

    /// Optional seed for reproducible transition selection
    pub seed: Option<u64>,
}

/// Main application controller driving one request end to end.
///
/// Requests are independent: every run gets its own temporary workspace and
/// shares nothing with other runs except the read-only transition pool.
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Speech synthesis collaborator
    provider: Arc<dyn SpeechProvider>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let provider: Arc<dyn SpeechProvider> = match config.tts.provider {
            SpeechProviderKind::ElevenLabs => Arc::new(ElevenLabs::new(&config.tts)),
            SpeechProviderKind::Mock => Arc::new(MockSpeechProvider::working()),
        };

        Ok(Self { config, provider })
    }

    /// Create a controller with an injected provider, used by tests
    pub fn with_provider(config: Config, provider: Arc<dyn SpeechProvider>) -> Self {
        Self { config, provider }
    }

    /// Run one generation request and return the finished video path.
    ///
    /// Every temporary artifact lives in a per-request workspace that is
    /// removed on all exit paths; a cleanup failure is logged, never
    /// escalated, since the request already succeeded or failed on its own.
    pub async fn run(&self, request: GenerationRequest) -> Result<PathBuf, AppError> {
        let output_filename = FileManager::sanitized_output_filename(&request.text)
            .map_err(|e| AppError::BadInput(e.to_string()))?;

        let visuals = Self::classify_visuals(&request.visuals)?;

        FileManager::ensure_dir(&request.output_dir)?;

        let workspace = tempfile::Builder::new()
            .prefix("subvox-")
            .tempdir()
            .map_err(AppError::from)?;

        let result = self
            .run_in_workspace(&request, visuals, workspace.path(), &output_filename)
            .await;

        if let Err(e) = workspace.close() {
            warn!("Failed to clean up temporary workspace: {}", e);
        }

        result
    }

    async fn run_in_workspace(
        &self,
        request: &GenerationRequest,
        visuals: VisualSource,
        workspace: &Path,
        output_filename: &str,
    ) -> Result<PathBuf, AppError> {
        let start_time = std::time::Instant::now();

        // The TTS call is the one suspension point everything else waits on
        let spinner = Self::spinner("Synthesizing speech...");
        let synthesis = self.provider.synthesize(&request.text).await?;
        spinner.finish_and_clear();

        let audio_path = FileManager::unique_temp_path(workspace, "mp3");
        FileManager::write_bytes_to_file(&audio_path, &synthesis.audio)?;

        let audio_duration = FileManager::probe_media_duration(&audio_path).await?;
        debug!("Synthesized {:.2}s of narration", audio_duration);

        let spans = TimingExtractor::extract(&request.text, &synthesis.alignment)?;
        let sheet = CueBuilder::new(&self.config.subtitles).build(&spans);
        info!("Built {} subtitle cue(s) from {} word(s)", sheet.len(), spans.len());

        let cue_path = FileManager::unique_temp_path(workspace, "srt");
        sheet.write_to_srt(&cue_path)?;

        let output_path = request.output_dir.join(output_filename);
        let compositor = Compositor::new(self.config.output.clone());

        let graph = match visuals {
            VisualSource::Video(video) => compositor.build_video_graph(
                &video,
                &audio_path,
                &cue_path,
                audio_duration,
                &output_path,
            ),
            VisualSource::Images(paths) => {
                let images = paths
                    .iter()
                    .map(ImageInput::probe)
                    .collect::<Result<Vec<_>>>()
                    .map_err(|e| AppError::BadInput(e.to_string()))?;

                let pool = TransitionPool::load_from_dir(&self.config.transitions_dir).await?;

                let mut rng = match request.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };

                let plan = SlideshowPlanner::plan(&images, &pool, audio_duration, &mut rng)?;
                debug!(
                    "Planned {} segment(s) and {} transition(s)",
                    plan.segments.len(),
                    plan.transitions.len()
                );

                compositor.build_slideshow_graph(
                    &plan,
                    &audio_path,
                    &cue_path,
                    audio_duration,
                    &output_path,
                )
            }
        };

        let spinner = Self::spinner("Rendering video...");
        let artifact = compositor.render(&graph).await?;
        spinner.finish_and_clear();

        info!(
            "Finished {:?} in {}",
            artifact,
            Self::format_duration(start_time.elapsed())
        );

        Ok(artifact)
    }

    /// Decide whether the supplied files form a video request or a slideshow
    fn classify_visuals(paths: &[PathBuf]) -> Result<VisualSource, AppError> {
        if paths.is_empty() {
            return Err(AppError::BadInput(
                "At least one visual source file is required".to_string(),
            ));
        }

        for path in paths {
            if !FileManager::file_exists(path) {
                return Err(AppError::BadInput(format!(
                    "Visual source does not exist: {:?}",
                    path
                )));
            }
        }

        let kinds: Vec<VisualKind> = paths.iter().map(FileManager::detect_visual_kind).collect();

        if kinds.iter().all(|k| *k == VisualKind::Image) {
            return Ok(VisualSource::Images(paths.to_vec()));
        }

        if kinds.len() == 1 && kinds[0] == VisualKind::Video {
            return Ok(VisualSource::Video(paths[0].clone()));
        }

        Err(AppError::BadInput(
            "Visuals must be either a single video file or a set of images".to_string(),
        ))
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let template_result = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(template_result);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Format a duration for the completion log line
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes > 0 {
            format!("{}m{:02}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
