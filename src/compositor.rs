use std::path::{Path, PathBuf};

use log::{debug, error};
use tokio::process::Command;

use crate::app_config::OutputConfig;
use crate::errors::RenderError;
use crate::file_utils::FileManager;
use crate::slideshow::{crop_region, SlideshowPlan};

// @module: Render-graph construction and backend invocation

// Renders are long-running but must not hang forever on a wedged backend
const RENDER_TIMEOUT_SECS: u64 = 600;

/// One media input and the options that precede it on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    pub path: PathBuf,
    pub options: Vec<String>,
}

impl InputSpec {
    pub fn plain<P: AsRef<Path>>(path: P) -> Self {
        InputSpec {
            path: path.as_ref().to_path_buf(),
            options: Vec::new(),
        }
    }

    pub fn with_options<P: AsRef<Path>>(path: P, options: Vec<String>) -> Self {
        InputSpec {
            path: path.as_ref().to_path_buf(),
            options,
        }
    }
}

/// One labeled filter chain inside the complex filter graph
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    /// Input pad labels, e.g. `0:v` or a prior chain's output label
    pub inputs: Vec<String>,
    /// Comma-joined filter expressions
    pub filters: String,
    /// Output pad label
    pub output: String,
}

impl FilterChain {
    fn render(&self) -> String {
        let inputs: String = self.inputs.iter().map(|i| format!("[{}]", i)).collect();
        format!("{}{}[{}]", inputs, self.filters, self.output)
    }
}

/// Output parameters for the final artifact
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSpec {
    pub path: PathBuf,
    pub codec: String,
    pub audio_bitrate: String,
    /// Explicit duration bound in seconds; the timeline is clipped to this
    pub duration: f64,
}

/// The immutable instruction set for one backend invocation.
///
/// Constructed once, validated, then turned into an argument vector. Keeping
/// the graph a value separates the pure construction step from the impure
/// backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderGraph {
    pub inputs: Vec<InputSpec>,
    pub filters: Vec<FilterChain>,
    /// Stream or pad selector mapped as the output video
    pub video_map: String,
    /// Stream selector mapped as the output audio
    pub audio_map: String,
    pub output: OutputSpec,
}

impl RenderGraph {
    // @validates: Input presence, label consistency, positive duration
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.inputs.is_empty() {
            return Err(RenderError::InvalidGraph("no inputs".to_string()));
        }

        if !self.output.duration.is_finite() || self.output.duration <= 0.0 {
            return Err(RenderError::InvalidGraph(format!(
                "non-positive output duration {}",
                self.output.duration
            )));
        }

        // Every chain input must be a source pad or a label produced earlier
        let mut known: Vec<String> = Vec::new();
        for (index, _) in self.inputs.iter().enumerate() {
            known.push(format!("{}:v", index));
            known.push(format!("{}:a", index));
        }
        for chain in &self.filters {
            for input in &chain.inputs {
                if !known.contains(input) {
                    return Err(RenderError::InvalidGraph(format!(
                        "filter chain reads undefined pad [{}]",
                        input
                    )));
                }
            }
            known.push(chain.output.clone());
        }

        let video_label = self
            .video_map
            .trim_start_matches('[')
            .trim_end_matches(']');
        if !known.iter().any(|k| k == video_label) {
            return Err(RenderError::InvalidGraph(format!(
                "video map {} refers to an undefined pad",
                self.video_map
            )));
        }

        Ok(())
    }

    /// Render the graph into an ffmpeg argument vector
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec!["-y".to_string()];

        for input in &self.inputs {
            args.extend(input.options.iter().cloned());
            args.push("-i".to_string());
            args.push(input.path.to_string_lossy().to_string());
        }

        if !self.filters.is_empty() {
            let graph: Vec<String> = self.filters.iter().map(|c| c.render()).collect();
            args.push("-filter_complex".to_string());
            args.push(graph.join(";"));
        }

        args.push("-map".to_string());
        args.push(self.video_map.clone());
        args.push("-map".to_string());
        args.push(self.audio_map.clone());

        args.push("-c:v".to_string());
        args.push(self.output.codec.clone());
        args.push("-b:a".to_string());
        args.push(self.output.audio_bitrate.clone());

        args.push("-t".to_string());
        args.push(format!("{:.3}", self.output.duration));

        args.push(self.output.path.to_string_lossy().to_string());
        args
    }
}

/// Drives the rendering backend: builds the graph from cues and plan, then
/// invokes ffmpeg exactly once per request.
pub struct Compositor {
    output: OutputConfig,
}

impl Compositor {
    pub fn new(output: OutputConfig) -> Self {
        Compositor { output }
    }

    /// Graph for an existing base video: loop it under the audio length,
    /// burn in the cue file, clip to the audio duration.
    pub fn build_video_graph(
        &self,
        video: &Path,
        audio: &Path,
        cue_file: &Path,
        audio_duration: f64,
        output_path: &Path,
    ) -> RenderGraph {
        let inputs = vec![
            InputSpec::with_options(
                video,
                vec!["-stream_loop".to_string(), "-1".to_string()],
            ),
            InputSpec::plain(audio),
        ];

        let filters = vec![FilterChain {
            inputs: vec!["0:v".to_string()],
            filters: format!("subtitles={}:charenc=UTF-8", escape_filter_path(cue_file)),
            output: "vout".to_string(),
        }];

        RenderGraph {
            inputs,
            filters,
            video_map: "[vout]".to_string(),
            audio_map: "1:a".to_string(),
            output: self.output_spec(output_path, audio_duration),
        }
    }

    /// Graph for a slideshow plan: per-image crop/scale chains, transition
    /// prep chains, a concat of all visual streams in plan order, then the
    /// same subtitle/clip steps as the video mode.
    pub fn build_slideshow_graph(
        &self,
        plan: &SlideshowPlan,
        audio: &Path,
        cue_file: &Path,
        audio_duration: f64,
        output_path: &Path,
    ) -> RenderGraph {
        let image_count = plan.segments.len();
        let mut inputs = Vec::with_capacity(image_count * 2);

        for segment in &plan.segments {
            inputs.push(InputSpec::with_options(
                &segment.image.path,
                vec![
                    "-loop".to_string(),
                    "1".to_string(),
                    "-framerate".to_string(),
                    self.output.fps.to_string(),
                    "-t".to_string(),
                    format!("{:.3}", segment.duration),
                ],
            ));
        }
        for transition in &plan.transitions {
            inputs.push(InputSpec::plain(&transition.clip.path));
        }
        let audio_index = inputs.len();
        inputs.push(InputSpec::plain(audio));

        let mut filters = Vec::new();

        for (i, segment) in plan.segments.iter().enumerate() {
            let region = crop_region(
                segment.image.width,
                segment.image.height,
                self.output.width,
                self.output.height,
            );
            filters.push(FilterChain {
                inputs: vec![format!("{}:v", i)],
                filters: format!(
                    "crop={}:{}:{}:{},scale={}:{},fps={},setsar=1,format=yuv420p",
                    region.width,
                    region.height,
                    region.x,
                    region.y,
                    self.output.width,
                    self.output.height,
                    self.output.fps
                ),
                output: format!("v{}", i),
            });
        }

        for (j, _) in plan.transitions.iter().enumerate() {
            filters.push(FilterChain {
                inputs: vec![format!("{}:v", image_count + j)],
                filters: format!(
                    "scale={}:{},fps={},setsar=1,format=yuv420p",
                    self.output.width, self.output.height, self.output.fps
                ),
                output: format!("t{}", j),
            });
        }

        // Interleave segments and transitions in plan order
        let mut concat_inputs = Vec::with_capacity(image_count * 2);
        for i in 0..image_count {
            concat_inputs.push(format!("v{}", i));
            if i < plan.transitions.len() {
                concat_inputs.push(format!("t{}", i));
            }
        }
        let stream_count = concat_inputs.len();
        filters.push(FilterChain {
            inputs: concat_inputs,
            filters: format!("concat=n={}:v=1:a=0", stream_count),
            output: "slideshow".to_string(),
        });

        filters.push(FilterChain {
            inputs: vec!["slideshow".to_string()],
            filters: format!("subtitles={}:charenc=UTF-8", escape_filter_path(cue_file)),
            output: "vout".to_string(),
        });

        RenderGraph {
            inputs,
            filters,
            video_map: "[vout]".to_string(),
            audio_map: format!("{}:a", audio_index),
            output: self.output_spec(output_path, audio_duration),
        }
    }

    fn output_spec(&self, path: &Path, duration: f64) -> OutputSpec {
        OutputSpec {
            path: path.to_path_buf(),
            codec: self.output.codec.clone(),
            audio_bitrate: self.output.audio_bitrate.clone(),
            duration,
        }
    }

    /// Execute the graph. One invocation produces the final artifact; any
    /// backend failure is fatal for the request and is not retried.
    pub async fn render(&self, graph: &RenderGraph) -> Result<PathBuf, RenderError> {
        graph.validate()?;

        let args = graph.to_args();
        debug!("Invoking ffmpeg with {} arguments", args.len());

        let ffmpeg_future = Command::new("ffmpeg").args(&args).output();

        let timeout = std::time::Duration::from_secs(RENDER_TIMEOUT_SECS);
        let result = tokio::select! {
            result = ffmpeg_future => result?,
            _ = tokio::time::sleep(timeout) => {
                FileManager::remove_quietly(&graph.output.path);
                return Err(RenderError::Timeout(RENDER_TIMEOUT_SECS));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("Render failed: {}", filtered);
            // A failed encode can leave a partial artifact behind
            FileManager::remove_quietly(&graph.output.path);
            return Err(RenderError::BackendFailure(filtered));
        }

        if !graph.output.path.exists() {
            return Err(RenderError::MissingArtifact(graph.output.path.clone()));
        }

        Ok(graph.output.path.clone())
    }
}

/// Escape a path for use inside an ffmpeg filter expression
fn escape_filter_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let escaped = raw
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'");
    format!("'{}'", escaped)
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "      Metadata:",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "frame=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
