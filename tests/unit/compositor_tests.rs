/*!
 * Tests for render-graph construction and validation
 */

use std::path::{Path, PathBuf};

use subvox::app_config::OutputConfig;
use subvox::compositor::{Compositor, FilterChain, InputSpec, OutputSpec, RenderGraph};
use subvox::errors::RenderError;
use subvox::slideshow::{ImageInput, Segment, SlideshowPlan, TransitionClip, TransitionUse};

fn compositor() -> Compositor {
    Compositor::new(OutputConfig::default())
}

fn sample_plan() -> SlideshowPlan {
    let image = |name: &str| ImageInput {
        path: PathBuf::from(name),
        width: 4000,
        height: 3000,
    };
    let clip = TransitionClip {
        path: PathBuf::from("swipe.mp4"),
        duration: 2.0,
    };

    SlideshowPlan {
        segments: vec![
            Segment { image: image("a.jpg"), duration: 4.0 },
            Segment { image: image("b.jpg"), duration: 4.0 },
            Segment { image: image("c.jpg"), duration: 4.0 },
        ],
        transitions: vec![
            TransitionUse { clip: clip.clone(), offset: 3.0 },
            TransitionUse { clip, offset: 9.0 },
        ],
    }
}

/// Video mode: loop the base video, burn cues, clip to the audio length
#[test]
fn test_video_graph_withDefaults_shouldLoopBurnAndClip() {
    let graph = compositor().build_video_graph(
        Path::new("base.mp4"),
        Path::new("speech.mp3"),
        Path::new("cues.srt"),
        12.5,
        Path::new("out.mp4"),
    );

    graph.validate().unwrap();
    let args = graph.to_args();

    let loop_pos = args.iter().position(|a| a == "-stream_loop").unwrap();
    assert_eq!(args[loop_pos + 1], "-1");

    let filter_pos = args.iter().position(|a| a == "-filter_complex").unwrap();
    assert!(args[filter_pos + 1].contains("subtitles="));
    assert!(args[filter_pos + 1].contains("charenc=UTF-8"));

    let t_pos = args.iter().position(|a| a == "-t").unwrap();
    assert_eq!(args[t_pos + 1], "12.500");

    let codec_pos = args.iter().position(|a| a == "-c:v").unwrap();
    assert_eq!(args[codec_pos + 1], "libx264");

    let bitrate_pos = args.iter().position(|a| a == "-b:a").unwrap();
    assert_eq!(args[bitrate_pos + 1], "192k");

    assert_eq!(args.last().unwrap(), "out.mp4");
}

/// Slideshow mode: one input per image, transition and the audio; a concat
/// over every visual stream in plan order
#[test]
fn test_slideshow_graph_withPlan_shouldConcatAllStreams() {
    let plan = sample_plan();
    let graph = compositor().build_slideshow_graph(
        &plan,
        Path::new("speech.mp3"),
        Path::new("cues.srt"),
        16.0,
        Path::new("out.mp4"),
    );

    graph.validate().unwrap();

    // 3 images + 2 transitions + 1 audio
    assert_eq!(graph.inputs.len(), 6);
    assert_eq!(graph.audio_map, "5:a");

    let args = graph.to_args();
    let filter_pos = args.iter().position(|a| a == "-filter_complex").unwrap();
    let filter_graph = &args[filter_pos + 1];

    // Segments and transitions interleave: v0, t0, v1, t1, v2
    assert!(filter_graph.contains("concat=n=5:v=1:a=0"));
    assert!(filter_graph.contains("crop="));
    assert!(filter_graph.contains("scale=1080:1920"));
    assert!(filter_graph.contains("subtitles="));
}

/// Image inputs are looped stills bounded to their segment duration
#[test]
fn test_slideshow_graph_withPlan_shouldBoundImageInputs() {
    let plan = sample_plan();
    let graph = compositor().build_slideshow_graph(
        &plan,
        Path::new("speech.mp3"),
        Path::new("cues.srt"),
        16.0,
        Path::new("out.mp4"),
    );

    for input in &graph.inputs[..3] {
        assert!(input.options.contains(&"-loop".to_string()));
        assert!(input.options.contains(&"-t".to_string()));
        assert!(input.options.contains(&"4.000".to_string()));
    }

    // Transition and audio inputs carry no pre-input options
    assert!(graph.inputs[3].options.is_empty());
    assert!(graph.inputs[5].options.is_empty());
}

/// Validation rejects a graph with no inputs
#[test]
fn test_graph_validate_withNoInputs_shouldFail() {
    let graph = RenderGraph {
        inputs: Vec::new(),
        filters: Vec::new(),
        video_map: "0:v".to_string(),
        audio_map: "1:a".to_string(),
        output: OutputSpec {
            path: PathBuf::from("out.mp4"),
            codec: "libx264".to_string(),
            audio_bitrate: "192k".to_string(),
            duration: 10.0,
        },
    };

    assert!(matches!(
        graph.validate(),
        Err(RenderError::InvalidGraph(_))
    ));
}

/// Validation rejects a non-positive duration bound
#[test]
fn test_graph_validate_withNonPositiveDuration_shouldFail() {
    let graph = RenderGraph {
        inputs: vec![InputSpec::plain("in.mp4")],
        filters: Vec::new(),
        video_map: "0:v".to_string(),
        audio_map: "0:a".to_string(),
        output: OutputSpec {
            path: PathBuf::from("out.mp4"),
            codec: "libx264".to_string(),
            audio_bitrate: "192k".to_string(),
            duration: 0.0,
        },
    };

    assert!(matches!(
        graph.validate(),
        Err(RenderError::InvalidGraph(_))
    ));
}

/// Validation rejects a filter chain reading an undefined pad
#[test]
fn test_graph_validate_withUndefinedPad_shouldFail() {
    let graph = RenderGraph {
        inputs: vec![InputSpec::plain("in.mp4")],
        filters: vec![FilterChain {
            inputs: vec!["missing".to_string()],
            filters: "fps=30".to_string(),
            output: "vout".to_string(),
        }],
        video_map: "[vout]".to_string(),
        audio_map: "0:a".to_string(),
        output: OutputSpec {
            path: PathBuf::from("out.mp4"),
            codec: "libx264".to_string(),
            audio_bitrate: "192k".to_string(),
            duration: 10.0,
        },
    };

    assert!(matches!(
        graph.validate(),
        Err(RenderError::InvalidGraph(_))
    ));
}

/// Graph construction is deterministic for identical inputs
#[test]
fn test_graph_toArgs_withSameInputs_shouldBeDeterministic() {
    let plan = sample_plan();
    let build = || {
        compositor()
            .build_slideshow_graph(
                &plan,
                Path::new("speech.mp3"),
                Path::new("cues.srt"),
                16.0,
                Path::new("out.mp4"),
            )
            .to_args()
    };

    assert_eq!(build(), build());
}
