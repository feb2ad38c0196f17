use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use rand::Rng;

use crate::errors::PlanError;
use crate::file_utils::FileManager;

// @module: Slideshow timeline planning for still-image visual sources

/// A short video resource used to bridge two image segments.
///
/// The duration is read from the file's container metadata when the pool is
/// loaded; the pool directory is never mutated at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionClip {
    pub path: PathBuf,
    pub duration: f64,
}

/// The static set of transition clips available to the planner
#[derive(Debug, Default)]
pub struct TransitionPool {
    clips: Vec<TransitionClip>,
}

impl TransitionPool {
    pub fn new(clips: Vec<TransitionClip>) -> Self {
        TransitionPool { clips }
    }

    /// Scan a directory for video files and probe each clip's duration.
    ///
    /// Files are sorted by path so pool indices are stable across runs.
    pub async fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !FileManager::dir_exists(dir) {
            debug!("Transition directory {:?} does not exist, pool is empty", dir);
            return Ok(TransitionPool::default());
        }

        let mut paths = FileManager::find_video_files(dir)?;
        paths.sort();

        let mut clips = Vec::with_capacity(paths.len());
        for path in paths {
            let duration = FileManager::probe_media_duration(&path)
                .await
                .with_context(|| format!("Failed to probe transition clip {:?}", path))?;
            clips.push(TransitionClip { path, duration });
        }

        debug!("Loaded {} transition clip(s)", clips.len());
        Ok(TransitionPool { clips })
    }

    pub fn clips(&self) -> &[TransitionClip] {
        &self.clips
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }
}

/// A still image with its pixel dimensions, read from the file header
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ImageInput {
    /// Read the image dimensions without decoding the pixel data
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (width, height) = image::image_dimensions(path)
            .with_context(|| format!("Failed to read image dimensions from {:?}", path))?;
        Ok(ImageInput {
            path: path.to_path_buf(),
            width,
            height,
        })
    }
}

/// One still-image-derived clip of fixed duration within the plan
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub image: ImageInput,
    pub duration: f64,
}

/// One chosen transition and the absolute timeline offset where it begins
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionUse {
    pub clip: TransitionClip,
    pub offset: f64,
}

/// Deterministic render plan for a set of still images.
///
/// Segments and transitions interleave: segment 0, transition 0, segment 1,
/// and so on. Every duration and offset is fully determined by the inputs;
/// only the clip choice is random.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowPlan {
    pub segments: Vec<Segment>,
    pub transitions: Vec<TransitionUse>,
}

impl SlideshowPlan {
    /// Total content time laid down by the plan.
    ///
    /// Equals the target audio duration by construction.
    pub fn total_duration(&self) -> f64 {
        let segment_time: f64 = self.segments.iter().map(|s| s.duration).sum();
        let transition_time: f64 = self.transitions.iter().map(|t| t.clip.duration).sum();
        segment_time + transition_time
    }
}

/// Computes per-image durations, picks transition clips, and places each
/// transition's crossfade window on the final timeline.
pub struct SlideshowPlanner;

impl SlideshowPlanner {
    /// Build a plan covering `audio_duration` seconds.
    ///
    /// `image_count - 1` clips are drawn from the pool uniformly at random
    /// WITH replacement, so a pool smaller than the number of junctions is
    /// fine. The remaining time is split evenly across all images. Each
    /// transition's offset is placed so its midpoint lands on the boundary
    /// between the two segments it bridges.
    pub fn plan<R: Rng>(
        images: &[ImageInput],
        pool: &TransitionPool,
        audio_duration: f64,
        rng: &mut R,
    ) -> Result<SlideshowPlan, PlanError> {
        if images.is_empty() {
            return Err(PlanError::NoImages);
        }

        let needed = images.len() - 1;
        let mut chosen: Vec<TransitionClip> = Vec::with_capacity(needed);
        if needed > 0 {
            if pool.is_empty() {
                return Err(PlanError::EmptyTransitionPool {
                    images: images.len(),
                    needed,
                });
            }
            for _ in 0..needed {
                let clip = &pool.clips()[rng.random_range(0..pool.len())];
                chosen.push(clip.clone());
            }
        }

        let transition_time: f64 = chosen.iter().map(|c| c.duration).sum();
        let remaining = audio_duration - transition_time;
        if remaining <= 0.0 {
            return Err(PlanError::InsufficientAudioDuration {
                transition_time,
                audio_duration,
            });
        }

        let per_image = remaining / images.len() as f64;
        let segments: Vec<Segment> = images
            .iter()
            .map(|image| Segment {
                image: image.clone(),
                duration: per_image,
            })
            .collect();

        // Walk the timeline: each segment and transition contributes its full
        // duration. A transition starts half its own length before the image
        // boundary it covers, centering the crossfade on the cut.
        let mut transitions = Vec::with_capacity(needed);
        let mut elapsed = 0.0;
        for clip in chosen {
            elapsed += per_image;
            let offset = elapsed - clip.duration / 2.0;
            elapsed += clip.duration;
            transitions.push(TransitionUse { clip, offset });
        }

        Ok(SlideshowPlan {
            segments,
            transitions,
        })
    }
}

/// Centered crop rectangle, in input pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Compute the centered crop that brings an input frame to the target aspect
/// ratio: crop width when the input is relatively wider than the target, crop
/// height when relatively taller.
pub fn crop_region(in_w: u32, in_h: u32, target_w: u32, target_h: u32) -> CropRegion {
    // Cross-multiplied aspect comparison, no floats
    let lhs = u64::from(in_w) * u64::from(target_h);
    let rhs = u64::from(target_w) * u64::from(in_h);

    if lhs > rhs {
        let width = (u64::from(in_h) * u64::from(target_w) / u64::from(target_h)) as u32;
        CropRegion {
            width,
            height: in_h,
            x: (in_w - width) / 2,
            y: 0,
        }
    } else if lhs < rhs {
        let height = (u64::from(in_w) * u64::from(target_h) / u64::from(target_w)) as u32;
        CropRegion {
            width: in_w,
            height,
            x: 0,
            y: (in_h - height) / 2,
        }
    } else {
        CropRegion {
            width: in_w,
            height: in_h,
            x: 0,
            y: 0,
        }
    }
}
