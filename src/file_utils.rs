use anyhow::{anyhow, Context, Result};
use log::error;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{from_str, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use uuid::Uuid;
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Characters stripped from filename components
static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9_-]").unwrap()
});

// Common video file extensions supported by ffmpeg.
// This list is not exhaustive but covers the most common formats.
const VIDEO_EXTENSIONS: [&str; 14] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ogv", "ts", "mts",
    "m2ts",
];

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "gif"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write raw bytes to a file, creating parent directories as needed
    pub fn write_bytes_to_file<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Find video files in a directory, non-recursively ordered by walkdir
    pub fn find_video_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::detect_visual_kind(path) == VisualKind::Video {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Classify a file as image, video or unknown by extension
    pub fn detect_visual_kind<P: AsRef<Path>>(path: P) -> VisualKind {
        if let Some(ext) = path.as_ref().extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();

            if IMAGE_EXTENSIONS.contains(&ext_str.as_str()) {
                return VisualKind::Image;
            }

            if VIDEO_EXTENSIONS.contains(&ext_str.as_str()) {
                return VisualKind::Video;
            }
        }

        VisualKind::Unknown
    }

    /// Output filename built from the text's first three words plus a UUID,
    /// mirroring how generated clips are named for upload
    pub fn sanitized_output_filename(text: &str) -> Result<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() < 3 {
            return Err(anyhow!("Text must contain at least three words"));
        }

        let mut parts: Vec<String> = words[..3]
            .iter()
            .map(|w| UNSAFE_FILENAME_CHARS.replace_all(w, "").to_string())
            .collect();
        parts.push(Uuid::new_v4().to_string());

        Ok(format!("{}.mp4", parts.join("_")))
    }

    /// Uniquely named path inside `dir` for a temporary artifact
    pub fn unique_temp_path<P: AsRef<Path>>(dir: P, extension: &str) -> PathBuf {
        dir.as_ref()
            .join(format!("{}.{}", Uuid::new_v4(), extension))
    }

    /// Probe a media file's container duration in seconds via ffprobe
    pub async fn probe_media_duration<P: AsRef<Path>>(path: P) -> Result<f64> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow!("Media file not found: {:?}", path));
        }

        let ffprobe_future = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_entries",
                "format=duration",
                path.to_str().unwrap_or(""),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(60);
        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("ffprobe command timed out after 60 seconds"));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed: {}", stderr);
            return Err(anyhow!("ffprobe command failed: {}", stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: Value = from_str(&stdout).context("Failed to parse ffprobe JSON output")?;

        let duration = json
            .get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|d| d.as_str())
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| anyhow!("ffprobe reported no duration for {:?}", path))?;

        Ok(duration)
    }

    /// Delete a temporary artifact, logging instead of failing.
    ///
    /// Cleanup runs after the request has already succeeded or failed on its
    /// own merits, so a deletion error is never escalated to the caller.
    pub fn remove_quietly<P: AsRef<Path>>(path: P) {
        let path = path.as_ref();
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                log::warn!("Failed to remove temporary file {:?}: {}", path, e);
            }
        }
    }
}

/// Enum representing the kind of visual source a file provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    /// Still image usable in a slideshow
    Image,
    /// Video file supported by ffmpeg
    Video,
    /// Unknown file type
    Unknown,
}
