use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app_config::SubtitleConfig;
use crate::timing::WordSpan;

// @module: Word-span clustering into subtitle cues and SRT serialization

// @struct: Single on-screen subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    // @field: Sequence number, 1-based
    pub seq_num: usize,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Words shown on screen, joined by single spaces
    pub text: String,
}

impl SubtitleCue {
    pub fn new(seq_num: usize, start: f64, end: f64, text: String) -> Self {
        SubtitleCue {
            seq_num,
            start,
            end,
            text,
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end)
    }

    /// Format a timestamp in seconds to SRT format (HH:MM:SS,mmm).
    ///
    /// The millisecond component is truncated, not rounded.
    pub fn format_timestamp(seconds: f64) -> String {
        let total_ms = (seconds.max(0.0) * 1000.0) as u64;

        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let millis = total_ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered collection of cues for one narration
#[derive(Debug, Default)]
pub struct CueSheet {
    /// List of cues, ordered, non-overlapping
    pub cues: Vec<SubtitleCue>,
}

impl CueSheet {
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Serialize all cues as one SRT document
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for cue in &self.cues {
            // Display renders one full SRT block including the separator line
            out.push_str(&cue.to_string());
        }
        out
    }

    /// Write cues to an SRT file, UTF-8 encoded
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for cue in &self.cues {
            write!(file, "{}", cue)?;
        }

        Ok(path.to_path_buf())
    }
}

/// Groups word spans into cues under display constraints.
///
/// Short, quickly spoken words are merged into one cue; a long or slowly
/// spoken word stands alone. The two knobs are the word-count cap and the
/// minimum cluster span, both from configuration.
pub struct CueBuilder {
    max_words_per_cue: usize,
    min_cluster_span: f64,
}

// In-progress group of words being merged before it is flushed
struct Cluster {
    text: String,
    start: f64,
    end: f64,
    word_count: usize,
}

impl Cluster {
    fn open(span: &WordSpan) -> Self {
        Cluster {
            text: span.word.clone(),
            start: span.start,
            end: span.end,
            word_count: 1,
        }
    }

    fn absorb(&mut self, span: &WordSpan) {
        self.text.push(' ');
        self.text.push_str(&span.word);
        self.end = span.end;
        self.word_count += 1;
    }

    fn into_cue(self, seq_num: usize) -> SubtitleCue {
        SubtitleCue::new(seq_num, self.start, self.end, self.text)
    }
}

impl CueBuilder {
    pub fn new(config: &SubtitleConfig) -> Self {
        CueBuilder {
            max_words_per_cue: config.max_words_per_cue,
            min_cluster_span: config.min_cluster_span,
        }
    }

    /// Greedy forward clustering over the word spans.
    ///
    /// A word joins the open cluster only while the cluster's total span,
    /// measured from the cluster's own start, stays under the minimum span
    /// and the word-count cap is not reached. Any word failing the test
    /// flushes the cluster and opens a new one, so no word is ever dropped.
    /// An empty span sequence yields an empty sheet.
    pub fn build(&self, spans: &[WordSpan]) -> CueSheet {
        let mut cues: Vec<SubtitleCue> = Vec::new();
        let mut open: Option<Cluster> = None;

        for span in spans {
            let merged = match open.as_mut() {
                Some(cluster)
                    if span.end - cluster.start < self.min_cluster_span
                        && cluster.word_count < self.max_words_per_cue =>
                {
                    cluster.absorb(span);
                    true
                }
                _ => false,
            };

            if !merged {
                if let Some(cluster) = open.take() {
                    cues.push(cluster.into_cue(cues.len() + 1));
                }
                open = Some(Cluster::open(span));
            }
        }

        if let Some(cluster) = open {
            cues.push(cluster.into_cue(cues.len() + 1));
        }

        CueSheet { cues }
    }
}
