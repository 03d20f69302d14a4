//! Audio duration lookup
//!
//! Reads the frame count and sample rate of an audio file's default
//! track through symphonia's format probe, without decoding any packets.
//! Duration in hours is `num_frames / (sample_rate * 3600)`.

use std::fs::File;
use std::path::{Path, PathBuf};
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

/// Duration lookup errors. All fatal upstream: a file whose length
/// cannot be determined aborts the run.
#[derive(Debug, Error)]
pub enum DurationError {
    /// Cannot open the audio file
    #[error("failed to open audio file {0}: {1}")]
    Open(PathBuf, String),

    /// Unreadable or unrecognized audio container
    #[error("failed to probe audio file {0}: {1}")]
    Probe(PathBuf, String),

    /// File probed but contains no audio track
    #[error("no audio track in {0}")]
    NoTrack(PathBuf),

    /// Track parameters lack a frame count or sample rate
    #[error("cannot determine duration of {0}: {1}")]
    UnknownDuration(PathBuf, &'static str),
}

/// Frame count and sample rate of one audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioInfo {
    pub num_frames: u64,
    pub sample_rate: u32,
}

impl AudioInfo {
    /// Duration in hours.
    pub fn hours(&self) -> f64 {
        self.num_frames as f64 / (self.sample_rate as f64 * 3600.0)
    }
}

/// Duration lookup collaborator for the planner.
pub trait DurationSource {
    fn probe(&self, audio_path: &Path) -> Result<AudioInfo, DurationError>;
}

/// Symphonia-backed probe used in production.
pub struct SymphoniaProbe;

impl DurationSource for SymphoniaProbe {
    fn probe(&self, audio_path: &Path) -> Result<AudioInfo, DurationError> {
        let file = File::open(audio_path)
            .map_err(|e| DurationError::Open(audio_path.to_path_buf(), e.to_string()))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = audio_path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DurationError::Probe(audio_path.to_path_buf(), e.to_string()))?;

        let format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| DurationError::NoTrack(audio_path.to_path_buf()))?;

        let num_frames = track.codec_params.n_frames.ok_or_else(|| {
            DurationError::UnknownDuration(audio_path.to_path_buf(), "frame count unknown")
        })?;
        let sample_rate = track.codec_params.sample_rate.ok_or_else(|| {
            DurationError::UnknownDuration(audio_path.to_path_buf(), "sample rate unknown")
        })?;

        tracing::trace!(
            path = %audio_path.display(),
            num_frames,
            sample_rate,
            "probed audio duration"
        );

        Ok(AudioInfo {
            num_frames,
            sample_rate,
        })
    }
}
