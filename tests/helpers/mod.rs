//! Shared fixtures for integration tests
#![allow(dead_code)]

pub mod audio_generator;

use std::fs;
use std::path::{Path, PathBuf};

/// Low sample rate keeps fixture files small; 900 s per quarter hour.
pub const SAMPLE_RATE: u32 = 50;

/// Frames per quarter hour of audio at [`SAMPLE_RATE`].
pub const QUARTER_HOUR_FRAMES: u32 = SAMPLE_RATE * 900;

/// Create one corpus clip: a WAV of `quarter_hours * 0.25` hours plus
/// its sidecar metadata file. `speaker` is spliced into the metadata
/// verbatim, so pass a JSON value (`"\"alice\""`, `"999"`, `"null"`).
pub fn add_clip(data_dir: &Path, rel_stem: &str, speaker: &str, quarter_hours: u32) -> PathBuf {
    let audio = data_dir.join(format!("{rel_stem}.wav"));
    fs::create_dir_all(audio.parent().unwrap()).unwrap();

    audio_generator::generate_test_wav(
        &audio,
        &audio_generator::AudioConfig {
            num_frames: quarter_hours * QUARTER_HOUR_FRAMES,
            sample_rate: SAMPLE_RATE,
        },
    )
    .unwrap();

    fs::write(
        data_dir.join(format!("{rel_stem}.json")),
        format!("{{\"speaker\": {speaker}}}"),
    )
    .unwrap();

    audio
}
