//! Run configuration

use crate::services::split_planner::SplitThresholds;
use std::path::PathBuf;

/// Settings for one planning run.
///
/// Defaults mirror the production deployment: FLAC audio with JSON
/// sidecar metadata, one hour each of test and validation audio per
/// speaker, reference table in the working directory.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Audio file extension, without the leading dot
    pub audio_extension: String,
    /// Sidecar metadata file extension, without the leading dot
    pub metadata_extension: String,
    /// Hours of audio reserved per speaker for the validation bucket
    pub val_hours: f64,
    /// Hours of audio reserved per speaker for the test bucket
    pub test_hours: f64,
    /// Path to the reference corpus split table
    pub reference_table: PathBuf,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            audio_extension: "flac".to_string(),
            metadata_extension: "json".to_string(),
            val_hours: 1.0,
            test_hours: 1.0,
            reference_table: PathBuf::from("speakers.json"),
        }
    }
}

impl SplitConfig {
    pub fn thresholds(&self) -> SplitThresholds {
        SplitThresholds {
            val_hours: self.val_hours,
            test_hours: self.test_hours,
        }
    }
}
