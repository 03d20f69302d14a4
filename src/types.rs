//! Core types for split planning
//!
//! Per-file metadata records, the external reference-corpus split table,
//! and the per-speaker bucket accumulators that make up a finished plan.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Canonical speaker identifier.
///
/// Reference tables and metadata files variously encode speakers as JSON
/// strings or integers; everything is normalized to this one string form
/// at the parse boundary.
pub type SpeakerId = String;

/// Sentinel identifier pooling all recordings whose metadata carries no
/// speaker.
pub const NULL_SPEAKER: &str = "null";

/// Metadata parsing errors
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Cannot read a metadata or reference-table file
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, String),

    /// File exists but is not the expected JSON shape
    #[error("invalid JSON in {0}: {1}")]
    Parse(PathBuf, String),
}

/// Speaker field as found on disk.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpeakerValue {
    Text(String),
    Number(i64),
}

impl SpeakerValue {
    fn canonicalize(self) -> SpeakerId {
        match self {
            SpeakerValue::Text(s) => s,
            SpeakerValue::Number(n) => n.to_string(),
        }
    }
}

/// Raw shape of a per-record metadata file. Only `speaker` matters here.
#[derive(Debug, Deserialize)]
struct RawMetadata {
    speaker: Option<SpeakerValue>,
}

/// One audio file's descriptor, built from its sidecar metadata file.
///
/// The audio path is derived by swapping the metadata extension for the
/// configured audio extension. Immutable once read; duration is never
/// stored here, it is resolved through the duration collaborator.
#[derive(Debug, Clone)]
pub struct MetadataRecord {
    pub speaker_id: SpeakerId,
    pub metadata_path: PathBuf,
    pub audio_path: PathBuf,
}

impl MetadataRecord {
    /// Read one metadata JSON file. A missing or null `speaker` field is
    /// normalized to [`NULL_SPEAKER`].
    pub fn read(metadata_path: &Path, audio_extension: &str) -> Result<Self, MetadataError> {
        let bytes = std::fs::read(metadata_path)
            .map_err(|e| MetadataError::Read(metadata_path.to_path_buf(), e.to_string()))?;
        let raw: RawMetadata = serde_json::from_slice(&bytes)
            .map_err(|e| MetadataError::Parse(metadata_path.to_path_buf(), e.to_string()))?;

        let speaker_id = raw
            .speaker
            .map(SpeakerValue::canonicalize)
            .unwrap_or_else(|| NULL_SPEAKER.to_string());

        Ok(Self {
            speaker_id,
            metadata_path: metadata_path.to_path_buf(),
            audio_path: metadata_path.with_extension(audio_extension),
        })
    }
}

/// Speaker partition of the external reference corpus.
///
/// Speakers in `dev` or `test` must never appear locally; speakers in
/// `train` are segregated wholesale into the `reference_train` bucket.
#[derive(Debug, Default, Deserialize)]
pub struct ReferenceSplitTable {
    #[serde(deserialize_with = "speaker_set")]
    pub train: HashSet<SpeakerId>,
    #[serde(deserialize_with = "speaker_set")]
    pub dev: HashSet<SpeakerId>,
    #[serde(deserialize_with = "speaker_set")]
    pub test: HashSet<SpeakerId>,
}

fn speaker_set<'de, D>(deserializer: D) -> Result<HashSet<SpeakerId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values = Vec::<SpeakerValue>::deserialize(deserializer)?;
    Ok(values.into_iter().map(SpeakerValue::canonicalize).collect())
}

impl ReferenceSplitTable {
    /// Load the table from a JSON file with `train`/`dev`/`test` keys.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let bytes = std::fs::read(path)
            .map_err(|e| MetadataError::Read(path.to_path_buf(), e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| MetadataError::Parse(path.to_path_buf(), e.to_string()))
    }
}

/// The five buckets a file can land in.
///
/// Only the first four are user-facing; `reference_train` is never
/// materialized to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitCategory {
    Train,
    Val,
    Test,
    SpeakerIndependent,
    ReferenceTrain,
}

impl SplitCategory {
    /// Categories that become directories under the output root.
    pub const MATERIALIZED: [SplitCategory; 4] = [
        SplitCategory::Train,
        SplitCategory::Val,
        SplitCategory::Test,
        SplitCategory::SpeakerIndependent,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            SplitCategory::Train => "train",
            SplitCategory::Val => "val",
            SplitCategory::Test => "test",
            SplitCategory::SpeakerIndependent => "speaker_independent",
            SplitCategory::ReferenceTrain => "reference_train",
        }
    }
}

impl fmt::Display for SplitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Per-speaker accumulator: running duration total plus the bucketed
/// audio paths, each list in arrival order.
///
/// Created on first sighting of a speaker, mutated only during the
/// planning and repair passes, then read-only.
#[derive(Debug, Clone, Default)]
pub struct SpeakerBuckets {
    /// Total hours of audio seen for this speaker so far.
    pub cumulative_hours: f64,
    pub train: Vec<PathBuf>,
    pub val: Vec<PathBuf>,
    pub test: Vec<PathBuf>,
    pub speaker_independent: Vec<PathBuf>,
    pub reference_train: Vec<PathBuf>,
}

impl SpeakerBuckets {
    pub fn files(&self, category: SplitCategory) -> &[PathBuf] {
        match category {
            SplitCategory::Train => &self.train,
            SplitCategory::Val => &self.val,
            SplitCategory::Test => &self.test,
            SplitCategory::SpeakerIndependent => &self.speaker_independent,
            SplitCategory::ReferenceTrain => &self.reference_train,
        }
    }

    /// Number of bucketed files across all categories.
    pub fn file_count(&self) -> usize {
        self.train.len()
            + self.val.len()
            + self.test.len()
            + self.speaker_independent.len()
            + self.reference_train.len()
    }
}

/// Finalized mapping from speaker to buckets.
///
/// Keyed on speaker id in a `BTreeMap` so validation logs and
/// materialization order are stable across runs.
#[derive(Debug, Default)]
pub struct SplitPlan {
    speakers: BTreeMap<SpeakerId, SpeakerBuckets>,
}

impl SplitPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator for `speaker`, created on first lookup miss.
    pub(crate) fn bucket_for(&mut self, speaker: &str) -> &mut SpeakerBuckets {
        self.speakers.entry(speaker.to_owned()).or_default()
    }

    pub(crate) fn speakers_mut(
        &mut self,
    ) -> impl Iterator<Item = (&SpeakerId, &mut SpeakerBuckets)> {
        self.speakers.iter_mut()
    }

    pub fn get(&self, speaker: &str) -> Option<&SpeakerBuckets> {
        self.speakers.get(speaker)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpeakerId, &SpeakerBuckets)> {
        self.speakers.iter()
    }

    /// Number of distinct speakers in the plan.
    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}
