//! voxsplit - speaker-dependent dataset split planner
//!
//! Partitions a directory of per-speaker recordings into disjoint
//! train/val/test/speaker-independent splits by cumulative audio
//! duration, honouring the speaker reservations of an external reference
//! corpus, and optionally mirrors the result onto disk as a symlink
//! tree.

pub mod config;
pub mod error;
pub mod progress;
pub mod services;
pub mod types;

pub use crate::error::{Error, Result};

use crate::config::SplitConfig;
use crate::progress::LogProgress;
use crate::services::metadata_scanner::MetadataScanner;
use crate::services::split_planner::SplitPlanner;
use crate::services::tree_materializer::TreeMaterializer;
use crate::services::SymphoniaProbe;
use crate::types::{MetadataRecord, ReferenceSplitTable, SplitPlan};
use std::path::Path;

/// Counters for one completed run
#[derive(Debug, Clone, Copy)]
pub struct RunOutcome {
    /// Metadata records processed
    pub records: usize,
    /// Distinct speakers in the plan
    pub speakers: usize,
}

/// Execute the full pipeline: discover metadata, read records, plan the
/// split, and optionally materialize the symlink tree under `out_dir`.
pub fn run(
    config: &SplitConfig,
    data_dir: &Path,
    out_dir: &Path,
    ignore_cache: bool,
    materialize: bool,
) -> Result<RunOutcome> {
    std::fs::create_dir_all(out_dir)?;
    let cache_path = out_dir.join(".cache").join("metadata.json");

    tracing::info!("gathering the metadata list from {}", data_dir.display());
    let scanner = MetadataScanner::new(&config.metadata_extension);
    let metadata_paths = scanner.load_or_scan(data_dir, &cache_path, ignore_cache)?;
    tracing::info!("{} metadata files found", metadata_paths.len());

    let mut records = Vec::with_capacity(metadata_paths.len());
    for path in &metadata_paths {
        records.push(MetadataRecord::read(path, &config.audio_extension)?);
    }

    let reference = ReferenceSplitTable::load(&config.reference_table)?;
    let plan = plan_splits(config, &records, &reference)?;
    let bucketed: usize = plan.iter().map(|(_, b)| b.file_count()).sum();
    tracing::info!("planned {} files across {} speakers", bucketed, plan.len());

    if materialize {
        let materializer = TreeMaterializer::new(&config.metadata_extension);
        materializer.apply(&plan, data_dir, out_dir)?;
        tracing::info!("split tree materialized under {}", out_dir.display());
    }

    Ok(RunOutcome {
        records: records.len(),
        speakers: plan.len(),
    })
}

/// Plan the splits for already-loaded records, reporting progress
/// through the log.
pub fn plan_splits(
    config: &SplitConfig,
    records: &[MetadataRecord],
    reference: &ReferenceSplitTable,
) -> Result<SplitPlan> {
    let planner = SplitPlanner::new(SymphoniaProbe, config.thresholds());
    let mut progress = LogProgress::default();
    let plan = planner.compute(records, reference, &mut progress)?;
    Ok(plan)
}
