//! Crate-level error type

use thiserror::Error;

/// Result type for the split pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the split pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Metadata discovery error
    #[error("scan error: {0}")]
    Scan(#[from] crate::services::metadata_scanner::ScanError),

    /// Metadata or reference-table parsing error
    #[error("metadata error: {0}")]
    Metadata(#[from] crate::types::MetadataError),

    /// Planning error (precondition, invariant, or duration lookup)
    #[error("planning error: {0}")]
    Plan(#[from] crate::services::split_planner::PlanError),

    /// Symlink-tree materialization error
    #[error("materialization error: {0}")]
    Materialize(#[from] crate::services::tree_materializer::MaterializeError),

    /// I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
