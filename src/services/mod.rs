//! Domain services: discovery, duration lookup, planning, materialization

pub mod duration_probe;
pub mod metadata_scanner;
pub mod split_planner;
pub mod tree_materializer;

pub use duration_probe::{AudioInfo, DurationError, DurationSource, SymphoniaProbe};
pub use metadata_scanner::{MetadataScanner, ScanError};
pub use split_planner::{PlanError, SplitPlanner, SplitThresholds};
pub use tree_materializer::{MaterializeError, TreeMaterializer};
