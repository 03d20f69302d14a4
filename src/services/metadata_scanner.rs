//! Metadata file discovery
//!
//! Recursive discovery of sidecar metadata files with a deterministic
//! walk order, plus a JSON cache of the discovered list so repeat runs
//! skip the traversal.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Metadata discovery errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Cache list cannot be serialized
    #[error("cache error: {0}")]
    Cache(#[from] serde_json::Error),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Metadata file scanner
pub struct MetadataScanner {
    metadata_extension: String,
    ignore_patterns: Vec<String>,
}

impl MetadataScanner {
    /// Create a scanner for files with `metadata_extension` (no leading
    /// dot). Ignores system noise like .git and the tool's own cache
    /// directory.
    pub fn new(metadata_extension: &str) -> Self {
        Self {
            metadata_extension: metadata_extension.to_string(),
            ignore_patterns: vec![
                ".DS_Store".to_string(),
                ".git".to_string(),
                ".svn".to_string(),
                ".cache".to_string(),
            ],
        }
    }

    /// Walk `root` and return every metadata file.
    ///
    /// The walk is sorted by file name at every level so the sequence is
    /// identical across runs; downstream bucketing depends on arrival
    /// order.
    pub fn scan(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root.exists() {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut files = Vec::new();
        let mut symlink_visited = HashSet::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, &mut symlink_visited));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.is_metadata_file(entry.path()) {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("error accessing entry: {}", e);
                    // Continue scanning, don't abort
                }
            }
        }

        tracing::debug!(
            "{} metadata files discovered under {}",
            files.len(),
            root.display()
        );

        Ok(files)
    }

    /// Return the cached list when present and trusted, otherwise rescan
    /// and rewrite the cache.
    ///
    /// A corrupt or unreadable cache is treated as a miss; the cache is
    /// derived data and a rescan reproduces it.
    pub fn load_or_scan(
        &self,
        root: &Path,
        cache_path: &Path,
        ignore_cache: bool,
    ) -> Result<Vec<PathBuf>, ScanError> {
        if !ignore_cache {
            if let Some(cached) = read_cache(cache_path) {
                tracing::info!(
                    "loaded {} metadata paths from cache {}",
                    cached.len(),
                    cache_path.display()
                );
                return Ok(cached);
            }
        }

        let files = self.scan(root)?;
        write_cache(cache_path, &files)?;
        Ok(files)
    }

    /// Check if entry should be processed
    fn should_process_entry(
        &self,
        entry: &DirEntry,
        symlink_visited: &mut HashSet<PathBuf>,
    ) -> bool {
        let file_name = entry.file_name().to_string_lossy();

        for pattern in &self.ignore_patterns {
            if file_name.contains(pattern.as_str()) {
                return false;
            }
        }

        // Detect symlink loops
        if entry.file_type().is_symlink() {
            if let Ok(canonical) = entry.path().canonicalize() {
                if !symlink_visited.insert(canonical) {
                    tracing::warn!("symlink loop detected: {}", entry.path().display());
                    return false;
                }
            }
        }

        true
    }

    fn is_metadata_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                ext.to_string_lossy()
                    .eq_ignore_ascii_case(&self.metadata_extension)
            })
            .unwrap_or(false)
    }
}

fn read_cache(cache_path: &Path) -> Option<Vec<PathBuf>> {
    let bytes = std::fs::read(cache_path).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(files) => Some(files),
        Err(e) => {
            tracing::warn!(
                "discarding unreadable metadata cache {}: {}",
                cache_path.display(),
                e
            );
            None
        }
    }
}

fn write_cache(cache_path: &Path, files: &[PathBuf]) -> Result<(), ScanError> {
    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec(files)?;
    std::fs::write(cache_path, json)?;
    Ok(())
}
