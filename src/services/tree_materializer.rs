//! Split-tree materialization
//!
//! Mirrors a finished plan onto disk: for every bucketed audio file, a
//! symlink under `dest/<category>/<relative path>` plus a sibling
//! metadata symlink. Reruns into a populated destination fail loudly
//! rather than silently overwrite an existing tree.

use crate::types::{SplitCategory, SplitPlan};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Materialization errors
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// A planned file does not live under the source root
    #[error("planned file {0} is outside the source root {1}")]
    OutsideRoot(PathBuf, PathBuf),

    /// Link creation failed; includes the already-exists case on rerun
    #[error("failed to link {dest}: {reason}")]
    Link { dest: PathBuf, reason: String },

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Split-tree materializer
pub struct TreeMaterializer {
    metadata_extension: String,
}

impl TreeMaterializer {
    pub fn new(metadata_extension: &str) -> Self {
        Self {
            metadata_extension: metadata_extension.to_string(),
        }
    }

    /// Lay the plan out under `dest_root`.
    ///
    /// Each audio file gets a symlink at
    /// `dest_root/<category>/<path relative to source_root>` and a second
    /// symlink beside it pointing at the sidecar metadata file. The
    /// `reference_train` bucket is never materialized. Existing
    /// destinations are an error, not a merge.
    pub fn apply(
        &self,
        plan: &SplitPlan,
        source_root: &Path,
        dest_root: &Path,
    ) -> Result<(), MaterializeError> {
        for (_, buckets) in plan.iter() {
            for category in SplitCategory::MATERIALIZED {
                let category_root = dest_root.join(category.dir_name());
                for audio_path in buckets.files(category) {
                    self.link_pair(audio_path, source_root, &category_root)?;
                }
            }
        }
        Ok(())
    }

    fn link_pair(
        &self,
        audio_path: &Path,
        source_root: &Path,
        category_root: &Path,
    ) -> Result<(), MaterializeError> {
        let relative = audio_path.strip_prefix(source_root).map_err(|_| {
            MaterializeError::OutsideRoot(audio_path.to_path_buf(), source_root.to_path_buf())
        })?;

        let dest = category_root.join(relative);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        link_file(audio_path, &dest)?;

        let meta_src = audio_path.with_extension(&self.metadata_extension);
        let meta_dest = dest.with_extension(&self.metadata_extension);
        link_file(&meta_src, &meta_dest)
    }
}

/// Create a symbolic link at `dest` resolving to `src`.
#[cfg(unix)]
fn link_file(src: &Path, dest: &Path) -> Result<(), MaterializeError> {
    std::os::unix::fs::symlink(src, dest).map_err(|e| MaterializeError::Link {
        dest: dest.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(windows)]
fn link_file(src: &Path, dest: &Path) -> Result<(), MaterializeError> {
    std::os::windows::fs::symlink_file(src, dest).map_err(|e| MaterializeError::Link {
        dest: dest.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn seed_source(source: &Path, rel_audio: &str) -> PathBuf {
        let audio = source.join(rel_audio);
        fs::create_dir_all(audio.parent().unwrap()).unwrap();
        fs::write(&audio, b"audio").unwrap();
        fs::write(audio.with_extension("json"), b"{\"speaker\": \"s1\"}").unwrap();
        audio
    }

    fn single_speaker_plan(audio: &Path) -> SplitPlan {
        let mut plan = SplitPlan::new();
        let buckets = plan.bucket_for("s1");
        buckets.cumulative_hours = 3.0;
        buckets.train.push(audio.to_path_buf());
        plan
    }

    #[test]
    fn test_apply_links_audio_and_metadata() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let audio = seed_source(source.path(), "s1/utt1.flac");

        let materializer = TreeMaterializer::new("json");
        materializer
            .apply(&single_speaker_plan(&audio), source.path(), dest.path())
            .unwrap();

        let linked_audio = dest.path().join("train").join("s1").join("utt1.flac");
        let linked_meta = dest.path().join("train").join("s1").join("utt1.json");
        assert_eq!(fs::read_link(&linked_audio).unwrap(), audio);
        assert_eq!(
            fs::read_link(&linked_meta).unwrap(),
            audio.with_extension("json")
        );
        // Links resolve to the source content.
        assert_eq!(fs::read(&linked_audio).unwrap(), b"audio");
    }

    #[test]
    fn test_second_apply_fails_on_existing_links() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let audio = seed_source(source.path(), "s1/utt1.flac");
        let plan = single_speaker_plan(&audio);

        let materializer = TreeMaterializer::new("json");
        materializer.apply(&plan, source.path(), dest.path()).unwrap();

        match materializer.apply(&plan, source.path(), dest.path()) {
            Err(MaterializeError::Link { dest: existing, .. }) => {
                assert!(existing.ends_with("train/s1/utt1.flac"));
            }
            other => panic!("expected Link error, got {other:?}"),
        }
    }

    #[test]
    fn test_reference_train_is_never_materialized() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let audio = seed_source(source.path(), "s1/utt1.flac");

        let mut plan = SplitPlan::new();
        plan.bucket_for("s1").reference_train.push(audio);

        let materializer = TreeMaterializer::new("json");
        materializer.apply(&plan, source.path(), dest.path()).unwrap();

        assert!(fs::read_dir(dest.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_file_outside_source_root_is_rejected() {
        let source = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let stray = seed_source(elsewhere.path(), "s1/utt1.flac");

        let materializer = TreeMaterializer::new("json");
        match materializer.apply(&single_speaker_plan(&stray), source.path(), dest.path()) {
            Err(MaterializeError::OutsideRoot(path, root)) => {
                assert_eq!(path, stray);
                assert_eq!(root, source.path());
            }
            other => panic!("expected OutsideRoot, got {other:?}"),
        }
    }

    #[test]
    fn test_all_user_facing_categories_get_directories() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        let mut plan = SplitPlan::new();
        for (speaker, rel, category) in [
            ("a", "a/t.flac", SplitCategory::Train),
            ("b", "b/v.flac", SplitCategory::Val),
            ("c", "c/e.flac", SplitCategory::Test),
            ("d", "d/i.flac", SplitCategory::SpeakerIndependent),
        ] {
            let audio = seed_source(source.path(), rel);
            let buckets = plan.bucket_for(speaker);
            match category {
                SplitCategory::Train => buckets.train.push(audio),
                SplitCategory::Val => buckets.val.push(audio),
                SplitCategory::Test => buckets.test.push(audio),
                SplitCategory::SpeakerIndependent => buckets.speaker_independent.push(audio),
                SplitCategory::ReferenceTrain => unreachable!(),
            }
        }

        let materializer = TreeMaterializer::new("json");
        materializer.apply(&plan, source.path(), dest.path()).unwrap();

        for dir in ["train/a/t.flac", "val/b/v.flac", "test/c/e.flac", "speaker_independent/d/i.flac"] {
            assert!(dest.path().join(dir).exists(), "missing {dir}");
        }
    }
}
