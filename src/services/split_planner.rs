//! Split planning
//!
//! Single streaming pass over per-speaker recordings using a
//! cumulative-duration watershed: the first `test_hours` of a speaker's
//! audio (arrival order) lands in the test bucket, the next `val_hours`
//! in val, everything after in train. Speakers claimed by the reference
//! corpus's train split are segregated wholesale; speakers that never
//! reach the train bucket are repaired into the speaker-independent
//! pool. A final validation pass enforces bucket exclusivity for every
//! speaker.

use crate::progress::ProgressObserver;
use crate::services::duration_probe::{DurationError, DurationSource};
use crate::types::{MetadataRecord, ReferenceSplitTable, SpeakerId, SplitPlan};
use std::path::PathBuf;
use thiserror::Error;

/// Planning errors. Both algorithmic failures are fatal: no retry, no
/// partial plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A locally seen speaker is reserved by the reference corpus's
    /// dev/test split; the corpora overlap and the input is unusable.
    #[error("speaker {speaker} appears in the reference {set} split; local data must not overlap it")]
    Precondition {
        speaker: SpeakerId,
        set: &'static str,
    },

    /// Bucket exclusivity failed after repair. Signals a bug in the
    /// planner itself, not bad input.
    #[error("split invariant violated for speaker {speaker}: {detail}")]
    Invariant { speaker: SpeakerId, detail: String },

    /// Duration lookup failure, propagated unchanged
    #[error(transparent)]
    Duration(#[from] DurationError),
}

/// Duration thresholds, in hours of audio per speaker.
#[derive(Debug, Clone, Copy)]
pub struct SplitThresholds {
    pub val_hours: f64,
    pub test_hours: f64,
}

impl Default for SplitThresholds {
    fn default() -> Self {
        Self {
            val_hours: 1.0,
            test_hours: 1.0,
        }
    }
}

/// Split planner
pub struct SplitPlanner<D> {
    durations: D,
    thresholds: SplitThresholds,
}

impl<D: DurationSource> SplitPlanner<D> {
    pub fn new(durations: D, thresholds: SplitThresholds) -> Self {
        Self {
            durations,
            thresholds,
        }
    }

    /// Compute the per-speaker split plan for `records`, in arrival
    /// order.
    pub fn compute(
        &self,
        records: &[MetadataRecord],
        reference: &ReferenceSplitTable,
        observer: &mut dyn ProgressObserver,
    ) -> Result<SplitPlan, PlanError> {
        self.check_preconditions(records, reference)?;

        let mut plan = self.bucket(records, reference, observer)?;
        self.repair(&mut plan, reference);
        self.validate(&plan, observer)?;

        Ok(plan)
    }

    /// The reference corpus reserves its dev/test speakers for its own
    /// evaluation; seeing one locally is a data-integrity failure, caught
    /// before any bucketing occurs.
    fn check_preconditions(
        &self,
        records: &[MetadataRecord],
        reference: &ReferenceSplitTable,
    ) -> Result<(), PlanError> {
        for record in records {
            if reference.dev.contains(&record.speaker_id) {
                return Err(PlanError::Precondition {
                    speaker: record.speaker_id.clone(),
                    set: "dev",
                });
            }
            if reference.test.contains(&record.speaker_id) {
                return Err(PlanError::Precondition {
                    speaker: record.speaker_id.clone(),
                    set: "test",
                });
            }
        }
        Ok(())
    }

    fn bucket(
        &self,
        records: &[MetadataRecord],
        reference: &ReferenceSplitTable,
        observer: &mut dyn ProgressObserver,
    ) -> Result<SplitPlan, PlanError> {
        let mut plan = SplitPlan::new();
        let total = records.len();

        for (index, record) in records.iter().enumerate() {
            let hours = self.durations.probe(&record.audio_path)?.hours();

            let buckets = plan.bucket_for(&record.speaker_id);
            buckets.cumulative_hours += hours;
            let time_so_far = buckets.cumulative_hours;

            if reference.train.contains(&record.speaker_id) {
                // A reference-train speaker's recordings never consult
                // the thresholds, whatever their duration.
                buckets.reference_train.push(record.audio_path.clone());
            } else if time_so_far < self.thresholds.test_hours {
                buckets.test.push(record.audio_path.clone());
            } else if time_so_far < self.thresholds.test_hours + self.thresholds.val_hours {
                buckets.val.push(record.audio_path.clone());
            } else {
                buckets.train.push(record.audio_path.clone());
            }

            observer.record_processed(index, total);
        }

        Ok(plan)
    }

    /// A speaker with no train-bucket data cannot be evaluated in a
    /// train/test-consistent way; all of that speaker's audio is
    /// reserved for the speaker-independent pool instead.
    fn repair(&self, plan: &mut SplitPlan, reference: &ReferenceSplitTable) {
        for (speaker, buckets) in plan.speakers_mut() {
            if buckets.train.is_empty() && !reference.train.contains(speaker) {
                let moved = buckets.test.len() + buckets.val.len();
                if moved > 0 {
                    tracing::debug!(
                        speaker = %speaker,
                        files = moved,
                        "insufficient data for a speaker-dependent split"
                    );
                }
                // Test files accumulated before val files, so draining
                // test first preserves arrival order.
                buckets.speaker_independent.append(&mut buckets.test);
                buckets.speaker_independent.append(&mut buckets.val);
            }
        }
    }

    /// Pure verification: every speaker must land in exactly one of the
    /// three cases (reference-train, speaker-independent, ordinary
    /// speaker-dependent). Ordinary speakers are reported through the
    /// observer.
    fn validate(
        &self,
        plan: &SplitPlan,
        observer: &mut dyn ProgressObserver,
    ) -> Result<(), PlanError> {
        for (speaker, buckets) in plan.iter() {
            if !buckets.reference_train.is_empty() {
                ensure_empty(
                    speaker,
                    "reference-train",
                    &[
                        ("train", &buckets.train),
                        ("val", &buckets.val),
                        ("test", &buckets.test),
                        ("speaker_independent", &buckets.speaker_independent),
                    ],
                )?;
            } else if !buckets.speaker_independent.is_empty() {
                ensure_empty(
                    speaker,
                    "speaker-independent",
                    &[
                        ("train", &buckets.train),
                        ("val", &buckets.val),
                        ("test", &buckets.test),
                    ],
                )?;
            } else {
                observer.speaker_validated(speaker, buckets.cumulative_hours);
            }
        }
        Ok(())
    }
}

fn ensure_empty(
    speaker: &SpeakerId,
    case: &str,
    lists: &[(&str, &Vec<PathBuf>)],
) -> Result<(), PlanError> {
    for (name, list) in lists {
        if !list.is_empty() {
            return Err(PlanError::Invariant {
                speaker: speaker.clone(),
                detail: format!(
                    "{case} speaker also holds {} file(s) in {name}",
                    list.len()
                ),
            });
        }
    }
    Ok(())
}
