use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationParser;
use crate::constants::labels::{DEFAULT_DELIMITER, DEFAULT_HARD_THRESHOLD};
use crate::errors::ConsensusError;
use crate::slots::{AnnotatorSlot, annotator_slots, primary_slots};

/// What the aggregator does with a present annotation whose slot has no
/// reliability weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReliabilityPolicy {
    /// Fail the sample with `ConsensusError::MissingReliability`.
    #[default]
    Fail,
    /// Leave the slot out of both the weighted sum and the contributor count.
    Skip,
}

/// Top-level pipeline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of annotators; slots `user_1..=user_N` (and `re_user_*`) are read.
    pub num_annotators: usize,
    /// Delimiter between label tokens inside a cell.
    pub delimiter: char,
    /// Inclusive threshold turning soft-label entries into hard-label ones.
    pub hard_threshold: f64,
    /// Response to annotated slots without a reliability weight.
    pub missing_reliability: MissingReliabilityPolicy,
    /// Expand `re_user_i` columns alongside the primary ones.
    ///
    /// Re-annotations are never weighted into the consensus; they are only
    /// binarized for downstream agreement estimation.
    pub include_reannotations: bool,
    /// Process rows on the rayon thread pool.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_annotators: 1,
            delimiter: DEFAULT_DELIMITER,
            hard_threshold: DEFAULT_HARD_THRESHOLD,
            missing_reliability: MissingReliabilityPolicy::Fail,
            include_reannotations: true,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    /// Configuration for `num_annotators` annotators with default settings.
    pub fn with_annotators(num_annotators: usize) -> Self {
        Self {
            num_annotators,
            ..Self::default()
        }
    }

    /// Validate counts and threshold range.
    pub fn validated(self) -> Result<Self, ConsensusError> {
        if self.num_annotators == 0 {
            return Err(ConsensusError::Configuration(
                "num_annotators must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.hard_threshold) {
            return Err(ConsensusError::Configuration(format!(
                "hard_threshold must lie in [0, 1], got {}",
                self.hard_threshold
            )));
        }
        if self.delimiter.is_whitespace() {
            return Err(ConsensusError::Configuration(
                "delimiter must not be whitespace".to_string(),
            ));
        }
        Ok(self)
    }

    /// Parser using the configured delimiter.
    pub fn parser(&self) -> AnnotationParser {
        AnnotationParser::new(self.delimiter)
    }

    /// Every slot the expander reads, in output column order.
    pub fn slots(&self) -> Vec<AnnotatorSlot> {
        annotator_slots(self.num_annotators, self.include_reannotations)
    }

    /// Slots weighted into the consensus.
    pub fn primary_slots(&self) -> Vec<AnnotatorSlot> {
        primary_slots(self.num_annotators)
    }
}
