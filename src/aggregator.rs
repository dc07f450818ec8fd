use tracing::debug;

use crate::config::{MissingReliabilityPolicy, PipelineConfig};
use crate::data::{Consensus, ExpandedSample, SoftLabel};
use crate::errors::ConsensusError;
use crate::label_space::BinaryLabelVector;
use crate::reliability::ReliabilityMap;
use crate::types::Reliability;

/// Combines the primary annotations of a sample into a soft label.
///
/// Each present primary vector is scaled by its annotator's reliability and
/// the sum is divided by the total reliability of the annotators that were
/// actually present, so unanswered slots lower the sample weight without
/// pulling the soft label toward zero. Re-annotation slots are ignored.
#[derive(Clone, Debug)]
pub struct ReliabilityWeightedAggregator<'a> {
    reliability: &'a ReliabilityMap,
    width: usize,
    missing_reliability: MissingReliabilityPolicy,
}

impl<'a> ReliabilityWeightedAggregator<'a> {
    /// Aggregator for vectors of `width` entries.
    pub fn new(
        reliability: &'a ReliabilityMap,
        width: usize,
        missing_reliability: MissingReliabilityPolicy,
    ) -> Self {
        Self {
            reliability,
            width,
            missing_reliability,
        }
    }

    /// Aggregator using the policy from `config`.
    pub fn from_config(
        reliability: &'a ReliabilityMap,
        width: usize,
        config: &PipelineConfig,
    ) -> Self {
        Self::new(reliability, width, config.missing_reliability)
    }

    /// Soft label and sample weight for one expanded sample.
    ///
    /// Weights are scaled by the largest contributing weight before they are
    /// summed, so any finite weights keep the soft label in `[0, 1]`.
    pub fn aggregate(&self, sample: &ExpandedSample) -> Result<Consensus, ConsensusError> {
        let mut contributions: Vec<(Reliability, &BinaryLabelVector)> = Vec::new();

        for (slot, vector) in sample.present_primary() {
            if vector.len() != self.width {
                return Err(ConsensusError::WidthMismatch {
                    expected: self.width,
                    actual: vector.len(),
                });
            }
            let weight = match self.reliability.get(slot) {
                Some(weight) => weight,
                None => match self.missing_reliability {
                    MissingReliabilityPolicy::Fail => {
                        return Err(ConsensusError::MissingReliability { slot: slot.name() });
                    }
                    MissingReliabilityPolicy::Skip => {
                        debug!(
                            row_index = sample.row_index,
                            slot = %slot,
                            "skipping slot without reliability weight"
                        );
                        continue;
                    }
                },
            };
            contributions.push((weight, vector));
        }

        let contributors = contributions.len();
        if contributors == 0 {
            return Err(ConsensusError::NoContributors);
        }
        let max_weight = contributions
            .iter()
            .map(|(weight, _)| *weight)
            .fold(0.0_f64, f64::max);
        if max_weight <= 0.0 {
            return Err(ConsensusError::ZeroReliabilityMass { contributors });
        }

        let mut accumulator = vec![0.0_f64; self.width];
        let mut scaled_sum = 0.0_f64;
        for (weight, vector) in &contributions {
            let scaled = weight / max_weight;
            scaled_sum += scaled;
            for (acc, bit) in accumulator.iter_mut().zip(vector.as_slice()) {
                *acc += scaled * f64::from(*bit);
            }
        }

        Ok(Consensus {
            soft_label: SoftLabel::clipped(accumulator.into_iter().map(|acc| acc / scaled_sum)),
            sample_weight: max_weight * (scaled_sum / contributors as f64),
            contributors,
        })
    }
}
