use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::ConsensusError;
use crate::slots::AnnotatorSlot;
use crate::types::Reliability;

/// Read-only per-annotator reliability weights, keyed by primary slot.
///
/// Weights are produced by an agreement estimator outside this crate.
/// Construction rejects re-annotation keys and negative or non-finite
/// weights, so every stored weight can be used directly as a mass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<String, Reliability>",
    into = "HashMap<String, Reliability>"
)]
pub struct ReliabilityMap {
    weights: HashMap<AnnotatorSlot, Reliability>,
}

impl ReliabilityMap {
    /// Build a map from `(slot identifier, weight)` pairs.
    ///
    /// A later entry for the same slot replaces an earlier one.
    pub fn new<I, K>(entries: I) -> Result<Self, ConsensusError>
    where
        I: IntoIterator<Item = (K, Reliability)>,
        K: AsRef<str>,
    {
        let mut weights = HashMap::new();
        for (identifier, weight) in entries.into_iter() {
            let slot = AnnotatorSlot::parse(identifier.as_ref())?;
            if !slot.is_primary() {
                return Err(ConsensusError::Configuration(format!(
                    "reliability weights are keyed by primary slots, got '{slot}'"
                )));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConsensusError::InvalidReliability {
                    slot: slot.name(),
                    weight,
                });
            }
            weights.insert(slot, weight);
        }
        Ok(Self { weights })
    }

    /// Weight registered for `slot`.
    pub fn get(&self, slot: &AnnotatorSlot) -> Option<Reliability> {
        self.weights.get(slot).copied()
    }

    /// Number of registered slots.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when no weights are registered.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate over `(slot, weight)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&AnnotatorSlot, Reliability)> + '_ {
        self.weights.iter().map(|(slot, weight)| (slot, *weight))
    }
}

impl TryFrom<HashMap<String, Reliability>> for ReliabilityMap {
    type Error = ConsensusError;

    fn try_from(value: HashMap<String, Reliability>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReliabilityMap> for HashMap<String, Reliability> {
    fn from(value: ReliabilityMap) -> Self {
        value
            .weights
            .into_iter()
            .map(|(slot, weight)| (slot.name(), weight))
            .collect()
    }
}
