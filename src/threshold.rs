use crate::constants::labels::DEFAULT_HARD_THRESHOLD;
use crate::data::{HardLabel, SoftLabel};
use crate::label_space::BinaryLabelVector;

/// Elementwise inclusive threshold from soft to hard labels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HardLabelThresholder {
    threshold: f64,
}

impl Default for HardLabelThresholder {
    fn default() -> Self {
        Self::new(DEFAULT_HARD_THRESHOLD)
    }
}

impl HardLabelThresholder {
    /// Thresholder with a custom cut-off.
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Cut-off in use.
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Entry `k` is 1 iff `soft[k] >= threshold`; ties resolve to 1.
    pub fn apply(&self, soft: &SoftLabel) -> HardLabel {
        BinaryLabelVector::from_bits(
            soft.values()
                .iter()
                .map(|value| u8::from(*value >= self.threshold)),
        )
    }
}
