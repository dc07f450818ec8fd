use thiserror::Error;

use crate::types::{LabelId, Reliability, SlotName};

/// Error type for label-space, slot, reliability, and aggregation failures.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConsensusError {
    #[error("slot '{identifier}' must be in the form user_x or re_user_x, where x is some string")]
    InvalidSlotFormat { identifier: String },
    #[error("slot '{identifier}' must not have a '(re_)user_' prefix")]
    UnexpectedSlotPrefix { identifier: String },
    #[error("label '{label}' is not part of the label space")]
    UnknownLabel { label: LabelId },
    #[error("label '{label}' appears more than once in the label space")]
    DuplicateLabel { label: LabelId },
    #[error("label space must contain at least one label")]
    EmptyLabelSpace,
    #[error("no reliability weight registered for annotated slot '{slot}'")]
    MissingReliability { slot: SlotName },
    #[error("reliability weight for '{slot}' must be finite and non-negative, got {weight}")]
    InvalidReliability { slot: SlotName, weight: Reliability },
    #[error("sample has no present primary annotations to aggregate")]
    NoContributors,
    #[error("reliability weights of {contributors} contributing annotators sum to zero")]
    ZeroReliabilityMass { contributors: usize },
    #[error("label vector width mismatch: expected {expected}, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },
    #[error("configuration error: {0}")]
    Configuration(String),
}
