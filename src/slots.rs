use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::constants::columns::{BIN_LABEL_SUFFIX, LABEL_SUFFIX};
use crate::constants::slots::{PRIMARY_PREFIX, REANNOTATION_PREFIX, SLOT_PATTERN};
use crate::errors::ConsensusError;
use crate::types::{ColumnName, SlotName};

static SLOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLOT_PATTERN).expect("slot pattern is a valid regex"));

/// Whether a slot holds a first-pass judgment or a re-annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotKind {
    /// First-pass judgment (`user_x`); weighted into the consensus.
    Primary,
    /// Repeat judgment by the same annotator (`re_user_x`).
    Reannotation,
}

/// One annotation source for a sample, such as `user_2` or `re_user_2`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnnotatorSlot {
    kind: SlotKind,
    suffix: String,
}

impl AnnotatorSlot {
    /// Primary slot `user_{index}`.
    pub fn primary(index: usize) -> Self {
        Self {
            kind: SlotKind::Primary,
            suffix: index.to_string(),
        }
    }

    /// Re-annotation slot `re_user_{index}`.
    pub fn reannotation(index: usize) -> Self {
        Self {
            kind: SlotKind::Reannotation,
            suffix: index.to_string(),
        }
    }

    /// Parse and validate a slot identifier.
    pub fn parse(identifier: &str) -> Result<Self, ConsensusError> {
        validate_slot_format(identifier, true)?;
        let (kind, suffix) = match identifier.strip_prefix(REANNOTATION_PREFIX) {
            Some(suffix) => (SlotKind::Reannotation, suffix),
            None => (
                SlotKind::Primary,
                identifier
                    .strip_prefix(PRIMARY_PREFIX)
                    .unwrap_or(identifier),
            ),
        };
        Ok(Self {
            kind,
            suffix: suffix.to_string(),
        })
    }

    /// Slot kind.
    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// True for `user_x` slots.
    pub fn is_primary(&self) -> bool {
        self.kind == SlotKind::Primary
    }

    /// Annotator suffix (`x` in `user_x`).
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The primary slot of the same annotator.
    pub fn primary_counterpart(&self) -> Self {
        Self {
            kind: SlotKind::Primary,
            suffix: self.suffix.clone(),
        }
    }

    /// Full identifier, e.g. `re_user_3`.
    pub fn name(&self) -> SlotName {
        self.to_string()
    }

    /// Raw annotation column, e.g. `user_3_label`.
    pub fn label_column(&self) -> ColumnName {
        format!("{self}{LABEL_SUFFIX}")
    }

    /// Binarized annotation column, e.g. `user_3_bin_label`.
    pub fn bin_label_column(&self) -> ColumnName {
        format!("{self}{BIN_LABEL_SUFFIX}")
    }
}

impl fmt::Display for AnnotatorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            SlotKind::Primary => PRIMARY_PREFIX,
            SlotKind::Reannotation => REANNOTATION_PREFIX,
        };
        write!(f, "{prefix}{}", self.suffix)
    }
}

impl FromStr for AnnotatorSlot {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AnnotatorSlot {
    type Error = ConsensusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AnnotatorSlot> for String {
    fn from(value: AnnotatorSlot) -> Self {
        value.to_string()
    }
}

/// Check an identifier against the `(re_)?user_x` naming convention.
///
/// With `expect_prefixed` the identifier must carry the prefix; without it
/// the identifier must not (bare annotator names).
pub fn validate_slot_format(identifier: &str, expect_prefixed: bool) -> Result<(), ConsensusError> {
    let matched = SLOT_RE.is_match(identifier);
    match (expect_prefixed, matched) {
        (true, false) => Err(ConsensusError::InvalidSlotFormat {
            identifier: identifier.to_string(),
        }),
        (false, true) => Err(ConsensusError::UnexpectedSlotPrefix {
            identifier: identifier.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Slots for `num_annotators` annotators, interleaved as
/// `user_1, re_user_1, user_2, re_user_2, ...`.
pub fn annotator_slots(num_annotators: usize, include_reannotations: bool) -> Vec<AnnotatorSlot> {
    let mut slots = Vec::with_capacity(num_annotators * 2);
    for idx in 1..=num_annotators {
        slots.push(AnnotatorSlot::primary(idx));
        if include_reannotations {
            slots.push(AnnotatorSlot::reannotation(idx));
        }
    }
    slots
}

/// Primary slots `user_1..=user_{num_annotators}`.
pub fn primary_slots(num_annotators: usize) -> Vec<AnnotatorSlot> {
    (1..=num_annotators).map(AnnotatorSlot::primary).collect()
}
