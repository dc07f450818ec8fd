use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data::AnnotationTable;
use crate::slots::AnnotatorSlot;

/// How many rows each slot annotated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlotCoverage {
    /// Rows in the table.
    pub total_rows: usize,
    /// One entry per configured slot, in slot order.
    pub per_slot: Vec<SlotShare>,
}

/// Annotated-row count and share for one slot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlotShare {
    /// Measured slot.
    pub slot: AnnotatorSlot,
    /// Rows where the slot's cell is present.
    pub annotated: usize,
    /// `annotated / total_rows`, or 0 for an empty table.
    pub share: f64,
}

impl SlotCoverage {
    /// Entry for `slot`, if it was measured.
    pub fn get(&self, slot: &AnnotatorSlot) -> Option<&SlotShare> {
        self.per_slot.iter().find(|entry| &entry.slot == slot)
    }
}

/// Count annotated rows per configured slot, in slot order.
/// A row counts when the slot's cell parses as present.
pub fn slot_coverage(table: &AnnotationTable, config: &PipelineConfig) -> SlotCoverage {
    let parser = config.parser();
    let total_rows = table.len();
    let per_slot = config
        .slots()
        .into_iter()
        .map(|slot| {
            let column = slot.label_column();
            let annotated = table
                .samples()
                .iter()
                .filter(|sample| parser.parse_opt(sample.get(&column)).is_present())
                .count();
            let share = if total_rows == 0 {
                0.0
            } else {
                annotated as f64 / total_rows as f64
            };
            SlotShare {
                slot,
                annotated,
                share,
            }
        })
        .collect();
    SlotCoverage {
        total_rows,
        per_slot,
    }
}
