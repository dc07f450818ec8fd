//! Table helpers shared with reliability estimators.

use serde_json::Value;

use crate::annotation::AnnotationParser;
use crate::data::{AnnotationTable, Sample};
use crate::errors::ConsensusError;
use crate::slots::AnnotatorSlot;

/// Rows annotated by both `slot_x` and `slot_y`, in input order.
///
/// Both identifiers are validated first. A slot counts as annotated when its
/// `{slot}_label` cell parses as present.
pub fn select_jointly_annotated(
    table: &AnnotationTable,
    slot_x: &str,
    slot_y: &str,
    parser: &AnnotationParser,
) -> Result<AnnotationTable, ConsensusError> {
    let slot_x = AnnotatorSlot::parse(slot_x)?;
    let slot_y = AnnotatorSlot::parse(slot_y)?;
    let column_x = slot_x.label_column();
    let column_y = slot_y.label_column();
    Ok(table
        .samples()
        .iter()
        .filter(|sample| {
            is_annotated(sample, &column_x, parser) && is_annotated(sample, &column_y, parser)
        })
        .cloned()
        .collect())
}

fn is_annotated(sample: &Sample, column: &str, parser: &AnnotationParser) -> bool {
    parser.parse_opt(sample.get(column)).is_present()
}

/// True when `value` is a numeric array of exactly `width` entries.
pub fn is_prob_label(value: &Value, width: usize) -> bool {
    match value {
        Value::Array(entries) => entries.len() == width && entries.iter().all(Value::is_number),
        _ => false,
    }
}

/// True when every row holds a `width`-wide numeric vector in both columns.
pub fn columns_contain_prob_labels(
    table: &AnnotationTable,
    column_a: &str,
    column_b: &str,
    width: usize,
) -> bool {
    table.samples().iter().all(|sample| {
        [column_a, column_b].iter().all(|column| {
            sample
                .get(column)
                .is_some_and(|value| is_prob_label(value, width))
        })
    })
}
