use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::columns::{GOLD, HARD_LABEL, ROW_ID, SAMPLE_WEIGHT, SOFT_LABEL};
use crate::label_space::BinaryLabelVector;
use crate::slots::AnnotatorSlot;
use crate::types::{ColumnName, Reliability, RowId};

/// Thresholded consensus vector.
pub type HardLabel = BinaryLabelVector;

static MISSING: SlotLabel = SlotLabel::Missing;

/// One table row: ordered column name to cell value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample {
    cells: IndexMap<ColumnName, Value>,
}

impl Sample {
    /// Empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style cell insertion.
    pub fn with(mut self, column: impl Into<ColumnName>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a cell, keeping the column's position if it already exists.
    pub fn insert(&mut self, column: impl Into<ColumnName>, value: impl Into<Value>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Cell value for `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    /// True when the row has `column`, even if the cell is `null`.
    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// Columns and values in insertion order.
    pub fn cells(&self) -> &IndexMap<ColumnName, Value> {
        &self.cells
    }

    /// Row identifier from the `id` column, when it is a string or number.
    pub fn row_id(&self) -> Option<RowId> {
        match self.cells.get(ROW_ID)? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Sample {
    fn from(value: Map<String, Value>) -> Self {
        Self {
            cells: value.into_iter().collect(),
        }
    }
}

impl<K: Into<ColumnName>, V: Into<Value>> FromIterator<(K, V)> for Sample {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        }
    }
}

/// Ordered collection of samples sharing one column convention.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationTable {
    samples: Vec<Sample>,
}

impl AnnotationTable {
    /// Table from rows in order.
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Table from JSON objects; any non-object row becomes an empty sample.
    pub fn from_json_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let samples = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => Sample::from(map),
                _ => Sample::new(),
            })
            .collect();
        Self { samples }
    }

    /// Rows in order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append a row.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Rows in order, consuming the table.
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl FromIterator<Sample> for AnnotationTable {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// Binarized annotation of one slot, or the marker for "did not annotate".
///
/// `Present` with an all-zero vector means the annotator selected no label,
/// which is different from `Missing`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotLabel {
    /// Binarized selection; may be all zeros.
    Present(BinaryLabelVector),
    /// The slot's cell was absent or blank.
    Missing,
}

impl SlotLabel {
    /// True for `Present`, including empty selections.
    pub fn is_present(&self) -> bool {
        matches!(self, SlotLabel::Present(_))
    }

    /// The binary vector, when present.
    pub fn vector(&self) -> Option<&BinaryLabelVector> {
        match self {
            SlotLabel::Present(vector) => Some(vector),
            SlotLabel::Missing => None,
        }
    }

    /// Cell rendering: the 0/1 array, or `null` when missing.
    pub fn to_value(&self) -> Value {
        match self {
            SlotLabel::Present(vector) => bits_to_value(vector),
            SlotLabel::Missing => Value::Null,
        }
    }
}

/// Reliability-weighted consensus vector with entries in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoftLabel(Vec<f64>);

impl SoftLabel {
    /// Build a soft label, clipping every entry into `[0, 1]`.
    pub fn clipped<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self(values.into_iter().map(|value| value.clamp(0.0, 1.0)).collect())
    }

    /// Entries in label-space order.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-width label space.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cell rendering as a JSON array of floats.
    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().map(|value| Value::from(*value)).collect())
    }
}

/// Output of the reliability-weighted aggregation for one sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Consensus {
    /// Weighted mean of the present primary annotations.
    pub soft_label: SoftLabel,
    /// Mean reliability of the contributing annotators.
    pub sample_weight: Reliability,
    /// Number of primary slots that contributed.
    pub contributors: usize,
}

/// A sample after every slot has been parsed and binarized.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedSample {
    /// Position of the row in the input table.
    pub row_index: usize,
    /// Untouched input row.
    pub sample: Sample,
    /// Binarized label per slot, in slot order.
    pub bin_labels: IndexMap<AnnotatorSlot, SlotLabel>,
    /// Binarized gold column, when the row has one.
    pub gold: Option<SlotLabel>,
}

impl ExpandedSample {
    /// Binarized label for `slot`; slots that were not expanded are missing.
    pub fn slot_label(&self, slot: &AnnotatorSlot) -> &SlotLabel {
        self.bin_labels.get(slot).unwrap_or(&MISSING)
    }

    /// Present primary-slot vectors, in slot order.
    pub fn present_primary(&self) -> impl Iterator<Item = (&AnnotatorSlot, &BinaryLabelVector)> {
        self.bin_labels
            .iter()
            .filter(|(slot, _)| slot.is_primary())
            .filter_map(|(slot, label)| label.vector().map(|vector| (slot, vector)))
    }
}

/// A fully labelled sample: expansion, consensus, and hard label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledSample {
    /// Row with its binarized slots.
    pub expanded: ExpandedSample,
    /// Soft label and sample weight.
    pub consensus: Consensus,
    /// Thresholded soft label.
    pub hard_label: HardLabel,
}

impl LabeledSample {
    /// Position of the row in the input table.
    pub fn row_index(&self) -> usize {
        self.expanded.row_index
    }

    /// Consensus soft label.
    pub fn soft_label(&self) -> &SoftLabel {
        &self.consensus.soft_label
    }

    /// Mean reliability of the contributing annotators.
    pub fn sample_weight(&self) -> Reliability {
        self.consensus.sample_weight
    }

    /// Render the row with the pipeline's output columns.
    ///
    /// Input columns keep their order and values, except `gold`, which is
    /// rebound to its binary vector. New columns follow in this order:
    /// `{slot}_bin_label` per slot, `soft_label`, `sample_weight`,
    /// `hard_label`.
    pub fn to_row(&self) -> Sample {
        let mut row = self.expanded.sample.clone();
        for (slot, label) in &self.expanded.bin_labels {
            row.insert(slot.bin_label_column(), label.to_value());
        }
        if let Some(gold) = &self.expanded.gold {
            row.insert(GOLD, gold.to_value());
        }
        row.insert(SOFT_LABEL, self.consensus.soft_label.to_value());
        row.insert(SAMPLE_WEIGHT, self.consensus.sample_weight);
        row.insert(HARD_LABEL, bits_to_value(&self.hard_label));
        row
    }
}

fn bits_to_value(vector: &BinaryLabelVector) -> Value {
    Value::Array(
        vector
            .as_slice()
            .iter()
            .map(|bit| Value::from(*bit))
            .collect(),
    )
}
