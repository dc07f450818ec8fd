#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Reliability-weighted aggregation of primary annotations.
pub mod aggregator;
/// Raw cell parsing into label sets.
pub mod annotation;
/// Pipeline configuration types.
pub mod config;
/// Centralized column names, slot prefixes, and label defaults.
pub mod constants;
/// Tables, samples, and per-stage outputs.
pub mod data;
/// Per-row slot parsing and binarization.
pub mod expander;
/// Label vocabulary and binarization.
pub mod label_space;
/// Annotation coverage helpers.
pub mod metrics;
/// Batch driver with per-sample failure collection.
pub mod pipeline;
/// Read-only reliability weights.
pub mod reliability;
/// Row selection and soft-label column checks.
pub mod selection;
/// Annotator slot naming and validation.
pub mod slots;
/// Soft to hard label thresholding.
pub mod threshold;
/// Shared type aliases.
pub mod types;

mod errors;

pub use aggregator::ReliabilityWeightedAggregator;
pub use annotation::{AnnotationParser, ParsedAnnotation};
pub use config::{MissingReliabilityPolicy, PipelineConfig};
pub use data::{
    AnnotationTable, Consensus, ExpandedSample, HardLabel, LabeledSample, Sample, SlotLabel,
    SoftLabel,
};
pub use errors::ConsensusError;
pub use expander::RowAnnotationExpander;
pub use label_space::{BinaryLabelVector, LabelSpace};
pub use pipeline::{
    ConsensusPipeline, ExpansionOutput, FailureReport, PipelineOutput, PipelineStage,
    SampleFailure,
};
pub use reliability::ReliabilityMap;
pub use selection::{columns_contain_prob_labels, is_prob_label, select_jointly_annotated};
pub use slots::{AnnotatorSlot, SlotKind, validate_slot_format};
pub use threshold::HardLabelThresholder;
pub use types::{ColumnName, LabelId, Reliability, RowId, SlotName};
