use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::aggregator::ReliabilityWeightedAggregator;
use crate::config::PipelineConfig;
use crate::data::{AnnotationTable, ExpandedSample, LabeledSample, Sample};
use crate::errors::ConsensusError;
use crate::expander::RowAnnotationExpander;
use crate::label_space::LabelSpace;
use crate::reliability::ReliabilityMap;
use crate::threshold::HardLabelThresholder;
use crate::types::RowId;

/// Pipeline stage at which a sample failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Parsing and binarizing annotator slots.
    Expand,
    /// Reliability-weighted aggregation.
    Aggregate,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Expand => f.write_str("expand"),
            PipelineStage::Aggregate => f.write_str("aggregate"),
        }
    }
}

/// One sample that could not be labelled.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampleFailure {
    /// Position of the row in the input table.
    pub row_index: usize,
    /// Value of the row's `id` column, if any.
    pub row_id: Option<RowId>,
    /// Stage that rejected the row.
    pub stage: PipelineStage,
    /// Cause of the failure.
    #[serde(serialize_with = "serialize_error")]
    pub error: ConsensusError,
}

impl fmt::Display for SampleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}", self.row_index)?;
        if let Some(id) = &self.row_id {
            write!(f, " ('{id}')")?;
        }
        write!(f, " failed during {}: {}", self.stage, self.error)
    }
}

fn serialize_error<S>(error: &ConsensusError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(error)
}

/// Failures gathered over one pipeline run, in row order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FailureReport {
    /// Rows seen by the run.
    pub total_rows: usize,
    /// Failed rows, ascending by `row_index`.
    pub failures: Vec<SampleFailure>,
}

impl FailureReport {
    /// True when every row succeeded.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of failed rows.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Failures that happened at `stage`.
    pub fn at_stage(&self, stage: PipelineStage) -> impl Iterator<Item = &SampleFailure> {
        self.failures
            .iter()
            .filter(move |failure| failure.stage == stage)
    }

    /// `Err` with the first failure when the run was not clean.
    pub fn into_result(self) -> Result<(), SampleFailure> {
        match self.failures.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(()),
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} of {} samples failed",
            self.failures.len(),
            self.total_rows
        )?;
        for failure in &self.failures {
            writeln!(f, "  {failure}")?;
        }
        Ok(())
    }
}

/// Labelled samples plus the failures of one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineOutput {
    /// Successfully labelled samples, in input order.
    pub samples: Vec<LabeledSample>,
    /// Rows that could not be labelled.
    pub report: FailureReport,
}

impl PipelineOutput {
    /// Rows with the output columns, in input order; failed rows are left out.
    pub fn to_table(&self) -> AnnotationTable {
        self.samples.iter().map(LabeledSample::to_row).collect()
    }
}

/// Expansion results of a whole table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpansionOutput {
    /// Expanded rows, in input order.
    pub samples: Vec<ExpandedSample>,
    /// Rows that failed expansion.
    pub report: FailureReport,
}

/// Runs expansion, aggregation, and thresholding over a table.
///
/// The label space and reliability map are borrowed read-only for the
/// lifetime of the pipeline; rows are processed independently and, when
/// `PipelineConfig::parallel` is set, on the rayon pool.
#[derive(Clone, Debug)]
pub struct ConsensusPipeline<'a> {
    config: PipelineConfig,
    expander: RowAnnotationExpander<'a>,
    aggregator: ReliabilityWeightedAggregator<'a>,
    thresholder: HardLabelThresholder,
}

impl<'a> ConsensusPipeline<'a> {
    /// Build a pipeline, validating `config` first.
    pub fn new(
        space: &'a LabelSpace,
        reliability: &'a ReliabilityMap,
        config: PipelineConfig,
    ) -> Result<Self, ConsensusError> {
        let config = config.validated()?;
        Ok(Self {
            expander: RowAnnotationExpander::from_config(space, &config),
            aggregator: ReliabilityWeightedAggregator::from_config(
                reliability,
                space.width(),
                &config,
            ),
            thresholder: HardLabelThresholder::new(config.hard_threshold),
            config,
        })
    }

    /// Validated configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage for one row.
    pub fn label_sample(
        &self,
        row_index: usize,
        sample: &Sample,
    ) -> Result<LabeledSample, SampleFailure> {
        let expanded = self
            .expander
            .expand(row_index, sample)
            .map_err(|error| failure(row_index, sample, PipelineStage::Expand, error))?;
        let consensus = self
            .aggregator
            .aggregate(&expanded)
            .map_err(|error| failure(row_index, sample, PipelineStage::Aggregate, error))?;
        let hard_label = self.thresholder.apply(&consensus.soft_label);
        Ok(LabeledSample {
            expanded,
            consensus,
            hard_label,
        })
    }

    /// Expand every row without aggregating.
    pub fn expand(&self, table: &AnnotationTable) -> ExpansionOutput {
        let results = self.map_rows(table, |row_index, sample| {
            self.expander
                .expand(row_index, sample)
                .map_err(|error| failure(row_index, sample, PipelineStage::Expand, error))
        });
        let (samples, report) = split_results(table.len(), results);
        ExpansionOutput { samples, report }
    }

    /// Label every row, collecting per-row failures instead of stopping.
    pub fn run(&self, table: &AnnotationTable) -> PipelineOutput {
        let results =
            self.map_rows(table, |row_index, sample| self.label_sample(row_index, sample));
        let (samples, report) = split_results(table.len(), results);

        info!(
            rows = report.total_rows,
            labelled = samples.len(),
            failed = report.len(),
            "consensus labelling finished"
        );
        if !report.is_empty() {
            warn!(failed = report.len(), "some samples could not be labelled");
        }

        PipelineOutput { samples, report }
    }

    fn map_rows<T, F>(&self, table: &AnnotationTable, f: F) -> Vec<Result<T, SampleFailure>>
    where
        T: Send,
        F: Fn(usize, &Sample) -> Result<T, SampleFailure> + Sync,
    {
        if self.config.parallel {
            table
                .samples()
                .par_iter()
                .enumerate()
                .map(|(row_index, sample)| f(row_index, sample))
                .collect()
        } else {
            table
                .samples()
                .iter()
                .enumerate()
                .map(|(row_index, sample)| f(row_index, sample))
                .collect()
        }
    }
}

fn failure(
    row_index: usize,
    sample: &Sample,
    stage: PipelineStage,
    error: ConsensusError,
) -> SampleFailure {
    debug!(row_index, %stage, %error, "sample failed");
    SampleFailure {
        row_index,
        row_id: sample.row_id(),
        stage,
        error,
    }
}

fn split_results<T>(
    total_rows: usize,
    results: Vec<Result<T, SampleFailure>>,
) -> (Vec<T>, FailureReport) {
    let mut samples = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(sample) => samples.push(sample),
            Err(failure) => failures.push(failure),
        }
    }
    (
        samples,
        FailureReport {
            total_rows,
            failures,
        },
    )
}
