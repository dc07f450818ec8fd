use serde_json::{Value, json};

use annotation_consensus::{
    AnnotationTable, AnnotatorSlot, ConsensusPipeline, LabelSpace, MissingReliabilityPolicy,
    PipelineConfig, ReliabilityMap, SlotLabel,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn abc() -> LabelSpace {
    LabelSpace::new(["A", "B", "C"]).unwrap()
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
    }
}

#[test]
fn absent_second_annotator_keeps_full_consensus() {
    init_tracing();
    let space = abc();
    let reliability = ReliabilityMap::new([("user_1", 0.8), ("user_2", 0.6)]).unwrap();
    let pipeline =
        ConsensusPipeline::new(&space, &reliability, PipelineConfig::with_annotators(2)).unwrap();
    let table = AnnotationTable::from_json_rows([json!({
        "user_1_label": "A,B",
        "user_2_label": "",
    })]);

    let output = pipeline.run(&table);
    assert!(output.report.is_empty(), "{}", output.report);
    let labeled = &output.samples[0];

    assert_eq!(
        labeled.expanded.slot_label(&AnnotatorSlot::primary(1)).to_value(),
        json!([1, 1, 0])
    );
    assert_eq!(
        labeled.expanded.slot_label(&AnnotatorSlot::primary(2)),
        &SlotLabel::Missing
    );
    assert_close(labeled.soft_label().values(), &[1.0, 1.0, 0.0]);
    assert!((labeled.sample_weight() - 0.8).abs() < 1e-9);
    assert_eq!(labeled.hard_label.as_slice(), &[1, 1, 0]);
}

#[test]
fn split_vote_resolves_boundary_to_one() {
    let space = abc();
    let reliability = ReliabilityMap::new([("user_1", 0.5), ("user_2", 0.5)]).unwrap();
    let pipeline =
        ConsensusPipeline::new(&space, &reliability, PipelineConfig::with_annotators(2)).unwrap();
    let table = AnnotationTable::from_json_rows([json!({
        "user_1_label": "A",
        "user_2_label": "B",
    })]);

    let output = pipeline.run(&table);
    let labeled = &output.samples[0];
    assert_close(labeled.soft_label().values(), &[0.5, 0.5, 0.0]);
    assert!((labeled.sample_weight() - 0.5).abs() < 1e-9);
    assert_eq!(labeled.hard_label.as_slice(), &[1, 1, 0]);
}

#[test]
fn duplicate_tokens_with_spacing_binarize_once() {
    let space = abc();
    let reliability = ReliabilityMap::new([("user_1", 1.0)]).unwrap();
    let pipeline =
        ConsensusPipeline::new(&space, &reliability, PipelineConfig::with_annotators(1)).unwrap();
    let table = AnnotationTable::from_json_rows([json!({"user_1_label": "A, A, B"})]);

    let row = pipeline.run(&table).to_table().into_samples().remove(0);
    assert_eq!(row.get("user_1_bin_label"), Some(&json!([1, 1, 0])));
}

#[test]
fn output_table_follows_column_contract() {
    let space = abc();
    let reliability = ReliabilityMap::new([("user_1", 0.9), ("user_2", 0.3)]).unwrap();
    let pipeline =
        ConsensusPipeline::new(&space, &reliability, PipelineConfig::with_annotators(2)).unwrap();
    let table = AnnotationTable::from_json_rows([json!({
        "id": "row-1",
        "text": "some sample",
        "user_1_label": "C",
        "user_2_label": "A,C",
        "re_user_1_label": "B",
        "gold": "C",
    })]);

    let output = pipeline.run(&table).to_table();
    let row = &output.samples()[0];
    let columns: Vec<&str> = row.cells().keys().map(String::as_str).collect();
    assert_eq!(
        columns,
        vec![
            "id",
            "text",
            "user_1_label",
            "user_2_label",
            "re_user_1_label",
            "gold",
            "user_1_bin_label",
            "re_user_1_bin_label",
            "user_2_bin_label",
            "re_user_2_bin_label",
            "soft_label",
            "sample_weight",
            "hard_label",
        ]
    );
    assert_eq!(row.get("text"), Some(&json!("some sample")));
    assert_eq!(row.get("user_1_label"), Some(&json!("C")));
    assert_eq!(row.get("gold"), Some(&json!([0, 0, 1])));
    assert_eq!(row.get("re_user_1_bin_label"), Some(&json!([0, 1, 0])));
    assert_eq!(row.get("re_user_2_bin_label"), Some(&Value::Null));
    assert_eq!(row.get("hard_label"), Some(&json!([0, 0, 1])));

    let soft: Vec<f64> = row
        .get("soft_label")
        .and_then(Value::as_array)
        .unwrap()
        .iter()
        .map(|value| value.as_f64().unwrap())
        .collect();
    assert_close(&soft, &[0.25, 0.0, 1.0]);
    let weight = row.get("sample_weight").and_then(Value::as_f64).unwrap();
    assert!((weight - 0.6).abs() < 1e-9);
}

#[test]
fn skip_policy_labels_rows_with_unweighted_annotators() {
    init_tracing();
    let space = abc();
    let reliability = ReliabilityMap::new([("user_1", 0.4)]).unwrap();
    let table = AnnotationTable::from_json_rows([json!({
        "id": 7,
        "user_1_label": "B",
        "user_2_label": "A",
    })]);

    let strict =
        ConsensusPipeline::new(&space, &reliability, PipelineConfig::with_annotators(2)).unwrap();
    let strict_output = strict.run(&table);
    assert!(strict_output.samples.is_empty());
    assert_eq!(strict_output.report.failures[0].row_id.as_deref(), Some("7"));

    let lenient = ConsensusPipeline::new(
        &space,
        &reliability,
        PipelineConfig {
            missing_reliability: MissingReliabilityPolicy::Skip,
            ..PipelineConfig::with_annotators(2)
        },
    )
    .unwrap();
    let lenient_output = lenient.run(&table);
    assert!(lenient_output.report.is_empty());
    assert_eq!(lenient_output.samples[0].hard_label.as_slice(), &[0, 1, 0]);
}

#[test]
fn primary_only_config_ignores_reannotation_columns() {
    let space = abc();
    let reliability = ReliabilityMap::new([("user_1", 1.0)]).unwrap();
    let pipeline = ConsensusPipeline::new(
        &space,
        &reliability,
        PipelineConfig {
            include_reannotations: false,
            ..PipelineConfig::with_annotators(1)
        },
    )
    .unwrap();
    let table = AnnotationTable::from_json_rows([json!({
        "user_1_label": "A",
        "re_user_1_label": "not-a-label",
    })]);

    let output = pipeline.run(&table);
    assert!(output.report.is_empty());
    let row = output.to_table().into_samples().remove(0);
    assert!(!row.contains("re_user_1_bin_label"));
}
