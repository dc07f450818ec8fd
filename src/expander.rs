use indexmap::IndexMap;
use tracing::debug;

use crate::annotation::{AnnotationParser, ParsedAnnotation};
use crate::config::PipelineConfig;
use crate::constants::columns::GOLD;
use crate::data::{ExpandedSample, Sample, SlotLabel};
use crate::errors::ConsensusError;
use crate::label_space::LabelSpace;
use crate::slots::AnnotatorSlot;

/// Parses and binarizes every annotator slot of a row.
///
/// Expansion is additive: the input row is kept as-is and one `SlotLabel`
/// is recorded per configured slot. Rows are independent of each other.
#[derive(Clone, Debug)]
pub struct RowAnnotationExpander<'a> {
    space: &'a LabelSpace,
    parser: AnnotationParser,
    slots: Vec<AnnotatorSlot>,
}

impl<'a> RowAnnotationExpander<'a> {
    /// Expander over explicit slots.
    pub fn new(
        space: &'a LabelSpace,
        parser: AnnotationParser,
        slots: Vec<AnnotatorSlot>,
    ) -> Self {
        Self {
            space,
            parser,
            slots,
        }
    }

    /// Expander reading the slots and delimiter of `config`.
    pub fn from_config(space: &'a LabelSpace, config: &PipelineConfig) -> Self {
        Self::new(space, config.parser(), config.slots())
    }

    /// Slots read from each row, in output order.
    pub fn slots(&self) -> &[AnnotatorSlot] {
        &self.slots
    }

    /// Binarize one parsed annotation; `Absent` becomes the missing marker.
    pub fn binarize(&self, parsed: &ParsedAnnotation) -> Result<SlotLabel, ConsensusError> {
        match parsed {
            ParsedAnnotation::Present(labels) => {
                Ok(SlotLabel::Present(self.space.binarize(labels)?))
            }
            ParsedAnnotation::Absent => Ok(SlotLabel::Missing),
        }
    }

    /// Expand one row.
    ///
    /// A slot whose column is absent from the row is recorded as missing.
    /// Any token outside the label space fails the whole row.
    pub fn expand(
        &self,
        row_index: usize,
        sample: &Sample,
    ) -> Result<ExpandedSample, ConsensusError> {
        let mut bin_labels = IndexMap::with_capacity(self.slots.len());
        for slot in &self.slots {
            let parsed = self.parser.parse_opt(sample.get(&slot.label_column()));
            let label = self.binarize(&parsed).inspect_err(|err| {
                debug!(row_index, slot = %slot, error = %err, "slot binarization failed");
            })?;
            bin_labels.insert(slot.clone(), label);
        }

        let gold = if sample.contains(GOLD) {
            let parsed = self.parser.parse_opt(sample.get(GOLD));
            Some(self.binarize(&parsed)?)
        } else {
            None
        };

        Ok(ExpandedSample {
            row_index,
            sample: sample.clone(),
            bin_labels,
            gold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label_space::BinaryLabelVector;
    use serde_json::Value;

    fn abc() -> LabelSpace {
        LabelSpace::new(["A", "B", "C"]).unwrap()
    }

    fn expander(space: &LabelSpace, annotators: usize) -> RowAnnotationExpander<'_> {
        RowAnnotationExpander::from_config(space, &PipelineConfig::with_annotators(annotators))
    }

    fn bits(raw: [u8; 3]) -> SlotLabel {
        SlotLabel::Present(BinaryLabelVector::from_bits(raw))
    }

    #[test]
    fn expand_binarizes_every_slot() {
        let space = abc();
        let expander = expander(&space, 2);
        let row = Sample::new()
            .with("user_1_label", "A,B")
            .with("user_2_label", "")
            .with("re_user_1_label", "C");

        let expanded = expander.expand(3, &row).unwrap();
        assert_eq!(expanded.row_index, 3);
        assert_eq!(expanded.sample, row);
        assert_eq!(expanded.bin_labels.len(), 4);
        assert_eq!(expanded.slot_label(&AnnotatorSlot::primary(1)), &bits([1, 1, 0]));
        assert_eq!(expanded.slot_label(&AnnotatorSlot::primary(2)), &SlotLabel::Missing);
        assert_eq!(expanded.slot_label(&AnnotatorSlot::reannotation(1)), &bits([0, 0, 1]));
        assert_eq!(expanded.slot_label(&AnnotatorSlot::reannotation(2)), &SlotLabel::Missing);
        assert!(expanded.gold.is_none());
    }

    #[test]
    fn duplicate_tokens_and_spacing_have_no_effect() {
        let space = abc();
        let expander = expander(&space, 1);
        let row = Sample::new().with("user_1_label", "A, A, B");
        let expanded = expander.expand(0, &row).unwrap();
        assert_eq!(expanded.slot_label(&AnnotatorSlot::primary(1)), &bits([1, 1, 0]));
    }

    #[test]
    fn gold_is_binarized_when_column_exists() {
        let space = abc();
        let expander = expander(&space, 1);
        let with_gold = Sample::new().with("user_1_label", "A").with("gold", "C, B");
        let expanded = expander.expand(0, &with_gold).unwrap();
        assert_eq!(expanded.gold, Some(bits([0, 1, 1])));

        let null_gold = Sample::new().with("user_1_label", "A").with("gold", Value::Null);
        let expanded = expander.expand(1, &null_gold).unwrap();
        assert_eq!(expanded.gold, Some(SlotLabel::Missing));
    }

    #[test]
    fn unknown_tokens_fail_the_row() {
        let space = abc();
        let expander = expander(&space, 1);
        let row = Sample::new().with("user_1_label", "A,Z");
        assert_eq!(
            expander.expand(0, &row),
            Err(ConsensusError::UnknownLabel {
                label: "Z".to_string()
            })
        );
        let bad_gold = Sample::new().with("user_1_label", "A").with("gold", "Q");
        assert!(expander.expand(0, &bad_gold).is_err());
    }

    #[test]
    fn empty_selection_is_present_zero_vector() {
        let space = abc();
        let expander = expander(&space, 1);
        let row = Sample::new().with("user_1_label", ",");
        let expanded = expander.expand(0, &row).unwrap();
        assert_eq!(expanded.slot_label(&AnnotatorSlot::primary(1)), &bits([0, 0, 0]));
    }
}
