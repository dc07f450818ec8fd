use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::ConsensusError;
use crate::types::LabelId;

/// Fixed, ordered vocabulary of labels.
///
/// The position of a label in the space is its index in every vector the
/// pipeline produces, so a space is built once and shared read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSpace {
    labels: Vec<LabelId>,
    index: HashMap<LabelId, usize>,
}

impl LabelSpace {
    /// Build a label space from an ordered, duplicate-free list of labels.
    pub fn new<I, L>(labels: I) -> Result<Self, ConsensusError>
    where
        I: IntoIterator<Item = L>,
        L: Into<LabelId>,
    {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();
        for label in labels.into_iter() {
            let label = label.into();
            if index.contains_key(&label) {
                return Err(ConsensusError::DuplicateLabel { label });
            }
            index.insert(label.clone(), ordered.len());
            ordered.push(label);
        }
        if ordered.is_empty() {
            return Err(ConsensusError::EmptyLabelSpace);
        }
        Ok(Self {
            labels: ordered,
            index,
        })
    }

    /// Number of labels, which is also the width of every label vector.
    pub fn width(&self) -> usize {
        self.labels.len()
    }

    /// Labels in index order.
    pub fn labels(&self) -> &[LabelId] {
        &self.labels
    }

    /// Index of `label`, if it belongs to the space.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Label stored at `index`.
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Map a set of labels to a 0/1 vector over this space.
    ///
    /// Order and repetition of the input have no effect. Every label must
    /// belong to the space; the first unknown one is reported.
    pub fn binarize<I, S>(&self, labels: I) -> Result<BinaryLabelVector, ConsensusError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bits = vec![0_u8; self.width()];
        for label in labels.into_iter() {
            let label = label.as_ref();
            let idx = self
                .index_of(label)
                .ok_or_else(|| ConsensusError::UnknownLabel {
                    label: label.to_string(),
                })?;
            bits[idx] = 1;
        }
        Ok(BinaryLabelVector(bits))
    }

    /// Labels whose entry is set in `vector`, in index order.
    pub fn decode<'a>(&'a self, vector: &BinaryLabelVector) -> Vec<&'a str> {
        vector
            .ones()
            .filter_map(|idx| self.label_at(idx))
            .collect()
    }
}

/// Fixed-width vector of 0/1 entries, one per label-space index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinaryLabelVector(Vec<u8>);

impl BinaryLabelVector {
    /// Build a vector from raw entries; any non-zero entry is stored as 1.
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        Self(bits.into_iter().map(|bit| u8::from(bit != 0)).collect())
    }

    /// Vector width.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the vector has zero width.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw entries.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of set entries.
    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|bit| **bit == 1).count()
    }

    /// Indices of the set entries, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit == 1)
            .map(|(idx, _)| idx)
    }
}

impl AsRef<[u8]> for BinaryLabelVector {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> LabelSpace {
        LabelSpace::new(["A", "B", "C"]).unwrap()
    }

    #[test]
    fn label_space_assigns_indices_in_order() {
        let space = abc();
        assert_eq!(space.width(), 3);
        assert_eq!(space.index_of("A"), Some(0));
        assert_eq!(space.index_of("C"), Some(2));
        assert_eq!(space.index_of("D"), None);
        assert_eq!(space.label_at(1), Some("B"));
        assert_eq!(space.label_at(3), None);
    }

    #[test]
    fn label_space_rejects_duplicates_and_empty_input() {
        assert_eq!(
            LabelSpace::new(["A", "B", "A"]),
            Err(ConsensusError::DuplicateLabel {
                label: "A".to_string()
            })
        );
        assert_eq!(
            LabelSpace::new(Vec::<String>::new()),
            Err(ConsensusError::EmptyLabelSpace)
        );
    }

    #[test]
    fn binarize_ignores_order_and_repetition() {
        let space = abc();
        let forward = space.binarize(["A", "B"]).unwrap();
        let reversed = space.binarize(["B", "A", "B"]).unwrap();
        assert_eq!(forward.as_slice(), &[1, 1, 0]);
        assert_eq!(forward, reversed);
        assert_eq!(forward.count_ones(), 2);
    }

    #[test]
    fn binarize_empty_set_is_a_zero_vector() {
        let space = abc();
        let empty = space.binarize(Vec::<&str>::new()).unwrap();
        assert_eq!(empty.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn binarize_rejects_unknown_labels() {
        let space = abc();
        assert_eq!(
            space.binarize(["A", "Z"]),
            Err(ConsensusError::UnknownLabel {
                label: "Z".to_string()
            })
        );
    }

    #[test]
    fn decode_returns_labels_in_index_order() {
        let space = abc();
        let vector = space.binarize(["C", "A"]).unwrap();
        assert_eq!(space.decode(&vector), vec!["A", "C"]);
        assert_eq!(vector.ones().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn from_bits_normalizes_non_zero_entries() {
        let vector = BinaryLabelVector::from_bits([0, 3, 1]);
        assert_eq!(vector.as_slice(), &[0, 1, 1]);
        assert_eq!(vector.len(), 3);
        assert!(!vector.is_empty());
    }
}
