//! Parsing of raw annotation cells into label sets.

use serde_json::Value;
use std::collections::BTreeSet;

use crate::constants::labels::DEFAULT_DELIMITER;
use crate::types::LabelId;

/// Outcome of parsing one annotation cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedAnnotation {
    /// The annotator labelled the sample; the set may be empty.
    Present(BTreeSet<LabelId>),
    /// The annotator did not label the sample.
    Absent,
}

impl ParsedAnnotation {
    /// True for `Present`, including an empty selection.
    pub fn is_present(&self) -> bool {
        matches!(self, ParsedAnnotation::Present(_))
    }

    /// Borrow the label set when present.
    pub fn labels(&self) -> Option<&BTreeSet<LabelId>> {
        match self {
            ParsedAnnotation::Present(labels) => Some(labels),
            ParsedAnnotation::Absent => None,
        }
    }
}

/// Splits delimited annotation strings into label sets.
///
/// Parsing is total: any cell that is not a non-blank string is `Absent`,
/// and tokens are never validated here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnnotationParser {
    delimiter: char,
}

impl Default for AnnotationParser {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl AnnotationParser {
    /// Create a parser splitting on `delimiter`.
    pub const fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Delimiter used between label tokens.
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parse a table cell.
    pub fn parse(&self, raw: &Value) -> ParsedAnnotation {
        match raw {
            Value::String(text) => self.parse_str(text),
            _ => ParsedAnnotation::Absent,
        }
    }

    /// Parse an optional cell, treating a missing column like `null`.
    pub fn parse_opt(&self, raw: Option<&Value>) -> ParsedAnnotation {
        raw.map_or(ParsedAnnotation::Absent, |value| self.parse(value))
    }

    /// Parse a delimited string such as `"A, B"`.
    ///
    /// Tokens are trimmed and blank tokens (from `"A,,B"` or a trailing
    /// delimiter) are dropped.
    pub fn parse_str(&self, text: &str) -> ParsedAnnotation {
        if text.trim().is_empty() {
            return ParsedAnnotation::Absent;
        }
        let labels = text
            .split(self.delimiter)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        ParsedAnnotation::Present(labels)
    }
}
