/// Constants describing the annotation table column layout.
pub mod columns {
    /// Suffix of raw annotation columns (for example `user_1_label`).
    pub const LABEL_SUFFIX: &str = "_label";
    /// Suffix of binarized annotation columns (for example `user_1_bin_label`).
    pub const BIN_LABEL_SUFFIX: &str = "_bin_label";
    /// Optional ground-truth column, rebound in place to its binary vector.
    pub const GOLD: &str = "gold";
    /// Output column holding the reliability-weighted consensus vector.
    pub const SOFT_LABEL: &str = "soft_label";
    /// Output column holding the mean reliability of contributing annotators.
    pub const SAMPLE_WEIGHT: &str = "sample_weight";
    /// Output column holding the thresholded consensus vector.
    pub const HARD_LABEL: &str = "hard_label";
    /// Column read as the row identifier when present.
    pub const ROW_ID: &str = "id";
}

/// Constants used by annotator slot naming.
pub mod slots {
    /// Prefix shared by every primary annotator slot.
    pub const PRIMARY_PREFIX: &str = "user_";
    /// Prefix shared by every re-annotation slot.
    pub const REANNOTATION_PREFIX: &str = "re_user_";
    /// Pattern a prefixed slot identifier must match at its start.
    pub const SLOT_PATTERN: &str = r"^(re_)?user_\S+";
}

/// Constants used when parsing and thresholding labels.
pub mod labels {
    /// Delimiter separating label tokens inside one cell.
    pub const DEFAULT_DELIMITER: char = ',';
    /// Soft-label values at or above this become 1 in the hard label.
    pub const DEFAULT_HARD_THRESHOLD: f64 = 0.5;
}
