/// Identifier for one entry of the label space.
/// Examples: `politics`, `sport`, `A`
pub type LabelId = String;
/// Annotator slot name without the column suffix.
/// Examples: `user_1`, `re_user_3`
pub type SlotName = String;
/// Column name in an annotation table.
/// Examples: `user_1_label`, `re_user_2_bin_label`, `gold`, `soft_label`
pub type ColumnName = String;
/// Optional stable identifier carried by a table row.
/// Example: `tweet-00421`
pub type RowId = String;
/// Non-negative reliability weight for one primary annotator.
/// Example: `0.83`
pub type Reliability = f64;
