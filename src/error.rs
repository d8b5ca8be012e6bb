use thiserror::Error;

/// Reasons a filter (or part of one) cannot be pushed down
///
/// Refusal is the expected outcome for many real filter trees, not a fault:
/// [`crate::Translator::translate`] folds every one of these into "no
/// predicate". The typed variants exist for callers that want to report why
/// a scan runs unpruned ([`crate::Translator::try_translate`] and
/// [`crate::Translator::translate_conjuncts`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Column not found among the schema's top-level primitive columns
    #[error("column '{column}' not found in schema")]
    ColumnNotFound {
        /// Name of the column that was not found
        column: String,
    },

    /// Column name collides with another after lowercasing
    #[error("column '{column}' is ambiguous under case-insensitive resolution")]
    AmbiguousColumn {
        /// Name of the ambiguous column
        column: String,
    },

    /// Column name contains the path separator
    ///
    /// A literal dotted name cannot be told apart from a nested path in the
    /// physical schema, so such names never push down.
    #[error("column '{column}' looks like a nested path and cannot be pushed down")]
    NestedColumn {
        /// The dotted name
        column: String,
    },

    /// No encoder exists for the column's physical/logical type combination,
    /// or the matching pushdown toggle is off
    #[error("column '{column}' has no supported pushdown encoding")]
    UnsupportedColumnType {
        /// Name of the column
        column: String,
    },

    /// Literal's runtime kind (or decimal scale) does not match the column
    #[error("value {value} does not match the type of column '{column}'")]
    ValueTypeMismatch {
        /// Name of the column
        column: String,
        /// Display form of the offending literal
        value: String,
    },

    /// Ordered comparison against a null literal
    #[error("ordered comparison on column '{column}' requires a non-null value")]
    NullComparison {
        /// Name of the column
        column: String,
    },

    /// IN filter with an empty value list
    #[error("IN list on column '{column}' is empty")]
    EmptyInList {
        /// Name of the column
        column: String,
    },

    /// IN filter with more distinct values than the configured threshold
    #[error("IN list has {count} distinct values, over the threshold of {threshold}")]
    InListOverThreshold {
        /// Number of distinct values in the list
        count: usize,
        /// Configured `in_list_threshold`
        threshold: usize,
    },

    /// IN filter where no value could be encoded for the column
    #[error("no IN-list value could be encoded for column '{column}'")]
    NoEncodableValue {
        /// Name of the column
        column: String,
    },

    /// StartsWith filter while prefix pushdown is disabled
    #[error("prefix pushdown is disabled")]
    PrefixPushdownDisabled,
}
