use datafusion_common::ScalarValue;
use parquet::schema::types::SchemaDescriptor;

use crate::{
    encode::Encoder,
    error::TranslateError,
    filter::Filter,
    options::TranslatorOptions,
    predicate::Predicate,
    prune::PrefixPruner,
    result::TranslateReport,
    schema::{ColumnInfo, SchemaIndex},
};

#[derive(Clone, Copy)]
enum LeafOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// Translates planner filter trees into storage-side predicates for a
/// fixed schema.
///
/// The schema index is built once at construction and reused for every
/// call. Translation is total: any filter that cannot be pushed down
/// safely yields "no predicate", never an error, and never a coerced
/// approximation.
///
/// # Thread Safety
///
/// `Translator` is `Send` and `Sync`. All methods take `&self` and no
/// state is written after construction, so one instance may be shared
/// across threads via `Arc` without coordination.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use datafusion_common::ScalarValue;
/// use parquet::schema::{parser::parse_message_type, types::SchemaDescriptor};
/// use sieve::{Filter, Translator};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let message = "message spark_schema {
///     required int32 age;
///     optional binary name (STRING);
/// }";
/// let schema = SchemaDescriptor::new(Arc::new(parse_message_type(message)?));
/// let translator = Translator::new(&schema);
///
/// let filter = Filter::not(Filter::eq("age", ScalarValue::Int32(Some(30))));
/// let predicate = translator.translate(&filter).expect("supported pushdown");
/// assert_eq!(predicate.to_string(), "age != 30");
///
/// // Unresolvable columns are a refusal, not an error.
/// let unknown = Filter::eq("missing", ScalarValue::Int32(Some(1)));
/// assert!(translator.translate(&unknown).is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Translator {
    index: SchemaIndex,
    options: TranslatorOptions,
}

impl Translator {
    /// Build a translator with default options.
    pub fn new(schema: &SchemaDescriptor) -> Self {
        Self::with_options(schema, TranslatorOptions::default())
    }

    /// Build a translator with explicit options.
    pub fn with_options(schema: &SchemaDescriptor, options: TranslatorOptions) -> Self {
        let index = SchemaIndex::new(schema, options.case_sensitive());
        Self { index, options }
    }

    /// Options this translator was built with.
    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Name-indexed view of the schema's pushdown-eligible columns.
    pub fn schema_index(&self) -> &SchemaIndex {
        &self.index
    }

    /// Translate a filter tree into a storage predicate.
    ///
    /// Returns `None` whenever any required sub-translation fails; absence
    /// of a predicate is the expected outcome for many real filters and
    /// always safe (the scan simply reads more than it strictly needs).
    pub fn translate(&self, filter: &Filter) -> Option<Predicate> {
        self.try_translate(filter).ok()
    }

    /// Translate a filter tree, reporting why translation was refused.
    ///
    /// Same semantics as [`translate`](Self::translate); the error carries
    /// the first refusal encountered, for diagnostics only.
    pub fn try_translate(&self, filter: &Filter) -> Result<Predicate, TranslateError> {
        match filter {
            Filter::IsNull { column } => self.try_leaf(column, &ScalarValue::Null, LeafOp::Eq),
            Filter::IsNotNull { column } => {
                self.try_leaf(column, &ScalarValue::Null, LeafOp::NotEq)
            }
            Filter::Eq { column, value } | Filter::EqNullSafe { column, value } => {
                self.try_leaf(column, value, LeafOp::Eq)
            }
            Filter::NotEq { column, value } => self.try_leaf(column, value, LeafOp::NotEq),
            Filter::Lt { column, value } => self.try_leaf(column, value, LeafOp::Lt),
            Filter::LtEq { column, value } => self.try_leaf(column, value, LeafOp::LtEq),
            Filter::Gt { column, value } => self.try_leaf(column, value, LeafOp::Gt),
            Filter::GtEq { column, value } => self.try_leaf(column, value, LeafOp::GtEq),
            // Emitting only one side of a conjunction is unsound in a
            // general tree (a NOT above would flip it), so both sides must
            // translate.
            Filter::And(left, right) => {
                let left = self.try_translate(left)?;
                let right = self.try_translate(right)?;
                Ok(Predicate::and(left, right))
            }
            Filter::Or(left, right) => {
                let left = self.try_translate(left)?;
                let right = self.try_translate(right)?;
                Ok(Predicate::or(left, right))
            }
            Filter::Not(inner) => match inner.as_ref() {
                Filter::Eq { column, value } | Filter::EqNullSafe { column, value } => {
                    self.try_leaf(column, value, LeafOp::NotEq)
                }
                _ => Ok(Predicate::not(self.try_translate(inner)?)),
            },
            Filter::In { column, values } => self.try_in_list(column, values),
            Filter::StartsWith { column, prefix } => self.try_starts_with(column, prefix),
        }
    }

    /// Split the top-level conjunction and translate each conjunct
    /// independently.
    ///
    /// Unlike an `And` node inside [`try_translate`](Self::try_translate),
    /// dropping a top-level conjunct only widens what the predicate
    /// matches, so the surviving conjuncts remain a safe pushdown. Refused
    /// conjuncts are collected as errors in the report.
    pub fn translate_conjuncts(&self, filter: &Filter) -> TranslateReport {
        let mut conjuncts = Vec::new();
        split_conjunction(filter, &mut conjuncts);
        let mut report = TranslateReport::default();
        for conjunct in conjuncts {
            match self.try_translate(conjunct) {
                Ok(predicate) => report.push_predicate(predicate),
                Err(error) => report.push_error(error),
            }
        }
        report
    }

    /// Resolve a filter's column name, refusing dotted names outright.
    fn resolve(&self, column: &str) -> Result<&ColumnInfo, TranslateError> {
        // A literal dot in a top-level name is indistinguishable from a
        // nested path, and matching the wrong one prunes wrong data.
        if column.contains('.') {
            return Err(TranslateError::NestedColumn {
                column: column.to_string(),
            });
        }
        match self.index.resolve(column) {
            Some(info) => Ok(info),
            None if self.index.is_ambiguous(column) => Err(TranslateError::AmbiguousColumn {
                column: column.to_string(),
            }),
            None => Err(TranslateError::ColumnNotFound {
                column: column.to_string(),
            }),
        }
    }

    fn try_leaf(
        &self,
        column: &str,
        value: &ScalarValue,
        op: LeafOp,
    ) -> Result<Predicate, TranslateError> {
        let info = self.resolve(column)?;
        if value.is_null() && !matches!(op, LeafOp::Eq | LeafOp::NotEq) {
            return Err(TranslateError::NullComparison {
                column: column.to_string(),
            });
        }
        let encoder =
            Encoder::select(info, &self.options).ok_or_else(|| {
                TranslateError::UnsupportedColumnType {
                    column: column.to_string(),
                }
            })?;
        let encoded = encoder
            .encode(value, self.options.session_timezone())
            .ok_or_else(|| TranslateError::ValueTypeMismatch {
                column: column.to_string(),
                value: value.to_string(),
            })?;
        let name = info.name().to_string();
        Ok(match op {
            LeafOp::Eq => Predicate::Eq {
                column: name,
                value: encoded,
            },
            LeafOp::NotEq => Predicate::NotEq {
                column: name,
                value: encoded,
            },
            LeafOp::Lt => Predicate::Lt {
                column: name,
                value: encoded,
            },
            LeafOp::LtEq => Predicate::LtEq {
                column: name,
                value: encoded,
            },
            LeafOp::Gt => Predicate::Gt {
                column: name,
                value: encoded,
            },
            LeafOp::GtEq => Predicate::GtEq {
                column: name,
                value: encoded,
            },
        })
    }

    fn try_in_list(
        &self,
        column: &str,
        values: &[ScalarValue],
    ) -> Result<Predicate, TranslateError> {
        let info = self.resolve(column)?;
        let encoder =
            Encoder::select(info, &self.options).ok_or_else(|| {
                TranslateError::UnsupportedColumnType {
                    column: column.to_string(),
                }
            })?;

        let mut distinct: Vec<&ScalarValue> = Vec::new();
        for value in values {
            if !distinct.iter().any(|seen| *seen == value) {
                distinct.push(value);
            }
        }
        if distinct.is_empty() {
            return Err(TranslateError::EmptyInList {
                column: column.to_string(),
            });
        }
        let threshold = self.options.in_list_threshold();
        if distinct.len() > threshold {
            return Err(TranslateError::InListOverThreshold {
                count: distinct.len(),
                threshold,
            });
        }

        let name = info.name();
        let mut folded: Option<Predicate> = None;
        for value in distinct {
            // A dropped disjunct only widens the OR, so values that fail
            // to encode are skipped as long as one survives.
            let Some(encoded) = encoder.encode(value, self.options.session_timezone()) else {
                continue;
            };
            let leaf = Predicate::Eq {
                column: name.to_string(),
                value: encoded,
            };
            folded = Some(match folded {
                None => leaf,
                Some(acc) => Predicate::or(acc, leaf),
            });
        }
        folded.ok_or_else(|| TranslateError::NoEncodableValue {
            column: column.to_string(),
        })
    }

    fn try_starts_with(&self, column: &str, prefix: &str) -> Result<Predicate, TranslateError> {
        if !self.options.push_down_starts_with() {
            return Err(TranslateError::PrefixPushdownDisabled);
        }
        let info = self.resolve(column)?;
        if !matches!(Encoder::select(info, &self.options), Some(Encoder::Utf8)) {
            return Err(TranslateError::UnsupportedColumnType {
                column: column.to_string(),
            });
        }
        Ok(Predicate::prefix(
            info.name(),
            PrefixPruner::new(prefix.as_bytes().to_vec()),
        ))
    }
}

fn split_conjunction<'a>(filter: &'a Filter, out: &mut Vec<&'a Filter>) {
    match filter {
        Filter::And(left, right) => {
            split_conjunction(left, out);
            split_conjunction(right, out);
        }
        other => out.push(other),
    }
}
