use crate::{error::TranslateError, predicate::Predicate};

/// Result of translating the top-level conjuncts of a filter.
///
/// Uses an error accumulation strategy: every conjunct is attempted, and
/// both the translated predicates and the refusal reasons are kept. A
/// report with errors still yields a usable (wider) predicate from the
/// conjuncts that did translate.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use datafusion_common::ScalarValue;
/// use parquet::schema::{parser::parse_message_type, types::SchemaDescriptor};
/// use sieve::{Filter, Translator};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let message = "message test { required int64 a; }";
/// let schema = SchemaDescriptor::new(Arc::new(parse_message_type(message)?));
/// let translator = Translator::new(&schema);
///
/// // Mix of supported and unsupported conjuncts
/// let filter = Filter::and(
///     Filter::gt("a", ScalarValue::Int64(Some(5))),
///     Filter::eq("missing", ScalarValue::Int64(Some(1))),
/// );
///
/// let report = translator.translate_conjuncts(&filter);
/// assert_eq!(report.pushed_count(), 1); // a > 5 translated
/// assert_eq!(report.error_count(), 1); // the other conjunct refused
/// assert!(report.into_predicate().is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct TranslateReport {
    /// Successfully translated conjuncts
    predicates: Vec<Predicate>,
    /// Refusal reasons for conjuncts that did not translate
    errors: Vec<TranslateError>,
}

impl TranslateReport {
    pub(crate) fn push_predicate(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub(crate) fn push_error(&mut self, error: TranslateError) {
        self.errors.push(error);
    }

    /// Get the successfully translated conjuncts.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Get the refusal reasons.
    pub fn errors(&self) -> &[TranslateError] {
        &self.errors
    }

    /// Check if any conjunct was refused.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of successfully translated conjuncts.
    pub fn pushed_count(&self) -> usize {
        self.predicates.len()
    }

    /// Number of refused conjuncts.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Check if every conjunct translated, i.e. the folded predicate is
    /// exactly the original filter rather than a widening of it.
    pub fn is_exact(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold the translated conjuncts back into one AND chain.
    ///
    /// Returns `None` when nothing translated.
    pub fn into_predicate(self) -> Option<Predicate> {
        let mut conjuncts = self.predicates.into_iter();
        let first = conjuncts.next()?;
        Some(conjuncts.fold(first, Predicate::and))
    }
}
