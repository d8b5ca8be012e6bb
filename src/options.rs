use chrono_tz::Tz;

/// Options for controlling filter pushdown behavior
///
/// Immutable once built; a [`crate::Translator`] holds one copy for its
/// whole lifetime.
#[derive(Clone, Debug)]
pub struct TranslatorOptions {
    push_down_date: bool,
    push_down_timestamp: bool,
    push_down_decimal: bool,
    push_down_starts_with: bool,
    in_list_threshold: usize,
    case_sensitive: bool,
    session_timezone: Tz,
}

impl TranslatorOptions {
    /// Create a new builder for TranslatorOptions
    ///
    /// # Example
    /// ```
    /// use sieve::TranslatorOptions;
    ///
    /// let options = TranslatorOptions::builder()
    ///     .push_down_starts_with(false)
    ///     .in_list_threshold(20)
    ///     .build();
    /// ```
    pub fn builder() -> TranslatorOptionsBuilder {
        TranslatorOptionsBuilder::default()
    }

    /// Check if DATE columns participate in pushdown
    pub fn push_down_date(&self) -> bool {
        self.push_down_date
    }

    /// Check if TIMESTAMP columns participate in pushdown
    pub fn push_down_timestamp(&self) -> bool {
        self.push_down_timestamp
    }

    /// Check if DECIMAL columns participate in pushdown
    pub fn push_down_decimal(&self) -> bool {
        self.push_down_decimal
    }

    /// Check if prefix matches translate to a statistics pruner
    pub fn push_down_starts_with(&self) -> bool {
        self.push_down_starts_with
    }

    /// Maximum number of distinct IN-list values expanded into an OR chain
    pub fn in_list_threshold(&self) -> usize {
        self.in_list_threshold
    }

    /// Check if column names resolve case-sensitively
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Session timezone used to normalize local-time timestamps
    pub fn session_timezone(&self) -> Tz {
        self.session_timezone
    }
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            push_down_date: true,
            push_down_timestamp: true,
            push_down_decimal: true,
            push_down_starts_with: true,
            in_list_threshold: 10,
            case_sensitive: true,
            session_timezone: chrono_tz::UTC,
        }
    }
}

/// Builder for TranslatorOptions
#[derive(Clone, Debug, Default)]
pub struct TranslatorOptionsBuilder {
    push_down_date: Option<bool>,
    push_down_timestamp: Option<bool>,
    push_down_decimal: Option<bool>,
    push_down_starts_with: Option<bool>,
    in_list_threshold: Option<usize>,
    case_sensitive: Option<bool>,
    session_timezone: Option<Tz>,
}

impl TranslatorOptionsBuilder {
    /// Enable or disable pushdown for DATE columns (default: true)
    pub fn push_down_date(mut self, value: bool) -> Self {
        self.push_down_date = Some(value);
        self
    }

    /// Enable or disable pushdown for TIMESTAMP columns (default: true)
    ///
    /// Timestamp literals against local-time storage are normalized through
    /// the session timezone; see
    /// [`session_timezone`](Self::session_timezone).
    pub fn push_down_timestamp(mut self, value: bool) -> Self {
        self.push_down_timestamp = Some(value);
        self
    }

    /// Enable or disable pushdown for DECIMAL columns (default: true)
    pub fn push_down_decimal(mut self, value: bool) -> Self {
        self.push_down_decimal = Some(value);
        self
    }

    /// Enable or disable prefix-match pushdown (default: true)
    ///
    /// When enabled, `StartsWith` filters on string columns produce a
    /// [`crate::PrefixPruner`] leaf the scan can evaluate against chunk
    /// statistics.
    pub fn push_down_starts_with(mut self, value: bool) -> Self {
        self.push_down_starts_with = Some(value);
        self
    }

    /// Cap on distinct IN-list values expanded into an OR chain (default: 10)
    ///
    /// IN filters with more distinct values than this produce no predicate,
    /// keeping pushed predicate trees small.
    pub fn in_list_threshold(mut self, value: usize) -> Self {
        self.in_list_threshold = Some(value);
        self
    }

    /// Resolve column names case-sensitively (default: true)
    ///
    /// In case-insensitive mode, stored names that collide after lowercasing
    /// become unresolvable rather than matching one of them arbitrarily.
    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = Some(value);
        self
    }

    /// Session timezone for local-time timestamp columns (default: UTC)
    pub fn session_timezone(mut self, value: Tz) -> Self {
        self.session_timezone = Some(value);
        self
    }

    /// Build the TranslatorOptions
    pub fn build(self) -> TranslatorOptions {
        TranslatorOptions {
            push_down_date: self.push_down_date.unwrap_or(true),
            push_down_timestamp: self.push_down_timestamp.unwrap_or(true),
            push_down_decimal: self.push_down_decimal.unwrap_or(true),
            push_down_starts_with: self.push_down_starts_with.unwrap_or(true),
            in_list_threshold: self.in_list_threshold.unwrap_or(10),
            case_sensitive: self.case_sensitive.unwrap_or(true),
            session_timezone: self.session_timezone.unwrap_or(chrono_tz::UTC),
        }
    }
}
