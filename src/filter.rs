use datafusion_common::ScalarValue;

/// Logical filter tree handed down by a query planner.
///
/// Leaves carry a column name and a logical-domain [`ScalarValue`] literal.
/// The tree is immutable; translation never consumes or rewrites it.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// `column IS NULL`
    IsNull { column: String },
    /// `column IS NOT NULL`
    IsNotNull { column: String },
    /// `column = value`
    Eq { column: String, value: ScalarValue },
    /// `column <=> value` (null-safe equality)
    EqNullSafe { column: String, value: ScalarValue },
    /// `column != value`
    NotEq { column: String, value: ScalarValue },
    /// `column < value`
    Lt { column: String, value: ScalarValue },
    /// `column <= value`
    LtEq { column: String, value: ScalarValue },
    /// `column > value`
    Gt { column: String, value: ScalarValue },
    /// `column >= value`
    GtEq { column: String, value: ScalarValue },
    /// Conjunction of two filters
    And(Box<Filter>, Box<Filter>),
    /// Disjunction of two filters
    Or(Box<Filter>, Box<Filter>),
    /// Negation of a filter
    Not(Box<Filter>),
    /// `column IN (values...)`
    In {
        column: String,
        values: Vec<ScalarValue>,
    },
    /// `column LIKE 'prefix%'`
    StartsWith { column: String, prefix: String },
}

impl Filter {
    /// Build an IS NULL filter.
    pub fn is_null(column: impl Into<String>) -> Self {
        Filter::IsNull {
            column: column.into(),
        }
    }

    /// Build an IS NOT NULL filter.
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Filter::IsNotNull {
            column: column.into(),
        }
    }

    /// Build an equality filter (`=`).
    pub fn eq(column: impl Into<String>, value: ScalarValue) -> Self {
        Filter::Eq {
            column: column.into(),
            value,
        }
    }

    /// Build a null-safe equality filter (`<=>`).
    pub fn eq_null_safe(column: impl Into<String>, value: ScalarValue) -> Self {
        Filter::EqNullSafe {
            column: column.into(),
            value,
        }
    }

    /// Build a not-equal filter (`!=`).
    pub fn not_eq(column: impl Into<String>, value: ScalarValue) -> Self {
        Filter::NotEq {
            column: column.into(),
            value,
        }
    }

    /// Build a less-than filter (`<`).
    pub fn lt(column: impl Into<String>, value: ScalarValue) -> Self {
        Filter::Lt {
            column: column.into(),
            value,
        }
    }

    /// Build a less-than-or-equal filter (`<=`).
    pub fn lt_eq(column: impl Into<String>, value: ScalarValue) -> Self {
        Filter::LtEq {
            column: column.into(),
            value,
        }
    }

    /// Build a greater-than filter (`>`).
    pub fn gt(column: impl Into<String>, value: ScalarValue) -> Self {
        Filter::Gt {
            column: column.into(),
            value,
        }
    }

    /// Build a greater-than-or-equal filter (`>=`).
    pub fn gt_eq(column: impl Into<String>, value: ScalarValue) -> Self {
        Filter::GtEq {
            column: column.into(),
            value,
        }
    }

    /// Build an AND filter.
    pub fn and(left: Filter, right: Filter) -> Self {
        Filter::And(Box::new(left), Box::new(right))
    }

    /// Build an OR filter.
    pub fn or(left: Filter, right: Filter) -> Self {
        Filter::Or(Box::new(left), Box::new(right))
    }

    /// Build a NOT filter.
    pub fn not(inner: Filter) -> Self {
        Filter::Not(Box::new(inner))
    }

    /// Build an IN (...) filter.
    pub fn in_list(column: impl Into<String>, values: Vec<ScalarValue>) -> Self {
        Filter::In {
            column: column.into(),
            values,
        }
    }

    /// Build a prefix match filter (`LIKE 'prefix%'`).
    pub fn starts_with(column: impl Into<String>, prefix: impl Into<String>) -> Self {
        Filter::StartsWith {
            column: column.into(),
            prefix: prefix.into(),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::IsNull { column } => write!(f, "{} IS NULL", column),
            Filter::IsNotNull { column } => write!(f, "{} IS NOT NULL", column),
            Filter::Eq { column, value } => write!(f, "{} = {:?}", column, value),
            Filter::EqNullSafe { column, value } => write!(f, "{} <=> {:?}", column, value),
            Filter::NotEq { column, value } => write!(f, "{} != {:?}", column, value),
            Filter::Lt { column, value } => write!(f, "{} < {:?}", column, value),
            Filter::LtEq { column, value } => write!(f, "{} <= {:?}", column, value),
            Filter::Gt { column, value } => write!(f, "{} > {:?}", column, value),
            Filter::GtEq { column, value } => write!(f, "{} >= {:?}", column, value),
            Filter::And(left, right) => write!(f, "({} AND {})", left, right),
            Filter::Or(left, right) => write!(f, "({} OR {})", left, right),
            Filter::Not(inner) => write!(f, "NOT ({})", inner),
            Filter::In { column, values } => {
                write!(f, "{} IN (", column)?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", v)?;
                }
                write!(f, ")")
            }
            Filter::StartsWith { column, prefix } => {
                write!(f, "{} LIKE '{}%'", column, prefix)
            }
        }
    }
}
