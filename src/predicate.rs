use parquet::data_type::ByteArray;

use crate::prune::PrefixPruner;

/// Literal already encoded into a column's physical representation.
///
/// The null channel is explicit: `Bytes(None)` is the "no value" marker and
/// is distinct from `Bytes(Some(empty))`. Encoders never conflate the two.
#[derive(Clone, Debug, PartialEq)]
pub enum PhysicalValue {
    Boolean(Option<bool>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float(Option<f32>),
    Double(Option<f64>),
    Bytes(Option<ByteArray>),
}

impl PhysicalValue {
    /// Check if this is the typed null marker.
    pub fn is_null(&self) -> bool {
        match self {
            PhysicalValue::Boolean(v) => v.is_none(),
            PhysicalValue::Int32(v) => v.is_none(),
            PhysicalValue::Int64(v) => v.is_none(),
            PhysicalValue::Float(v) => v.is_none(),
            PhysicalValue::Double(v) => v.is_none(),
            PhysicalValue::Bytes(v) => v.is_none(),
        }
    }
}

impl std::fmt::Display for PhysicalValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicalValue::Boolean(Some(v)) => write!(f, "{}", v),
            PhysicalValue::Int32(Some(v)) => write!(f, "{}", v),
            PhysicalValue::Int64(Some(v)) => write!(f, "{}", v),
            PhysicalValue::Float(Some(v)) => write!(f, "{}", v),
            PhysicalValue::Double(Some(v)) => write!(f, "{}", v),
            PhysicalValue::Bytes(Some(v)) => {
                write!(f, "{:?}", String::from_utf8_lossy(v.data()))
            }
            _ => write!(f, "null"),
        }
    }
}

/// Storage-side filter predicate produced by translation.
///
/// Mirrors the shape of the logical filter it came from, but with literals
/// already in physical form. Equality here is null-safe: `Eq` against the
/// null marker is the is-null test, `NotEq` against it the is-not-null
/// test. The [`Prefix`](Predicate::Prefix) leaf is the one user-defined
/// predicate; it carries the pruner the scan evaluates against chunk
/// statistics.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Eq {
        column: String,
        value: PhysicalValue,
    },
    NotEq {
        column: String,
        value: PhysicalValue,
    },
    Lt {
        column: String,
        value: PhysicalValue,
    },
    LtEq {
        column: String,
        value: PhysicalValue,
    },
    Gt {
        column: String,
        value: PhysicalValue,
    },
    GtEq {
        column: String,
        value: PhysicalValue,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    Prefix {
        column: String,
        pruner: PrefixPruner,
    },
}

impl Predicate {
    /// Build an equality leaf.
    pub fn eq(column: impl Into<String>, value: PhysicalValue) -> Self {
        Predicate::Eq {
            column: column.into(),
            value,
        }
    }

    /// Build an inequality leaf.
    pub fn not_eq(column: impl Into<String>, value: PhysicalValue) -> Self {
        Predicate::NotEq {
            column: column.into(),
            value,
        }
    }

    /// Build a less-than leaf.
    pub fn lt(column: impl Into<String>, value: PhysicalValue) -> Self {
        Predicate::Lt {
            column: column.into(),
            value,
        }
    }

    /// Build a less-than-or-equal leaf.
    pub fn lt_eq(column: impl Into<String>, value: PhysicalValue) -> Self {
        Predicate::LtEq {
            column: column.into(),
            value,
        }
    }

    /// Build a greater-than leaf.
    pub fn gt(column: impl Into<String>, value: PhysicalValue) -> Self {
        Predicate::Gt {
            column: column.into(),
            value,
        }
    }

    /// Build a greater-than-or-equal leaf.
    pub fn gt_eq(column: impl Into<String>, value: PhysicalValue) -> Self {
        Predicate::GtEq {
            column: column.into(),
            value,
        }
    }

    /// Build a conjunction.
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(Box::new(left), Box::new(right))
    }

    /// Build a disjunction.
    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(Box::new(left), Box::new(right))
    }

    /// Build a negation.
    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Build the user-defined prefix-match leaf.
    pub fn prefix(column: impl Into<String>, pruner: PrefixPruner) -> Self {
        Predicate::Prefix {
            column: column.into(),
            pruner,
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Eq { column, value } if value.is_null() => {
                write!(f, "{} IS NULL", column)
            }
            Predicate::NotEq { column, value } if value.is_null() => {
                write!(f, "{} IS NOT NULL", column)
            }
            Predicate::Eq { column, value } => write!(f, "{} = {}", column, value),
            Predicate::NotEq { column, value } => write!(f, "{} != {}", column, value),
            Predicate::Lt { column, value } => write!(f, "{} < {}", column, value),
            Predicate::LtEq { column, value } => write!(f, "{} <= {}", column, value),
            Predicate::Gt { column, value } => write!(f, "{} > {}", column, value),
            Predicate::GtEq { column, value } => write!(f, "{} >= {}", column, value),
            Predicate::And(left, right) => write!(f, "({} AND {})", left, right),
            Predicate::Or(left, right) => write!(f, "({} OR {})", left, right),
            Predicate::Not(inner) => write!(f, "NOT ({})", inner),
            Predicate::Prefix { column, pruner } => {
                write!(
                    f,
                    "{} LIKE '{}%'",
                    column,
                    String::from_utf8_lossy(pruner.prefix())
                )
            }
        }
    }
}
