//! Predicate pushdown translation for Parquet scans.
//!
//! Given the physical schema of a stored table and a logical filter tree
//! produced by a query planner, [`Translator`] emits an equivalent
//! [`Predicate`] in the storage-side filter algebra, so a scan can skip
//! row groups and column chunks that cannot satisfy the filter. Literals
//! are encoded bit-exactly into their physical representation (decimal
//! unscaled values, two's-complement fixed-width byte arrays, timestamp
//! unit and timezone normalization), and prefix matches carry a
//! [`PrefixPruner`] the scan evaluates against chunk statistics.
//!
//! Translation never evaluates data and never errors: any filter that
//! cannot be pushed down safely simply yields no predicate, which is a
//! frequent and expected outcome.

mod encode;
mod error;
mod filter;
mod options;
mod predicate;
mod prune;
mod result;
mod schema;
mod translate;

pub use error::TranslateError;
pub use filter::Filter;
pub use options::{TranslatorOptions, TranslatorOptionsBuilder};
pub use predicate::{PhysicalValue, Predicate};
pub use prune::PrefixPruner;
pub use result::TranslateReport;
pub use schema::{ColumnInfo, SchemaIndex};
pub use translate::Translator;
