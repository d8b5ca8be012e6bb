use std::collections::{HashMap, HashSet};

use parquet::{
    basic::{LogicalType, Type as PhysicalType},
    schema::types::SchemaDescriptor,
};

/// Physical description of one top-level primitive column.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnInfo {
    name: String,
    physical_type: PhysicalType,
    logical_type: Option<LogicalType>,
    type_length: i32,
}

impl ColumnInfo {
    /// Column name as stored in the file schema.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parquet physical type.
    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// Logical type annotation, if the column carries one.
    pub fn logical_type(&self) -> Option<&LogicalType> {
        self.logical_type.as_ref()
    }

    /// Declared byte length; meaningful only for FIXED_LEN_BYTE_ARRAY.
    pub fn type_length(&self) -> i32 {
        self.type_length
    }
}

/// Name-indexed view of a file schema's top-level primitive columns.
///
/// Nested columns are excluded outright: pushdown is not supported for
/// nested paths, and no flattening is attempted. Under case-insensitive
/// resolution, stored names that collide after lowercasing are dropped
/// entirely rather than resolved arbitrarily; resolving to the wrong
/// column would silently corrupt results.
#[derive(Clone, Debug)]
pub struct SchemaIndex {
    fields: HashMap<String, ColumnInfo>,
    ambiguous: HashSet<String>,
    case_sensitive: bool,
}

impl SchemaIndex {
    /// Build the index from a Parquet schema descriptor.
    pub fn new(schema: &SchemaDescriptor, case_sensitive: bool) -> Self {
        let mut fields: HashMap<String, ColumnInfo> = HashMap::new();
        let mut ambiguous: HashSet<String> = HashSet::new();

        for column in schema.columns() {
            // Nested leaves carry multi-part paths; only top-level
            // primitives participate.
            if column.path().parts().len() != 1 {
                continue;
            }
            let info = ColumnInfo {
                name: column.name().to_string(),
                physical_type: column.physical_type(),
                logical_type: column.logical_type(),
                type_length: column.type_length(),
            };
            if case_sensitive {
                fields.insert(info.name.clone(), info);
                continue;
            }
            let key = info.name.to_lowercase();
            if ambiguous.contains(&key) {
                continue;
            }
            if fields.remove(&key).is_some() {
                ambiguous.insert(key);
                continue;
            }
            fields.insert(key, info);
        }

        Self {
            fields,
            ambiguous,
            case_sensitive,
        }
    }

    /// Resolve a filter's column name to its physical column.
    ///
    /// Absent and ambiguous names are simply unresolvable; no error is
    /// raised here.
    pub fn resolve(&self, name: &str) -> Option<&ColumnInfo> {
        if self.case_sensitive {
            self.fields.get(name)
        } else {
            self.fields.get(&name.to_lowercase())
        }
    }

    /// Check whether a name was dropped because it collides with another
    /// after lowercasing.
    pub fn is_ambiguous(&self, name: &str) -> bool {
        !self.case_sensitive && self.ambiguous.contains(&name.to_lowercase())
    }

    /// Number of resolvable columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no column is resolvable.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
