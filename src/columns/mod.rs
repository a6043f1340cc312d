//! # Column Configuration
//!
//! Declarative, per-column metadata: the column's field name, whether it takes
//! part in the global search, whether it can be sorted on, and optional search
//! and order strategies that override the provider's defaults for this column.
//!
//! Strategy precedence everywhere in the engine is
//! **column-level > provider-level > built-in default**.

pub mod configuration;
pub mod searchable;

pub use configuration::{ColumnConfiguration, ColumnConfigurationBuilder, ColumnOrderFn, SearchFn};
pub use searchable::Searchable;

use std::collections::HashSet;

use crate::errors::{DatatableError, Result};

/// Check that a column set has no duplicate names.
///
/// Empty names cannot occur since [`ColumnConfigurationBuilder::build`] rejects them.
///
/// # Errors
///
/// Returns a configuration error naming the first duplicated column.
pub fn validate_columns(columns: &[ColumnConfiguration]) -> Result<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.name()) {
            return Err(DatatableError::configuration(format!(
                "duplicate column '{}'",
                column.name()
            )));
        }
    }
    Ok(())
}

/// Find a column by name
#[must_use]
pub fn find_column<'a>(columns: &'a [ColumnConfiguration], name: &str) -> Option<&'a ColumnConfiguration> {
    columns.iter().find(|column| column.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> ColumnConfiguration {
        ColumnConfiguration::builder().name(name).build().unwrap()
    }

    #[test]
    fn test_validate_unique_columns() {
        assert!(validate_columns(&[column("id"), column("name")]).is_ok());
        assert!(validate_columns(&[]).is_ok());
    }

    #[test]
    fn test_validate_duplicate_columns() {
        let err = validate_columns(&[column("id"), column("name"), column("id")]).unwrap_err();
        assert_eq!(err, DatatableError::configuration("duplicate column 'id'"));
    }

    #[test]
    fn test_find_column() {
        let columns = [column("id"), column("name")];
        assert_eq!(find_column(&columns, "name").map(ColumnConfiguration::name), Some("name"));
        assert!(find_column(&columns, "email").is_none());
    }
}
