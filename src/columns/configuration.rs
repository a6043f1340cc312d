use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::Searchable;
use crate::Record;
use crate::errors::{DatatableError, Result};
use crate::query::Direction;

/// Search predicate `(record, term) -> matches`.
pub type SearchFn = Arc<dyn Fn(&Record, &str) -> bool + Send + Sync>;

/// Column comparator. Receives the requested direction and must apply it itself.
pub type ColumnOrderFn = Arc<dyn Fn(&Record, &Record, Direction) -> Ordering + Send + Sync>;

/// Immutable metadata for one column of the table.
///
/// Built once with [`ColumnConfigurationBuilder`] and reused across requests;
/// cloning is cheap since custom strategies are reference counted.
#[derive(Clone)]
pub struct ColumnConfiguration {
    name: String,
    searchable: Searchable,
    orderable: bool,
    search: Option<SearchFn>,
    order: Option<ColumnOrderFn>,
}

impl ColumnConfiguration {
    /// Start building a column configuration
    #[must_use]
    pub fn builder() -> ColumnConfigurationBuilder {
        ColumnConfigurationBuilder::new()
    }

    /// Field name of the column in each record
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn searchable(&self) -> Searchable {
        self.searchable
    }

    #[must_use]
    pub fn is_orderable(&self) -> bool {
        self.orderable
    }

    /// Column-level search predicate, if one was configured
    #[must_use]
    pub fn search(&self) -> Option<&SearchFn> {
        self.search.as_ref()
    }

    /// Column-level comparator, if one was configured
    #[must_use]
    pub fn order(&self) -> Option<&ColumnOrderFn> {
        self.order.as_ref()
    }
}

impl fmt::Debug for ColumnConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnConfiguration")
            .field("name", &self.name)
            .field("searchable", &self.searchable)
            .field("orderable", &self.orderable)
            .field("custom_search", &self.search.is_some())
            .field("custom_order", &self.order.is_some())
            .finish()
    }
}

/// Staging area for a [`ColumnConfiguration`].
///
/// ```rust
/// use datatable::columns::{ColumnConfiguration, Searchable};
///
/// let column = ColumnConfiguration::builder()
///     .name("email")
///     .searchable(Searchable::None)
///     .orderable(false)
///     .build()
///     .unwrap();
/// assert_eq!(column.name(), "email");
/// ```
pub struct ColumnConfigurationBuilder {
    name: String,
    searchable: Searchable,
    orderable: bool,
    search: Option<SearchFn>,
    order: Option<ColumnOrderFn>,
}

impl Default for ColumnConfigurationBuilder {
    fn default() -> Self {
        Self {
            name: String::new(),
            searchable: Searchable::Default,
            orderable: true,
            search: None,
            order: None,
        }
    }
}

impl ColumnConfigurationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column name (required)
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn searchable(mut self, searchable: Searchable) -> Self {
        self.searchable = searchable;
        self
    }

    /// Whether the column may be sorted on (default `true`)
    #[must_use]
    pub fn orderable(mut self, orderable: bool) -> Self {
        self.orderable = orderable;
        self
    }

    /// Replace the search predicate for this column only
    #[must_use]
    pub fn search<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Record, &str) -> bool + Send + Sync + 'static,
    {
        self.search = Some(Arc::new(predicate));
        self
    }

    /// Replace the comparator for this column only
    ///
    /// The comparator must implement a total order; sorting may panic otherwise.
    #[must_use]
    pub fn order<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Record, &Record, Direction) -> Ordering + Send + Sync + 'static,
    {
        self.order = Some(Arc::new(comparator));
        self
    }

    /// Finalise the configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no name (or a blank one) was given.
    pub fn build(self) -> Result<ColumnConfiguration> {
        if self.name.trim().is_empty() {
            return Err(DatatableError::configuration(
                "column name must not be empty",
            ));
        }

        Ok(ColumnConfiguration {
            name: self.name,
            searchable: self.searchable,
            orderable: self.orderable,
            search: self.search,
            order: self.order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_build_defaults() {
        let column = ColumnConfiguration::builder().name("name").build().unwrap();
        assert_eq!(column.name(), "name");
        assert_eq!(column.searchable(), Searchable::Default);
        assert!(column.is_orderable());
        assert!(column.search().is_none());
        assert!(column.order().is_none());
    }

    #[test]
    fn test_build_without_name_fails() {
        let err = ColumnConfigurationBuilder::new().build().unwrap_err();
        assert!(matches!(err, DatatableError::Configuration { .. }));
    }

    #[test]
    fn test_build_with_blank_name_fails() {
        assert!(ColumnConfiguration::builder().name("   ").build().is_err());
    }

    #[test]
    fn test_custom_strategies_are_kept() {
        let column = ColumnConfiguration::builder()
            .name("id")
            .searchable(Searchable::All)
            .orderable(false)
            .search(|record, term| record.get("id").and_then(|v| v.as_str()) == Some(term))
            .order(|a, b, direction| direction.apply(a["id"].to_string().cmp(&b["id"].to_string())))
            .build()
            .unwrap();

        let a = record(json!({"id": "a"}));
        let b = record(json!({"id": "b"}));

        assert_eq!(column.searchable(), Searchable::All);
        assert!(!column.is_orderable());
        assert!((column.search().unwrap())(&a, "a"));
        assert!(!(column.search().unwrap())(&b, "a"));
        assert_eq!((column.order().unwrap())(&a, &b, Direction::Descending), Ordering::Greater);
    }

    #[test]
    fn test_clone_shares_strategies() {
        let column = ColumnConfiguration::builder()
            .name("id")
            .search(|_, _| true)
            .build()
            .unwrap();
        let copy = column.clone();
        assert!(Arc::ptr_eq(column.search().unwrap(), copy.search().unwrap()));
    }

    #[test]
    fn test_debug_hides_closures() {
        let column = ColumnConfiguration::builder()
            .name("id")
            .search(|_, _| true)
            .build()
            .unwrap();
        let debug = format!("{column:?}");
        assert!(debug.contains("custom_search: true"));
        assert!(debug.contains("custom_order: false"));
    }
}
