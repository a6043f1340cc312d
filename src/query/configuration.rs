use serde::Serialize;

use super::{ColumnOrder, ColumnSearch, Direction};
use crate::errors::{DatatableError, Result};

/// Number of records a page may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PageLength {
    /// At most this many records
    Limit(usize),
    /// Every remaining record after `start`
    #[default]
    All,
}

impl PageLength {
    /// Interpret a protocol length value: `-1` means "all", other negatives are invalid.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for negative values other than `-1`.
    pub fn from_signed(length: i64) -> Result<Self> {
        match length {
            -1 => Ok(Self::All),
            n if n < 0 => Err(DatatableError::configuration(format!(
                "page length must be -1 or non-negative, got {n}"
            ))),
            n => usize::try_from(n)
                .map(Self::Limit)
                .map_err(|_| DatatableError::configuration(format!("page length {n} is too large"))),
        }
    }
}

/// One parsed client request: pagination window, correlation token, global
/// search, per-column searches and sort directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryConfiguration {
    start: usize,
    length: PageLength,
    draw_call: String,
    search_value: Option<String>,
    column_searches: Vec<ColumnSearch>,
    column_orders: Vec<ColumnOrder>,
}

impl QueryConfiguration {
    #[must_use]
    pub fn builder() -> QueryConfigurationBuilder {
        QueryConfigurationBuilder::new()
    }

    /// Offset into the filtered and sorted result
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn length(&self) -> PageLength {
        self.length
    }

    /// Correlation token to echo back in the response
    #[must_use]
    pub fn draw_call(&self) -> &str {
        &self.draw_call
    }

    /// Global search term, `None` when absent or empty
    #[must_use]
    pub fn search_value(&self) -> Option<&str> {
        self.search_value.as_deref()
    }

    #[must_use]
    pub fn is_global_search(&self) -> bool {
        self.search_value.is_some()
    }

    #[must_use]
    pub fn column_searches(&self) -> &[ColumnSearch] {
        &self.column_searches
    }

    /// Sort directives; the first entry is the primary key
    #[must_use]
    pub fn column_orders(&self) -> &[ColumnOrder] {
        &self.column_orders
    }

    #[must_use]
    pub fn has_order(&self) -> bool {
        !self.column_orders.is_empty()
    }

    /// Every column name this query refers to, searches first
    pub fn referenced_columns(&self) -> impl Iterator<Item = &str> {
        self.column_searches
            .iter()
            .map(ColumnSearch::column)
            .chain(self.column_orders.iter().map(ColumnOrder::column))
    }
}

/// Staging area for a [`QueryConfiguration`].
///
/// Builder inputs are validated by [`build`](Self::build); the first invalid
/// input is reported. Repeating [`column_search`](Self::column_search) or
/// [`column_order`](Self::column_order) for a column replaces its value but
/// keeps the position of the first call.
///
/// ```rust
/// use datatable::query::QueryConfiguration;
///
/// let query = QueryConfiguration::builder()
///     .start(0)
///     .length(10)
///     .draw_call(1)
///     .search_value("foo")
///     .column_order("name", "desc")
///     .build()
///     .unwrap();
/// assert_eq!(query.column_orders()[0].column(), "name");
/// ```
#[derive(Debug, Default)]
pub struct QueryConfigurationBuilder {
    start: i64,
    length: Option<i64>,
    draw_call: String,
    search_value: Option<String>,
    column_searches: Vec<ColumnSearch>,
    column_orders: Vec<ColumnOrder>,
    error: Option<DatatableError>,
}

impl QueryConfigurationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            draw_call: "0".to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }

    /// Page size; `-1` requests all remaining records
    #[must_use]
    pub fn length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn draw_call(mut self, draw_call: impl ToString) -> Self {
        self.draw_call = draw_call.to_string();
        self
    }

    /// Global search term; an empty term disables the global search
    #[must_use]
    pub fn search_value(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.search_value = (!value.is_empty()).then_some(value);
        self
    }

    #[must_use]
    pub fn column_search(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        let column = column.into();
        if self.check_column_name(&column) {
            let value = value.into();
            match self.column_searches.iter_mut().find(|s| s.column() == column) {
                Some(existing) => existing.set_value(value),
                None => self.column_searches.push(ColumnSearch::new(column, value)),
            }
        }
        self
    }

    /// Add a sort directive; `direction` is parsed case-insensitively
    #[must_use]
    pub fn column_order(self, column: impl Into<String>, direction: &str) -> Self {
        match direction.parse::<Direction>() {
            Ok(direction) => self.column_order_direction(column, direction),
            Err(err) => self.fail(err),
        }
    }

    #[must_use]
    pub fn column_order_direction(mut self, column: impl Into<String>, direction: Direction) -> Self {
        let column = column.into();
        if self.check_column_name(&column) {
            match self.column_orders.iter_mut().find(|o| o.column() == column) {
                Some(existing) => existing.set_direction(direction),
                None => self.column_orders.push(ColumnOrder::new(column, direction)),
            }
        }
        self
    }

    /// Finalise the query
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a negative start, a negative length
    /// other than `-1`, an invalid direction or an empty column name.
    pub fn build(self) -> Result<QueryConfiguration> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let start = usize::try_from(self.start).map_err(|_| {
            DatatableError::configuration(format!("start must be non-negative, got {}", self.start))
        })?;
        let length = self.length.map_or(Ok(PageLength::All), PageLength::from_signed)?;

        Ok(QueryConfiguration {
            start,
            length,
            draw_call: self.draw_call,
            search_value: self.search_value,
            column_searches: self.column_searches,
            column_orders: self.column_orders,
        })
    }

    fn check_column_name(&mut self, column: &str) -> bool {
        if column.is_empty() {
            self.error
                .get_or_insert_with(|| DatatableError::configuration("column name must not be empty"));
            return false;
        }
        true
    }

    fn fail(mut self, err: DatatableError) -> Self {
        self.error.get_or_insert(err);
        self
    }
}
