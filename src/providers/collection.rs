use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{ProcessedResult, Provider, validate_query};
use crate::Record;
use crate::columns::{ColumnConfiguration, SearchFn, find_column};
use crate::errors::{DatatableError, Result};
use crate::filtering::{compare_with_direction, contains_term, paginate};
use crate::query::{ColumnOrder, QueryConfiguration};

/// Provider-level comparator. Receives the whole directive so one function can
/// serve every column; it must apply the direction itself.
pub type ProviderOrderFn = Arc<dyn Fn(&Record, &Record, &ColumnOrder) -> Ordering + Send + Sync>;

/// Query and columns captured by the last successful preparation
struct PreparedQuery {
    query: QueryConfiguration,
    columns: Vec<ColumnConfiguration>,
}

/// In-memory provider over an already-loaded sequence of records.
///
/// # Pipeline
///
/// 1. `total_count` is the size of the backing sequence
/// 2. **Global search** (OR): a record is kept if any globally searchable column
///    matches the search term. With no searchable columns the step keeps everything.
/// 3. **Column searches** (AND): a record must match every column search
/// 4. `filtered_count` is taken
/// 5. **Ordering**: stable multi-key sort, first directive is the primary key
/// 6. **Pagination**: `[start, start + length)`, empty when `start` is past the end
/// 7. Records are projected onto the configured columns
///
/// # Strategy precedence
///
/// | step | column-level | provider-level | default |
/// |------|--------------|----------------|---------|
/// | global search | [`ColumnConfiguration::search`] | [`search`](Self::search) | substring |
/// | column search | [`ColumnConfiguration::search`] | [`search_column`](Self::search_column) | substring |
/// | order | [`ColumnConfiguration::order`] | [`order`](Self::order) | natural order |
///
/// Provider registrations persist across preparations.
///
/// # Example
///
/// ```rust
/// use datatable::columns::ColumnConfiguration;
/// use datatable::providers::{CollectionProvider, Provider};
/// use datatable::query::QueryConfiguration;
/// use serde_json::json;
///
/// let records = vec![
///     json!({"id": 1, "name": "foo"}).as_object().cloned().unwrap(),
///     json!({"id": 2, "name": "foo2"}).as_object().cloned().unwrap(),
/// ];
/// let columns = vec![ColumnConfiguration::builder().name("name").build().unwrap()];
/// let query = QueryConfiguration::builder()
///     .length(2)
///     .column_order("name", "desc")
///     .build()
///     .unwrap();
///
/// let mut provider = CollectionProvider::new(records);
/// provider.prepare_for_processing(&query, &columns).unwrap();
/// let result = provider.process().unwrap();
///
/// assert_eq!(result.data()[0].get("name"), Some(&json!("foo2")));
/// assert_eq!(result.data()[0].get("id"), None);
/// ```
pub struct CollectionProvider {
    records: Vec<Record>,
    global_search: Option<SearchFn>,
    column_searches: HashMap<String, SearchFn>,
    order: Option<ProviderOrderFn>,
    case_insensitive: bool,
    search_default_columns: bool,
    prepared: Option<PreparedQuery>,
}

impl CollectionProvider {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            global_search: None,
            column_searches: HashMap::new(),
            order: None,
            case_insensitive: true,
            search_default_columns: true,
            prepared: None,
        }
    }

    /// Build a provider from values that serialize to JSON objects (e.g. structs)
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an item fails to serialize or does not
    /// serialize to an object.
    pub fn from_serialize<T, I>(items: I) -> Result<Self>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match serde_json::to_value(item) {
                Ok(Value::Object(record)) => Ok(record),
                Ok(other) => Err(DatatableError::configuration(format!(
                    "record {index} must serialize to an object, got {other}"
                ))),
                Err(err) => Err(DatatableError::configuration(format!(
                    "record {index} could not be serialized: {err}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(records))
    }

    /// The backing records
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    // ============================================================================
    // Customization
    // ============================================================================

    /// Set the global search predicate used for columns without their own
    pub fn search<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&Record, &str) -> bool + Send + Sync + 'static,
    {
        self.global_search = Some(Arc::new(predicate));
        self
    }

    /// Set the predicate used for searches on `column`, unless the column has its own
    pub fn search_column<F>(&mut self, column: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(&Record, &str) -> bool + Send + Sync + 'static,
    {
        self.column_searches.insert(column.into(), Arc::new(predicate));
        self
    }

    /// Set the comparator used for every column without its own
    ///
    /// The comparator must implement a total order; sorting may panic otherwise.
    pub fn order<F>(&mut self, comparator: F) -> &mut Self
    where
        F: Fn(&Record, &Record, &ColumnOrder) -> Ordering + Send + Sync + 'static,
    {
        self.order = Some(Arc::new(comparator));
        self
    }

    /// Whether the default substring search ignores case (default `true`)
    pub fn case_insensitive(&mut self, case_insensitive: bool) -> &mut Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Whether columns with [`Searchable::Default`](crate::columns::Searchable::Default)
    /// take part in the global search (default `true`)
    pub fn search_default_columns(&mut self, enabled: bool) -> &mut Self {
        self.search_default_columns = enabled;
        self
    }

    // ============================================================================
    // Pipeline
    // ============================================================================

    fn search_with(&self, custom: Option<&SearchFn>, column: &str, record: &Record, term: &str) -> bool {
        match custom {
            Some(predicate) => predicate(record, term),
            None => contains_term(record.get(column), term, self.case_insensitive),
        }
    }

    fn matches_global(&self, record: &Record, term: &str, searchable: &[&ColumnConfiguration]) -> bool {
        searchable.is_empty()
            || searchable.iter().any(|column| {
                let custom = column.search().or(self.global_search.as_ref());
                self.search_with(custom, column.name(), record, term)
            })
    }

    fn matches_columns(&self, record: &Record, query: &QueryConfiguration, columns: &[ColumnConfiguration]) -> bool {
        query.column_searches().iter().all(|search| {
            let column = find_column(columns, search.column());
            let custom = column
                .and_then(ColumnConfiguration::search)
                .or_else(|| self.column_searches.get(search.column()));
            self.search_with(custom, search.column(), record, search.value())
        })
    }

    fn compare(&self, a: &Record, b: &Record, order: &ColumnOrder, column: &ColumnConfiguration) -> Ordering {
        if let Some(comparator) = column.order() {
            comparator(a, b, order.direction())
        } else if let Some(comparator) = &self.order {
            comparator(a, b, order)
        } else {
            compare_with_direction(a.get(order.column()), b.get(order.column()), order.direction())
        }
    }

    fn sort(&self, records: &mut [&Record], query: &QueryConfiguration, columns: &[ColumnConfiguration]) {
        let keys: Vec<(&ColumnOrder, &ColumnConfiguration)> = query
            .column_orders()
            .iter()
            .filter_map(|order| {
                let column = find_column(columns, order.column())?;
                if column.is_orderable() {
                    Some((order, column))
                } else {
                    tracing::debug!(column = order.column(), "Skipping order on non-orderable column");
                    None
                }
            })
            .collect();

        if keys.is_empty() {
            return;
        }

        // sort_by is stable: records equal on every key keep their filtered order
        records.sort_by(|a, b| {
            keys.iter()
                .map(|(order, column)| self.compare(a, b, order, column))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }
}

/// Copy of `record` holding exactly the configured columns; missing fields become `null`
fn project(record: &Record, columns: &[ColumnConfiguration]) -> Record {
    columns
        .iter()
        .map(|column| {
            let value = record.get(column.name()).cloned().unwrap_or(Value::Null);
            (column.name().to_string(), value)
        })
        .collect()
}

impl Provider for CollectionProvider {
    fn prepare_for_processing(&mut self, query: &QueryConfiguration, columns: &[ColumnConfiguration]) -> Result<()> {
        self.prepared = None;
        validate_query(query, columns)?;

        tracing::debug!(
            columns = columns.len(),
            column_searches = query.column_searches().len(),
            column_orders = query.column_orders().len(),
            global_search = query.is_global_search(),
            "Prepared collection query"
        );

        self.prepared = Some(PreparedQuery {
            query: query.clone(),
            columns: columns.to_vec(),
        });
        Ok(())
    }

    fn process(&self) -> Result<ProcessedResult> {
        let Some(PreparedQuery { query, columns }) = &self.prepared else {
            return Err(DatatableError::invalid_state(
                "process() called before prepare_for_processing()",
            ));
        };

        let total_count = self.records.len();

        let searchable: Vec<&ColumnConfiguration> = columns
            .iter()
            .filter(|column| column.searchable().is_globally_searchable(self.search_default_columns))
            .collect();
        if query.is_global_search() && searchable.is_empty() {
            tracing::debug!("No globally searchable columns, ignoring global search");
        }

        let mut matched: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| {
                query
                    .search_value()
                    .is_none_or(|term| self.matches_global(record, term, &searchable))
            })
            .filter(|record| self.matches_columns(record, query, columns))
            .collect();
        let filtered_count = matched.len();

        self.sort(&mut matched, query, columns);

        let data: Vec<Record> = paginate(matched, query.start(), query.length())
            .into_iter()
            .map(|record| project(record, columns))
            .collect();

        tracing::debug!(
            total = total_count,
            filtered = filtered_count,
            returned = data.len(),
            draw = query.draw_call(),
            "Processed collection query"
        );

        Ok(ProcessedResult::new(data, total_count, filtered_count, query.draw_call()))
    }
}

impl fmt::Debug for CollectionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionProvider")
            .field("records", &self.records.len())
            .field("global_search", &self.global_search.is_some())
            .field("column_searches", &self.column_searches.keys().collect::<Vec<_>>())
            .field("order", &self.order.is_some())
            .field("case_insensitive", &self.case_insensitive)
            .field("search_default_columns", &self.search_default_columns)
            .field("prepared", &self.prepared.is_some())
            .finish()
    }
}
