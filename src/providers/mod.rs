//! # Providers
//!
//! A [`Provider`] executes one prepared query against its data source:
//! global search, per-column search, ordering and pagination, in that order.
//!
//! ## Lifecycle
//!
//! ```text
//! prepare_for_processing(&query, &columns)   validate + store
//!        |
//! process()                                  filter -> order -> paginate -> ProcessedResult
//! ```
//!
//! `process()` before a successful preparation fails with
//! [`DatatableError::InvalidState`]. Preparation needs `&mut self`, so a
//! provider cannot be re-prepared while a result is being produced; callers
//! that need parallelism use one provider per request.
//!
//! [`CollectionProvider`] is the in-memory implementation. Providers over other
//! sources should call [`validate_query`] from their own preparation so they
//! reject the same queries.

pub mod collection;

pub use collection::{CollectionProvider, ProviderOrderFn};

use serde::Serialize;

use crate::Record;
use crate::columns::{ColumnConfiguration, find_column, validate_columns};
use crate::errors::{DatatableError, Result};
use crate::query::QueryConfiguration;

/// Outcome of one processed query.
///
/// Invariant: `data.len() <= filtered_count <= total_count`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedResult {
    data: Vec<Record>,
    total_count: usize,
    filtered_count: usize,
    draw_call: String,
}

impl ProcessedResult {
    #[must_use]
    pub fn new(data: Vec<Record>, total_count: usize, filtered_count: usize, draw_call: impl Into<String>) -> Self {
        debug_assert!(data.len() <= filtered_count && filtered_count <= total_count);
        Self {
            data,
            total_count,
            filtered_count,
            draw_call: draw_call.into(),
        }
    }

    /// Records of the requested page, projected onto the configured columns
    #[must_use]
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> Vec<Record> {
        self.data
    }

    /// Number of records before any filtering
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Number of records after filtering, before pagination
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.filtered_count
    }

    #[must_use]
    pub fn draw_call(&self) -> &str {
        &self.draw_call
    }
}

/// Executes filtering, ordering and pagination against a data source.
pub trait Provider {
    /// Validate `query` against `columns` and keep both for [`process`](Self::process)
    ///
    /// # Errors
    ///
    /// Configuration error for duplicate column names, unknown column error when
    /// the query searches or orders on a column missing from `columns`.
    fn prepare_for_processing(&mut self, query: &QueryConfiguration, columns: &[ColumnConfiguration]) -> Result<()>;

    /// Run the prepared query. Calling it again returns the same result.
    ///
    /// # Errors
    ///
    /// Invalid state error when nothing has been prepared.
    fn process(&self) -> Result<ProcessedResult>;
}

/// Checks shared by every provider's preparation step.
///
/// # Errors
///
/// See [`Provider::prepare_for_processing`].
pub fn validate_query(query: &QueryConfiguration, columns: &[ColumnConfiguration]) -> Result<()> {
    validate_columns(columns)?;

    if let Some(column) = query
        .referenced_columns()
        .find(|name| find_column(columns, name).is_none())
    {
        return Err(DatatableError::unknown_column(column));
    }
    Ok(())
}
