//! # datatable
//!
//! Server-side processing for DataTables-style grids: per-column configuration
//! plus a client request (search text, column filters, sort order, page window)
//! become a filtered, sorted and paginated result, rendered in the wire format
//! of the protocol revision the client speaks.
//!
//! ```text
//! RequestParams -> VersionEngine -> QueryParser -> QueryConfiguration
//!               -> Provider::prepare_for_processing -> Provider::process -> ProcessedResult
//!               -> ResponseCreator -> serde_json::Value
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use datatable::prelude::*;
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"id": 1, "name": "foo"}),
//!     json!({"id": 2, "name": "bar"}),
//! ];
//! let columns = vec![
//!     ColumnConfiguration::builder().name("id").build().unwrap(),
//!     ColumnConfiguration::builder().name("name").build().unwrap(),
//! ];
//!
//! let request: RequestParams = [("draw", "1"), ("search[value]", "ba")].into_iter().collect();
//! let provider = CollectionProvider::from_serialize(records).unwrap();
//! let mut service = DatatableService::new(provider, columns, VersionEngine::for_request(request)).unwrap();
//!
//! let response = service.handle_request().unwrap();
//! assert_eq!(response["recordsFiltered"], 1);
//! assert_eq!(response["data"][0]["name"], "bar");
//! ```

pub mod columns;
pub mod errors;
pub mod filtering;
pub mod providers;
pub mod query;
pub mod service;
pub mod versions;

/// One row of data: field name to value
pub type Record = serde_json::Map<String, serde_json::Value>;

pub use errors::{DatatableError, Result};
pub use service::DatatableService;

pub mod prelude {
    pub use crate::Record;
    pub use crate::columns::{ColumnConfiguration, Searchable};
    pub use crate::errors::{DatatableError, Result};
    pub use crate::providers::{CollectionProvider, ProcessedResult, Provider};
    pub use crate::query::{ColumnOrder, ColumnSearch, Direction, PageLength, QueryConfiguration};
    pub use crate::service::DatatableService;
    pub use crate::versions::{Datatable19, Datatable110, RequestParams, Version, VersionEngine};
}
