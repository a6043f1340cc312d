//! # Protocol versions
//!
//! A [`Version`] pairs a [`QueryParser`] (raw request parameters to a
//! [`QueryConfiguration`]) with a [`ResponseCreator`] ([`ProcessedResult`] to the
//! wire JSON). Each version owns the request it was built for.
//!
//! [`VersionEngine`] holds the active version for one request-handling context.
//! [`VersionEngine::for_request`] picks it by the shape of the request:
//!
//! | revision | detected by | response keys |
//! |---|---|---|
//! | [`Datatable110`] | `draw` | `draw`, `recordsTotal`, `recordsFiltered`, `data` |
//! | [`Datatable19`] | `sEcho` | `sEcho`, `iTotalRecords`, `iTotalDisplayRecords`, `aaData` |

mod client;
pub mod datatable110;
pub mod datatable19;
pub mod request;

pub use client::MAX_CLIENT_COLUMNS;
pub use datatable19::Datatable19;
pub use datatable110::Datatable110;
pub use request::RequestParams;

use std::fmt;

use serde_json::Value;

use crate::columns::ColumnConfiguration;
use crate::errors::{DatatableError, Result};
use crate::providers::ProcessedResult;
use crate::query::QueryConfiguration;

/// Turns the version's request into a query
pub trait QueryParser: Send + Sync {
    /// Whether the owned request has the shape of this protocol revision
    fn can_parse(&self) -> bool;

    /// # Errors
    ///
    /// Invalid request error for malformed parameters.
    fn parse(&self, columns: &[ColumnConfiguration]) -> Result<QueryConfiguration>;
}

/// Renders a processed result in the version's wire format
pub trait ResponseCreator: Send + Sync {
    /// # Errors
    ///
    /// Invalid state error when the response cannot be serialized.
    fn create_response(
        &self,
        result: ProcessedResult,
        query: &QueryConfiguration,
        columns: &[ColumnConfiguration],
    ) -> Result<Value>;
}

pub trait Version: Send + Sync {
    /// Human-readable revision, e.g. `"1.10"`
    fn name(&self) -> &'static str;

    fn query_parser(&self) -> &dyn QueryParser;

    fn response_creator(&self) -> &dyn ResponseCreator;
}

/// Holds at most one active [`Version`].
#[derive(Default)]
pub struct VersionEngine {
    version: Option<Box<dyn Version>>,
}

impl VersionEngine {
    /// Engine without an active version
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_version(version: impl Version + 'static) -> Self {
        Self {
            version: Some(Box::new(version)),
        }
    }

    /// Engine for the first supported revision that can parse `request`
    ///
    /// 1.10 is tried before the legacy 1.9 protocol. The engine has no active
    /// version when neither matches.
    #[must_use]
    pub fn for_request(request: RequestParams) -> Self {
        Self::from_candidates(vec![
            Box::new(Datatable110::new(request.clone())),
            Box::new(Datatable19::new(request)),
        ])
    }

    /// Engine for the first candidate whose parser accepts its request
    #[must_use]
    pub fn from_candidates(candidates: Vec<Box<dyn Version>>) -> Self {
        let version = candidates
            .into_iter()
            .find(|version| version.query_parser().can_parse());

        match &version {
            Some(version) => tracing::debug!(version = version.name(), "Selected datatable version"),
            None => tracing::debug!("No datatable version matches the request"),
        }
        Self { version }
    }

    /// Replace the active version
    pub fn set_version(&mut self, version: Box<dyn Version>) {
        self.version = Some(version);
    }

    #[must_use]
    pub fn has_version(&self) -> bool {
        self.version.is_some()
    }

    /// # Errors
    ///
    /// [`DatatableError::NoActiveVersion`] when no version is set.
    pub fn version(&self) -> Result<&dyn Version> {
        self.version.as_deref().ok_or(DatatableError::NoActiveVersion)
    }
}

impl fmt::Debug for VersionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionEngine")
            .field("version", &self.version.as_ref().map(|version| version.name()))
            .finish()
    }
}
