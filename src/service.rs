//! Request orchestration: version lookup, parsing, processing and rendering.

use serde_json::Value;

use crate::columns::{ColumnConfiguration, validate_columns};
use crate::errors::Result;
use crate::providers::Provider;
use crate::versions::{Version, VersionEngine};

/// A configured datatable ready to answer requests.
///
/// ```rust,ignore
/// let engine = VersionEngine::for_request(RequestParams::from(params));
/// let mut service = DatatableService::new(CollectionProvider::new(records), columns, engine)?;
/// if service.should_handle() {
///     return Ok(Json(service.handle_request()?));
/// }
/// ```
#[derive(Debug)]
pub struct DatatableService<P> {
    provider: P,
    columns: Vec<ColumnConfiguration>,
    versions: VersionEngine,
}

impl<P: Provider> DatatableService<P> {
    /// # Errors
    ///
    /// Configuration error when `columns` contains duplicate names.
    pub fn new(provider: P, columns: Vec<ColumnConfiguration>, versions: VersionEngine) -> Result<Self> {
        validate_columns(&columns)?;
        Ok(Self {
            provider,
            columns,
            versions,
        })
    }

    /// Use `version` for subsequent requests
    pub fn set_version(&mut self, version: Box<dyn Version>) {
        self.versions.set_version(version);
    }

    /// Whether a protocol version is active for the current request
    #[must_use]
    pub fn should_handle(&self) -> bool {
        self.versions.has_version()
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnConfiguration] {
        &self.columns
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Parse the active version's request, process it and render the response.
    ///
    /// # Errors
    ///
    /// [`DatatableError::NoActiveVersion`](crate::errors::DatatableError::NoActiveVersion)
    /// when [`should_handle`](Self::should_handle) is false, otherwise whatever
    /// parsing, preparation or rendering fails with.
    pub fn handle_request(&mut self) -> Result<Value> {
        let version = self.versions.version()?;
        let query = version.query_parser().parse(&self.columns)?;
        self.provider.prepare_for_processing(&query, &self.columns)?;
        let result = self.provider.process()?;

        tracing::debug!(
            version = version.name(),
            draw = result.draw_call(),
            filtered = result.filtered_count(),
            "Handled datatable request"
        );
        version
            .response_creator()
            .create_response(result, &query, &self.columns)
    }
}
