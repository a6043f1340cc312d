//! Legacy DataTables 1.9 server-side protocol.
//!
//! ```text
//! GET /users?sEcho=3&iDisplayStart=0&iDisplayLength=10&sSearch=foo
//!     &iColumns=2&mDataProp_0=id&mDataProp_1=name&bSearchable_0=true&sSearch_0=
//!     &iSortingCols=1&iSortCol_0=0&sSortDir_0=desc&bSortable_0=true
//!
//! {"sEcho": 3, "iTotalRecords": 57, "iTotalDisplayRecords": 12, "aaData": [[7, "foo"]]}
//! ```
//!
//! Rows are rendered as arrays in column configuration order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DisplayFromStr, serde_as};
use utoipa::ToSchema;

use super::client::{
    ClientColumn, ClientOrder, ClientPaging, MAX_CLIENT_COLUMNS, build_query, draw_token, resolve_column_name,
};
use super::{QueryParser, RequestParams, ResponseCreator, Version};
use crate::columns::ColumnConfiguration;
use crate::errors::{DatatableError, Result};
use crate::filtering::DEFAULT_PAGE_LENGTH;
use crate::providers::ProcessedResult;
use crate::query::QueryConfiguration;

fn default_length() -> i64 {
    DEFAULT_PAGE_LENGTH
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPagingParams {
    #[serde(default)]
    s_echo: String,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    i_display_start: i64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_length")]
    i_display_length: i64,
    #[serde(default)]
    s_search: String,
}

/// Version 1.9 of the protocol, bound to one request
#[derive(Debug)]
pub struct Datatable19 {
    parser: Datatable19QueryParser,
    creator: Datatable19ResponseCreator,
}

impl Datatable19 {
    #[must_use]
    pub fn new(request: RequestParams) -> Self {
        Self {
            parser: Datatable19QueryParser { request },
            creator: Datatable19ResponseCreator,
        }
    }
}

impl Version for Datatable19 {
    fn name(&self) -> &'static str {
        "1.9"
    }

    fn query_parser(&self) -> &dyn QueryParser {
        &self.parser
    }

    fn response_creator(&self) -> &dyn ResponseCreator {
        &self.creator
    }
}

#[derive(Debug)]
pub struct Datatable19QueryParser {
    request: RequestParams,
}

impl Datatable19QueryParser {
    /// `iColumns` when sent, otherwise the run of `mDataProp_i` parameters
    fn column_count(&self) -> Result<usize> {
        if let Some(count) = self.request.index("iColumns")? {
            if count > MAX_CLIENT_COLUMNS {
                return Err(DatatableError::invalid_request(format!(
                    "iColumns must not exceed {MAX_CLIENT_COLUMNS}, got {count}"
                )));
            }
            return Ok(count);
        }
        Ok((0..MAX_CLIENT_COLUMNS)
            .take_while(|i| self.request.contains(&format!("mDataProp_{i}")))
            .count())
    }

    fn client_columns(&self, columns: &[ColumnConfiguration]) -> Result<Vec<ClientColumn>> {
        let request = &self.request;
        let columns = (0..self.column_count()?)
            .map(|i| ClientColumn {
                name: resolve_column_name(request.get(&format!("mDataProp_{i}")), i, columns),
                searchable: request.flag(&format!("bSearchable_{i}"), true),
                orderable: request.flag(&format!("bSortable_{i}"), true),
                search: request.get(&format!("sSearch_{i}")).unwrap_or_default().to_string(),
            })
            .collect();
        Ok(columns)
    }

    fn orders(&self) -> Result<Vec<ClientOrder>> {
        let declared = self.request.index("iSortingCols")?;
        let mut orders = Vec::new();
        for i in 0..declared.unwrap_or(usize::MAX) {
            let Some(column_index) = self.request.index(&format!("iSortCol_{i}"))? else {
                break;
            };
            let direction = self.request.get(&format!("sSortDir_{i}")).unwrap_or("asc");
            orders.push(ClientOrder {
                column_index,
                direction: direction.to_string(),
            });
        }
        Ok(orders)
    }
}

impl QueryParser for Datatable19QueryParser {
    fn can_parse(&self) -> bool {
        self.request.contains("sEcho")
    }

    fn parse(&self, columns: &[ColumnConfiguration]) -> Result<QueryConfiguration> {
        let paging: LegacyPagingParams = self.request.deserialize()?;
        let paging = ClientPaging {
            draw: paging.s_echo,
            start: paging.i_display_start,
            length: paging.i_display_length,
            search: paging.s_search,
        };
        build_query(paging, &self.client_columns(columns)?, &self.orders()?, columns)
    }
}

/// Wire response of the 1.9 protocol
#[derive(Debug, Serialize, ToSchema)]
pub struct Datatable19Response {
    #[serde(rename = "sEcho")]
    pub s_echo: Value,
    #[serde(rename = "iTotalRecords")]
    pub i_total_records: usize,
    #[serde(rename = "iTotalDisplayRecords")]
    pub i_total_display_records: usize,
    /// One array per row, values in column order
    #[serde(rename = "aaData")]
    pub aa_data: Vec<Vec<Value>>,
}

/// Renders `{sEcho, iTotalRecords, iTotalDisplayRecords, aaData}`
#[derive(Debug)]
pub struct Datatable19ResponseCreator;

impl ResponseCreator for Datatable19ResponseCreator {
    fn create_response(
        &self,
        result: ProcessedResult,
        _query: &QueryConfiguration,
        columns: &[ColumnConfiguration],
    ) -> Result<Value> {
        let s_echo = draw_token(result.draw_call());
        let i_total_records = result.total_count();
        let i_total_display_records = result.filtered_count();
        let aa_data = result
            .into_data()
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|column| record.remove(column.name()).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        let response = Datatable19Response {
            s_echo,
            i_total_records,
            i_total_display_records,
            aa_data,
        };
        Ok(serde_json::to_value(response)?)
    }
}
