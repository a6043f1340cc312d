//! DataTables 1.10+ server-side protocol.
//!
//! ```text
//! GET /users?draw=3&start=0&length=10&search[value]=foo
//!     &columns[0][data]=id&columns[0][searchable]=true&columns[0][orderable]=true
//!     &columns[0][search][value]=
//!     &order[0][column]=0&order[0][dir]=desc
//!
//! {"draw": 3, "recordsTotal": 57, "recordsFiltered": 12, "data": [{"id": 7, ...}]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DisplayFromStr, serde_as};
use utoipa::ToSchema;

use super::client::{ClientColumn, ClientOrder, ClientPaging, build_query, draw_token, resolve_column_name};
use super::{QueryParser, RequestParams, ResponseCreator, Version};
use crate::columns::ColumnConfiguration;
use crate::errors::Result;
use crate::filtering::DEFAULT_PAGE_LENGTH;
use crate::providers::ProcessedResult;
use crate::query::QueryConfiguration;

fn default_length() -> i64 {
    DEFAULT_PAGE_LENGTH
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct PagingParams {
    #[serde(default)]
    draw: String,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    start: i64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_length")]
    length: i64,
    #[serde(rename = "search[value]", default)]
    search: String,
}

/// Version 1.10 of the protocol, bound to one request
#[derive(Debug)]
pub struct Datatable110 {
    parser: Datatable110QueryParser,
    creator: Datatable110ResponseCreator,
}

impl Datatable110 {
    #[must_use]
    pub fn new(request: RequestParams) -> Self {
        Self {
            parser: Datatable110QueryParser { request },
            creator: Datatable110ResponseCreator,
        }
    }
}

impl Version for Datatable110 {
    fn name(&self) -> &'static str {
        "1.10"
    }

    fn query_parser(&self) -> &dyn QueryParser {
        &self.parser
    }

    fn response_creator(&self) -> &dyn ResponseCreator {
        &self.creator
    }
}

/// Reads `draw`/`start`/`length`/`search[value]`/`columns[i][..]`/`order[i][..]`
#[derive(Debug)]
pub struct Datatable110QueryParser {
    request: RequestParams,
}

impl Datatable110QueryParser {
    fn client_columns(&self, columns: &[ColumnConfiguration]) -> Vec<ClientColumn> {
        let request = &self.request;
        (0..)
            .take_while(|i| request.contains(&format!("columns[{i}][data]")))
            .map(|i| ClientColumn {
                name: resolve_column_name(request.get(&format!("columns[{i}][data]")), i, columns),
                searchable: request.flag(&format!("columns[{i}][searchable]"), true),
                orderable: request.flag(&format!("columns[{i}][orderable]"), true),
                search: request
                    .get(&format!("columns[{i}][search][value]"))
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect()
    }

    fn orders(&self) -> Result<Vec<ClientOrder>> {
        let mut orders = Vec::new();
        for i in 0.. {
            let Some(column_index) = self.request.index(&format!("order[{i}][column]"))? else {
                break;
            };
            let direction = self.request.get(&format!("order[{i}][dir]")).unwrap_or("asc");
            orders.push(ClientOrder {
                column_index,
                direction: direction.to_string(),
            });
        }
        Ok(orders)
    }
}

impl QueryParser for Datatable110QueryParser {
    fn can_parse(&self) -> bool {
        self.request.contains("draw")
    }

    fn parse(&self, columns: &[ColumnConfiguration]) -> Result<QueryConfiguration> {
        let paging: PagingParams = self.request.deserialize()?;
        let paging = ClientPaging {
            draw: paging.draw,
            start: paging.start,
            length: paging.length,
            search: paging.search,
        };
        build_query(paging, &self.client_columns(columns), &self.orders()?, columns)
    }
}

/// Wire response of the 1.10 protocol
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Datatable110Response {
    /// Echo of the request's draw counter
    pub draw: Value,
    pub records_total: usize,
    pub records_filtered: usize,
    /// One object per row, keyed by column name
    pub data: Vec<Value>,
}

/// Renders `{draw, recordsTotal, recordsFiltered, data}`
#[derive(Debug)]
pub struct Datatable110ResponseCreator;

impl ResponseCreator for Datatable110ResponseCreator {
    fn create_response(
        &self,
        result: ProcessedResult,
        _query: &QueryConfiguration,
        _columns: &[ColumnConfiguration],
    ) -> Result<Value> {
        let response = Datatable110Response {
            draw: draw_token(result.draw_call()),
            records_total: result.total_count(),
            records_filtered: result.filtered_count(),
            data: result.into_data().into_iter().map(Value::Object).collect(),
        };
        Ok(serde_json::to_value(response)?)
    }
}
