//! Protocol-independent assembly of a [`QueryConfiguration`] from what a
//! DataTables client sends. Each version only maps its own parameter names
//! onto these types.

use serde_json::Value;

use crate::columns::{ColumnConfiguration, Searchable, find_column};
use crate::errors::{DatatableError, Result};
use crate::filtering::truncate_search_value;
use crate::query::{Direction, QueryConfiguration};

/// Paging, correlation and global search parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClientPaging {
    pub draw: String,
    pub start: i64,
    pub length: i64,
    pub search: String,
}

/// One column as described by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClientColumn {
    /// Resolved column name, `None` when the client column maps to nothing
    pub name: Option<String>,
    pub searchable: bool,
    pub orderable: bool,
    pub search: String,
}

/// One sort directive as sent by the client: a client column index and a direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClientOrder {
    pub column_index: usize,
    pub direction: String,
}

/// Name of the client column at `index`.
///
/// Clients send either the field name (object data sources) or the column
/// index (array data sources, or nothing at all); indexes resolve against the
/// configured columns.
pub(crate) fn resolve_column_name(data: Option<&str>, index: usize, columns: &[ColumnConfiguration]) -> Option<String> {
    let data = data.map(str::trim).unwrap_or_default();
    if !data.is_empty() && !data.bytes().all(|b| b.is_ascii_digit()) {
        return Some(data.to_string());
    }

    let index = data.parse().unwrap_or(index);
    columns.get(index).map(|column| column.name().to_string())
}

/// Build the query for the client's request
pub(crate) fn build_query(
    paging: ClientPaging,
    client_columns: &[ClientColumn],
    orders: &[ClientOrder],
    columns: &[ColumnConfiguration],
) -> Result<QueryConfiguration> {
    let mut builder = QueryConfiguration::builder()
        .draw_call(paging.draw)
        .start(paging.start)
        .length(paging.length)
        .search_value(truncate_search_value(&paging.search));

    for client in client_columns {
        let Some(name) = &client.name else { continue };
        if client.search.is_empty() || !client.searchable {
            continue;
        }
        if find_column(columns, name).is_some_and(|column| column.searchable() == Searchable::None) {
            tracing::debug!(column = %name, "Ignoring search on unsearchable column");
            continue;
        }
        builder = builder.column_search(name, truncate_search_value(&client.search));
    }

    for order in orders {
        let client = client_columns.get(order.column_index);
        let name = client
            .and_then(|client| client.name.clone())
            .or_else(|| columns.get(order.column_index).map(|column| column.name().to_string()))
            .ok_or_else(|| {
                DatatableError::invalid_request(format!(
                    "order references unknown column index {}",
                    order.column_index
                ))
            })?;

        let orderable = client.is_none_or(|client| client.orderable)
            && find_column(columns, &name).is_none_or(ColumnConfiguration::is_orderable);
        if !orderable {
            tracing::debug!(column = %name, "Dropping order on non-orderable column");
            continue;
        }

        let direction: Direction = order
            .direction
            .parse()
            .map_err(|_| DatatableError::invalid_request(format!("invalid sort direction '{}'", order.direction)))?;
        builder = builder.column_order_direction(name, direction);
    }

    // Builder rejections here stem from client input
    builder.build().map_err(|err| match err {
        DatatableError::Configuration { message } => DatatableError::invalid_request(message),
        other => other,
    })
}

/// Upper bound on the number of columns a client may declare
pub const MAX_CLIENT_COLUMNS: usize = 1_000;

/// Draw token as rendered in responses: a number when it renders back to the
/// exact same text, otherwise the verbatim string
pub(crate) fn draw_token(draw: &str) -> Value {
    match draw.parse::<u64>() {
        Ok(number) if number.to_string() == draw => Value::from(number),
        _ => Value::from(draw),
    }
}
