#![allow(dead_code)]

use std::collections::HashMap;

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use datatable::prelude::*;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub city: Option<String>,
    pub active: bool,
}

pub fn users() -> Vec<User> {
    [
        (1, "Alice", "alice@example.com", Some("Bern"), true),
        (2, "bob", "bob@example.com", Some("Basel"), false),
        (3, "Carol", "carol@example.org", None, true),
        (4, "dave", "dave@example.org", Some("Bern"), true),
        (5, "Eve", "eve@example.net", Some("Zurich"), false),
    ]
    .into_iter()
    .map(|(id, name, email, city, active)| User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        city: city.map(str::to_string),
        active,
    })
    .collect()
}

pub fn user_provider() -> CollectionProvider {
    CollectionProvider::from_serialize(users()).expect("users serialize to objects")
}

/// `id`, `name`, `city`; email is deliberately not exposed
pub fn user_columns() -> Vec<ColumnConfiguration> {
    ["id", "name", "city"]
        .into_iter()
        .map(|name| ColumnConfiguration::builder().name(name).build().unwrap())
        .collect()
}

/// The two-record fixture used throughout the provider tests
pub fn foo_records() -> Vec<Record> {
    [json!({"id": 1, "name": "foo"}), json!({"id": 2, "name": "foo2"})]
        .into_iter()
        .map(|value| value.as_object().cloned().unwrap())
        .collect()
}

pub fn foo_bar_records() -> Vec<Record> {
    [json!({"id": 1, "name": "foo"}), json!({"id": 2, "name": "bar"})]
        .into_iter()
        .map(|value| value.as_object().cloned().unwrap())
        .collect()
}

pub fn column(name: &str) -> ColumnConfiguration {
    ColumnConfiguration::builder().name(name).build().unwrap()
}

pub fn params(pairs: &[(&str, &str)]) -> RequestParams {
    pairs.iter().copied().collect()
}

pub fn ids(result: &ProcessedResult) -> Vec<i64> {
    result
        .data()
        .iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect()
}

/// Query string with DataTables' bracketed keys percent-encoded
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    let encode = |s: &str| {
        s.replace('%', "%25")
            .replace('[', "%5B")
            .replace(']', "%5D")
            .replace(' ', "%20")
            .replace('&', "%26")
            .replace('=', "%3D")
    };
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

async fn users_handler(Query(params): Query<HashMap<String, String>>) -> std::result::Result<Json<Value>, DatatableError> {
    let engine = VersionEngine::for_request(RequestParams::from(params));
    let mut service = DatatableService::new(user_provider(), user_columns(), engine)?;
    Ok(Json(service.handle_request()?))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn setup_test_app() -> Router {
    let api = Router::new().route("/users", get(users_handler));
    Router::new().nest("/api/v1", api)
}
