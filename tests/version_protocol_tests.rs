use datatable::prelude::*;
use serde_json::json;

mod common;
use common::{init_tracing, params, user_columns, user_provider};

fn handle(pairs: &[(&str, &str)]) -> datatable::Result<serde_json::Value> {
    init_tracing();
    let engine = VersionEngine::for_request(params(pairs));
    let mut service = DatatableService::new(user_provider(), user_columns(), engine)?;
    service.handle_request()
}

#[test]
fn test_datatable110_round_trip() {
    let response = handle(&[
        ("draw", "12"),
        ("start", "0"),
        ("length", "2"),
        ("search[value]", "b"),
        ("columns[0][data]", "id"),
        ("columns[1][data]", "name"),
        ("columns[2][data]", "city"),
        ("order[0][column]", "0"),
        ("order[0][dir]", "desc"),
    ])
    .unwrap();

    // "b" hits Bern (1, 4) and bob/Basel (2)
    assert_eq!(
        response,
        json!({
            "draw": 12,
            "recordsTotal": 5,
            "recordsFiltered": 3,
            "data": [
                {"id": 4, "name": "dave", "city": "Bern"},
                {"id": 2, "name": "bob", "city": "Basel"}
            ]
        })
    );
}

#[test]
fn test_datatable110_column_search_and_multi_order() {
    let response = handle(&[
        ("draw", "1"),
        ("length", "-1"),
        ("columns[0][data]", "id"),
        ("columns[1][data]", "name"),
        ("columns[2][data]", "city"),
        ("columns[2][search][value]", "b"),
        ("order[0][column]", "2"),
        ("order[0][dir]", "asc"),
        ("order[1][column]", "0"),
        ("order[1][dir]", "desc"),
    ])
    .unwrap();

    let ids: Vec<_> = response["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 4, 1]);
    assert_eq!(response["recordsFiltered"], json!(3));
}

#[test]
fn test_datatable110_string_draw_token_is_echoed() {
    let response = handle(&[("draw", "req-7")]).unwrap();
    assert_eq!(response["draw"], json!("req-7"));
    assert_eq!(response["data"].as_array().unwrap().len(), 5);
}

#[test]
fn test_draw_token_with_leading_zeros_is_echoed_verbatim() {
    let response = handle(&[("draw", "007")]).unwrap();
    assert_eq!(response["draw"], json!("007"));

    let response = handle(&[("sEcho", "+5")]).unwrap();
    assert_eq!(response["sEcho"], json!("+5"));
}

#[test]
fn test_datatable19_oversized_column_count_is_rejected() {
    let err = handle(&[("sEcho", "1"), ("iColumns", "18446744073709551615")]).unwrap_err();
    assert!(matches!(err, DatatableError::InvalidRequest { .. }));
}

#[test]
fn test_datatable19_round_trip() {
    let response = handle(&[
        ("sEcho", "3"),
        ("iDisplayStart", "1"),
        ("iDisplayLength", "2"),
        ("sSearch", ""),
        ("iColumns", "3"),
        ("mDataProp_0", "id"),
        ("mDataProp_1", "name"),
        ("mDataProp_2", "city"),
        ("iSortingCols", "1"),
        ("iSortCol_0", "0"),
        ("sSortDir_0", "asc"),
    ])
    .unwrap();

    assert_eq!(
        response,
        json!({
            "sEcho": 3,
            "iTotalRecords": 5,
            "iTotalDisplayRecords": 5,
            "aaData": [[2, "bob", "Basel"], [3, "Carol", null]]
        })
    );
}

#[test]
fn test_datatable19_column_search() {
    let response = handle(&[
        ("sEcho", "1"),
        ("mDataProp_0", "id"),
        ("mDataProp_1", "name"),
        ("mDataProp_2", "city"),
        ("sSearch_1", "A"),
        ("bSearchable_1", "true"),
    ])
    .unwrap();

    // Alice, Carol and dave contain an "a"
    assert_eq!(response["iTotalDisplayRecords"], json!(3));
}

#[test]
fn test_unrecognised_request_has_no_version() {
    let err = handle(&[("start", "0"), ("length", "10")]).unwrap_err();
    assert_eq!(err, DatatableError::NoActiveVersion);
}

#[test]
fn test_malformed_parameters_are_client_errors() {
    for pairs in [
        vec![("draw", "1"), ("start", "-4")],
        vec![("draw", "1"), ("length", "many")],
        vec![("draw", "1"), ("order[0][column]", "9")],
        vec![("draw", "1"), ("order[0][column]", "0"), ("order[0][dir]", "sideways")],
        vec![("sEcho", "1"), ("iDisplayStart", "x")],
        vec![("sEcho", "1"), ("iSortCol_0", "-1")],
    ] {
        let err = handle(&pairs).unwrap_err();
        assert!(matches!(err, DatatableError::InvalidRequest { .. }), "{pairs:?}: {err}");
    }
}

#[test]
fn test_unknown_column_in_request() {
    let err = handle(&[("draw", "1"), ("columns[0][data]", "email"), ("columns[0][search][value]", "example")])
        .unwrap_err();
    assert_eq!(err, DatatableError::unknown_column("email"));
}

#[test]
fn test_explicit_version_overrides_detection() {
    let mut service = DatatableService::new(user_provider(), user_columns(), VersionEngine::new()).unwrap();
    assert!(!service.should_handle());

    service.set_version(Box::new(Datatable19::new(params(&[("sEcho", "1"), ("iDisplayLength", "1")]))));
    let response = service.handle_request().unwrap();
    assert_eq!(response["aaData"], json!([[1, "Alice", "Bern"]]));
}
