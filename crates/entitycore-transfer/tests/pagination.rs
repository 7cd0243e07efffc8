mod support;

use serde_json::{Value, json};

use entitycore_core::Error;
use entitycore_transfer::{Method, stream_paginated};
use support::{MockTransport, json_response};

const URL: &str = "http://api/entitycore/simulation";

fn page(page: u64, page_size: u64, total: u64, items: Vec<Value>) -> Value {
    json!({
        "data": items,
        "pagination": {"page": page, "page_size": page_size, "total_items": total},
    })
}

fn items(range: std::ops::Range<u64>) -> Vec<Value> {
    range.map(|i| json!({"i": i})).collect()
}

#[tokio::test]
async fn test_streams_all_pages_in_order() {
    let transport = MockTransport::new();
    transport.expect(Method::Get, URL, json_response(200, page(1, 10, 25, items(0..10))));
    transport.expect(Method::Get, URL, json_response(200, page(2, 10, 25, items(10..20))));
    transport.expect(Method::Get, URL, json_response(200, page(3, 10, 25, items(20..25))));
    let api = support::api(transport);

    let records: Vec<Value> =
        stream_paginated(api.clone(), URL.to_string(), Method::Get, Vec::new(), Some(10), None)
            .unwrap()
            .all()
            .await
            .unwrap();

    assert_eq!(records.len(), 25);
    let order: Vec<u64> = records.iter().map(|r| r["i"].as_u64().unwrap()).collect();
    assert_eq!(order, (0..25).collect::<Vec<_>>());

    let requests = api.transport().requests_for(Method::Get, URL);
    assert_eq!(requests.len(), 3);
    for (index, request) in requests.iter().enumerate() {
        let expected_page = (index + 1).to_string();
        assert!(request.query.contains(&("page".to_string(), expected_page)));
        assert!(request.query.contains(&("page_size".to_string(), "10".to_string())));
    }
}

#[tokio::test]
async fn test_limit_stops_mid_page() {
    let transport = MockTransport::new();
    transport.expect(Method::Get, URL, json_response(200, page(1, 10, 25, items(0..10))));
    transport.expect(Method::Get, URL, json_response(200, page(2, 10, 25, items(10..20))));
    let api = support::api(transport);

    let records: Vec<Value> =
        stream_paginated(api.clone(), URL.to_string(), Method::Get, Vec::new(), Some(10), Some(13))
            .unwrap()
            .all()
            .await
            .unwrap();

    assert_eq!(records.len(), 13);
    // page 3 is never requested once the limit is reached
    assert_eq!(api.transport().requests_for(Method::Get, URL).len(), 2);
}

#[tokio::test]
async fn test_limit_at_page_boundary_stops_fetching() {
    let transport = MockTransport::new();
    transport.expect(Method::Get, URL, json_response(200, page(1, 10, 25, items(0..10))));
    let api = support::api(transport);

    let records: Vec<Value> =
        stream_paginated(api.clone(), URL.to_string(), Method::Get, Vec::new(), Some(10), Some(10))
            .unwrap()
            .all()
            .await
            .unwrap();

    assert_eq!(records.len(), 10);
    assert_eq!(api.transport().requests_for(Method::Get, URL).len(), 1);
}

#[tokio::test]
async fn test_short_page_terminates_stream() {
    let transport = MockTransport::new();
    transport.expect(Method::Get, URL, json_response(200, page(1, 10, 4, items(0..4))));
    let api = support::api(transport);

    let records: Vec<Value> =
        stream_paginated(api.clone(), URL.to_string(), Method::Get, Vec::new(), Some(10), None)
            .unwrap()
            .all()
            .await
            .unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(api.transport().requests_for(Method::Get, URL).len(), 1);
}

#[tokio::test]
async fn test_server_default_page_size() {
    let transport = MockTransport::new();
    transport.expect(Method::Get, URL, json_response(200, page(1, 10, 14, items(0..10))));
    transport.expect(Method::Get, URL, json_response(200, page(2, 10, 14, items(10..14))));
    let api = support::api(transport);

    let records: Vec<Value> =
        stream_paginated(api.clone(), URL.to_string(), Method::Get, Vec::new(), None, None)
            .unwrap()
            .all()
            .await
            .unwrap();

    assert_eq!(records.len(), 14);

    // without an explicit page size, only the page number is requested
    let requests = api.transport().requests_for(Method::Get, URL);
    assert!(requests.iter().all(|r| !r.query.iter().any(|(k, _)| k == "page_size")));
}

#[tokio::test]
async fn test_page_mismatch_fails_without_yielding() {
    let transport = MockTransport::new();
    transport.expect(Method::Get, URL, json_response(200, page(1, 10, 25, items(0..10))));
    // server re-paginated: reports page 7 for our page-2 request
    transport.expect(Method::Get, URL, json_response(200, page(7, 10, 25, items(10..20))));
    let api = support::api(transport);

    let mut stream =
        stream_paginated::<Value, _>(api, URL.to_string(), Method::Get, Vec::new(), Some(10), None)
            .unwrap();

    use futures_util::StreamExt;
    for _ in 0..10 {
        assert!(stream.next().await.unwrap().is_ok());
    }
    let failure = stream.next().await.unwrap();
    assert!(matches!(
        failure,
        Err(Error::PaginationMismatch { field: "page", expected: 2, actual: 7 })
    ));
}

#[tokio::test]
async fn test_page_size_mismatch_names_both_values() {
    let transport = MockTransport::new();
    transport.expect(Method::Get, URL, json_response(200, page(1, 50, 25, items(0..10))));
    let api = support::api(transport);

    let err = stream_paginated::<Value, _>(api, URL.to_string(), Method::Get, Vec::new(), Some(10), None)
        .unwrap()
        .all()
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("page_size"));
    assert!(message.contains("10"));
    assert!(message.contains("50"));
}

#[tokio::test]
async fn test_query_params_are_preserved() {
    let transport = MockTransport::new();
    transport.expect(Method::Get, URL, json_response(200, page(1, 10, 1, items(0..1))));
    let api = support::api(transport);

    stream_paginated::<Value, _>(
        api.clone(),
        URL.to_string(),
        Method::Get,
        vec![("name".to_string(), "L5_TPC".to_string())],
        Some(10),
        None,
    )
    .unwrap()
    .all()
    .await
    .unwrap();

    let request = &api.transport().requests_for(Method::Get, URL)[0];
    assert!(request.query.contains(&("name".to_string(), "L5_TPC".to_string())));
}
