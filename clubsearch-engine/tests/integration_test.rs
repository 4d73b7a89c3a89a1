//! Gateway tests against a mock engine.

use clubsearch_engine::*;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const INDEX: &str = "clubs";

fn client_for(server: &MockServer) -> SearchClient {
    SearchClient::connect(SearchConfig::new(server.uri()).with_basic_auth("elastic", "changeme"))
        .unwrap()
}

// Nothing listens on the discard port.
fn unreachable_client() -> SearchClient {
    SearchClient::connect(
        SearchConfig::new("http://127.0.0.1:9").with_request_timeout(Duration::from_secs(2)),
    )
    .unwrap()
}

fn body_json(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

fn ndjson_lines(request: &Request) -> Vec<Value> {
    String::from_utf8(request.body.clone())
        .unwrap()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Document with a fixed id and raw source text.
struct RawDoc {
    id: Option<&'static str>,
    source: &'static str,
}

impl Document for RawDoc {
    fn document_id(&self) -> Option<String> {
        self.id.map(str::to_string)
    }

    fn to_source(&self) -> serde_json::Result<Box<RawValue>> {
        RawValue::from_string(self.source.to_string())
    }
}

fn search_response(hits: Value) -> Value {
    let total = hits.as_array().map_or(0, Vec::len);
    json!({
        "took": 2,
        "timed_out": false,
        "hits": {
            "total": { "value": total, "relation": "eq" },
            "max_score": 1.0,
            "hits": hits
        }
    })
}

// ========== Connection ==========

#[tokio::test]
async fn test_ping_reports_cluster_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "node-1",
            "cluster_name": "itsm",
            "version": { "number": "7.17.0" }
        })))
        .mount(&server)
        .await;

    let info = client_for(&server).ping().await.unwrap();
    assert_eq!(info, "itsm (node node-1, version 7.17.0)");

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0].headers.get("authorization").unwrap();
    assert!(auth.to_str().unwrap().starts_with("Basic "));
}

#[tokio::test]
async fn test_ping_rejected_is_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server).ping().await.unwrap_err();
    assert!(matches!(err, SearchError::Connection(_)));
}

#[tokio::test]
async fn test_ping_unreachable_is_connection_error() {
    let err = unreachable_client().ping().await.unwrap_err();
    assert!(matches!(err, SearchError::Connection(_)));
}

// ========== Index management ==========

#[tokio::test]
async fn test_create_index_sends_settings() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = IndexSettings::new().mappings(
        Mapping::new()
            .field("club_id", MappingField::keyword())
            .field("history", MappingField::nested().property("rank", MappingField::integer())),
    );
    client_for(&server).create_index(INDEX, &settings).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let create = requests.iter().find(|r| r.method.as_str() == "PUT").unwrap();
    assert_eq!(
        body_json(create),
        json!({
            "mappings": {
                "properties": {
                    "club_id": { "type": "keyword" },
                    "history": { "type": "nested", "properties": { "rank": { "type": "integer" } } }
                }
            }
        })
    );
}

#[tokio::test]
async fn test_create_existing_index_sends_no_create() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_index(INDEX, &IndexSettings::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::IndexExists(name) if name == INDEX));
}

#[tokio::test]
async fn test_create_index_conflict_from_engine() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "resource_already_exists_exception",
                "reason": "index [clubs/abc] already exists"
            },
            "status": 400
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_index(INDEX, &IndexSettings::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::IndexExists(_)));
}

#[tokio::test]
async fn test_create_index_other_failure_is_engine_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "illegal_argument_exception", "reason": "unknown analyzer [ik_smart]" },
            "status": 400
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_index(INDEX, &IndexSettings::new())
        .await
        .unwrap_err();
    match err {
        SearchError::Engine { status, reason } => {
            assert_eq!(status, 400);
            assert_eq!(reason, "unknown analyzer [ik_smart]");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_missing_index() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.delete_index(INDEX).await,
        Err(SearchError::IndexNotFound(_))
    ));
}

#[tokio::test]
async fn test_refresh_and_exists() {
    let server = MockServer::start().await;
    Mock::given(path("/clubs/_refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_shards": {} })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.refresh_index(INDEX).await.unwrap();
    assert!(client.index_exists(INDEX).await.unwrap());
}

// ========== Documents ==========

#[tokio::test]
async fn test_insert_document_upserts_by_id() {
    let server = MockServer::start().await;
    Mock::given(path("/clubs/_doc/1"))
        .and(query_param("refresh", "true"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_index": INDEX, "_id": "1", "result": "created"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = RawDoc {
        id: Some("1"),
        source: r#"{"club_id":"1","club_name":"Alice","raw":{"z":1,"a":[2, 3]}}"#,
    };
    let second = RawDoc {
        id: Some("1"),
        source: r#"{"club_id":"1","club_name":"Alicia"}"#,
    };

    assert_eq!(client.insert_document(INDEX, &first).await.unwrap(), "1");
    assert_eq!(client.insert_document(INDEX, &second).await.unwrap(), "1");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    // Raw fragments reach the engine exactly as written.
    assert_eq!(requests[0].body, first.source.as_bytes());
    assert_eq!(requests[1].body, second.source.as_bytes());
}

#[tokio::test]
async fn test_insert_without_id_gets_engine_id() {
    let server = MockServer::start().await;
    Mock::given(path("/clubs/_doc"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_index": INDEX, "_id": "aUt0x3", "result": "created"
        })))
        .mount(&server)
        .await;

    let id = client_for(&server)
        .insert_document(INDEX, &json!({ "club_name": "Nameless" }))
        .await
        .unwrap();
    assert_eq!(id, "aUt0x3");
}

#[tokio::test]
async fn test_insert_empty_id_sends_nothing() {
    let server = MockServer::start().await;

    let doc = RawDoc {
        id: Some(""),
        source: "{}",
    };
    let err = client_for(&server)
        .insert_document(INDEX, &doc)
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_insert_whitespace_id_is_sent() {
    let server = MockServer::start().await;
    Mock::given(path_regex(r"^/clubs/_doc/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_index": INDEX, "_id": " ", "result": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let doc = RawDoc {
        id: Some(" "),
        source: "{}",
    };
    let id = client_for(&server).insert_document(INDEX, &doc).await.unwrap();
    assert_eq!(id, " ");
}

#[tokio::test]
async fn test_insert_rejected_is_engine_error() {
    let server = MockServer::start().await;
    Mock::given(path("/clubs/_doc/1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "mapper_parsing_exception", "reason": "failed to parse field [created_at]" },
            "status": 400
        })))
        .mount(&server)
        .await;

    let doc = RawDoc {
        id: Some("1"),
        source: r#"{"created_at":"yesterday"}"#,
    };
    let err = client_for(&server)
        .insert_document(INDEX, &doc)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Engine { status: 400, .. }));
}

#[tokio::test]
async fn test_insert_unreachable_returns_error() {
    let doc = RawDoc {
        id: Some("1"),
        source: "{}",
    };
    let err = unreachable_client()
        .insert_document(INDEX, &doc)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Client(_)));
}

#[tokio::test]
async fn test_get_by_id_returns_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clubs/_doc/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": INDEX,
            "_id": "1",
            "found": true,
            "_source": { "club_id": "1", "club_name": "Alice", "club_type": "football3" }
        })))
        .mount(&server)
        .await;

    let source = client_for(&server).get_by_id(INDEX, "1").await.unwrap();
    assert_eq!(source["club_name"], "Alice");
    assert_eq!(source["club_type"], "football3");
}

#[tokio::test]
async fn test_get_by_id_missing_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clubs/_doc/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "_index": INDEX, "_id": "9", "found": false
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_by_id(INDEX, "9").await.unwrap_err();
    match err {
        SearchError::DocumentNotFound { index, id } => {
            assert_eq!(index, INDEX);
            assert_eq!(id, "9");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_get_by_id_without_source_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clubs/_doc/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": INDEX, "_id": "1", "found": true
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_by_id(INDEX, "1").await.unwrap_err();
    assert!(matches!(err, SearchError::DocumentNotFound { .. }));
}

#[tokio::test]
async fn test_get_by_id_server_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clubs/_doc/1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_by_id(INDEX, "1").await.unwrap_err();
    match err {
        SearchError::Engine { status, reason } => {
            assert_eq!(status, 503);
            assert_eq!(reason, "unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_get_document_typed() {
    #[derive(Debug, Deserialize)]
    struct Club {
        club_name: String,
        raw: Box<RawValue>,
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clubs/_doc/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"_index":"clubs","_id":"1","found":true,"_source":{"club_name":"Alice","raw":{"z":1,"a":2}}}"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let club: Club = client.get_document(INDEX, "1").await.unwrap();
    assert_eq!(club.club_name, "Alice");
    assert_eq!(club.raw.get(), r#"{"z":1,"a":2}"#);

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Wrong {
        rank: i32,
    }
    let err = client.get_document::<Wrong>(INDEX, "1").await.unwrap_err();
    assert!(matches!(err, SearchError::Decode(_)));
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/clubs/_doc/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": INDEX, "_id": "3", "result": "deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/clubs/_doc/3"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "found": false })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete_document(INDEX, "3").await.unwrap();
    assert!(matches!(
        client.get_by_id(INDEX, "3").await,
        Err(SearchError::DocumentNotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_missing_document_is_engine_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/clubs/_doc/3"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "_index": INDEX, "_id": "3", "result": "not_found"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .delete_document(INDEX, "3")
        .await
        .unwrap_err();
    match err {
        SearchError::Engine { status, reason } => {
            assert_eq!(status, 404);
            assert_eq!(reason, "not_found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

// ========== Bulk ==========

fn bulk_ok(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "index": { "_index": INDEX, "_id": id, "result": "created", "status": 201 } }))
        .collect();
    json!({ "took": 4, "errors": false, "items": items })
}

#[tokio::test]
async fn test_bulk_insert_sends_pairs_in_order() {
    let server = MockServer::start().await;
    Mock::given(path("/clubs/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bulk_ok(&["1", "2", "3"])))
        .expect(1)
        .mount(&server)
        .await;

    let alice = RawDoc { id: Some("1"), source: r#"{"club_name":"Alice"}"# };
    let john = RawDoc { id: Some("2"), source: r#"{"club_name":"John"}"# };
    let mary = RawDoc { id: Some("3"), source: r#"{"club_name":"Mary"}"# };
    let docs: Vec<&dyn Document> = vec![&alice, &john, &mary];

    let stats = client_for(&server).bulk_insert(INDEX, &docs).await.unwrap();
    assert_eq!(stats.num_added, 3);
    assert_eq!(stats.num_flushed, 3);
    assert_eq!(stats.num_indexed, 3);
    assert_eq!(stats.num_failed, 0);
    assert_eq!(stats.num_requests, 1);

    let requests = server.received_requests().await.unwrap();
    let lines = ndjson_lines(&requests[0]);
    assert_eq!(lines.len(), 6);
    for (i, (id, name)) in [("1", "Alice"), ("2", "John"), ("3", "Mary")].iter().enumerate() {
        assert_eq!(lines[i * 2]["index"]["_id"], *id);
        assert_eq!(lines[i * 2 + 1]["club_name"], *name);
    }
}

#[tokio::test]
async fn test_bulk_insert_counts_item_failures() {
    let server = MockServer::start().await;
    Mock::given(path("/clubs/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 4,
            "errors": true,
            "items": [
                { "index": { "_index": INDEX, "_id": "1", "result": "created", "status": 201 } },
                { "index": { "_index": INDEX, "_id": "2", "status": 400,
                    "error": { "type": "mapper_parsing_exception", "reason": "bad year" } } }
            ]
        })))
        .mount(&server)
        .await;

    let good = RawDoc { id: Some("1"), source: "{}" };
    let bad = RawDoc { id: Some("2"), source: r#"{"year":"never"}"# };
    let docs: Vec<&dyn Document> = vec![&good, &bad];

    let stats = client_for(&server).bulk_insert(INDEX, &docs).await.unwrap();
    assert_eq!(stats.num_indexed, 1);
    assert_eq!(stats.num_failed, 1);
}

#[tokio::test]
async fn test_bulk_encoding_failure_sends_nothing() {
    struct Broken;

    impl Document for Broken {
        fn to_source(&self) -> serde_json::Result<Box<RawValue>> {
            RawValue::from_string("{".to_string())
        }
    }

    let server = MockServer::start().await;
    let good = RawDoc { id: Some("1"), source: "{}" };
    let docs: Vec<&dyn Document> = vec![&good, &Broken];

    let err = client_for(&server).bulk_insert(INDEX, &docs).await.unwrap_err();
    assert!(matches!(err, SearchError::Encoding { position: 1, .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_request_rejected() {
    let server = MockServer::start().await;
    Mock::given(path("/clubs/_bulk"))
        .respond_with(ResponseTemplate::new(413).set_body_string("request entity too large"))
        .mount(&server)
        .await;

    let doc = RawDoc { id: Some("1"), source: "{}" };
    let docs: Vec<&dyn Document> = vec![&doc];
    let err = client_for(&server).bulk_insert(INDEX, &docs).await.unwrap_err();
    assert!(matches!(err, SearchError::Engine { status: 413, .. }));
}

#[tokio::test]
async fn test_bulk_indexer_flushes_on_item_threshold() {
    let server = MockServer::start().await;
    Mock::given(path("/clubs/_bulk"))
        .and(query_param("refresh", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "took": 1, "errors": false, "items": [] })))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut indexer = client.bulk_indexer(
        BulkIndexerConfig::new(INDEX)
            .with_flush_items(2)
            .with_refresh(true),
    );
    for i in 0..5 {
        let source = RawValue::from_string(format!(r#"{{"n":{}}}"#, i)).unwrap();
        indexer.add(BulkItem::index(Some(i.to_string()), source)).await.unwrap();
    }
    assert_eq!(indexer.stats().num_requests, 2);

    let stats = indexer.close().await.unwrap();
    assert_eq!(stats.num_added, 5);
    assert_eq!(stats.num_flushed, 5);
    assert_eq!(stats.num_requests, 3);
}

#[tokio::test]
async fn test_bulk_indexer_delete_items() {
    let server = MockServer::start().await;
    Mock::given(path("/clubs/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 1,
            "errors": false,
            "items": [ { "delete": { "_index": INDEX, "_id": "3", "result": "deleted", "status": 200 } } ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut indexer = client.bulk_indexer(BulkIndexerConfig::new(INDEX));
    indexer.add(BulkItem::delete("3")).await.unwrap();
    let stats = indexer.close().await.unwrap();
    assert_eq!(stats.num_deleted, 1);

    let requests = server.received_requests().await.unwrap();
    let lines = ndjson_lines(&requests[0]);
    assert_eq!(lines, vec![json!({ "delete": { "_index": INDEX, "_id": "3" } })]);
}

// ========== Search ==========

#[tokio::test]
async fn test_search_all() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clubs/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(json!([
            { "_index": INDEX, "_id": "1", "_score": 1.0, "_source": { "club_name": "Alice" } },
            { "_index": INDEX, "_id": "2", "_score": 1.0, "_source": { "club_name": "John" } }
        ]))))
        .mount(&server)
        .await;

    let hits = client_for(&server).search_all(INDEX).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[1].id, "2");
    assert_eq!(hits[1].source["club_name"], "John");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(body_json(&requests[0]), json!({ "query": { "match_all": {} } }));
}

#[tokio::test]
async fn test_search_all_is_one_default_page() {
    let server = MockServer::start().await;
    let page: Vec<Value> = (1..=10)
        .map(|i| json!({ "_index": INDEX, "_id": i.to_string(), "_source": {} }))
        .collect();
    let mut body = search_response(Value::Array(page));
    body["hits"]["total"]["value"] = json!(25);
    Mock::given(method("POST"))
        .and(path("/clubs/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.search_all(INDEX).await.unwrap().len(), 10);
    let requests = server.received_requests().await.unwrap();
    assert!(body_json(&requests[0]).get("size").is_none());

    // The builder keeps the total visible.
    let result = client
        .search()
        .index(INDEX)
        .query(Query::match_all())
        .execute()
        .await
        .unwrap();
    assert_eq!(result.total, 25);
    assert_eq!(result.hits.len(), 10);
}

#[tokio::test]
async fn test_search_hit_decode_keeps_raw_bytes() {
    #[derive(Deserialize)]
    struct Standing {
        raw: Box<RawValue>,
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clubs/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"took":1,"hits":{"total":{"value":1,"relation":"eq"},"max_score":1.0,"hits":[{"_index":"clubs","_id":"1","_score":1.0,"_source":{"raw":{"z": 1,  "a":[3,2]}}}]}}"#,
        ))
        .mount(&server)
        .await;

    let dsl = json!({ "query": { "match_all": {} } });
    let hits = client_for(&server).search_by_dsl(INDEX, &dsl).await.unwrap();
    let standing: Standing = hits[0].decode().unwrap();
    assert_eq!(standing.raw.get(), r#"{"z": 1,  "a":[3,2]}"#);
    assert_eq!(hits[0].source["raw"]["a"], json!([3, 2]));
}

#[tokio::test]
async fn test_search_by_dsl_matches_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clubs/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(json!([
            { "_index": INDEX, "_id": "3", "_score": 0.98, "_source": { "club_id": "3", "club_name": "Mary" } }
        ]))))
        .mount(&server)
        .await;

    let dsl = json!({ "query": { "match": { "club_name": "Mary" } } });
    let hits = client_for(&server).search_by_dsl(INDEX, &dsl).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "3");
    assert_eq!(hits[0].source["club_id"], "3");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(body_json(&requests[0]), dsl);
}

#[tokio::test]
async fn test_search_without_hits_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clubs/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "took": 1 })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search_by_dsl(INDEX, &json!({ "query": { "match_all": {} } }))
        .await
        .unwrap_err();
    match err {
        SearchError::Engine { reason, .. } => assert_eq!(reason, "no 'hits' field in the response"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_search_rejected_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clubs/_search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "parsing_exception", "reason": "unknown query [mtch]" },
            "status": 400
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search_by_dsl(INDEX, &json!({ "query": { "mtch": {} } }))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Engine { status: 400, .. }));
}

#[tokio::test]
async fn test_search_builder_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clubs/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(json!([]))))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .search()
        .index(INDEX)
        .query(Query::term("club_type", "football3"))
        .from(10)
        .size(5)
        .sort_by("created_at", SortOrder::Desc)
        .execute()
        .await
        .unwrap();
    assert_eq!(result.total, 0);
    assert!(result.hits.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        body_json(&requests[0]),
        json!({
            "query": { "term": { "club_type": "football3" } },
            "from": 10,
            "size": 5,
            "sort": [ { "created_at": { "order": "desc" } } ]
        })
    );
}

#[tokio::test]
async fn test_search_needs_an_index() {
    let server = MockServer::start().await;
    let err = client_for(&server)
        .search()
        .query(Query::match_all())
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Validation(_)));
}
