//! Paginated listings against a mock server

use futures_util::StreamExt;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{client_for, ok_json};

fn database_page(ids: &[i64]) -> serde_json::Value {
    let databases: Vec<_> = ids
        .iter()
        .map(|id| json!({"databaseId": id, "name": format!("db-{id}"), "protocol": "redis"}))
        .collect();
    json!({
        "accountId": 1,
        "subscription": [{
            "subscriptionId": 5,
            "numberOfDatabases": ids.len(),
            "databases": databases
        }]
    })
}

#[tokio::test]
async fn test_list_ends_cleanly_on_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions/5/databases"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "100"))
        .respond_with(ok_json(database_page(&[42])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions/5/databases"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut list = client.databases().list(5);

    assert!(list.next().await);
    assert_eq!(list.value().unwrap().database_id, Some(42));
    assert!(!list.next().await);
    assert!(list.value().is_none());
    assert!(list.err().is_none());
}

#[tokio::test]
async fn test_list_ends_cleanly_on_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/fixed/subscriptions/3/databases"))
        .and(query_param("offset", "0"))
        .respond_with(ok_json(json!({
            "subscription": {"subscriptionId": 3, "databases": [{"databaseId": 1}, {"databaseId": 2}]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/fixed/subscriptions/3/databases"))
        .and(query_param("offset", "100"))
        .respond_with(ok_json(json!({"subscription": {"subscriptionId": 3, "databases": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let all = client.fixed().list_databases(3).collect_all().await.unwrap();

    let ids: Vec<_> = all.iter().map(|db| db.database_id).collect();
    assert_eq!(ids, vec![Some(1), Some(2)]);
}

#[tokio::test]
async fn test_list_failure_is_sticky() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions/5/databases"))
        .respond_with(ResponseTemplate::new(500).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut list = client.databases().list(5);

    assert!(!list.next().await);
    assert!(!list.next().await);
    let err = list.err().unwrap();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().starts_with("failed to list databases"));
}

#[tokio::test]
async fn test_list_as_stream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions/5/databases"))
        .and(query_param("offset", "0"))
        .respond_with(ok_json(database_page(&[1, 2, 3])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let names: Vec<String> = client
        .databases()
        .list(5)
        .into_stream()
        .filter_map(|db| async move { db.ok().and_then(|db| db.name) })
        .collect()
        .await;

    assert_eq!(names, vec!["db-1", "db-2", "db-3"]);
}
