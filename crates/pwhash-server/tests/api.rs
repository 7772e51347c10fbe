use std::time::Duration;

use pwhash_core::{Config, Stats, StrengthRules};
use pwhash_server::api::{API_PREFIX, REQUEST_ID_HEADER};
use pwhash_server::{Server, ServerError};
use reqwest::StatusCode;
use tokio::task::JoinHandle;

fn test_config(delay_secs: u64) -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        check_password_strength: false,
        max_task_seconds: delay_secs,
        ..Config::default()
    }
}

async fn spawn_server(config: Config) -> (String, JoinHandle<Result<(), ServerError>>) {
    let server = Server::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let handle = tokio::spawn(server.run());
    (format!("http://{addr}{API_PREFIX}"), handle)
}

async fn post_password(base: &str, field: &str, password: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/hash"))
        .form(&[(field, password)])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn new_hash_returns_sequential_ids() {
    let (base, _server) = spawn_server(test_config(1)).await;

    let res = post_password(&base, "password", "secret").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.text().await.unwrap(), "1");

    let res = post_password(&base, "password", "secret").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.text().await.unwrap(), "2");
}

#[tokio::test]
async fn new_hash_without_password_field_is_bad_request() {
    let (base, _server) = spawn_server(test_config(1)).await;

    let res = post_password(&base, "unknown", "secret").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weak_password_is_bad_request() {
    let config = Config {
        check_password_strength: true,
        password_strength: StrengthRules::length_only(8, 50),
        ..test_config(1)
    };
    let (base, _server) = spawn_server(config).await;

    let res = post_password(&base, "password", "pass").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let stats: Stats = reqwest::get(format!("{base}/stats"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.total, 0);

    // rejected input did not consume an id
    let res = post_password(&base, "password", "password").await;
    assert_eq!(res.text().await.unwrap(), "1");
}

#[tokio::test]
async fn wrong_methods_are_not_allowed() {
    let (base, _server) = spawn_server(test_config(1)).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{base}/hash")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let res = client.post(format!("{base}/hash/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let res = client.post(format!("{base}/stats")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let res = client.get(format!("{base}/shutdown")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn malformed_and_unknown_ids_are_distinguished() {
    let (base, _server) = spawn_server(test_config(1)).await;

    let res = reqwest::get(format!("{base}/hash/not-an-id")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = reqwest::get(format!("{base}/hash/999999")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pending_hash_is_unavailable_with_retry_hint_then_done() {
    let (base, _server) = spawn_server(test_config(1)).await;

    let id = post_password(&base, "password", "angryMonkey")
        .await
        .text()
        .await
        .unwrap();

    let res = reqwest::get(format!("{base}/hash/{id}")).await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.headers()["retry-after"], "1");

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let res = reqwest::get(format!("{base}/hash/{id}")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.text().await.unwrap(),
        "ZEHhWB65gUlzdVwtDQArEyx+KVLzp/aTaRaPlBzYRIFj6vjFdqEb0Q5B8zVKCZ0vKbZPZklJz0Fd7su2A+gf7Q=="
    );

    let stats: Stats = reqwest::get(format!("{base}/stats"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.total, 1);
    assert!(stats.average >= 1_000_000, "average={}", stats.average);
}

#[tokio::test]
async fn stats_start_at_zero() {
    let (base, _server) = spawn_server(test_config(1)).await;

    let res = reqwest::get(format!("{base}/stats")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "total": 0, "average": 0 }));
}

#[tokio::test]
async fn request_id_is_echoed_or_assigned() {
    let (base, _server) = spawn_server(test_config(1)).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{base}/stats"))
        .header(REQUEST_ID_HEADER, "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()[REQUEST_ID_HEADER], "abc-123");

    let res = client.get(format!("{base}/stats")).send().await.unwrap();
    assert!(res.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn shutdown_waits_for_pending_tasks_then_stops_server() {
    let (base, server) = spawn_server(test_config(1)).await;
    let client = reqwest::Client::new();

    let res = post_password(&base, "password", "secret").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client.post(format!("{base}/shutdown")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // the task above keeps the server up for about a second
    let res = client.post(format!("{base}/shutdown")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = post_password(&base, "password", "secret").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = client.get(format!("{base}/stats")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop after draining")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn shutdown_with_no_tasks_stops_server() {
    let (base, server) = spawn_server(test_config(5)).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/shutdown"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
