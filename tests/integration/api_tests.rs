//! API integration tests

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

fn base_url() -> String {
    std::env::var("LIVRARIA_TEST_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Book names are unique store-wide, so every run needs fresh ones
fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

async fn create_library(client: &Client, name: &str) -> i64 {
    let response = client
        .post(format!("{}/api/biblioteca/create", base_url()))
        .json(&json!({ "nome": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No library ID")
}

async fn create_book(client: &Client, name: &str, library_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/api/livro/create", base_url()))
        .json(&json!({ "nome": name, "biblioteca": { "id": library_id } }))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore] // Run with: cargo test --test integration -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_ready_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_create_and_search_library() {
    let client = Client::new();
    let name = unique("Central");

    let response = client
        .post(format!("{}/api/biblioteca/create", base_url()))
        .json(&json!({ "nome": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("No Location header")
        .to_string();
    let created: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(created["nome"], name.as_str());
    assert_eq!(created["livros"], json!([]));

    let response = client
        .get(format!("{}{}", base_url(), location))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched, created);
}

#[tokio::test]
#[ignore]
async fn test_book_output_omits_library() {
    let client = Client::new();
    let library = create_library(&client, &unique("Central")).await;

    let response = create_book(&client, &unique("Dune"), library).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["id"].is_number());
    assert!(body.get("biblioteca").is_none());
}

#[tokio::test]
#[ignore]
async fn test_book_with_unknown_library() {
    let client = Client::new();

    let response = create_book(&client, &unique("Orphan"), i32::MAX as i64).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_book_name() {
    let client = Client::new();
    let library = create_library(&client, &unique("Central")).await;
    let name = unique("Dune");

    let first = create_book(&client, &name, library).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first: Value = first.json().await.expect("Failed to parse response");

    let second = create_book(&client, &name, library).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let response = client
        .get(format!("{}/api/livro/search/{}", base_url(), first["id"]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_delete_library_cascades() {
    let client = Client::new();
    let library = create_library(&client, &unique("Central")).await;

    let mut book_ids = Vec::new();
    for prefix in ["Dune", "Emma"] {
        let response = create_book(&client, &unique(prefix), library).await;
        let body: Value = response.json().await.expect("Failed to parse response");
        book_ids.push(body["id"].as_i64().expect("No book ID"));
    }

    let response = client
        .delete(format!("{}/api/biblioteca/delete/{}", base_url(), library))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for id in book_ids {
        let response = client
            .get(format!("{}/api/livro/search/{}", base_url(), id))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
#[ignore]
async fn test_replace_unknown_library() {
    let client = Client::new();

    let response = client
        .put(format!("{}/api/biblioteca/replace/{}", base_url(), i32::MAX))
        .json(&json!({ "nome": "Nowhere" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore]
async fn test_list_libraries_paged() {
    let client = Client::new();
    create_library(&client, &unique("Central")).await;
    create_library(&client, &unique("Norte")).await;

    let response = client
        .get(format!("{}/api/biblioteca/all?page=0&size=1", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["content"].as_array().map(Vec::len), Some(1));
    assert!(body["totalElements"].as_i64().unwrap_or(0) >= 2);
    assert_eq!(body["last"], false);
}
