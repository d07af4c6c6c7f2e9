//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique ISBN per call so reruns never trip the uniqueness constraint
fn fresh_isbn() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("isbn-{}", nanos)
}

/// A due date comfortably in the future
fn future_due_date() -> &'static str {
    "2031-01-01T00:00:00Z"
}

async fn create_book(client: &Client, title: &str, genre: &str, isbn: &str, copies: i32) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "genre": genre,
            "isbn": isbn,
            "copies": copies
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    body["data"].clone()
}

async fn get_book(client: &Client, id: &str) -> Value {
    let response = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send get request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_book_derives_availability() {
    let client = Client::new();

    let with_copies = create_book(&client, "Stocked", "FICTION", &fresh_isbn(), 3).await;
    assert_eq!(with_copies["copies"], 3);
    assert_eq!(with_copies["available"], true);

    let without_copies = create_book(&client, "Out of stock", "FICTION", &fresh_isbn(), 0).await;
    assert_eq!(without_copies["copies"], 0);
    assert_eq!(without_copies["available"], false);
}

#[tokio::test]
#[ignore]
async fn test_create_book_validation_failure() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "",
            "author": "Someone",
            "genre": "FICTION",
            "isbn": fresh_isbn(),
            "copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    // field-level detail is passed through
    assert!(body["error"]["title"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_book_duplicate_isbn_conflict() {
    let client = Client::new();
    let isbn = fresh_isbn();

    create_book(&client, "Original", "HISTORY", &isbn, 2).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Copycat",
            "author": "Someone Else",
            "genre": "HISTORY",
            "isbn": isbn,
            "copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains(&isbn));
}

#[tokio::test]
#[ignore]
async fn test_get_book_malformed_id() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/not-a-uuid", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("not-a-uuid"));
}

#[tokio::test]
#[ignore]
async fn test_get_book_missing() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/books/00000000-0000-4000-8000-000000000000",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_list_books_pagination() {
    let client = Client::new();

    // Three titles in a known alphabetical order within a unique genre page
    let marker = fresh_isbn();
    for title in ["Alpha", "Beta", "Gamma"] {
        create_book(
            &client,
            &format!("{} {}", title, marker),
            "FANTASY",
            &fresh_isbn(),
            1,
        )
        .await;
    }

    let response = client
        .get(format!(
            "{}/books?sort_by=created_at&sort=desc&limit=3&page=1",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let titles: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    // newest first: the three just created, in reverse creation order
    assert_eq!(titles.len(), 3);
    assert!(titles[0].starts_with("Gamma"));
    assert!(titles[2].starts_with("Alpha"));

    // limit=1, page=2 sorted ascending by title lands on the middle book
    let response = client
        .get(format!(
            "{}/books?sort_by=title&sort=asc&limit=1&page=2",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_update_book_recomputes_availability() {
    let client = Client::new();
    let book = create_book(&client, "Updatable", "SCIENCE", &fresh_isbn(), 4).await;
    let id = book["id"].as_str().unwrap();

    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .json(&json!({ "copies": 0 }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["copies"], 0);
    assert_eq!(body["data"]["available"], false);

    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .json(&json!({ "copies": 2 }))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["available"], true);
}

#[tokio::test]
#[ignore]
async fn test_update_book_empty_patch() {
    let client = Client::new();
    let book = create_book(&client, "Untouched", "SCIENCE", &fresh_isbn(), 1).await;
    let id = book["id"].as_str().unwrap();

    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "No relevant values passed for update.");
}

#[tokio::test]
#[ignore]
async fn test_borrow_decrements_copies() {
    let client = Client::new();
    let book = create_book(&client, "Borrowable", "FICTION", &fresh_isbn(), 5).await;
    let id = book["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({
            "book_id": id,
            "quantity": 2,
            "due_date": future_due_date()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["book_id"], id);
    assert_eq!(body["data"]["quantity"], 2);

    let book = get_book(&client, id).await;
    assert_eq!(book["copies"], 3);
    assert_eq!(book["available"], true);
}

#[tokio::test]
#[ignore]
async fn test_borrow_drains_availability() {
    let client = Client::new();
    let book = create_book(&client, "Drainable", "FICTION", &fresh_isbn(), 2).await;
    let id = book["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({
            "book_id": id,
            "quantity": 2,
            "due_date": future_due_date()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    // drained to zero copies reads unavailable immediately
    let book = get_book(&client, id).await;
    assert_eq!(book["copies"], 0);
    assert_eq!(book["available"], false);
}

#[tokio::test]
#[ignore]
async fn test_borrow_insufficient_inventory() {
    let client = Client::new();
    let book = create_book(&client, "Scarce", "FICTION", &fresh_isbn(), 1).await;
    let id = book["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({
            "book_id": id,
            "quantity": 3,
            "due_date": future_due_date()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("available: 1, requested: 3"));

    // failed borrow leaves the inventory untouched
    let book = get_book(&client, id).await;
    assert_eq!(book["copies"], 1);
}

#[tokio::test]
#[ignore]
async fn test_borrow_unavailable_book() {
    let client = Client::new();
    let book = create_book(&client, "Empty shelf", "FICTION", &fresh_isbn(), 0).await;
    let id = book["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({
            "book_id": id,
            "quantity": 1,
            "due_date": future_due_date()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("is not available for borrowing"));
}

#[tokio::test]
#[ignore]
async fn test_borrow_due_date_in_past() {
    let client = Client::new();
    let book = create_book(&client, "Punctual", "FICTION", &fresh_isbn(), 2).await;
    let id = book["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({
            "book_id": id,
            "quantity": 1,
            "due_date": "2001-01-01T00:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_summary_groups_per_book() {
    let client = Client::new();
    let first = create_book(&client, "Summed A", "HISTORY", &fresh_isbn(), 10).await;
    let second = create_book(&client, "Summed B", "HISTORY", &fresh_isbn(), 10).await;
    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();

    for (id, quantity) in [(first_id, 2), (first_id, 3), (second_id, 5)] {
        let response = client
            .post(format!("{}/borrows", BASE_URL))
            .json(&json!({
                "book_id": id,
                "quantity": quantity,
                "due_date": future_due_date()
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
    }

    let response = client
        .get(format!("{}/borrows/summary", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let entries = body["data"].as_array().unwrap();

    let total_for = |isbn: &str| {
        entries
            .iter()
            .find(|e| e["book"]["isbn"] == isbn)
            .map(|e| e["total_quantity"].as_i64().unwrap())
    };

    assert_eq!(total_for(first["isbn"].as_str().unwrap()), Some(5));
    assert_eq!(total_for(second["isbn"].as_str().unwrap()), Some(5));
}

#[tokio::test]
#[ignore]
async fn test_summary_omits_deleted_book() {
    let client = Client::new();
    let book = create_book(&client, "Short lived", "BIOGRAPHY", &fresh_isbn(), 5).await;
    let id = book["id"].as_str().unwrap();
    let isbn = book["isbn"].as_str().unwrap();

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .json(&json!({
            "book_id": id,
            "quantity": 2,
            "due_date": future_due_date()
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // deleting a book with outstanding borrows succeeds
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/borrows/summary", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    let entries = body["data"].as_array().unwrap();
    assert!(entries.iter().all(|e| e["book"]["isbn"] != isbn));
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_never_overdraw() {
    let client = Client::new();
    let book = create_book(&client, "Contended", "FICTION", &fresh_isbn(), 5).await;
    let id = book["id"].as_str().unwrap().to_string();

    // five concurrent requests for 2 copies each over 5 copies: exactly
    // two can succeed
    let mut handles = Vec::new();
    for _ in 0..5 {
        let client = client.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(format!("{}/borrows", BASE_URL))
                .json(&json!({
                    "book_id": id,
                    "quantity": 2,
                    "due_date": future_due_date()
                }))
                .send()
                .await
                .expect("Failed to send request")
                .status()
                .as_u16()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.expect("task panicked") == 201 {
            successes += 1;
        }
    }
    assert_eq!(successes, 2);

    let book = get_book(&client, &id).await;
    assert_eq!(book["copies"], 1);
    assert_eq!(book["available"], true);
}
