//! API integration tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use library_catalog::{
    api::create_router, repository::memory::MemoryDocumentStore, AppConfig, AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Router over a fresh in-memory store
fn app() -> Router {
    let state = AppState::new(AppConfig::default(), Arc::new(MemoryDocumentStore::new()));
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response is not JSON")
    };
    (status, value)
}

fn book(title: &str) -> Value {
    json!({
        "title": title,
        "author": "Octavia E. Butler",
        "genre": "Science Fiction",
        "imgurl": "kindred.jpg",
        "publication": { "date": "1979", "publisher": "Doubleday", "edition": "1st" },
        "copies": [
            { "id": "k1", "checked": { "available": true, "user": "" }, "reserved": { "reserved": false, "user": "" } },
            { "id": "k2", "checked": { "available": false, "user": "2" }, "reserved": { "reserved": false, "user": "" } },
            { "id": "k3", "checked": { "available": true, "user": "" }, "reserved": { "reserved": true, "user": "5" } }
        ]
    })
}

#[tokio::test]
async fn test_api_root() {
    let (status, body) = send(&app(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Library API");
}

#[tokio::test]
async fn test_create_books_assigns_sequential_ids() {
    let app = app();

    let (status, first) = send_json(&app, Method::POST, "/books", Some(book("Kindred"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["_id"], 1);
    assert_eq!(first["title"], "Kindred");

    let (status, second) = send_json(&app, Method::POST, "/books", Some(book("Dawn"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["_id"], 2);

    let (status, fetched) = send_json(&app, Method::GET, "/books/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Dawn");
}

#[tokio::test]
async fn test_delete_book() {
    let app = app();
    send_json(&app, Method::POST, "/books", Some(book("Kindred"))).await;
    send_json(&app, Method::POST, "/books", Some(book("Dawn"))).await;

    let (status, _) = send(&app, Method::DELETE, "/books", Some(json!({ "_id": 2 }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, books) = send_json(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = books
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn test_invalid_book_is_rejected() {
    let app = app();
    let mut payload = book("Kindred");
    payload["copies"][1]["checked"]["user"] = json!("");

    let (status, body) = send_json(&app, Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert!(body["message"].as_str().unwrap().contains("available is false"));

    let (_, books) = send_json(&app, Method::GET, "/books", None).await;
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_client_cannot_choose_id() {
    let mut payload = book("Kindred");
    payload["_id"] = json!(50);
    let (status, _) = send_json(&app(), Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_book_echoes_payload() {
    let app = app();
    send_json(&app, Method::POST, "/books", Some(book("Kindred"))).await;

    let update = json!({ "_id": 1, "genre": "Historical Fiction" });
    let (status, echoed) = send_json(&app, Method::PUT, "/books", Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed, update);

    let (_, stored) = send_json(&app, Method::GET, "/books/1", None).await;
    assert_eq!(stored["genre"], "Historical Fiction");
    assert_eq!(stored["title"], "Kindred");

    let (status, _) = send_json(&app, Method::PUT, "/books", Some(json!({ "genre": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_book_is_not_found() {
    let (status, body) = send_json(&app(), Method::GET, "/books/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchRecord");
}

#[tokio::test]
async fn test_malformed_path_id_is_a_json_error() {
    let app = app();
    for uri in ["/books/abc", "/users/1.5", "/library/books/x"] {
        let (status, body) = send_json(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "BadValue");
        assert_eq!(body["code"], 18);
    }
}

#[tokio::test]
async fn test_list_books_with_filter() {
    let app = app();
    send_json(&app, Method::POST, "/books", Some(book("Kindred"))).await;
    let mut other = book("Parable of the Sower");
    other["publication"]["publisher"] = json!("Four Walls Eight Windows");
    send_json(&app, Method::POST, "/books", Some(other)).await;

    let (status, books) = send_json(
        &app,
        Method::GET,
        "/books?publication.publisher=Doubleday",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().unwrap().len(), 1);
    assert_eq!(books[0]["title"], "Kindred");

    let (status, books) = send_json(&app, Method::GET, "/books?copies.checked.user=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().unwrap().len(), 2);

    let (_, books) = send_json(&app, Method::GET, "/books?copies.id=k9", None).await;
    assert_eq!(books, json!([]));

    let (status, _) = send_json(&app, Method::GET, "/books?_id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_users_and_late_fees() {
    let app = app();
    let fee = json!({
        "bookID": "1", "copyID": "k2", "dueDate": "2017-06-01",
        "returnDate": "2017-06-08", "fee": "0.70"
    });

    for (name, fees) in [("Ann", json!([])), ("Bob", json!([fee])), ("Cy", json!([]))] {
        let (status, _) = send_json(
            &app,
            Method::POST,
            "/users",
            Some(json!({ "name": name, "email": format!("{}@example.com", name), "fees": fees })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, owing) = send_json(&app, Method::GET, "/users/late-fees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owing.as_array().unwrap().len(), 1);
    assert_eq!(owing[0]["name"], "Bob");

    let (status, owing) = send_json(&app, Method::GET, "/users?fees.copyID=k2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owing.as_array().unwrap().len(), 1);
    assert_eq!(owing[0]["name"], "Bob");

    let (status, user) = send_json(&app, Method::GET, "/users/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], "Cy");

    let update = json!({ "_id": 3, "email": "cy@library.test", "fees": "" });
    let (status, echoed) = send_json(&app, Method::PUT, "/users", Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed, update);
    let (_, user) = send_json(&app, Method::GET, "/users/3", None).await;
    assert_eq!(user["email"], "cy@library.test");

    let (status, _) = send_json(&app, Method::POST, "/users", Some(json!({ "name": "NoEmail" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_library_pages() {
    let app = app();
    send_json(&app, Method::POST, "/books", Some(book("Kindred"))).await;

    let (status, html) = send(&app, Method::GET, "/library", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(html).unwrap().contains("Welcome to the Library"));

    let (status, html) = send(&app, Method::GET, "/library/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(html).unwrap().contains("/library/books/1"));

    let (status, html) = send(&app, Method::GET, "/library/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(html).unwrap().contains("2 of 3 copies available"));

    let (status, _) = send(&app, Method::GET, "/library/books/8", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stylesheets_are_served() {
    let app = app();
    let (status, css) = send(&app, Method::GET, "/library/styles.css", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!css.is_empty());

    let (status, _) = send(&app, Method::GET, "/library/fluid_grid.css", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/library/images/placeholder.svg", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send_json(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

mod live {
    //! Tests against a running server backed by PostgreSQL

    use reqwest::Client;
    use serde_json::{json, Value};

    const BASE_URL: &str = "http://localhost:3000";

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
    async fn test_create_and_delete_book() {
        let client = Client::new();

        let response = client
            .post(format!("{}/books", BASE_URL))
            .json(&json!({
                "title": "Test Book",
                "author": "Test Author",
                "genre": "Test",
                "imgurl": "test.jpg",
                "publication": { "date": "2020", "publisher": "Test Press", "edition": "1st" },
                "copies": []
            }))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), 201);

        let body: Value = response.json().await.expect("Failed to parse response");
        let book_id = body["_id"].as_i64().expect("No book ID");

        let response = client
            .delete(format!("{}/books", BASE_URL))
            .json(&json!({ "_id": book_id }))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), 204);
    }
}
