use axum_test::TestServer;
use http::{header::AUTHORIZATION, StatusCode};
use serde_json::{json, Value};

mod common;

async fn server_with_boards(count: usize) -> TestServer {
    let app_config = common::create_test_app_config();
    let (app, _backend) = common::setup_test_app(app_config).await.unwrap();
    let server = TestServer::new(app).unwrap();

    for i in 1..=count {
        server
            .post("/boards")
            .add_header(AUTHORIZATION, common::auth_header())
            .json(&json!({"name": format!("Board {:02}", i)}))
            .await
            .assert_status(StatusCode::CREATED);
    }

    server
}

async fn page(server: &TestServer, params: &[(&str, &str)]) -> Value {
    let mut request = server
        .get("/boards")
        .add_header(AUTHORIZATION, common::auth_header());
    for (key, value) in params {
        request = request.add_query_param(key, value);
    }
    let response = request.await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json()
}

#[tokio::test]
async fn test_second_page_holds_the_remainder() {
    let server = server_with_boards(15).await;

    let body = page(&server, &[("page", "2"), ("size", "10")]).await;
    assert_eq!(body["totalItems"], 15);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_default_page_size() {
    let server = server_with_boards(15).await;

    let body = page(&server, &[]).await;
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_invalid_page_and_size_fall_back() {
    let server = server_with_boards(12).await;

    let body = page(&server, &[("page", "0"), ("size", "-3")]).await;
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);

    let body = page(&server, &[("page", "abc"), ("size", "xyz")]).await;
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalPages"], 2);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let server = server_with_boards(3).await;

    let body = page(&server, &[("page", "5"), ("size", "2")]).await;
    assert_eq!(body["totalItems"], 3);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["currentPage"], 5);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_table_has_no_pages() {
    let server = server_with_boards(0).await;

    let body = page(&server, &[]).await;
    assert_eq!(body["totalItems"], 0);
    assert_eq!(body["totalPages"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_configured_default_page_size() {
    let mut app_config = common::create_test_app_config();
    app_config.pagination.default_size = 4;
    let (app, _backend) = common::setup_test_app(app_config).await.unwrap();
    let server = TestServer::new(app).unwrap();

    for i in 1..=6 {
        server
            .post("/boards")
            .add_header(AUTHORIZATION, common::auth_header())
            .json(&json!({"name": format!("Board {}", i)}))
            .await;
    }

    let body = page(&server, &[]).await;
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_maximum_page_size_returns_one_page() {
    let server = server_with_boards(2).await;

    let body = page(&server, &[("size", "9223372036854775807")]).await;
    assert_eq!(body["totalItems"], 2);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let body = page(&server, &[("page", "2"), ("size", "9223372036854775807")]).await;
    assert_eq!(body["totalPages"], 1);
    assert!(body["items"].as_array().unwrap().is_empty());
}
