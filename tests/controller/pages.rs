use axum::http::StatusCode;

use crate::server;

#[tokio::test]
async fn index_links_the_first_vocabulary() {
    let server = server().await;

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let text = response.text();
    assert!(text.contains("Test Vocabularies"));
    assert!(text.contains("/vocabulary/soil"));
}

#[tokio::test]
async fn collection_register_is_static() {
    let server = server().await;

    let response = server.get("/collection/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("<h1>Collections</h1>"));
}

#[tokio::test]
async fn about_renders_the_readme() {
    let server = server().await;

    let response = server.get("/about").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("vocpub"));
}
