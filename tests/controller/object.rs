use axum::http::StatusCode;
use serde_json::Value;
use vocpub::tests_cfg::app::SOIL_TEXTURES;

use crate::server;

const LOAM: &str = "http://example.org/def/soil/loam";

#[tokio::test]
async fn concept_is_rendered() {
    let server = server().await;

    let response = server
        .get("/object")
        .add_query_param("vocab_id", "soil")
        .add_query_param("uri", LOAM)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("<h1>Loam</h1>"));
}

#[tokio::test]
async fn collection_is_rendered_as_json() {
    let server = server().await;

    let body: Value = server
        .get("/object")
        .add_query_param("vocab_id", "soil")
        .add_query_param("uri", SOIL_TEXTURES)
        .add_query_param("_format", "json")
        .await
        .json();

    assert_eq!(body["view"], "object");
    assert_eq!(body["data"]["class"], "collection");
    assert_eq!(body["data"]["title"], "Soil textures");
    assert_eq!(body["data"]["members"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn unknown_vocabulary_is_plain_text() {
    let server = server().await;

    let response = server
        .get("/object")
        .add_query_param("vocab_id", "air")
        .add_query_param("uri", LOAM)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text(),
        "The vocabulary ID you've supplied is not known. Must be one of:\n soil\nwater"
    );
}

#[tokio::test]
async fn missing_uri_is_plain_text() {
    let server = server().await;

    let response = server
        .get("/object")
        .add_query_param("vocab_id", "soil")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text(),
        "A Query String Argument 'uri' must be supplied for this endpoint, indicating an object \
         within a vocabulary"
    );
}

#[tokio::test]
async fn unsupported_class_is_an_error_page() {
    let server = server().await;

    let response = server
        .get("/object")
        .add_query_param("vocab_id", "soil")
        .add_query_param("uri", "http://example.org/def/soil/nothing")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let text = response.text();
    assert!(text.contains("Concept Class Type Error"));
    assert!(text.contains("No valid Object Class URI found for vocab_id soil"));
}

#[tokio::test]
async fn backend_error_names_the_closed_project() {
    let server = server().await;

    let response = server
        .get("/object")
        .add_query_param("vocab_id", "water")
        .add_query_param("uri", "http://example.org/def/water/lake")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert!(response
        .text()
        .contains("The VocBench instance returned with an error: water is not an open project."));
}
