use axum::http::{header, HeaderValue, StatusCode};
use serde_json::Value;

use crate::{server, server_with_titles};

fn titles(body: &Value) -> Vec<String> {
    body["data"]["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item["title"].as_str().expect("title").to_string())
        .collect()
}

#[tokio::test]
async fn search_filters_sorts_and_pages_the_register() {
    let server = server_with_titles(&[("soil", "Soil"), ("water", "Water"), ("air", "Air")]).await;

    let response = server
        .get("/vocabulary/")
        .add_query_param("search", "a")
        .add_query_param("page", "1")
        .add_query_param("per_page", "2")
        .add_query_param("_format", "json")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["view"], "register");
    assert_eq!(titles(&body), vec!["Air", "Water"]);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(
        body["data"]["register_class"],
        "http://www.w3.org/2004/02/skos/core#ConceptScheme"
    );
}

#[tokio::test]
async fn page_past_the_end_is_empty_but_keeps_the_total() {
    let server = server_with_titles(&[("soil", "Soil"), ("water", "Water"), ("air", "Air")]).await;

    let body: Value = server
        .get("/vocabulary/")
        .add_query_param("page", "9")
        .add_query_param("_format", "json")
        .await
        .json();

    assert!(titles(&body).is_empty());
    assert_eq!(body["data"]["total"], 3);
}

#[tokio::test]
async fn accept_header_selects_json() {
    let server = server().await;

    let response = server
        .get("/vocabulary/")
        .add_header(header::ACCEPT, HeaderValue::from_static("application/json"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(titles(&response.json()), vec!["Soil", "Water"]);
}

#[tokio::test]
async fn register_defaults_to_html() {
    let server = server().await;

    let response = server.get("/vocabulary/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let content_type = response.header(header::CONTENT_TYPE);
    assert!(content_type.to_str().expect("ascii").starts_with("text/html"));
    assert!(response.text().contains("href=\"/vocabulary/soil\""));
}

#[tokio::test]
async fn invalid_paging_is_a_bad_request() {
    let server = server().await;

    for (name, value) in [("page", "0"), ("per_page", "-3"), ("page", "first")] {
        let response = server.get("/vocabulary/").add_query_param(name, value).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{name}={value}");
        assert!(response.text().contains(name));
    }
}

#[tokio::test]
async fn unknown_vocabulary_page_lists_the_known_ids() {
    let server = server().await;

    let response = server.get("/vocabulary/air").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let text = response.text();
    assert!(text.contains("Invalid Vocab ID"));
    assert!(text.contains("It must be one of these:"));
    assert!(text.contains("* soil"));
    assert!(text.contains("* water"));
}

#[tokio::test]
async fn vocabulary_view_is_served() {
    let server = server().await;

    let body: Value = server
        .get("/vocabulary/soil")
        .add_query_param("_format", "json")
        .await
        .json();

    assert_eq!(body["view"], "vocabulary");
    assert_eq!(body["data"]["reference"]["id"], "soil");
    assert_eq!(
        body["data"]["reference"]["uri"],
        "http://localhost:5150/vocabulary/soil"
    );
}

#[tokio::test]
async fn concepts_are_listed_by_title() {
    let server = server().await;

    let body: Value = server
        .get("/vocabulary/soil/concept/")
        .add_query_param("_format", "json")
        .await
        .json();

    assert_eq!(titles(&body), vec!["Clay", "Loam", "Sandy loam"]);
    assert_eq!(body["data"]["vocab_id"], "soil");
    assert_eq!(body["data"]["title"], "Soil concepts");
}

#[tokio::test]
async fn closed_vocbench_project_is_a_bad_gateway() {
    let server = server().await;

    let response = server.get("/vocabulary/water/concept/").await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert!(response.text().contains("water is not an open project."));
}
