use axum::http::StatusCode;
use serde_json::Value;

use crate::{server, server_with_titles};

#[tokio::test]
async fn monitoring_routes_answer_ok() {
    let server = server().await;

    for uri in ["/_ping", "/_health", "/_readiness"] {
        let response = server.get(uri).await;
        assert_eq!(response.status_code(), StatusCode::OK, "{uri}");
        assert_eq!(response.json::<Value>()["ok"], true, "{uri}");
    }
}

#[tokio::test]
async fn empty_catalog_is_not_ready() {
    let server = server_with_titles(&[]).await;

    let body: Value = server.get("/_readiness").await.json();

    assert_eq!(body["ok"], false);
}
