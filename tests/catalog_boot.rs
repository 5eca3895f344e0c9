use std::path::Path;

use vocpub::{
    boot,
    config::Config,
    environment::Environment,
    tests_cfg::{self, graphs},
    vocab::Catalog,
    TestServer,
};

#[tokio::test]
async fn local_graph_catalog_serves_pages() {
    let path = graphs::write_graph("boot", graphs::SOIL_TTL);
    let config = tests_cfg::config::local_graph_config(path.clone());

    let ctx = boot::create_context(&Environment::Test, config)
        .await
        .expect("context");
    let catalog = ctx.catalog.snapshot();
    assert_eq!(catalog.ids(), vec!["soil"]);
    assert_eq!(
        catalog.get("soil").expect("soil").uri,
        "http://localhost:5150/vocabulary/soil"
    );

    let server = TestServer::new(boot::create_router(ctx).expect("router")).expect("server");

    let vocabulary = server.get("/vocabulary/soil").await;
    assert_eq!(vocabulary.status_code(), 200);
    assert!(vocabulary.text().contains("Soil Types"));

    let concept = server
        .get("/object")
        .add_query_param("vocab_id", "soil")
        .add_query_param("uri", "http://example.org/def/soil/loam")
        .await;
    assert_eq!(concept.status_code(), 200);
    assert!(concept.text().contains("Loamy soil"));

    let scheme = server
        .get("/object")
        .add_query_param("vocab_id", "soil")
        .add_query_param("uri", "http://example.org/def/soil")
        .await;
    assert_eq!(scheme.status_code(), 404);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn reload_swaps_the_catalog() {
    let path = graphs::write_graph("reload", graphs::SOIL_TTL);
    let ctx = boot::create_context(&Environment::Test, tests_cfg::config::test_config())
        .await
        .expect("context");
    assert!(ctx.catalog.snapshot().is_empty());

    ctx.catalog
        .reload(&tests_cfg::config::local_graph_config(path.clone()))
        .await
        .expect("reload");
    assert!(ctx.catalog.snapshot().contains("soil"));

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn shipped_test_configuration_loads() {
    let config = Config::from_folder(&Environment::Test, Path::new("config")).expect("config");
    assert!(config.vocabularies.contains_key("soil"));

    let catalog = Catalog::from_config(&config).await.expect("catalog");
    assert_eq!(catalog.len(), config.vocabularies.len());
}

#[test]
fn route_listing() {
    let listing = boot::routes()
        .collect()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(listing, @r"
    [GET] /
    [GET] /_health
    [GET] /_ping
    [GET] /_readiness
    [GET] /about
    [GET] /collection/
    [GET] /object
    [GET] /vocabulary/
    [GET] /vocabulary/{vocab_id}
    [GET] /vocabulary/{vocab_id}/concept/
    ");
}
