use std::sync::Arc;

use vocpub::{
    app::AppContext,
    boot,
    tests_cfg::{self, backend::FakeBackend},
    vocab::{BackendHandle, Catalog},
    TestServer,
};

mod monitoring;
mod object;
mod pages;
mod vocabulary;

fn server_for(ctx: AppContext) -> TestServer {
    let router = boot::create_router(ctx).expect("build router");
    TestServer::new(router).expect("start test server")
}

/// Serves the shared fake context: `soil` with concepts, `water` failing.
pub async fn server() -> TestServer {
    server_for(tests_cfg::app::get_app_context().await)
}

/// Serves one vocabulary per title, each from its own fake backend.
pub async fn server_with_titles(vocabularies: &[(&str, &str)]) -> TestServer {
    let backends = vocabularies
        .iter()
        .map(|(id, title)| {
            let backend: Arc<BackendHandle> = Arc::new(FakeBackend::new(id, title));
            backend
        })
        .collect();
    let catalog = Catalog::from_backends(backends).await.expect("catalog");
    server_for(tests_cfg::app::app_context(
        tests_cfg::config::test_config(),
        catalog,
    ))
}
