use std::sync::Arc;

use super::{
    backend::{FakeBackend, FakeObject},
    config::test_config,
};
use crate::{
    app::AppContext,
    config::Config,
    environment::Environment,
    render::Renderers,
    vocab::{
        catalog::{Catalog, CatalogHandle},
        source::BackendHandle,
    },
};

/// Collection served by the `soil` fake.
pub const SOIL_TEXTURES: &str = "http://example.org/def/soil/textures";

/// Builds a context around an existing catalog.
///
/// # Panics
///
/// Panics when the bundled templates do not compile.
#[must_use]
pub fn app_context(config: Config, catalog: Catalog) -> AppContext {
    let renderers = Renderers::new(&config.site.title).expect("templates compile");
    AppContext {
        environment: Environment::Test,
        config,
        catalog: CatalogHandle::new(catalog),
        renderers: Arc::new(renderers),
    }
}

/// A context serving two fake vocabularies: `soil`, with three concepts and
/// a collection, and `water`, whose backend rejects every call as VocBench
/// does for a closed project.
///
/// # Panics
///
/// Panics when the catalog cannot be assembled.
pub async fn get_app_context() -> AppContext {
    let soil: Arc<BackendHandle> = Arc::new(
        FakeBackend::new("soil", "Soil")
            .with_concepts(&["Loam", "Clay", "Sandy loam"])
            .with_object(SOIL_TEXTURES, FakeObject::collection("Soil textures")),
    );
    let water: Arc<BackendHandle> = Arc::new(
        FakeBackend::new("water", "Water")
            .failing_with("Project error: not an open project: water"),
    );
    let catalog = Catalog::from_backends(vec![soil, water])
        .await
        .expect("fake catalog");
    app_context(test_config(), catalog)
}
