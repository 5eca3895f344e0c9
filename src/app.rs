//! Shared state handed to every request handler.
use std::sync::Arc;

use crate::{config::Config, environment::Environment, render::Renderers, vocab::catalog::CatalogHandle};

/// Application context, cloned into each handler through axum state.
///
/// Holds the catalog behind a swap handle, so the context itself stays
/// cheap to clone and free of request-specific data.
#[derive(Clone)]
pub struct AppContext {
    /// The environment the application runs in.
    pub environment: Environment,
    /// Configuration the application was booted with.
    pub config: Config,
    /// Current vocabulary catalog.
    pub catalog: CatalogHandle,
    /// HTML and JSON renderers.
    pub renderers: Arc<Renderers>,
}
