//! Boots the application: builds the context from configuration, mounts the
//! routes and serves them until interrupted.
use std::sync::Arc;

use axum::Router;

use crate::{
    app::AppContext,
    config::Config,
    controller::{object, pages, vocabulary, AppRoutes},
    environment::Environment,
    render::Renderers,
    vocab::catalog::{Catalog, CatalogHandle},
    Result,
};

/// Every route the application serves.
#[must_use]
pub fn routes() -> AppRoutes {
    AppRoutes::with_default_routes()
        .add_route(pages::routes())
        .add_route(vocabulary::routes())
        .add_route(object::routes())
}

/// Loads the catalog and compiles the templates.
///
/// # Errors
///
/// Fails when a configured backend cannot list its vocabularies or the
/// templates do not compile.
pub async fn create_context(environment: &Environment, config: Config) -> Result<AppContext> {
    let catalog = Catalog::from_config(&config).await?;
    let renderers = Renderers::new(&config.site.title)?;
    Ok(AppContext {
        environment: environment.clone(),
        config,
        catalog: CatalogHandle::new(catalog),
        renderers: Arc::new(renderers),
    })
}

/// Builds the router for `ctx`.
///
/// # Errors
///
/// Fails when two handlers claim the same uri.
pub fn create_router(ctx: AppContext) -> Result<Router> {
    routes().to_router(ctx)
}

/// Serves `router` on the configured binding until ctrl-c.
///
/// # Errors
///
/// Fails when the listener cannot bind or the server stops with an error.
pub async fn serve(router: Router, ctx: &AppContext) -> Result<()> {
    let address = format!("{}:{}", ctx.config.server.binding, ctx.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        environment = %ctx.environment,
        address,
        vocabularies = ctx.catalog.snapshot().len(),
        "listening"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Loads the configuration for `environment`, sets up logging and serves.
///
/// # Errors
///
/// See [`create_context`] and [`serve`].
pub async fn start(environment: &Environment) -> Result<()> {
    let config = environment.load()?;
    crate::logger::init(&config.logger);
    let ctx = create_context(environment, config).await?;
    let router = create_router(ctx.clone())?;
    serve(router, &ctx).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutting_down"),
        Err(err) => {
            tracing::error!(err.msg = %err, err.detail = ?err, "ctrl_c_listener_failed");
        }
    }
}
