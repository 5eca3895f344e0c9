//! Landing, about and collection register pages.
use axum::{extract::State, response::Response, routing::get};

use super::{format, Routes};
use crate::{
    app::AppContext,
    render::{AboutView, IndexView, Renderer, View},
    Result,
};

pub async fn index(State(ctx): State<AppContext>) -> Result<Response> {
    let catalog = ctx.catalog.snapshot();
    let view = View::Index(IndexView {
        title: &ctx.config.site.title,
        vocab_id: catalog.first_id(),
    });
    format::render(ctx.renderers.html.render(&view)?)
}

/// Renders the configured about document as preformatted text.
pub async fn about(State(ctx): State<AppContext>) -> Result<Response> {
    let path = &ctx.config.site.about_path;
    let content = tokio::fs::read_to_string(path).await.map_err(|err| {
        tracing::error!(path = %path.display(), err.msg = %err, err.detail = ?err, "about_document_unreadable");
        err
    })?;
    let view = View::About(AboutView { content: &content });
    format::render(ctx.renderers.html.render(&view)?)
}

pub async fn collections(State(ctx): State<AppContext>) -> Result<Response> {
    format::render(ctx.renderers.html.render(&View::Collections)?)
}

pub fn routes() -> Routes {
    Routes::new()
        .add("/", get(index))
        .add("/about", get(about))
        .add("/collection/", get(collections))
}
