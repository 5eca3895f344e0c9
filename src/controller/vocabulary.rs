//! Vocabulary register, single vocabulary view and concept listings.
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    routing::get,
};

use super::{error_page, format, FormatParams, ListingParams, Routes};
use crate::{
    app::AppContext,
    render::{Format, RegisterView, View},
    vocab::{listing, source::SourceError, VocabError},
    Result,
};

fn backend_failure(vocab_id: &str, error: &SourceError) -> VocabError {
    tracing::warn!(vocab_id, err.msg = %error, err.detail = ?error, "backend_call_failed");
    VocabError::BackendUnavailable {
        message: error.to_string(),
    }
}

/// `GET /vocabulary/`: paginated register of catalog vocabularies.
pub async fn list(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Query(params): Query<ListingParams>,
) -> Result<Response> {
    let query = params.query()?;
    let renderer = ctx
        .renderers
        .for_format(Format::negotiate(params.format.as_deref(), &headers));
    let catalog = ctx.catalog.snapshot();

    let page = listing::paginate(catalog.all(), query);
    format::render(renderer.render(&View::Register(RegisterView::vocabularies(page)))?)
}

/// `GET /vocabulary/{vocab_id}`: the whole-vocabulary view.
pub async fn show(
    State(ctx): State<AppContext>,
    Path(vocab_id): Path<String>,
    headers: HeaderMap,
    Query(params): Query<FormatParams>,
) -> Result<Response> {
    let renderer = ctx
        .renderers
        .for_format(Format::negotiate(params.format.as_deref(), &headers));
    let catalog = ctx.catalog.snapshot();

    let entry = match catalog.entry(&vocab_id) {
        Ok(entry) => entry,
        Err(err) => return error_page(renderer, &err),
    };
    match entry.backend.fetch_vocabulary(&vocab_id).await {
        Ok(vocabulary) => format::render(renderer.render(&View::Vocabulary(&vocabulary))?),
        Err(error) => error_page(renderer, &backend_failure(&vocab_id, &error)),
    }
}

/// `GET /vocabulary/{vocab_id}/concept/`: paginated concepts of one
/// vocabulary.
pub async fn concepts(
    State(ctx): State<AppContext>,
    Path(vocab_id): Path<String>,
    headers: HeaderMap,
    Query(params): Query<ListingParams>,
) -> Result<Response> {
    let query = params.query()?;
    let renderer = ctx
        .renderers
        .for_format(Format::negotiate(params.format.as_deref(), &headers));
    let catalog = ctx.catalog.snapshot();

    let entry = match catalog.entry(&vocab_id) {
        Ok(entry) => entry,
        Err(err) => return error_page(renderer, &err),
    };
    let concepts = match entry.backend.list_concepts(&vocab_id).await {
        Ok(concepts) => concepts,
        Err(error) => return error_page(renderer, &backend_failure(&vocab_id, &error)),
    };

    let page = listing::paginate(concepts, query);
    let view = RegisterView::concepts(&entry.reference, page);
    format::render(renderer.render(&View::Register(view))?)
}

pub fn routes() -> Routes {
    Routes::new()
        .prefix("/vocabulary")
        .add("/", get(list))
        .add("/{vocab_id}", get(show))
        .add("/{vocab_id}/concept/", get(concepts))
}
