//! `GET /object`: any concept or collection, by vocabulary id and URI.
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::get,
};
use serde::Deserialize;

use super::{error_page, format, Routes};
use crate::{
    app::AppContext,
    render::Format,
    vocab::{dispatcher::ObjectDispatcher, VocabError},
    Error, Result,
};

#[derive(Debug, Default, Deserialize)]
pub struct ObjectParams {
    pub vocab_id: Option<String>,
    pub uri: Option<String>,
    #[serde(rename = "_format")]
    pub format: Option<String>,
}

/// Parameter errors are answered in plain text; everything after the
/// parameters are accepted gets a rendered error page.
pub async fn show(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Query(params): Query<ObjectParams>,
) -> Result<Response> {
    let renderer = ctx
        .renderers
        .for_format(Format::negotiate(params.format.as_deref(), &headers));
    let dispatcher = ObjectDispatcher::new(ctx.catalog.snapshot());

    let dispatched = dispatcher
        .dispatch(params.vocab_id.as_deref(), params.uri.as_deref(), renderer)
        .await;
    match dispatched {
        Ok(representation) => format::render(representation),
        Err(Error::Vocab(VocabError::UnknownVocabulary { known, .. })) => {
            format::text_with_status(
                StatusCode::BAD_REQUEST,
                &format!(
                    "The vocabulary ID you've supplied is not known. Must be one of:\n {}",
                    known.join("\n")
                ),
            )
        }
        Err(Error::Vocab(
            err @ (VocabError::MissingParameter { .. } | VocabError::InvalidParameter { .. }),
        )) => format::text_with_status(StatusCode::BAD_REQUEST, &err.user_message()),
        Err(Error::Vocab(err)) => error_page(renderer, &err),
        Err(err) => Err(err),
    }
}

pub fn routes() -> Routes {
    Routes::new().add("/object", get(show))
}
