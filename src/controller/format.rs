//! Response helpers shared by controllers.
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{render::Representation, Result};

/// Returns a JSON response.
///
/// # Errors
///
/// Never fails; the `Result` keeps handler signatures uniform.
pub fn json<T: Serialize>(t: T) -> Result<Response> {
    Ok(Json(t).into_response())
}

/// Returns a plain text response with the given status.
///
/// # Errors
///
/// Never fails; the `Result` keeps handler signatures uniform.
pub fn text_with_status(status: StatusCode, body: &str) -> Result<Response> {
    Ok((
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body.to_string(),
    )
        .into_response())
}

/// Sends a rendered representation.
///
/// # Errors
///
/// Never fails; the `Result` keeps handler signatures uniform.
pub fn render(representation: Representation) -> Result<Response> {
    Ok(representation.into_response())
}
