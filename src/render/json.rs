use axum::http::StatusCode;

use super::{RenderError, Renderer, Representation, View};

/// Serializes views as JSON documents.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn media_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, view: &View<'_>) -> Result<Representation, RenderError> {
        let status = match view {
            View::Error(error) => error.status,
            _ => StatusCode::OK,
        };
        Ok(Representation {
            status,
            content_type: self.media_type(),
            body: serde_json::to_string(view)?,
        })
    }
}
