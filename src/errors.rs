//! # Application Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{render::RenderError, vocab::catalog::CatalogError, vocab::VocabError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    /// Client error answered with a plain-text 400.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Vocab(#[from] VocabError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Tera(#[from] tera::Error),

    #[error("cannot parse `{1}`: {0}")]
    YAMLFile(#[source] serde_yaml::Error, String),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

impl Error {
    /// Attaches the file name to a YAML parse failure.
    #[must_use]
    pub fn with_yaml_path(self, path: String) -> Self {
        match self {
            Self::YAMLFile(err, _) => Self::YAMLFile(err, path),
            other => other,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Vocab(err) => match err {
                VocabError::UnknownVocabulary { .. }
                | VocabError::ObjectNotFound { .. }
                | VocabError::UnsupportedClass { .. } => StatusCode::NOT_FOUND,
                VocabError::MissingParameter { .. } | VocabError::InvalidParameter { .. } => {
                    StatusCode::BAD_REQUEST
                }
                VocabError::BackendUnavailable { .. } => StatusCode::BAD_GATEWAY,
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Fallback conversion for handler errors that were not rendered as a page.
///
/// Client errors carry their message; anything else is logged and answered
/// with a generic text so internals do not leak.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Vocab(err) => err.user_message(),
            _ => {
                tracing::error!(
                    error.msg = %self,
                    error.details = ?self,
                    "controller_error"
                );
                "internal server error".to_string()
            }
        };
        (status, body).into_response()
    }
}
