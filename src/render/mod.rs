//! Renderer contract consumed by controllers and the object dispatcher.
//!
//! Controllers build a [`View`] from domain objects; a [`Renderer`] turns it
//! into a [`Representation`]. Two renderers ship: HTML through `tera`
//! templates and JSON through `serde_json`.

mod html;
mod json;

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;

use crate::vocab::{
    entities::{ConceptRef, SkosObject, Vocabulary, VocabularyRef},
    listing::Page,
    VocabError,
};

/// Register class IRI announced on vocabulary listings.
pub const CONCEPT_SCHEME_REGISTER: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] tera::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Everything a renderer can be asked to present.
#[derive(Debug, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum View<'a> {
    Index(IndexView<'a>),
    Register(RegisterView),
    Vocabulary(&'a Vocabulary),
    Object(&'a SkosObject),
    Collections,
    About(AboutView<'a>),
    Error(ErrorView),
}

#[derive(Debug, Serialize)]
pub struct IndexView<'a> {
    pub title: &'a str,
    /// A vocabulary to link to from the landing page.
    pub vocab_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct AboutView<'a> {
    pub content: &'a str,
}

/// Paginated listing of vocabularies or concepts.
#[derive(Debug, Serialize)]
pub struct RegisterView {
    pub title: String,
    pub register_class: String,
    /// Set when listing the concepts of one vocabulary.
    pub vocab_id: Option<String>,
    pub items: Vec<RegisterItem>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub page_count: usize,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterItem {
    pub uri: String,
    pub title: String,
    /// Vocabulary id for vocabulary listings.
    pub id: Option<String>,
}

impl RegisterView {
    fn from_page<T>(
        title: String,
        register_class: String,
        vocab_id: Option<String>,
        page: Page<T>,
        item: impl FnMut(T) -> RegisterItem,
    ) -> Self {
        let page_count = page.page_count();
        let page = page.map(item);
        Self {
            title,
            register_class,
            vocab_id,
            items: page.items,
            total: page.total,
            page: page.query.page.get(),
            per_page: page.query.per_page.get(),
            page_count,
            search: page.query.text,
        }
    }

    /// Register of catalog vocabularies.
    #[must_use]
    pub fn vocabularies(page: Page<VocabularyRef>) -> Self {
        Self::from_page(
            "Vocabularies".to_string(),
            CONCEPT_SCHEME_REGISTER.to_string(),
            None,
            page,
            |vocabulary| RegisterItem {
                uri: vocabulary.uri,
                title: vocabulary.title,
                id: Some(vocabulary.id),
            },
        )
    }

    /// Register of the concepts of `vocabulary`.
    #[must_use]
    pub fn concepts(vocabulary: &VocabularyRef, page: Page<ConceptRef>) -> Self {
        Self::from_page(
            format!("{} concepts", vocabulary.title),
            vocabulary.uri.clone(),
            Some(vocabulary.id.clone()),
            page,
            |concept| RegisterItem {
                uri: concept.uri.to_string(),
                title: concept.title,
                id: None,
            },
        )
    }
}

/// Human readable error page.
#[derive(Debug, Serialize)]
pub struct ErrorView {
    #[serde(skip)]
    pub status: StatusCode,
    pub title: String,
    pub heading: String,
    pub message: String,
    /// `message` split into paragraphs.
    pub lines: Vec<String>,
}

impl From<&VocabError> for ErrorView {
    fn from(err: &VocabError) -> Self {
        let (status, title, heading) = match err {
            VocabError::UnknownVocabulary { .. } => (
                StatusCode::NOT_FOUND,
                "Error - invalid vocab id",
                "Invalid Vocab ID",
            ),
            VocabError::MissingParameter { .. } | VocabError::InvalidParameter { .. } => (
                StatusCode::BAD_REQUEST,
                "Error - invalid request",
                "Invalid Request",
            ),
            VocabError::BackendUnavailable { .. } => {
                (StatusCode::BAD_GATEWAY, "Error", "Vocabulary Source Error")
            }
            VocabError::ObjectNotFound { .. } | VocabError::UnsupportedClass { .. } => (
                StatusCode::NOT_FOUND,
                "Error - Object Class URI",
                "Concept Class Type Error",
            ),
        };
        let message = err.user_message();
        let lines = message
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        Self {
            status,
            title: title.to_string(),
            heading: heading.to_string(),
            message,
            lines,
        }
    }
}

/// Rendered body plus the metadata needed to send it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl IntoResponse for Representation {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type))],
            self.body,
        )
            .into_response()
    }
}

/// Turns views into representations.
pub trait Renderer: Send + Sync {
    /// Media type of every representation this renderer produces.
    fn media_type(&self) -> &'static str;

    /// Renders `view`.
    ///
    /// # Errors
    ///
    /// Returns an error when templating or serialization fails.
    fn render(&self, view: &View<'_>) -> Result<Representation, RenderError>;
}

/// Representation requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Html,
    Json,
}

impl Format {
    /// Picks the format from an explicit `_format` argument, then `Accept`.
    #[must_use]
    pub fn negotiate(explicit: Option<&str>, headers: &HeaderMap) -> Self {
        match explicit {
            Some("json" | "application/json") => return Self::Json,
            Some("html" | "text/html") => return Self::Html,
            _ => {}
        }
        let accepts_json = headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|accept| {
                accept.contains("application/json") && !accept.contains("text/html")
            });
        if accepts_json {
            Self::Json
        } else {
            Self::Html
        }
    }
}

/// The renderers available to request handlers.
pub struct Renderers {
    pub html: HtmlRenderer,
    pub json: JsonRenderer,
}

impl Renderers {
    /// Builds both renderers.
    ///
    /// # Errors
    ///
    /// Returns an error when the bundled templates fail to compile.
    pub fn new(site_title: &str) -> Result<Self, RenderError> {
        Ok(Self {
            html: HtmlRenderer::new(site_title)?,
            json: JsonRenderer,
        })
    }

    #[must_use]
    pub fn for_format(&self, format: Format) -> &dyn Renderer {
        match format {
            Format::Html => &self.html,
            Format::Json => &self.json,
        }
    }
}
