use axum::http::StatusCode;
use tera::{Context, Tera};

use super::{RenderError, Renderer, Representation, View};
use crate::vocab::entities::SkosObject;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../assets/views/base.html")),
    ("index.html", include_str!("../../assets/views/index.html")),
    ("register.html", include_str!("../../assets/views/register.html")),
    ("vocabulary.html", include_str!("../../assets/views/vocabulary.html")),
    ("concept.html", include_str!("../../assets/views/concept.html")),
    ("collection.html", include_str!("../../assets/views/collection.html")),
    ("collections.html", include_str!("../../assets/views/collections.html")),
    ("about.html", include_str!("../../assets/views/about.html")),
    ("error.html", include_str!("../../assets/views/error.html")),
];

/// Renders views through the bundled `tera` templates.
pub struct HtmlRenderer {
    tera: Tera,
    site_title: String,
}

impl HtmlRenderer {
    /// Compiles the bundled templates.
    ///
    /// # Errors
    ///
    /// Returns an error when a template does not compile.
    pub fn new(site_title: &str) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self {
            tera,
            site_title: site_title.to_string(),
        })
    }

    fn page(
        &self,
        template: &str,
        status: StatusCode,
        data: &impl serde::Serialize,
    ) -> Result<Representation, RenderError> {
        let mut context = Context::new();
        context.insert("site_title", &self.site_title);
        context.insert("page", data);
        let body = self.tera.render(template, &context)?;
        Ok(Representation {
            status,
            content_type: self.media_type(),
            body,
        })
    }
}

impl Renderer for HtmlRenderer {
    fn media_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    fn render(&self, view: &View<'_>) -> Result<Representation, RenderError> {
        match view {
            View::Index(index) => self.page("index.html", StatusCode::OK, index),
            View::Register(register) => self.page("register.html", StatusCode::OK, register),
            View::Vocabulary(vocabulary) => {
                self.page("vocabulary.html", StatusCode::OK, vocabulary)
            }
            View::Object(SkosObject::Concept(concept)) => {
                self.page("concept.html", StatusCode::OK, concept)
            }
            View::Object(SkosObject::Collection(collection)) => {
                self.page("collection.html", StatusCode::OK, collection)
            }
            View::Collections => self.page("collections.html", StatusCode::OK, &()),
            View::About(about) => self.page("about.html", StatusCode::OK, about),
            View::Error(error) => self.page("error.html", error.status, error),
        }
    }
}
