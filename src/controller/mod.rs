//! HTTP surface of the publisher.
//!
//! Handlers take the [`AppContext`](crate::app::AppContext) from axum state,
//! grab one catalog snapshot, and answer through a [`Renderer`] picked by
//! content negotiation.
use std::num::NonZeroUsize;

use axum::response::Response;
use serde::Deserialize;

pub use app_routes::{AppRoutes, ListRoutes};
pub use routes::Routes;

use crate::{
    render::{ErrorView, Renderer, View},
    vocab::{
        listing::{SearchQuery, DEFAULT_PER_PAGE},
        VocabError,
    },
    Error, Result,
};

mod app_routes;
pub mod format;
pub mod monitoring;
pub mod object;
pub mod pages;
mod routes;
pub mod vocabulary;

/// `_format` query argument accepted by every representation route.
#[derive(Debug, Default, Deserialize)]
pub struct FormatParams {
    #[serde(rename = "_format")]
    pub format: Option<String>,
}

/// Query arguments of the listing routes.
///
/// Numbers are taken as text so malformed values get our own 400 message
/// instead of the extractor's rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "_format")]
    pub format: Option<String>,
}

impl ListingParams {
    /// Validates the paging arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadRequest`] when `page` or `per_page` is not a
    /// whole number of at least 1.
    pub fn query(&self) -> Result<SearchQuery> {
        let page = positive("page", self.page.as_deref(), 1)?;
        let per_page = positive("per_page", self.per_page.as_deref(), DEFAULT_PER_PAGE)?;
        Ok(SearchQuery::new(self.search.clone(), page, per_page))
    }
}

fn positive(name: &str, value: Option<&str>, default: usize) -> Result<NonZeroUsize> {
    let value = value.map(str::trim).filter(|value| !value.is_empty());
    let parsed = match value {
        None => NonZeroUsize::new(default),
        Some(value) => value.parse::<NonZeroUsize>().ok(),
    };
    parsed.ok_or_else(|| {
        Error::BadRequest(format!(
            "The Query String Argument '{name}' must be a whole number of at least 1"
        ))
    })
}

/// Renders `err` as an error page with the status matching its kind.
///
/// # Errors
///
/// Returns an error when the error page itself cannot be rendered.
pub fn error_page(renderer: &dyn Renderer, err: &VocabError) -> Result<Response> {
    if err.is_client_error() {
        tracing::info!(err.msg = %err, "request_rejected");
    } else {
        tracing::warn!(err.msg = %err, err.detail = ?err, "request_failed");
    }
    format::render(renderer.render(&View::Error(ErrorView::from(err)))?)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn params(page: Option<&str>, per_page: Option<&str>) -> ListingParams {
        ListingParams {
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
            ..ListingParams::default()
        }
    }

    #[test]
    fn paging_defaults() {
        let query = params(None, Some("")).query().expect("defaults");
        assert_eq!(query.page.get(), 1);
        assert_eq!(query.per_page.get(), DEFAULT_PER_PAGE);
    }

    #[rstest]
    #[case(Some("0"), None)]
    #[case(Some("-1"), None)]
    #[case(Some("two"), None)]
    #[case(None, Some("0"))]
    #[case(None, Some("1.5"))]
    fn rejects_bad_paging(#[case] page: Option<&str>, #[case] per_page: Option<&str>) {
        let err = params(page, per_page).query().expect_err("bad paging");
        assert!(matches!(err, Error::BadRequest(_)));
    }
}
