//! Search, sort and paginate homogeneous item collections.
//!
//! The same pipeline backs the vocabulary register and the per-vocabulary
//! concept register. It assumes `page` and `per_page` are at least 1; the HTTP
//! layer rejects anything else before calling in.

use std::num::NonZeroUsize;

use serde::Serialize;

use super::entities::{ConceptRef, VocabularyRef};

pub const DEFAULT_PER_PAGE: usize = 20;

/// Items that can be listed by display title.
pub trait Listable {
    fn title(&self) -> &str;
}

impl Listable for VocabularyRef {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Listable for ConceptRef {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Search text and page window requested by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub page: NonZeroUsize,
    pub per_page: NonZeroUsize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: None,
            page: NonZeroUsize::MIN,
            per_page: NonZeroUsize::new(DEFAULT_PER_PAGE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl SearchQuery {
    #[must_use]
    pub fn new(text: Option<String>, page: NonZeroUsize, per_page: NonZeroUsize) -> Self {
        Self {
            text,
            page,
            per_page,
        }
    }

    /// Search text, with an empty string treated as no search at all.
    #[must_use]
    pub fn needle(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.is_empty())
    }

    fn window(&self) -> (usize, usize) {
        let start = (self.page.get() - 1).saturating_mul(self.per_page.get());
        (start, start.saturating_add(self.per_page.get()))
    }
}

/// One page of a filtered and sorted listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of items after filtering and before pagination.
    pub total: usize,
    pub query: SearchQuery,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` items, at least 1.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.query.per_page.get()).max(1)
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.query.page.get() < self.page_count()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.query.page.get() > 1
    }

    /// Converts the items while keeping totals and the query echo.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            query: self.query,
        }
    }
}

/// Keeps the items whose title contains `needle`, ignoring case.
pub fn filter<T: Listable>(items: Vec<T>, needle: &str) -> Vec<T> {
    let needle = needle.to_lowercase();
    items
        .into_iter()
        .filter(|item| item.title().to_lowercase().contains(&needle))
        .collect()
}

/// Runs the full pipeline over `items`.
pub fn paginate<T: Listable>(items: Vec<T>, query: SearchQuery) -> Page<T> {
    let mut items = match query.needle() {
        Some(needle) => filter(items, needle),
        None => items,
    };
    items.sort_by(|a, b| a.title().cmp(b.title()));

    let total = items.len();
    let (start, end) = query.window();
    let items = if start >= total {
        Vec::new()
    } else {
        items.drain(start..end.min(total)).collect()
    };

    Page {
        items,
        total,
        query,
    }
}
