//! # vocpub
//!
//! Publishes SKOS vocabularies over HTTP. Each vocabulary in the catalog is
//! served by a [`SourceBackend`](vocab::source::SourceBackend), either a
//! local RDF graph or a VocBench project, and every page is available as
//! HTML or JSON.
pub use self::errors::Error;

pub mod app;
pub mod boot;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod environment;
pub mod errors;
pub mod logger;
pub mod render;
mod tera;
#[cfg(any(test, feature = "testing"))]
pub mod tests_cfg;
pub mod vocab;

#[cfg(feature = "testing")]
pub use axum_test::TestServer;

/// Application results options list
pub type Result<T, E = Error> = std::result::Result<T, E>;
