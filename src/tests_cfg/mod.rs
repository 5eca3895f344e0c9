//! Fixtures shared by unit tests and the `tests/` suite.
pub mod app;
pub mod backend;
pub mod config;
pub mod graphs;
