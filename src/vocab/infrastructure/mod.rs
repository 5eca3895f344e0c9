//! Backend adapters implementing [`SourceBackend`](crate::vocab::SourceBackend).

pub mod local_graph;
pub mod vocbench;

pub use local_graph::{LocalGraphBackend, LocalVocabulary};
pub use vocbench::{VocBenchBackend, VocBenchProject};
