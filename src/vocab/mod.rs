//! SKOS vocabulary domain: entities, the backend capability trait and its
//! implementations, the catalog, the listing pipeline and the object
//! dispatcher.
pub mod catalog;
pub mod dispatcher;
pub mod entities;
pub mod errors;
pub mod infrastructure;
pub mod listing;
pub mod resolver;
pub mod source;
pub mod value_objects;

pub use catalog::{Catalog, CatalogHandle};
pub use dispatcher::ObjectDispatcher;
pub use entities::{ObjectClass, SkosObject};
pub use errors::VocabError;
pub use resolver::ObjectClassResolver;
pub use source::{BackendHandle, SourceBackend, SourceError};
pub use value_objects::Iri;
