use async_trait::async_trait;

use super::entities::{Collection, Concept, ConceptRef, ObjectClass, Vocabulary, VocabularyRef};
use super::value_objects::Iri;

/// Capability set every vocabulary data origin provides.
///
/// Callers hold one backend handle per vocabulary and never branch on the
/// concrete origin. All operations are reads and may be repeated freely.
#[async_trait]
pub trait SourceBackend {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Short name of the origin, used in logs and the CLI catalog listing.
    fn kind(&self) -> &'static str;

    /// Enumerates every vocabulary this backend instance serves.
    async fn list_vocabularies(&self) -> Result<Vec<VocabularyRef>, Self::Error>;

    /// Lists all concepts of a vocabulary in backend order.
    async fn list_concepts(&self, vocab_id: &str) -> Result<Vec<ConceptRef>, Self::Error>;

    /// Determines which SKOS class the URI denotes.
    ///
    /// Implementors must return [`ObjectClass::Unknown`] when the URI is
    /// absent from the vocabulary.
    async fn resolve_object_class(
        &self,
        vocab_id: &str,
        uri: &Iri,
    ) -> Result<ObjectClass, Self::Error>;

    /// Fetches a concept. The class may have changed since resolution, in
    /// which case implementors report the object as not found.
    async fn fetch_concept(&self, vocab_id: &str, uri: &Iri) -> Result<Concept, Self::Error>;

    /// Fetches a collection with its members.
    async fn fetch_collection(&self, vocab_id: &str, uri: &Iri)
        -> Result<Collection, Self::Error>;

    /// Fetches the whole-vocabulary view.
    async fn fetch_vocabulary(&self, vocab_id: &str) -> Result<Vocabulary, Self::Error>;
}

/// Type alias simplifying backend trait object usage across the crate.
pub type BackendHandle = dyn SourceBackend<Error = SourceError> + Send + Sync + 'static;

/// Failures raised by backend implementations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The origin refused or failed the request. The message is the
    /// origin's own diagnostic and is shown to users verbatim.
    #[error("{message}")]
    Unavailable { message: String },
    /// The object does not exist in the vocabulary with the requested class.
    #[error("`{uri}` not found in vocabulary `{vocab_id}`")]
    NotFound { vocab_id: String, uri: String },
    /// The vocabulary id is not served by this backend instance.
    #[error("vocabulary `{vocab_id}` is not served by this backend")]
    UnknownVocabulary { vocab_id: String },
    /// Reading a local graph failed.
    #[error("failed to read vocabulary graph `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// A local graph could not be parsed.
    #[error("failed to parse vocabulary graph `{path}`: {message}")]
    Parse { path: String, message: String },
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn not_found(vocab_id: &str, uri: &Iri) -> Self {
        Self::NotFound {
            vocab_id: vocab_id.to_string(),
            uri: uri.to_string(),
        }
    }

    pub fn unknown_vocabulary(vocab_id: &str) -> Self {
        Self::UnknownVocabulary {
            vocab_id: vocab_id.to_string(),
        }
    }
}
