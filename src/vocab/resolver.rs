use super::{
    entities::ObjectClass,
    errors::VocabError,
    source::{BackendHandle, SourceError},
    value_objects::Iri,
};

/// Maps backend answers about an object's class onto three outcomes: a
/// class, [`ObjectClass::Unknown`], or [`VocabError::BackendUnavailable`].
pub struct ObjectClassResolver;

impl ObjectClassResolver {
    /// Resolves the class of `uri` inside `vocab_id` through `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`VocabError::BackendUnavailable`] carrying the backend
    /// diagnostic when the backend fails for any reason other than the
    /// object being absent.
    pub async fn resolve(
        backend: &BackendHandle,
        vocab_id: &str,
        uri: &Iri,
    ) -> Result<ObjectClass, VocabError> {
        match backend.resolve_object_class(vocab_id, uri).await {
            Ok(class) => Ok(class),
            Err(SourceError::NotFound { .. }) => Ok(ObjectClass::Unknown),
            Err(error) => {
                tracing::warn!(
                    backend = backend.kind(),
                    vocab_id,
                    uri = %uri,
                    err.msg = %error,
                    err.detail = ?error,
                    "object_class_resolution_failed"
                );
                Err(VocabError::BackendUnavailable {
                    message: error.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_cfg::backend::{FakeBackend, FakeObject};

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    #[tokio::test]
    async fn returns_the_backend_class() {
        let backend = FakeBackend::new("soil", "Soil").with_object(
            "http://example.org/loam",
            FakeObject::concept("Loam"),
        );
        let class = ObjectClassResolver::resolve(&backend, "soil", &iri("http://example.org/loam"))
            .await
            .expect("resolved");
        assert_eq!(class, ObjectClass::Concept);
    }

    #[tokio::test]
    async fn absent_objects_are_unknown_not_errors() {
        let backend = FakeBackend::new("soil", "Soil").resolving_not_found();
        let class =
            ObjectClassResolver::resolve(&backend, "soil", &iri("http://example.org/missing"))
                .await
                .expect("absent object is not an error");
        assert_eq!(class, ObjectClass::Unknown);
    }

    #[tokio::test]
    async fn backend_failures_keep_their_diagnostic() {
        let backend = FakeBackend::new("water", "Water")
            .failing_with("Project error: not an open project: water");
        let err = ObjectClassResolver::resolve(&backend, "water", &iri("http://example.org/x"))
            .await
            .expect_err("backend failure");
        assert_eq!(
            err,
            VocabError::BackendUnavailable {
                message: "Project error: not an open project: water".to_string()
            }
        );
    }
}
