//! Request-scoped state machine behind the `/object` endpoint.
//!
//! ```text
//! Start -> ClassResolved -> Fetched -> Rendered
//! ```
//!
//! Any step may fail; nothing is rendered unless resolution, the typed fetch
//! and rendering all succeed.
use std::sync::Arc;

use super::{
    catalog::Catalog,
    entities::{ObjectClass, SkosObject},
    errors::VocabError,
    resolver::ObjectClassResolver,
    source::{BackendHandle, SourceError},
    value_objects::Iri,
};
use crate::{
    render::{Renderer, Representation, View},
    Result,
};

/// Routes an object URI to the fetch matching its SKOS class.
///
/// The dispatcher works from one catalog snapshot, so class resolution and
/// the fetch that follows always hit the same backend instance.
pub struct ObjectDispatcher {
    catalog: Arc<Catalog>,
}

impl ObjectDispatcher {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Resolves and fetches the object named by `vocab_id` and `uri`.
    ///
    /// # Errors
    ///
    /// - [`VocabError::UnknownVocabulary`] before any backend is consulted.
    /// - [`VocabError::MissingParameter`] / [`VocabError::InvalidParameter`]
    ///   for an absent, empty or malformed `uri`.
    /// - [`VocabError::BackendUnavailable`] when the backend fails.
    /// - [`VocabError::UnsupportedClass`] for anything but a concept or a
    ///   collection.
    /// - [`VocabError::ObjectNotFound`] when the object vanished between
    ///   resolution and fetch.
    pub async fn fetch(
        &self,
        vocab_id: Option<&str>,
        uri: Option<&str>,
    ) -> std::result::Result<SkosObject, VocabError> {
        let vocab_id = vocab_id.unwrap_or_default();
        let backend = self.catalog.backend(vocab_id)?;
        let uri = match uri.map(str::trim) {
            None | Some("") => return Err(VocabError::missing("uri")),
            Some(uri) => Iri::new(uri).map_err(|err| VocabError::invalid("uri", err.to_string()))?,
        };

        tracing::debug!(vocab_id, uri = %uri, backend = backend.kind(), "object_dispatch_start");
        let class = ObjectClassResolver::resolve(backend.as_ref(), vocab_id, &uri).await?;
        tracing::debug!(vocab_id, uri = %uri, class = %class, "object_class_resolved");

        let object = Self::fetch_typed(backend.as_ref(), vocab_id, &uri, class).await?;
        tracing::debug!(vocab_id, uri = %uri, class = %class, "object_fetched");
        Ok(object)
    }

    async fn fetch_typed(
        backend: &BackendHandle,
        vocab_id: &str,
        uri: &Iri,
        class: ObjectClass,
    ) -> std::result::Result<SkosObject, VocabError> {
        let fetched = match class {
            ObjectClass::Concept => backend
                .fetch_concept(vocab_id, uri)
                .await
                .map(SkosObject::Concept),
            ObjectClass::Collection => backend
                .fetch_collection(vocab_id, uri)
                .await
                .map(SkosObject::Collection),
            ObjectClass::ConceptScheme | ObjectClass::Unknown => {
                return Err(VocabError::UnsupportedClass {
                    vocab_id: vocab_id.to_string(),
                    uri: uri.to_string(),
                    class,
                });
            }
        };

        fetched.map_err(|error| match error {
            SourceError::NotFound { .. } => {
                tracing::info!(vocab_id, uri = %uri, class = %class, "object_vanished_after_resolution");
                VocabError::ObjectNotFound {
                    vocab_id: vocab_id.to_string(),
                    uri: uri.to_string(),
                    class,
                }
            }
            error => {
                tracing::warn!(
                    backend = backend.kind(),
                    vocab_id,
                    uri = %uri,
                    err.msg = %error,
                    err.detail = ?error,
                    "object_fetch_failed"
                );
                VocabError::BackendUnavailable {
                    message: error.to_string(),
                }
            }
        })
    }

    /// Runs [`ObjectDispatcher::fetch`] and renders the result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Vocab`] for dispatch failures and
    /// [`crate::Error::Render`] when rendering fails.
    pub async fn dispatch(
        &self,
        vocab_id: Option<&str>,
        uri: Option<&str>,
        renderer: &dyn Renderer,
    ) -> Result<Representation> {
        let object = self.fetch(vocab_id, uri).await?;
        let representation = renderer.render(&View::Object(&object))?;
        tracing::debug!(media_type = renderer.media_type(), "object_rendered");
        Ok(representation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::Error,
        render::JsonRenderer,
        tests_cfg::backend::{Call, FakeBackend, FakeObject},
    };

    const LOAM: &str = "http://example.org/def/soil/loam";
    const TEXTURES: &str = "http://example.org/def/soil/textures";

    async fn dispatcher_over(backend: Arc<FakeBackend>) -> ObjectDispatcher {
        let handle: Arc<BackendHandle> = backend;
        let catalog = Catalog::from_backends(vec![handle]).await.expect("catalog");
        ObjectDispatcher::new(Arc::new(catalog))
    }

    fn soil() -> Arc<FakeBackend> {
        Arc::new(
            FakeBackend::new("soil", "Soil")
                .with_object(LOAM, FakeObject::concept("Loam"))
                .with_object(TEXTURES, FakeObject::collection("Textures")),
        )
    }

    #[tokio::test]
    async fn unknown_vocabulary_never_reaches_a_backend() {
        let backend = soil();
        let dispatcher = dispatcher_over(Arc::clone(&backend)).await;
        backend.clear_calls();

        let err = dispatcher
            .fetch(Some("air"), Some(LOAM))
            .await
            .expect_err("unknown vocab");
        assert!(matches!(err, VocabError::UnknownVocabulary { ref known, .. } if known == &["soil"]));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn concept_is_resolved_then_fetched_once() {
        let backend = soil();
        let dispatcher = dispatcher_over(Arc::clone(&backend)).await;
        backend.clear_calls();

        let object = dispatcher
            .fetch(Some("soil"), Some(LOAM))
            .await
            .expect("concept");
        assert!(matches!(object, SkosObject::Concept(ref concept) if concept.title() == "Loam"));
        assert_eq!(
            backend.calls(),
            vec![
                Call::ResolveObjectClass(LOAM.to_string()),
                Call::FetchConcept(LOAM.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn collection_never_fetches_a_concept() {
        let backend = soil();
        let dispatcher = dispatcher_over(Arc::clone(&backend)).await;
        backend.clear_calls();

        let object = dispatcher
            .fetch(Some("soil"), Some(TEXTURES))
            .await
            .expect("collection");
        assert!(matches!(object, SkosObject::Collection(_)));
        assert!(!backend
            .calls()
            .iter()
            .any(|call| matches!(call, Call::FetchConcept(_))));
    }

    #[tokio::test]
    async fn missing_or_empty_uri_is_reported() {
        let dispatcher = dispatcher_over(soil()).await;
        for uri in [None, Some(""), Some("  ")] {
            let err = dispatcher.fetch(Some("soil"), uri).await.expect_err("uri");
            assert_eq!(err, VocabError::missing("uri"));
        }
        let err = dispatcher
            .fetch(Some("soil"), Some("not an iri"))
            .await
            .expect_err("invalid");
        assert!(matches!(err, VocabError::InvalidParameter { name: "uri", .. }));
    }

    #[tokio::test]
    async fn unknown_class_is_unsupported() {
        let dispatcher = dispatcher_over(soil()).await;
        let err = dispatcher
            .fetch(Some("soil"), Some("http://example.org/def/soil/nothing"))
            .await
            .expect_err("unsupported");
        assert_eq!(
            err.user_message(),
            "No valid Object Class URI found for vocab_id soil and uri \
             http://example.org/def/soil/nothing.\n\nInstead, found no SKOS class."
        );
    }

    #[tokio::test]
    async fn scheme_is_not_dispatched() {
        let backend = Arc::new(
            FakeBackend::new("soil", "Soil")
                .with_object("http://example.org/def/soil", FakeObject::scheme()),
        );
        let dispatcher = dispatcher_over(backend).await;
        let err = dispatcher
            .fetch(Some("soil"), Some("http://example.org/def/soil"))
            .await
            .expect_err("scheme");
        assert!(matches!(
            err,
            VocabError::UnsupportedClass {
                class: ObjectClass::ConceptScheme,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn vanished_object_is_not_found() {
        let backend = Arc::new(
            FakeBackend::new("soil", "Soil")
                .with_object(LOAM, FakeObject::concept("Loam").vanishing()),
        );
        let dispatcher = dispatcher_over(backend).await;
        let err = dispatcher
            .fetch(Some("soil"), Some(LOAM))
            .await
            .expect_err("vanished");
        assert!(matches!(err, VocabError::ObjectNotFound { class: ObjectClass::Concept, .. }));
    }

    #[tokio::test]
    async fn closed_vocbench_project_is_named() {
        let backend =
            Arc::new(FakeBackend::new("water", "Water").failing_with("not an open project: water"));
        let dispatcher = dispatcher_over(backend).await;
        let err = dispatcher
            .dispatch(Some("water"), Some("http://example.org/def/water/x"), &JsonRenderer)
            .await
            .expect_err("backend error");
        match err {
            Error::Vocab(err) => assert_eq!(
                err.user_message(),
                "The VocBench instance returned with an error: water is not an open project."
            ),
            other => panic!("expected a vocabulary error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatch_renders_the_fetched_object() {
        let dispatcher = dispatcher_over(soil()).await;
        let page = dispatcher
            .dispatch(Some("soil"), Some(LOAM), &JsonRenderer)
            .await
            .expect("rendered");
        let value: serde_json::Value = serde_json::from_str(&page.body).expect("json");
        assert_eq!(value["data"]["class"], "concept");
        assert_eq!(value["data"]["title"], "Loam");
    }
}
