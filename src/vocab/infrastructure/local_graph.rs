use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use oxrdf::{vocab::rdf, Graph, LiteralRef, NamedNodeRef, TermRef};
use oxttl::TurtleParser;

use crate::vocab::{
    entities::{
        terms, Collection, Concept, ConceptRef, ObjectClass, Vocabulary, VocabularyRef,
    },
    source::{SourceBackend, SourceError},
    value_objects::Iri,
};

/// A vocabulary published from a Turtle file.
#[derive(Clone, Debug)]
pub struct LocalVocabulary {
    pub reference: VocabularyRef,
    pub path: PathBuf,
}

/// Serves vocabularies from local RDF files.
///
/// Files are parsed on every call, so edits show up without a restart.
#[derive(Clone, Debug)]
pub struct LocalGraphBackend {
    vocabularies: BTreeMap<String, LocalVocabulary>,
    language: String,
}

impl LocalGraphBackend {
    /// Labels are picked in `language` first, then untagged, then any.
    #[must_use]
    pub fn new(vocabularies: Vec<LocalVocabulary>, language: &str) -> Self {
        Self {
            vocabularies: vocabularies
                .into_iter()
                .map(|vocabulary| (vocabulary.reference.id.clone(), vocabulary))
                .collect(),
            language: language.to_string(),
        }
    }

    fn vocabulary(&self, vocab_id: &str) -> Result<&LocalVocabulary, SourceError> {
        self.vocabularies
            .get(vocab_id)
            .ok_or_else(|| SourceError::unknown_vocabulary(vocab_id))
    }

    async fn load(&self, vocab_id: &str) -> Result<SkosGraph<'_>, SourceError> {
        let vocabulary = self.vocabulary(vocab_id)?;
        let bytes = tokio::fs::read(&vocabulary.path)
            .await
            .map_err(|source| SourceError::Io {
                path: vocabulary.path.display().to_string(),
                source,
            })?;
        let graph = SkosGraph::parse(&vocabulary.path, &bytes, &self.language)?;
        tracing::debug!(
            vocab_id,
            path = %vocabulary.path.display(),
            triples = graph.graph.len(),
            "local_graph_loaded"
        );
        Ok(graph)
    }
}

/// Parsed graph with the SKOS lookups the backend needs.
struct SkosGraph<'a> {
    graph: Graph,
    language: &'a str,
}

impl<'a> SkosGraph<'a> {
    fn parse(path: &Path, bytes: &[u8], language: &'a str) -> Result<Self, SourceError> {
        let mut graph = Graph::new();
        for triple in TurtleParser::new().for_slice(bytes) {
            let triple = triple.map_err(|err| SourceError::Parse {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
            graph.insert(&triple);
        }
        Ok(Self { graph, language })
    }

    fn types(&self, subject: &Iri) -> Vec<&str> {
        self.graph
            .objects_for_subject_predicate(subject.as_named_node(), rdf::TYPE)
            .filter_map(named_node)
            .map(|node| node.as_str())
            .collect()
    }

    fn has_type(&self, subject: &Iri, class: &str) -> bool {
        self.types(subject).contains(&class)
    }

    fn objects(&self, subject: &Iri, predicate: &str) -> Vec<Iri> {
        self.graph
            .objects_for_subject_predicate(
                subject.as_named_node(),
                NamedNodeRef::new_unchecked(predicate),
            )
            .filter_map(named_node)
            .filter_map(|node| Iri::new(node.as_str()).ok())
            .collect()
    }

    fn subjects(&self, predicate: &str, object: NamedNodeRef<'_>) -> Vec<Iri> {
        self.graph
            .subjects_for_predicate_object(NamedNodeRef::new_unchecked(predicate), object)
            .filter_map(|subject| named_node(TermRef::from(subject)))
            .filter_map(|node| Iri::new(node.as_str()).ok())
            .collect()
    }

    fn instances_of(&self, class: &str) -> Vec<Iri> {
        self.subjects(rdf::TYPE.as_str(), NamedNodeRef::new_unchecked(class))
    }

    fn literals(&self, subject: &Iri, predicate: &str) -> Vec<LiteralRef<'_>> {
        self.graph
            .objects_for_subject_predicate(
                subject.as_named_node(),
                NamedNodeRef::new_unchecked(predicate),
            )
            .filter_map(|term| match term {
                TermRef::Literal(literal) => Some(literal),
                _ => None,
            })
            .collect()
    }

    /// Best literal for `predicate`: English, then untagged, then any.
    fn text(&self, subject: &Iri, predicate: &str) -> Option<String> {
        pick_literal(self.literals(subject, predicate), self.language)
    }

    fn title(&self, subject: &Iri) -> Option<String> {
        self.text(subject, terms::SKOS_PREF_LABEL)
            .or_else(|| self.text(subject, terms::DCT_TITLE))
    }

    fn concept_ref(&self, uri: Iri) -> ConceptRef {
        match self.title(&uri) {
            Some(title) => ConceptRef::new(uri, title),
            None => ConceptRef::untitled(uri),
        }
    }

    /// Builds sorted, de-duplicated refs for `uris`.
    fn refs(&self, uris: impl IntoIterator<Item = Iri>) -> Vec<ConceptRef> {
        let unique: BTreeSet<Iri> = uris.into_iter().collect();
        let mut refs: Vec<ConceptRef> = unique.into_iter().map(|uri| self.concept_ref(uri)).collect();
        refs.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.uri.cmp(&b.uri)));
        refs
    }

    /// Literal values and IRIs of `predicate`, as display strings.
    fn values(&self, subject: &Iri, predicate: &str) -> Vec<String> {
        self.graph
            .objects_for_subject_predicate(
                subject.as_named_node(),
                NamedNodeRef::new_unchecked(predicate),
            )
            .filter_map(|term| match term {
                TermRef::Literal(literal) => Some(literal.value().to_string()),
                TermRef::NamedNode(node) => Some(node.as_str().to_string()),
                _ => None,
            })
            .collect()
    }
}

fn named_node(term: TermRef<'_>) -> Option<NamedNodeRef<'_>> {
    match term {
        TermRef::NamedNode(node) => Some(node),
        _ => None,
    }
}

fn pick_literal(literals: Vec<LiteralRef<'_>>, language: &str) -> Option<String> {
    literals
        .iter()
        .find(|literal| literal.language() == Some(language))
        .or_else(|| literals.iter().find(|literal| literal.language().is_none()))
        .or_else(|| literals.first())
        .map(|literal| literal.value().to_string())
}

#[async_trait]
impl SourceBackend for LocalGraphBackend {
    type Error = SourceError;

    fn kind(&self) -> &'static str {
        "local_graph"
    }

    async fn list_vocabularies(&self) -> Result<Vec<VocabularyRef>, Self::Error> {
        Ok(self
            .vocabularies
            .values()
            .map(|vocabulary| vocabulary.reference.clone())
            .collect())
    }

    async fn list_concepts(&self, vocab_id: &str) -> Result<Vec<ConceptRef>, Self::Error> {
        let graph = self.load(vocab_id).await?;
        Ok(graph
            .instances_of(terms::SKOS_CONCEPT)
            .into_iter()
            .map(|uri| graph.concept_ref(uri))
            .collect())
    }

    async fn resolve_object_class(
        &self,
        vocab_id: &str,
        uri: &Iri,
    ) -> Result<ObjectClass, Self::Error> {
        let graph = self.load(vocab_id).await?;
        Ok(ObjectClass::from_type_iris(graph.types(uri)))
    }

    async fn fetch_concept(&self, vocab_id: &str, uri: &Iri) -> Result<Concept, Self::Error> {
        let graph = self.load(vocab_id).await?;
        if !graph.has_type(uri, terms::SKOS_CONCEPT) {
            return Err(SourceError::not_found(vocab_id, uri));
        }

        let node = uri.as_named_node();
        let broader = graph
            .objects(uri, terms::SKOS_BROADER)
            .into_iter()
            .chain(graph.subjects(terms::SKOS_NARROWER, node));
        let narrower = graph
            .objects(uri, terms::SKOS_NARROWER)
            .into_iter()
            .chain(graph.subjects(terms::SKOS_BROADER, node));
        let mut alt_labels: Vec<String> = graph
            .literals(uri, terms::SKOS_ALT_LABEL)
            .into_iter()
            .map(|literal| literal.value().to_string())
            .collect();
        alt_labels.sort();

        let title = graph
            .title(uri)
            .unwrap_or_else(|| uri.as_str().to_string());
        let mut concept = Concept::new(vocab_id, uri.clone(), title)
            .with_alt_labels(alt_labels)
            .with_broader(graph.refs(broader))
            .with_narrower(graph.refs(narrower))
            .with_schemes(graph.objects(uri, terms::SKOS_IN_SCHEME));
        if let Some(definition) = graph.text(uri, terms::SKOS_DEFINITION) {
            concept = concept.with_definition(definition);
        }
        Ok(concept)
    }

    async fn fetch_collection(
        &self,
        vocab_id: &str,
        uri: &Iri,
    ) -> Result<Collection, Self::Error> {
        let graph = self.load(vocab_id).await?;
        if ObjectClass::from_type_iris(graph.types(uri)) != ObjectClass::Collection {
            return Err(SourceError::not_found(vocab_id, uri));
        }

        let title = graph
            .title(uri)
            .unwrap_or_else(|| uri.as_str().to_string());
        let mut collection = Collection::new(vocab_id, uri.clone(), title)
            .with_members(graph.refs(graph.objects(uri, terms::SKOS_MEMBER)));
        if let Some(definition) = graph.text(uri, terms::SKOS_DEFINITION) {
            collection = collection.with_definition(definition);
        }
        Ok(collection)
    }

    async fn fetch_vocabulary(&self, vocab_id: &str) -> Result<Vocabulary, Self::Error> {
        let reference = self.vocabulary(vocab_id)?.reference.clone();
        let graph = self.load(vocab_id).await?;
        let mut vocabulary = Vocabulary::new(reference);

        let Some(scheme) = graph.instances_of(terms::SKOS_CONCEPT_SCHEME).into_iter().min() else {
            tracing::warn!(vocab_id, "local_graph_without_concept_scheme");
            return Ok(vocabulary);
        };

        let description = graph
            .text(&scheme, terms::SKOS_DEFINITION)
            .or_else(|| graph.text(&scheme, terms::DCT_DESCRIPTION));
        let top_concepts = graph
            .objects(&scheme, terms::SKOS_HAS_TOP_CONCEPT)
            .into_iter()
            .chain(graph.subjects(terms::SKOS_TOP_CONCEPT_OF, scheme.as_named_node()));

        vocabulary = vocabulary
            .with_creators(graph.values(&scheme, terms::DCT_CREATOR))
            .with_dates(
                graph.values(&scheme, terms::DCT_CREATED).into_iter().next(),
                graph.values(&scheme, terms::DCT_MODIFIED).into_iter().next(),
            )
            .with_top_concepts(graph.refs(top_concepts))
            .with_scheme(scheme.clone(), graph.title(&scheme));
        if let Some(description) = description {
            vocabulary = vocabulary.with_description(description);
        }
        Ok(vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_cfg::graphs::{write_graph, SOIL_TTL};

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    fn backend(path: PathBuf) -> LocalGraphBackend {
        backend_in(path, "en")
    }

    fn backend_in(path: PathBuf, language: &str) -> LocalGraphBackend {
        LocalGraphBackend::new(
            vec![LocalVocabulary {
                reference: VocabularyRef::new("soil", "Soil", "http://localhost:5150"),
                path,
            }],
            language,
        )
    }

    #[tokio::test]
    async fn resolves_classes_from_type_triples() {
        let path = write_graph("resolve", SOIL_TTL);
        let backend = backend(path.clone());

        let cases = [
            ("http://example.org/def/soil/loam", ObjectClass::Concept),
            ("http://example.org/def/soil/textures", ObjectClass::Collection),
            ("http://example.org/def/soil", ObjectClass::ConceptScheme),
            ("http://example.org/def/soil/nothing", ObjectClass::Unknown),
        ];
        for (uri, expected) in cases {
            let class = backend
                .resolve_object_class("soil", &iri(uri))
                .await
                .expect("resolve");
            assert_eq!(class, expected, "{uri}");
        }

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn lists_concepts_with_english_labels() {
        let path = write_graph("list", SOIL_TTL);
        let backend = backend(path.clone());

        let mut titles: Vec<String> = backend
            .list_concepts("soil")
            .await
            .expect("concepts")
            .into_iter()
            .map(|concept| concept.title)
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["Clay", "Loam", "Sandy loam"]);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn labels_follow_the_configured_language() {
        let path = write_graph("language", SOIL_TTL);
        let backend = backend_in(path.clone(), "de");

        let loam = backend
            .fetch_concept("soil", &iri("http://example.org/def/soil/loam"))
            .await
            .expect("loam");
        assert_eq!(loam.title(), "Lehm");
        let clay = backend
            .fetch_concept("soil", &iri("http://example.org/def/soil/clay"))
            .await
            .expect("clay");
        assert_eq!(clay.title(), "Clay");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn concept_hierarchy_uses_both_directions() {
        let path = write_graph("concept", SOIL_TTL);
        let backend = backend(path.clone());

        let loam = backend
            .fetch_concept("soil", &iri("http://example.org/def/soil/loam"))
            .await
            .expect("loam");
        assert_eq!(loam.title(), "Loam");
        assert_eq!(loam.definition(), Some("Soil with roughly equal sand and silt."));
        assert_eq!(loam.alt_labels(), ["Loamy soil".to_string()]);
        let narrower: Vec<&str> = loam.narrower().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(narrower, vec!["Sandy loam"]);

        let sandy = backend
            .fetch_concept("soil", &iri("http://example.org/def/soil/sandy-loam"))
            .await
            .expect("sandy loam");
        let broader: Vec<&str> = sandy.broader().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(broader, vec!["Loam"]);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn fetching_with_the_wrong_class_is_not_found() {
        let path = write_graph("race", SOIL_TTL);
        let backend = backend(path.clone());

        let err = backend
            .fetch_concept("soil", &iri("http://example.org/def/soil/textures"))
            .await
            .expect_err("collection is not a concept");
        assert!(matches!(err, SourceError::NotFound { .. }));

        let collection = backend
            .fetch_collection("soil", &iri("http://example.org/def/soil/textures"))
            .await
            .expect("collection");
        let members: Vec<&str> = collection.members().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(members, vec!["Clay", "Loam"]);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn vocabulary_carries_scheme_metadata() {
        let path = write_graph("vocabulary", SOIL_TTL);
        let backend = backend(path.clone());

        let vocabulary = backend.fetch_vocabulary("soil").await.expect("vocabulary");
        assert_eq!(vocabulary.reference().title, "Soil Types");
        assert_eq!(
            vocabulary.scheme().map(Iri::as_str),
            Some("http://example.org/def/soil")
        );
        assert_eq!(vocabulary.created(), Some("2019-03-01"));
        let top: Vec<&str> = vocabulary.top_concepts().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(top, vec!["Clay", "Loam"]);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn io_and_parse_failures_are_reported() {
        let missing = backend(std::env::temp_dir().join("vocpub-definitely-missing.ttl"));
        let err = missing.list_concepts("soil").await.expect_err("missing file");
        assert!(matches!(err, SourceError::Io { .. }));

        let path = write_graph("broken", "<http://example.org/a> <http://example.org/b> .");
        let broken = backend(path.clone());
        let err = broken.list_concepts("soil").await.expect_err("broken turtle");
        assert!(matches!(err, SourceError::Parse { .. }));

        let err = broken.list_concepts("water").await.expect_err("not served");
        assert!(matches!(err, SourceError::UnknownVocabulary { .. }));

        let _ = std::fs::remove_file(path);
    }
}
