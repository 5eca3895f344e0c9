use std::{
    collections::BTreeMap,
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;

use crate::vocab::{
    entities::{Collection, Concept, ConceptRef, ObjectClass, Vocabulary, VocabularyRef},
    source::{SourceBackend, SourceError},
    value_objects::Iri,
};

/// Base URL used for the vocabulary references fakes announce.
pub const BASE_URL: &str = "http://localhost:5150";

/// A backend call, recorded in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListVocabularies,
    ListConcepts(String),
    ResolveObjectClass(String),
    FetchConcept(String),
    FetchCollection(String),
    FetchVocabulary(String),
}

#[derive(Debug, Clone)]
pub struct FakeObject {
    class: ObjectClass,
    title: String,
    vanishing: bool,
}

impl FakeObject {
    #[must_use]
    pub fn concept(title: &str) -> Self {
        Self {
            class: ObjectClass::Concept,
            title: title.to_string(),
            vanishing: false,
        }
    }

    #[must_use]
    pub fn collection(title: &str) -> Self {
        Self {
            class: ObjectClass::Collection,
            ..Self::concept(title)
        }
    }

    #[must_use]
    pub fn scheme() -> Self {
        Self {
            class: ObjectClass::ConceptScheme,
            ..Self::concept("Scheme")
        }
    }

    /// Resolves normally but is gone by the time it is fetched.
    #[must_use]
    pub fn vanishing(mut self) -> Self {
        self.vanishing = true;
        self
    }
}

/// In-memory backend serving a single vocabulary and recording every call.
pub struct FakeBackend {
    reference: VocabularyRef,
    objects: BTreeMap<String, FakeObject>,
    concepts: Vec<ConceptRef>,
    not_found: bool,
    failure: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    #[must_use]
    pub fn new(vocab_id: &str, title: &str) -> Self {
        Self {
            reference: VocabularyRef::new(vocab_id, title, BASE_URL),
            objects: BTreeMap::new(),
            concepts: Vec::new(),
            not_found: false,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_object(mut self, uri: &str, object: FakeObject) -> Self {
        self.objects.insert(uri.to_string(), object);
        self
    }

    /// Adds concepts, in the given order, under
    /// `http://example.org/def/<vocab_id>/<slug>`.
    ///
    /// # Panics
    ///
    /// Panics when a title produces an invalid IRI.
    #[must_use]
    pub fn with_concepts(mut self, titles: &[&str]) -> Self {
        for title in titles {
            let slug = title.to_lowercase().replace(' ', "-");
            let uri = format!("http://example.org/def/{}/{slug}", self.reference.id);
            let iri = Iri::new(&uri).expect("fixture titles produce valid IRIs");
            self.concepts.push(ConceptRef::new(iri, *title));
            self.objects.insert(uri, FakeObject::concept(title));
        }
        self
    }

    /// Every class lookup answers "not found".
    #[must_use]
    pub fn resolving_not_found(mut self) -> Self {
        self.not_found = true;
        self
    }

    /// Every call except `list_vocabularies` fails with `message`.
    #[must_use]
    pub fn failing_with(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, vocab_id: &str, call: Call) -> Result<(), SourceError> {
        self.lock().push(call);
        if vocab_id != self.reference.id {
            return Err(SourceError::unknown_vocabulary(vocab_id));
        }
        match &self.failure {
            Some(message) => Err(SourceError::unavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn object(
        &self,
        vocab_id: &str,
        uri: &Iri,
        class: ObjectClass,
    ) -> Result<&FakeObject, SourceError> {
        self.objects
            .get(uri.as_str())
            .filter(|object| object.class == class && !object.vanishing)
            .ok_or_else(|| SourceError::not_found(vocab_id, uri))
    }
}

#[async_trait]
impl SourceBackend for FakeBackend {
    type Error = SourceError;

    fn kind(&self) -> &'static str {
        "fake"
    }

    async fn list_vocabularies(&self) -> Result<Vec<VocabularyRef>, Self::Error> {
        self.lock().push(Call::ListVocabularies);
        Ok(vec![self.reference.clone()])
    }

    async fn list_concepts(&self, vocab_id: &str) -> Result<Vec<ConceptRef>, Self::Error> {
        self.record(vocab_id, Call::ListConcepts(vocab_id.to_string()))?;
        Ok(self.concepts.clone())
    }

    async fn resolve_object_class(
        &self,
        vocab_id: &str,
        uri: &Iri,
    ) -> Result<ObjectClass, Self::Error> {
        self.record(vocab_id, Call::ResolveObjectClass(uri.to_string()))?;
        if self.not_found {
            return Err(SourceError::not_found(vocab_id, uri));
        }
        Ok(self
            .objects
            .get(uri.as_str())
            .map_or(ObjectClass::Unknown, |object| object.class))
    }

    async fn fetch_concept(&self, vocab_id: &str, uri: &Iri) -> Result<Concept, Self::Error> {
        self.record(vocab_id, Call::FetchConcept(uri.to_string()))?;
        let object = self.object(vocab_id, uri, ObjectClass::Concept)?;
        Ok(Concept::new(vocab_id, uri.clone(), object.title.clone()))
    }

    async fn fetch_collection(
        &self,
        vocab_id: &str,
        uri: &Iri,
    ) -> Result<Collection, Self::Error> {
        self.record(vocab_id, Call::FetchCollection(uri.to_string()))?;
        let object = self.object(vocab_id, uri, ObjectClass::Collection)?;
        Ok(Collection::new(vocab_id, uri.clone(), object.title.clone())
            .with_members(self.concepts.clone()))
    }

    async fn fetch_vocabulary(&self, vocab_id: &str) -> Result<Vocabulary, Self::Error> {
        self.record(vocab_id, Call::FetchVocabulary(vocab_id.to_string()))?;
        Ok(Vocabulary::new(self.reference.clone()).with_top_concepts(self.concepts.clone()))
    }
}
