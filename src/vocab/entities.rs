use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use super::value_objects::Iri;

/// IRIs of the SKOS and Dublin Core terms the backends understand.
pub mod terms {
    pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    pub const SKOS_COLLECTION: &str = "http://www.w3.org/2004/02/skos/core#Collection";
    pub const SKOS_ORDERED_COLLECTION: &str =
        "http://www.w3.org/2004/02/skos/core#OrderedCollection";
    pub const SKOS_CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";
    pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
    pub const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
    pub const SKOS_BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
    pub const SKOS_NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
    pub const SKOS_MEMBER: &str = "http://www.w3.org/2004/02/skos/core#member";
    pub const SKOS_IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";
    pub const SKOS_HAS_TOP_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#hasTopConcept";
    pub const SKOS_TOP_CONCEPT_OF: &str = "http://www.w3.org/2004/02/skos/core#topConceptOf";
    pub const DCT_TITLE: &str = "http://purl.org/dc/terms/title";
    pub const DCT_DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    pub const DCT_CREATOR: &str = "http://purl.org/dc/terms/creator";
    pub const DCT_CREATED: &str = "http://purl.org/dc/terms/created";
    pub const DCT_MODIFIED: &str = "http://purl.org/dc/terms/modified";
}

/// SKOS class an object URI denotes inside a vocabulary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectClass {
    ConceptScheme,
    Concept,
    Collection,
    /// The URI carries no SKOS class the service knows how to publish.
    Unknown,
}

impl ObjectClass {
    /// Maps an `rdf:type` value onto a class tag.
    #[must_use]
    pub fn from_type_iri(iri: &str) -> Self {
        match iri {
            terms::SKOS_CONCEPT => Self::Concept,
            terms::SKOS_COLLECTION | terms::SKOS_ORDERED_COLLECTION => Self::Collection,
            terms::SKOS_CONCEPT_SCHEME => Self::ConceptScheme,
            _ => Self::Unknown,
        }
    }

    /// Picks the class to publish from every `rdf:type` asserted for a URI.
    ///
    /// Concepts win over collections, which win over schemes.
    #[must_use]
    pub fn from_type_iris<'a>(types: impl IntoIterator<Item = &'a str>) -> Self {
        types
            .into_iter()
            .map(Self::from_type_iri)
            .min_by_key(|class| class.precedence())
            .unwrap_or(Self::Unknown)
    }

    /// Returns the SKOS class IRI, if any.
    #[must_use]
    pub fn iri(self) -> Option<&'static str> {
        match self {
            Self::ConceptScheme => Some(terms::SKOS_CONCEPT_SCHEME),
            Self::Concept => Some(terms::SKOS_CONCEPT),
            Self::Collection => Some(terms::SKOS_COLLECTION),
            Self::Unknown => None,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Self::Concept => 0,
            Self::Collection => 1,
            Self::ConceptScheme => 2,
            Self::Unknown => 3,
        }
    }
}

impl Display for ObjectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.iri() {
            Some(iri) => f.write_str(iri),
            None => f.write_str("no SKOS class"),
        }
    }
}

/// Catalog entry describing one published vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VocabularyRef {
    /// Stable identifier used in routes and query strings.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Canonical URI of the vocabulary inside this service.
    pub uri: String,
}

impl VocabularyRef {
    /// Builds a reference whose URI lives under `<base>/vocabulary/`.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, base: &str) -> Self {
        let id = id.into();
        let uri = format!("{}/vocabulary/{id}", base.trim_end_matches('/'));
        Self {
            id,
            title: title.into(),
            uri,
        }
    }
}

/// Lightweight reference to a concept, used for listings and relations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConceptRef {
    pub uri: Iri,
    pub title: String,
}

impl ConceptRef {
    #[must_use]
    pub fn new(uri: Iri, title: impl Into<String>) -> Self {
        Self {
            uri,
            title: title.into(),
        }
    }

    /// Uses the URI itself as the title when the backend has no label.
    #[must_use]
    pub fn untitled(uri: Iri) -> Self {
        let title = uri.as_str().to_string();
        Self { uri, title }
    }
}

/// A SKOS concept with its immediate hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Concept {
    uri: Iri,
    vocab_id: String,
    title: String,
    definition: Option<String>,
    alt_labels: Vec<String>,
    broader: Vec<ConceptRef>,
    narrower: Vec<ConceptRef>,
    schemes: Vec<Iri>,
}

impl Concept {
    #[must_use]
    pub fn new(vocab_id: impl Into<String>, uri: Iri, title: impl Into<String>) -> Self {
        Self {
            uri,
            vocab_id: vocab_id.into(),
            title: title.into(),
            definition: None,
            alt_labels: Vec::new(),
            broader: Vec::new(),
            narrower: Vec::new(),
            schemes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    #[must_use]
    pub fn with_alt_labels(mut self, labels: Vec<String>) -> Self {
        self.alt_labels = labels;
        self
    }

    #[must_use]
    pub fn with_broader(mut self, broader: Vec<ConceptRef>) -> Self {
        self.broader = broader;
        self
    }

    #[must_use]
    pub fn with_narrower(mut self, narrower: Vec<ConceptRef>) -> Self {
        self.narrower = narrower;
        self
    }

    #[must_use]
    pub fn with_schemes(mut self, schemes: Vec<Iri>) -> Self {
        self.schemes = schemes;
        self
    }

    #[must_use]
    pub fn uri(&self) -> &Iri {
        &self.uri
    }

    #[must_use]
    pub fn vocab_id(&self) -> &str {
        &self.vocab_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    #[must_use]
    pub fn alt_labels(&self) -> &[String] {
        &self.alt_labels
    }

    #[must_use]
    pub fn broader(&self) -> &[ConceptRef] {
        &self.broader
    }

    #[must_use]
    pub fn narrower(&self) -> &[ConceptRef] {
        &self.narrower
    }

    #[must_use]
    pub fn schemes(&self) -> &[Iri] {
        &self.schemes
    }
}

/// A SKOS collection and its members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Collection {
    uri: Iri,
    vocab_id: String,
    title: String,
    definition: Option<String>,
    members: Vec<ConceptRef>,
}

impl Collection {
    #[must_use]
    pub fn new(vocab_id: impl Into<String>, uri: Iri, title: impl Into<String>) -> Self {
        Self {
            uri,
            vocab_id: vocab_id.into(),
            title: title.into(),
            definition: None,
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    #[must_use]
    pub fn with_members(mut self, members: Vec<ConceptRef>) -> Self {
        self.members = members;
        self
    }

    #[must_use]
    pub fn uri(&self) -> &Iri {
        &self.uri
    }

    #[must_use]
    pub fn vocab_id(&self) -> &str {
        &self.vocab_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    #[must_use]
    pub fn members(&self) -> &[ConceptRef] {
        &self.members
    }
}

/// Whole-vocabulary view: the catalog entry plus the concept scheme metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    reference: VocabularyRef,
    scheme: Option<Iri>,
    description: Option<String>,
    creators: Vec<String>,
    created: Option<String>,
    modified: Option<String>,
    top_concepts: Vec<ConceptRef>,
}

impl Vocabulary {
    #[must_use]
    pub fn new(reference: VocabularyRef) -> Self {
        Self {
            reference,
            scheme: None,
            description: None,
            creators: Vec::new(),
            created: None,
            modified: None,
            top_concepts: Vec::new(),
        }
    }

    /// Records the concept scheme IRI and, when present, its own title.
    #[must_use]
    pub fn with_scheme(mut self, scheme: Iri, title: Option<String>) -> Self {
        self.scheme = Some(scheme);
        if let Some(title) = title {
            self.reference.title = title;
        }
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_creators(mut self, creators: Vec<String>) -> Self {
        self.creators = creators;
        self
    }

    #[must_use]
    pub fn with_dates(mut self, created: Option<String>, modified: Option<String>) -> Self {
        self.created = created;
        self.modified = modified;
        self
    }

    #[must_use]
    pub fn with_top_concepts(mut self, top_concepts: Vec<ConceptRef>) -> Self {
        self.top_concepts = top_concepts;
        self
    }

    #[must_use]
    pub fn reference(&self) -> &VocabularyRef {
        &self.reference
    }

    #[must_use]
    pub fn scheme(&self) -> Option<&Iri> {
        self.scheme.as_ref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn creators(&self) -> &[String] {
        &self.creators
    }

    #[must_use]
    pub fn created(&self) -> Option<&str> {
        self.created.as_deref()
    }

    #[must_use]
    pub fn modified(&self) -> Option<&str> {
        self.modified.as_deref()
    }

    #[must_use]
    pub fn top_concepts(&self) -> &[ConceptRef] {
        &self.top_concepts
    }
}

/// Typed object produced by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum SkosObject {
    Concept(Concept),
    Collection(Collection),
}
