use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

use async_trait::async_trait;
use serde::Deserialize;
use reqwest::StatusCode;
use tokio::sync::Mutex;

use crate::{
    config::VocBenchSettings,
    vocab::{
        entities::{Collection, Concept, ConceptRef, ObjectClass, Vocabulary, VocabularyRef},
        source::{SourceBackend, SourceError},
        value_objects::Iri,
    },
};

const PREFIXES: &str = "PREFIX skos: <http://www.w3.org/2004/02/skos/core#>\n\
                        PREFIX dct: <http://purl.org/dc/terms/>\n";

/// A VocBench project published as a catalog vocabulary.
#[derive(Clone, Debug)]
pub struct VocBenchProject {
    pub reference: VocabularyRef,
    /// Project name on the VocBench side.
    pub project: String,
}

/// Serves vocabularies from VocBench projects through its SPARQL service.
pub struct VocBenchBackend {
    client: reqwest::Client,
    endpoint: String,
    credentials: Option<(String, String)>,
    language: String,
    projects: BTreeMap<String, VocBenchProject>,
    /// Whether the cookie store holds a live session.
    session: Mutex<bool>,
}

impl VocBenchBackend {
    /// Builds a client for `settings.endpoint`, picking labels in
    /// `language` first.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn try_new(
        settings: &VocBenchSettings,
        language: &str,
        projects: Vec<VocBenchProject>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        let credentials = match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        };
        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            credentials,
            language: language.to_string(),
            projects: projects
                .into_iter()
                .map(|project| (project.reference.id.clone(), project))
                .collect(),
            session: Mutex::new(false),
        })
    }

    fn project(&self, vocab_id: &str) -> Result<&VocBenchProject, SourceError> {
        self.projects
            .get(vocab_id)
            .ok_or_else(|| SourceError::unknown_vocabulary(vocab_id))
    }

    async fn login(&self) -> Result<(), SourceError> {
        let Some((username, password)) = &self.credentials else {
            return Ok(());
        };
        let response = self
            .client
            .post(format!("{}/Auth/login", self.endpoint))
            .form(&[
                ("email", username.as_str()),
                ("password", password.as_str()),
                ("_spring_security_remember_me", "false"),
            ])
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::unavailable(format!(
                "VocBench login failed with status {status}"
            )));
        }
        tracing::info!(endpoint = %self.endpoint, "vocbench_session_opened");
        Ok(())
    }

    /// Logs in unless a session is already open.
    async fn open_session(&self) -> Result<(), SourceError> {
        let mut open = self.session.lock().await;
        if !*open {
            self.login().await?;
            *open = true;
        }
        Ok(())
    }

    async fn evaluate(
        &self,
        project: &VocBenchProject,
        query: &str,
    ) -> Result<(StatusCode, String), SourceError> {
        let response = self
            .client
            .get(format!("{}/SPARQL/evaluateQuery", self.endpoint))
            .query(&[("ctx_project", project.project.as_str()), ("query", query)])
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        Ok((status, body))
    }

    /// Runs a SELECT query against the vocabulary's project.
    ///
    /// A 401 or 403 while logged in means the session expired: the backend
    /// logs in again and retries the query once.
    async fn select(&self, vocab_id: &str, query: &str) -> Result<Vec<Row>, SourceError> {
        let project = self.project(vocab_id)?;
        self.open_session().await?;

        let query = format!("{PREFIXES}{query}");
        tracing::debug!(vocab_id, project = %project.project, query = %query, "vocbench_select");
        let (mut status, mut body) = self.evaluate(project, &query).await?;
        if session_expired(status) && self.credentials.is_some() {
            tracing::info!(endpoint = %self.endpoint, %status, "vocbench_session_expired");
            *self.session.lock().await = false;
            self.open_session().await?;
            (status, body) = self.evaluate(project, &query).await?;
        }

        if !status.is_success() {
            return Err(SourceError::unavailable(format!(
                "VocBench responded with status {status}: {body}"
            )));
        }
        parse_envelope(&body)
    }

    /// Every prefLabel of `subject`; the preferred one is chosen from the
    /// returned language tags.
    fn label_pattern(subject: &str, var: &str) -> String {
        format!("OPTIONAL {{ {subject} skos:prefLabel ?{var} }}")
    }

    async fn concept_refs(
        &self,
        vocab_id: &str,
        pattern: &str,
    ) -> Result<Vec<ConceptRef>, SourceError> {
        let query = format!(
            "SELECT DISTINCT ?c ?label WHERE {{ {pattern} {} }}",
            Self::label_pattern("?c", "label")
        );
        let rows = self.select(vocab_id, &query).await?;
        Ok(refs_from_rows(&rows, "c", "label", &self.language))
    }

    async fn types(&self, vocab_id: &str, uri: &Iri) -> Result<Vec<String>, SourceError> {
        let rows = self
            .select(vocab_id, &format!("SELECT ?type WHERE {{ <{uri}> a ?type }}"))
            .await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.uri("type"))
            .map(str::to_string)
            .collect())
    }

    async fn class_of(&self, vocab_id: &str, uri: &Iri) -> Result<ObjectClass, SourceError> {
        let types = self.types(vocab_id, uri).await?;
        Ok(ObjectClass::from_type_iris(types.iter().map(String::as_str)))
    }

    /// Title and definition of `uri`, preferring the configured language.
    async fn describe(
        &self,
        vocab_id: &str,
        uri: &Iri,
    ) -> Result<(Option<String>, Option<String>), SourceError> {
        let query = format!(
            "SELECT ?label ?definition WHERE {{ \
             {} \
             OPTIONAL {{ <{uri}> skos:definition ?definition }} }}",
            Self::label_pattern(&format!("<{uri}>"), "label"),
        );
        let rows = self.select(vocab_id, &query).await?;
        Ok((
            best_literal(&rows, "label", &self.language),
            best_literal(&rows, "definition", &self.language),
        ))
    }
}

fn session_expired(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn transport_error(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::unavailable(format!("VocBench did not answer in time: {err}"))
    } else {
        SourceError::unavailable(format!("VocBench request failed: {err}"))
    }
}

/// Semantic Turkey response envelope. Failures carry `stresponse`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<SparqlResult>,
    #[serde(default)]
    stresponse: Option<StResponse>,
}

#[derive(Debug, Deserialize)]
struct StResponse {
    #[serde(default)]
    msg: String,
    #[serde(default)]
    exception: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SparqlResult {
    sparql: SparqlDocument,
}

#[derive(Debug, Deserialize)]
struct SparqlDocument {
    results: SparqlBindings,
}

#[derive(Debug, Deserialize)]
struct SparqlBindings {
    bindings: Vec<Row>,
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct Row(HashMap<String, Binding>);

#[derive(Debug, Deserialize)]
struct Binding {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    #[serde(rename = "xml:lang", default)]
    lang: Option<String>,
}

impl Row {
    fn uri(&self, var: &str) -> Option<&str> {
        self.0
            .get(var)
            .filter(|binding| binding.kind == "uri")
            .map(|binding| binding.value.as_str())
    }

    fn literal(&self, var: &str) -> Option<&str> {
        self.tagged_literal(var).map(|(value, _)| value)
    }

    fn tagged_literal(&self, var: &str) -> Option<(&str, Option<&str>)> {
        self.0
            .get(var)
            .filter(|binding| binding.kind == "literal" || binding.kind == "typed-literal")
            .map(|binding| (binding.value.as_str(), binding.lang.as_deref()))
    }

    fn value(&self, var: &str) -> Option<&str> {
        self.0.get(var).map(|binding| binding.value.as_str())
    }
}

fn parse_envelope(body: &str) -> Result<Vec<Row>, SourceError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|err| {
        SourceError::unavailable(format!("VocBench returned an unreadable response: {err}"))
    })?;
    if let Some(error) = envelope.stresponse {
        tracing::warn!(
            exception = error.exception.as_deref().unwrap_or_default(),
            msg = %error.msg,
            "vocbench_error_response"
        );
        return Err(SourceError::unavailable(error.msg));
    }
    envelope
        .result
        .map(|result| result.sparql.results.bindings)
        .ok_or_else(|| SourceError::unavailable("VocBench response carried no result"))
}

/// 0 for the preferred language, 1 for untagged, 2 for anything else.
fn language_rank(tag: Option<&str>, language: &str) -> u8 {
    match tag {
        Some(tag) if tag.eq_ignore_ascii_case(language) => 0,
        None | Some("") => 1,
        Some(_) => 2,
    }
}

/// The best ranked literal bound to `var`; ties keep the first row.
fn best_literal(rows: &[Row], var: &str, language: &str) -> Option<String> {
    rows.iter()
        .filter_map(|row| row.tagged_literal(var))
        .min_by_key(|(_, tag)| language_rank(*tag, language))
        .map(|(value, _)| value.to_string())
}

/// Collapses rows of `?uri ?label` into sorted refs, one per URI, keeping
/// the best ranked label of each.
fn refs_from_rows(
    rows: &[Row],
    uri_var: &str,
    label_var: &str,
    language: &str,
) -> Vec<ConceptRef> {
    let mut titles: BTreeMap<Iri, Option<(u8, String)>> = BTreeMap::new();
    for row in rows {
        let Some(uri) = row.uri(uri_var).and_then(|uri| Iri::new(uri).ok()) else {
            continue;
        };
        let slot = titles.entry(uri).or_default();
        if let Some((value, tag)) = row.tagged_literal(label_var) {
            let rank = language_rank(tag, language);
            if slot.as_ref().map_or(true, |(best, _)| rank < *best) {
                *slot = Some((rank, value.to_string()));
            }
        }
    }
    let mut refs: Vec<ConceptRef> = titles
        .into_iter()
        .map(|(uri, title)| match title.map(|(_, title)| title) {
            Some(title) => ConceptRef::new(uri, title),
            None => ConceptRef::untitled(uri),
        })
        .collect();
    refs.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.uri.cmp(&b.uri)));
    refs
}

#[async_trait]
impl SourceBackend for VocBenchBackend {
    type Error = SourceError;

    fn kind(&self) -> &'static str {
        "vocbench"
    }

    async fn list_vocabularies(&self) -> Result<Vec<VocabularyRef>, Self::Error> {
        Ok(self
            .projects
            .values()
            .map(|project| project.reference.clone())
            .collect())
    }

    async fn list_concepts(&self, vocab_id: &str) -> Result<Vec<ConceptRef>, Self::Error> {
        self.concept_refs(vocab_id, "?c a skos:Concept .").await
    }

    async fn resolve_object_class(
        &self,
        vocab_id: &str,
        uri: &Iri,
    ) -> Result<ObjectClass, Self::Error> {
        self.class_of(vocab_id, uri).await
    }

    async fn fetch_concept(&self, vocab_id: &str, uri: &Iri) -> Result<Concept, Self::Error> {
        if self.class_of(vocab_id, uri).await? != ObjectClass::Concept {
            return Err(SourceError::not_found(vocab_id, uri));
        }
        let (title, definition) = self.describe(vocab_id, uri).await?;

        let alt_rows = self
            .select(
                vocab_id,
                &format!(
                    "SELECT ?alt WHERE {{ <{uri}> skos:altLabel ?alt . \
                     FILTER(lang(?alt) = \"{lang}\" || lang(?alt) = \"\") }}",
                    lang = self.language
                ),
            )
            .await?;
        let mut alt_labels: Vec<String> = alt_rows
            .iter()
            .filter_map(|row| row.literal("alt"))
            .map(str::to_string)
            .collect();
        alt_labels.sort();

        let broader = self
            .concept_refs(
                vocab_id,
                &format!("{{ <{uri}> skos:broader ?c }} UNION {{ ?c skos:narrower <{uri}> }}"),
            )
            .await?;
        let narrower = self
            .concept_refs(
                vocab_id,
                &format!("{{ <{uri}> skos:narrower ?c }} UNION {{ ?c skos:broader <{uri}> }}"),
            )
            .await?;
        let schemes = self
            .select(vocab_id, &format!("SELECT ?s WHERE {{ <{uri}> skos:inScheme ?s }}"))
            .await?
            .iter()
            .filter_map(|row| row.uri("s"))
            .filter_map(|scheme| Iri::new(scheme).ok())
            .collect();

        let title = title.unwrap_or_else(|| uri.as_str().to_string());
        let mut concept = Concept::new(vocab_id, uri.clone(), title)
            .with_alt_labels(alt_labels)
            .with_broader(broader)
            .with_narrower(narrower)
            .with_schemes(schemes);
        if let Some(definition) = definition {
            concept = concept.with_definition(definition);
        }
        Ok(concept)
    }

    async fn fetch_collection(
        &self,
        vocab_id: &str,
        uri: &Iri,
    ) -> Result<Collection, Self::Error> {
        if self.class_of(vocab_id, uri).await? != ObjectClass::Collection {
            return Err(SourceError::not_found(vocab_id, uri));
        }
        let (title, definition) = self.describe(vocab_id, uri).await?;
        let members = self
            .concept_refs(vocab_id, &format!("<{uri}> skos:member ?c ."))
            .await?;

        let title = title.unwrap_or_else(|| uri.as_str().to_string());
        let mut collection = Collection::new(vocab_id, uri.clone(), title).with_members(members);
        if let Some(definition) = definition {
            collection = collection.with_definition(definition);
        }
        Ok(collection)
    }

    async fn fetch_vocabulary(&self, vocab_id: &str) -> Result<Vocabulary, Self::Error> {
        let reference = self.project(vocab_id)?.reference.clone();
        let query = format!(
            "SELECT ?s ?title ?description ?created ?modified WHERE {{ \
             ?s a skos:ConceptScheme . \
             {} \
             OPTIONAL {{ ?s dct:description ?description }} \
             OPTIONAL {{ ?s dct:created ?created }} \
             OPTIONAL {{ ?s dct:modified ?modified }} \
             }} ORDER BY ?s",
            Self::label_pattern("?s", "title")
        );
        let rows = self.select(vocab_id, &query).await?;
        let Some(first) = rows.iter().find_map(|row| row.uri("s")) else {
            return Ok(Vocabulary::new(reference));
        };
        let Ok(scheme) = Iri::new(first) else {
            return Ok(Vocabulary::new(reference));
        };
        let rows: Vec<Row> = rows
            .into_iter()
            .filter(|row| row.uri("s") == Some(scheme.as_str()))
            .collect();
        let Some(row) = rows.first() else {
            return Ok(Vocabulary::new(reference));
        };

        let creators = self
            .select(
                vocab_id,
                &format!("SELECT ?creator WHERE {{ <{scheme}> dct:creator ?creator }}"),
            )
            .await?
            .iter()
            .filter_map(|row| row.value("creator"))
            .map(str::to_string)
            .collect();
        let top_concepts = self
            .concept_refs(
                vocab_id,
                &format!(
                    "{{ <{scheme}> skos:hasTopConcept ?c }} UNION {{ ?c skos:topConceptOf <{scheme}> }}"
                ),
            )
            .await?;

        let mut vocabulary = Vocabulary::new(reference)
            .with_creators(creators)
            .with_dates(
                row.value("created").map(str::to_string),
                row.value("modified").map(str::to_string),
            )
            .with_top_concepts(top_concepts)
            .with_scheme(scheme, best_literal(&rows, "title", &self.language));
        if let Some(description) = best_literal(&rows, "description", &self.language) {
            vocabulary = vocabulary.with_description(description);
        }
        Ok(vocabulary)
    }
}
