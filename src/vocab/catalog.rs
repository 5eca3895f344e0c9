use std::{collections::BTreeMap, sync::Arc};

use arc_swap::ArcSwap;

use super::{
    entities::VocabularyRef,
    errors::VocabError,
    infrastructure::{LocalGraphBackend, LocalVocabulary, VocBenchBackend, VocBenchProject},
    source::{BackendHandle, SourceError},
};
use crate::config::{Config, SourceSettings};

/// A catalog vocabulary bound to the backend instance serving it.
#[derive(Clone)]
pub struct CatalogEntry {
    pub reference: VocabularyRef,
    pub backend: Arc<BackendHandle>,
}

/// Read-only registry of the vocabularies this service publishes.
#[derive(Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

/// Errors raised while assembling a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("vocabulary `{vocab_id}` is served by more than one backend")]
    Duplicate { vocab_id: String },
    #[error("vocabulary `{vocab_id}` uses a VocBench source but no `vocbench` section is configured")]
    MissingVocBench { vocab_id: String },
    #[error("failed to build {backend} backend: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
    #[error("{backend} backend could not list its vocabularies: {source}")]
    Listing {
        backend: &'static str,
        source: SourceError,
    },
}

impl Catalog {
    /// Builds the catalog from every backend's own vocabulary listing.
    ///
    /// # Errors
    ///
    /// Fails when a backend cannot list its vocabularies or two backends
    /// claim the same id.
    pub async fn from_backends(backends: Vec<Arc<BackendHandle>>) -> Result<Self, CatalogError> {
        let mut entries = BTreeMap::new();
        for backend in backends {
            let references =
                backend
                    .list_vocabularies()
                    .await
                    .map_err(|source| CatalogError::Listing {
                        backend: backend.kind(),
                        source,
                    })?;
            for reference in references {
                let vocab_id = reference.id.clone();
                let entry = CatalogEntry {
                    reference,
                    backend: Arc::clone(&backend),
                };
                if entries.insert(vocab_id.clone(), entry).is_some() {
                    return Err(CatalogError::Duplicate { vocab_id });
                }
            }
        }
        Ok(Self { entries })
    }

    /// Builds the backends described by `config.vocabularies` and collects
    /// their vocabularies.
    ///
    /// # Errors
    ///
    /// See [`Catalog::from_backends`]; also fails when a VocBench source is
    /// used without VocBench connection settings.
    pub async fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let base = config.server.base_url();
        let language = config.site.language.as_str();
        let mut local = Vec::new();
        let mut remote = Vec::new();

        for (vocab_id, settings) in &config.vocabularies {
            let reference = VocabularyRef::new(vocab_id.clone(), settings.title.clone(), base);
            match &settings.source {
                SourceSettings::LocalGraph { path } => local.push(LocalVocabulary {
                    reference,
                    path: path.clone(),
                }),
                SourceSettings::Vocbench { project } => remote.push(VocBenchProject {
                    project: project.clone().unwrap_or_else(|| vocab_id.clone()),
                    reference,
                }),
            }
        }

        let mut backends: Vec<Arc<BackendHandle>> = Vec::new();
        if !local.is_empty() {
            backends.push(Arc::new(LocalGraphBackend::new(local, language)));
        }
        if let Some(first) = remote.first() {
            let settings = config
                .vocbench
                .as_ref()
                .ok_or_else(|| CatalogError::MissingVocBench {
                    vocab_id: first.reference.id.clone(),
                })?;
            let backend = VocBenchBackend::try_new(settings, language, remote).map_err(|err| {
                CatalogError::Backend {
                    backend: "vocbench",
                    message: err.to_string(),
                }
            })?;
            backends.push(Arc::new(backend));
        }

        let catalog = Self::from_backends(backends).await?;
        tracing::info!(vocabularies = catalog.len(), "catalog_loaded");
        Ok(catalog)
    }

    #[must_use]
    pub fn contains(&self, vocab_id: &str) -> bool {
        self.entries.contains_key(vocab_id)
    }

    /// Looks up a vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`VocabError::UnknownVocabulary`] listing the valid ids.
    pub fn get(&self, vocab_id: &str) -> Result<&VocabularyRef, VocabError> {
        self.entry(vocab_id).map(|entry| &entry.reference)
    }

    /// Looks up a vocabulary together with its backend.
    ///
    /// # Errors
    ///
    /// Returns [`VocabError::UnknownVocabulary`] listing the valid ids.
    pub fn entry(&self, vocab_id: &str) -> Result<&CatalogEntry, VocabError> {
        self.entries
            .get(vocab_id)
            .ok_or_else(|| VocabError::UnknownVocabulary {
                vocab_id: vocab_id.to_string(),
                known: self.ids(),
            })
    }

    /// The backend serving `vocab_id`.
    ///
    /// # Errors
    ///
    /// Returns [`VocabError::UnknownVocabulary`] listing the valid ids.
    pub fn backend(&self, vocab_id: &str) -> Result<Arc<BackendHandle>, VocabError> {
        self.entry(vocab_id).map(|entry| Arc::clone(&entry.backend))
    }

    /// All vocabularies ordered by id.
    #[must_use]
    pub fn all(&self) -> Vec<VocabularyRef> {
        self.entries
            .values()
            .map(|entry| entry.reference.clone())
            .collect()
    }

    /// All entries ordered by id.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// The first vocabulary id, used to seed links on the index page.
    #[must_use]
    pub fn first_id(&self) -> Option<&str> {
        self.entries.keys().next().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Process-wide catalog handle.
///
/// Requests take a [`snapshot`](CatalogHandle::snapshot) once and work from
/// it, so a [`reload`](CatalogHandle::reload) swaps in a complete catalog
/// without in-flight requests seeing a partial one.
#[derive(Clone)]
pub struct CatalogHandle {
    current: Arc<ArcSwap<Catalog>>,
}

impl CatalogHandle {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(catalog)),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.load_full()
    }

    /// Rebuilds the catalog from `config` and swaps it in.
    ///
    /// # Errors
    ///
    /// Leaves the current catalog in place when the new one fails to build.
    pub async fn reload(&self, config: &Config) -> Result<(), CatalogError> {
        let catalog = Catalog::from_config(config).await?;
        self.current.store(Arc::new(catalog));
        Ok(())
    }
}
