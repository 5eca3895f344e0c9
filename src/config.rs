//! # Configuration Management
//!
//! Configuration is read from `config/<environment>.yaml`, with
//! `config/<environment>.local.yaml` taking precedence when present. Files are
//! rendered through `tera` before parsing, so values can come from the
//! environment:
//!
//! ```yaml
//! server:
//!   port: {{ get_env(name="PORT", default="5150") }}
//! ```
//!
//! The `vocabularies` section is the catalog's data source: each entry maps a
//! vocabulary id to its title and the backend that serves it.
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{environment::Environment, logger, tera, Error, Result};

/// Main application configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logger: Logger,
    pub server: Server,
    #[serde(default)]
    pub site: Site,
    #[serde(default)]
    pub vocbench: Option<VocBenchSettings>,
    #[serde(default)]
    pub vocabularies: BTreeMap<String, VocabularySettings>,
}

/// Logger configuration
///
/// Example (development):
/// ```yaml
/// logger:
///   enable: true
///   level: debug
///   format: compact
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logger {
    pub enable: bool,

    /// Set the logger level.
    pub level: logger::LogLevel,

    /// Set the logger format.
    pub format: logger::Format,

    /// Override our custom tracing filter.
    pub override_filter: Option<String>,

    /// Optional file output, in addition to stdout.
    pub file_appender: Option<LoggerFileAppender>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggerFileAppender {
    pub enable: bool,
    #[serde(default)]
    pub non_blocking: bool,
    /// Level for the file output, independent of the stdout level.
    pub level: logger::LogLevel,
    pub format: logger::Format,
    pub rotation: logger::Rotation,
    pub dir: Option<String>,
    pub filename_prefix: Option<String>,
}

/// Server configuration structure.
///
/// Example (development):
/// ```yaml
/// server:
///   port: 5150
///   host: http://localhost:5150
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Server {
    /// The address on which the server should listen on for incoming
    /// connections.
    #[serde(default = "default_binding")]
    pub binding: String,
    /// The port on which the server should listen for incoming connections.
    pub port: u16,
    /// Public base URL (scheme, authority and optional path) under which
    /// vocabularies are published, e.g. `https://vocabs.example.org`.
    pub host: String,
    /// Abort requests that take longer than this many seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_binding() -> String {
    "localhost".to_string()
}

impl Server {
    /// The public base URL without a trailing slash. The listening port is
    /// not part of it: behind a proxy the two differ.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.host.trim_end_matches('/')
    }
}

/// Site-wide presentation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Site {
    pub title: String,
    /// Document rendered on the `/about` page.
    pub about_path: PathBuf,
    /// Language preferred when picking labels, for every backend.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            title: "Vocabulary Publisher".to_string(),
            about_path: PathBuf::from("README.md"),
            language: default_language(),
        }
    }
}

/// Connection settings for a VocBench instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VocBenchSettings {
    /// Base URL of the Semantic Turkey services, e.g.
    /// `http://vocbench.example.org/semanticturkey/it.uniroma2.art.semanticturkey/st-core-services`.
    pub endpoint: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Upper bound for a single API call.
    #[serde(default = "default_vocbench_timeout")]
    pub timeout_secs: u64,
}

fn default_vocbench_timeout() -> u64 {
    30
}

fn default_language() -> String {
    "en".to_string()
}

/// One catalog entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VocabularySettings {
    pub title: String,
    pub source: SourceSettings,
}

/// Backend serving a vocabulary.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSettings {
    /// A Turtle file read on every request.
    LocalGraph { path: PathBuf },
    /// A VocBench project, named after the vocabulary id unless overridden.
    Vocbench {
        #[serde(default)]
        project: Option<String>,
    },
}

impl SourceSettings {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LocalGraph { .. } => "local_graph",
            Self::Vocbench { .. } => "vocbench",
        }
    }
}

impl Config {
    /// Loads the configuration for `env` from the `config/` folder.
    ///
    /// # Errors
    ///
    /// Returns an error when no file exists or it cannot be rendered or
    /// parsed.
    pub fn new(env: &Environment) -> Result<Self> {
        let config = Self::from_folder(env, Path::new("config"))?;
        Ok(config)
    }

    /// Loads the configuration for `env` from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when no file exists or it cannot be rendered or
    /// parsed.
    pub fn from_folder(env: &Environment, path: &Path) -> Result<Self> {
        let files = [
            path.join(format!("{env}.local.yaml")),
            path.join(format!("{env}.yaml")),
        ];

        let selected_path = files.iter().find(|p| p.exists()).ok_or_else(|| {
            Error::Message(format!(
                "no configuration file found in folder: {}",
                path.display()
            ))
        })?;

        tracing::info!(selected_path =? selected_path, "loading environment from");

        let content = fs::read_to_string(selected_path)?;
        Self::from_yaml(&content)
            .map_err(|err| err.with_yaml_path(selected_path.to_string_lossy().to_string()))
    }

    /// Renders and parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns an error when the template or the YAML is invalid.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let rendered = tera::render_string(content, &json!({}))?;
        serde_yaml::from_str(&rendered).map_err(|err| Error::YAMLFile(err, "<inline>".to_string()))
    }
}
