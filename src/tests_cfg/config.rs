use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    config::{Config, Logger, Server, Site, SourceSettings, VocBenchSettings, VocabularySettings},
    logger,
};

/// Configuration with logging off, a VocBench section pointing nowhere and
/// no vocabularies.
#[must_use]
pub fn test_config() -> Config {
    Config {
        logger: Logger {
            enable: false,
            level: logger::LogLevel::Off,
            format: logger::Format::Compact,
            override_filter: None,
            file_appender: None,
        },
        server: Server {
            binding: "localhost".to_string(),
            port: 5150,
            host: "http://localhost:5150".to_string(),
            request_timeout_secs: None,
        },
        site: Site {
            title: "Test Vocabularies".to_string(),
            about_path: PathBuf::from("README.md"),
            language: "en".to_string(),
        },
        vocbench: Some(VocBenchSettings {
            endpoint: "http://127.0.0.1:9/semanticturkey".to_string(),
            username: None,
            password: None,
            timeout_secs: 1,
        }),
        vocabularies: BTreeMap::new(),
    }
}

/// [`test_config`] serving `path` as the `soil` vocabulary.
#[must_use]
pub fn local_graph_config(path: PathBuf) -> Config {
    let mut config = test_config();
    config.vocabularies.insert(
        "soil".to_string(),
        VocabularySettings {
            title: "Soil".to_string(),
            source: SourceSettings::LocalGraph { path },
        },
    );
    config
}
