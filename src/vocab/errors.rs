use super::entities::ObjectClass;

const NOT_OPEN_PROJECT: &str = "not an open project";

/// Failures surfaced to users by the vocabulary layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VocabError {
    /// The vocabulary id is not in the catalog.
    #[error("unknown vocabulary `{vocab_id}`")]
    UnknownVocabulary { vocab_id: String, known: Vec<String> },
    /// A required query string argument was not supplied.
    #[error("missing parameter `{name}`")]
    MissingParameter { name: &'static str },
    /// A query string argument was supplied but is malformed.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    /// The backend failed; `message` is its own diagnostic.
    #[error("backend unavailable: {message}")]
    BackendUnavailable { message: String },
    /// Resolution succeeded but the typed fetch found nothing.
    #[error("`{uri}` resolved as {class} in `{vocab_id}` but could not be fetched")]
    ObjectNotFound {
        vocab_id: String,
        uri: String,
        class: ObjectClass,
    },
    /// The object resolved to a class the dispatcher does not publish.
    #[error("`{uri}` in `{vocab_id}` has unsupported class {class}")]
    UnsupportedClass {
        vocab_id: String,
        uri: String,
        class: ObjectClass,
    },
}

impl VocabError {
    #[must_use]
    pub fn missing(name: &'static str) -> Self {
        Self::MissingParameter { name }
    }

    #[must_use]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns true for failures caused by the request itself.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownVocabulary { .. }
                | Self::MissingParameter { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Human readable text shown in error responses.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownVocabulary { known, .. } => {
                let mut msg = String::from(
                    "The vocabulary ID that was supplied was not known. It must be one of these:\n",
                );
                for id in known {
                    msg.push_str("\n* ");
                    msg.push_str(id);
                }
                msg
            }
            Self::MissingParameter { name } => format!(
                "A Query String Argument '{name}' must be supplied for this endpoint, \
                 indicating an object within a vocabulary"
            ),
            Self::InvalidParameter { name, reason } => {
                format!("The Query String Argument '{name}' is invalid: {reason}")
            }
            Self::BackendUnavailable { message } => backend_message(message),
            Self::ObjectNotFound {
                vocab_id,
                uri,
                class,
            } => format!(
                "The object {uri} was resolved as {class} in vocab_id {vocab_id}, \
                 but it could not be retrieved. It may have just been changed."
            ),
            Self::UnsupportedClass {
                vocab_id,
                uri,
                class,
            } => format!(
                "No valid Object Class URI found for vocab_id {vocab_id} and uri {uri}.\n\n\
                 Instead, found {class}."
            ),
        }
    }
}

/// Turns a backend diagnostic into the text shown to users.
///
/// VocBench reports unknown projects as `... not an open project: <id>`; that
/// case names the offending id, everything else is passed through verbatim.
#[must_use]
pub fn backend_message(message: &str) -> String {
    if !message.contains(NOT_OPEN_PROJECT) {
        return message.to_string();
    }
    let vocab_id = message
        .rsplit(&format!("{NOT_OPEN_PROJECT}:"))
        .next()
        .unwrap_or_default()
        .trim();
    format!("The VocBench instance returned with an error: {vocab_id} is not an open project.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_the_project_vocbench_refused() {
        let msg = backend_message("Project error: not an open project: water");
        assert_eq!(
            msg,
            "The VocBench instance returned with an error: water is not an open project."
        );
        assert!(msg.contains("water is not an open project."));
    }

    #[test]
    fn passes_other_diagnostics_through() {
        assert_eq!(backend_message("connection refused"), "connection refused");
    }

    #[test]
    fn unknown_vocabulary_lists_known_ids() {
        let err = VocabError::UnknownVocabulary {
            vocab_id: "nope".to_string(),
            known: vec!["air".to_string(), "soil".to_string()],
        };
        let msg = err.user_message();
        assert!(msg.ends_with("\n* air\n* soil"));
        assert!(err.is_client_error());
    }

    #[test]
    fn unsupported_class_names_what_was_found() {
        let err = VocabError::UnsupportedClass {
            vocab_id: "soil".to_string(),
            uri: "http://example.org/def/soil".to_string(),
            class: ObjectClass::ConceptScheme,
        };
        let msg = err.user_message();
        assert!(msg.contains("vocab_id soil"));
        assert!(msg.contains("uri http://example.org/def/soil"));
        assert!(msg.contains("found http://www.w3.org/2004/02/skos/core#ConceptScheme"));
        assert!(!err.is_client_error());
    }
}
