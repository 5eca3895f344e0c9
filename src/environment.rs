//! # Application Environment
//!
//! Selects which `config/<environment>.yaml` file is loaded. The environment
//! comes from the `--environment` flag or the `VOCPUB_ENV` variable and
//! defaults to development.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{config::Config, Result};

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const ENV_VAR: &str = "VOCPUB_ENV";

#[must_use]
pub fn resolve_from_env() -> String {
    std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    #[serde(rename = "production")]
    Production,
    #[serde(rename = "development")]
    Development,
    #[serde(rename = "test")]
    Test,
    Any(String),
}

impl Environment {
    /// Loads the configuration for this environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file is missing or invalid.
    pub fn load(&self) -> Result<Config> {
        Config::new(self)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => "production".fmt(f),
            Self::Development => "development".fmt(f),
            Self::Test => "test".fmt(f),
            Self::Any(s) => s.fmt(f),
        }
    }
}

impl From<String> for Environment {
    fn from(env: String) -> Self {
        Self::from_str(&env).unwrap_or(Self::Any(env))
    }
}

impl FromStr for Environment {
    type Err = &'static str;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input {
            "production" => Ok(Self::Production),
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            s => Ok(Self::Any(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_custom_environments() {
        assert_eq!(Environment::from("test".to_string()), Environment::Test);
        assert_eq!(
            Environment::from("staging".to_string()),
            Environment::Any("staging".to_string())
        );
        assert_eq!(Environment::Production.to_string(), "production");
    }
}
