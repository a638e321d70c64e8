//! Store configuration.
//!
//! # Responsibility
//! - Carry external policy inputs (required acknowledgments, expected intake
//!   documents) into the store at construction time.
//! - Load them from JSON or environment variables.
//!
//! # Invariants
//! - Loading never panics; malformed input is a `ConfigError`.

use crate::ledger::SubmissionPolicy;
use crate::model::project::{AcknowledgmentKind, ProjectValidationError};
use crate::queue::parse_queue::DocumentClass;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Comma-separated acknowledgment kinds required before submission.
pub const ENV_REQUIRED_ACKS: &str = "PERMITFLOW_REQUIRED_ACKS";
/// Comma-separated subset of `intake_form,blueprints`.
pub const ENV_INTAKE_DOCUMENTS: &str = "PERMITFLOW_INTAKE_DOCUMENTS";

/// Document classes the intake flow queues for parsing on project creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeDocuments {
    #[serde(default = "enabled")]
    pub intake_form: bool,
    #[serde(default = "enabled")]
    pub blueprints: bool,
}

impl Default for IntakeDocuments {
    fn default() -> Self {
        Self {
            intake_form: true,
            blueprints: true,
        }
    }
}

impl IntakeDocuments {
    /// Whether the intake flow queues `class` for parsing.
    pub fn expects(&self, class: DocumentClass) -> bool {
        match class {
            DocumentClass::IntakeForm => self.intake_form,
            DocumentClass::Blueprint => self.blueprints,
        }
    }

    /// Expected classes in queue order.
    pub fn classes(&self) -> Vec<DocumentClass> {
        DocumentClass::ALL
            .into_iter()
            .filter(|class| self.expects(*class))
            .collect()
    }
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub submission_policy: SubmissionPolicy,
    #[serde(default)]
    pub intake_documents: IntakeDocuments,
}

impl StoreConfig {
    /// Parses a JSON config document. Missing sections use defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|err| ConfigError::Json(err.to_string()))
    }

    /// Loads config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Loads config through an injectable variable lookup.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_REQUIRED_ACKS) {
            let required = split_list(&raw)
                .map(AcknowledgmentKind::parse)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| ConfigError::InvalidAcknowledgment {
                    variable: ENV_REQUIRED_ACKS,
                    source: err,
                })?;
            config.submission_policy = SubmissionPolicy::new(required);
        }

        if let Some(raw) = lookup(ENV_INTAKE_DOCUMENTS) {
            let mut documents = IntakeDocuments {
                intake_form: false,
                blueprints: false,
            };
            for item in split_list(&raw) {
                match item.to_ascii_lowercase().as_str() {
                    "intake_form" => documents.intake_form = true,
                    "blueprints" | "blueprint" => documents.blueprints = true,
                    other => {
                        return Err(ConfigError::UnsupportedValue {
                            variable: ENV_INTAKE_DOCUMENTS,
                            value: other.to_string(),
                        });
                    }
                }
            }
            config.intake_documents = documents;
        }

        Ok(config)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Json(String),
    InvalidAcknowledgment {
        variable: &'static str,
        source: ProjectValidationError,
    },
    UnsupportedValue {
        variable: &'static str,
        value: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(message) => write!(f, "invalid store config JSON: {message}"),
            Self::InvalidAcknowledgment { variable, source } => {
                write!(f, "{variable}: {source}")
            }
            Self::UnsupportedValue { variable, value } => {
                write!(f, "{variable}: unsupported value `{value}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidAcknowledgment { source, .. } => Some(source),
            _ => None,
        }
    }
}
