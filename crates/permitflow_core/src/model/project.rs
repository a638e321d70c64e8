//! Project domain model.
//!
//! # Responsibility
//! - Define the canonical permitting case record and its identifiers.
//! - Validate ids and acknowledgment kinds at construction and deserialization.
//!
//! # Invariants
//! - `ProjectId` is non-empty, trimmed and never reused within a session.
//! - `AcknowledgmentKind` is normalized to lowercase `[a-z0-9_-]`.
//! - `files` keeps upload order and is append-only.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MAX_PROJECT_ID_CHARS: usize = 128;

/// Stable identifier of one permitting case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Parses a caller-provided id, trimming surrounding whitespace.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ProjectValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProjectValidationError::EmptyId);
        }
        if trimmed.chars().count() > MAX_PROJECT_ID_CHARS {
            return Err(ProjectValidationError::IdTooLong(trimmed.chars().count()));
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ProjectValidationError::InvalidId(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generates a fresh UUID v4 backed id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = ProjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for ProjectId {
    type Error = ProjectValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ProjectId> for String {
    fn from(value: ProjectId) -> Self {
        value.0
    }
}

/// One submission prerequisite that can be signed off, e.g. `safety`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcknowledgmentKind(String);

impl AcknowledgmentKind {
    /// Parses and normalizes one acknowledgment kind (trim + lowercase).
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ProjectValidationError> {
        let normalized = value.as_ref().trim().to_ascii_lowercase();
        if !is_valid_acknowledgment_kind(&normalized) {
            return Err(ProjectValidationError::InvalidAcknowledgmentKind(
                value.as_ref().to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AcknowledgmentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AcknowledgmentKind {
    type Error = ProjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AcknowledgmentKind> for String {
    fn from(value: AcknowledgmentKind) -> Self {
        value.0
    }
}

fn is_valid_acknowledgment_kind(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Postal address of the construction site. Free-form, shown verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl ProjectAddress {
    /// Single-line rendering for list rows, skipping blank parts.
    pub fn one_line(&self) -> String {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.postal_code.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Display-only building specification value attached to a project.
///
/// Numbers keep their source text (`serde_json` is built with
/// `arbitrary_precision`), so parcel numbers and `1.50` render as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Flag(bool),
    Number(Number),
    Text(String),
    List(Vec<AttributeValue>),
    Group(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Renders the value verbatim for detail views.
    pub fn display(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Flag(true) => "Yes".to_string(),
            Self::Flag(false) => "No".to_string(),
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
            Self::List(values) => values
                .iter()
                .map(Self::display)
                .collect::<Vec<_>>()
                .join(", "),
            Self::Group(entries) => entries
                .iter()
                .map(|(key, value)| format!("{key}: {}", value.display()))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Flag(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Group(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

// Every JSON shape maps to a variant; numbers keep their source text.
impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Document class of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    IntakeForm,
    Blueprint,
    Other,
}

/// Reference to one uploaded file. The handle is owned by the upload pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub handle: String,
    pub kind: FileKind,
}

impl ProjectFile {
    pub fn new(name: impl Into<String>, handle: impl Into<String>, kind: FileKind) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            kind,
        }
    }
}

/// Canonical permitting case record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Assigned once at creation; never changes.
    pub id: ProjectId,
    pub customer_name: String,
    #[serde(default)]
    pub address: ProjectAddress,
    /// Opaque to the coordinator; rendered as-is by detail views.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Append-only, upload order.
    #[serde(default)]
    pub files: Vec<ProjectFile>,
    /// Grows only, through the acknowledgment ledger.
    #[serde(default)]
    pub acknowledgments: BTreeSet<AcknowledgmentKind>,
}

impl Project {
    /// Creates a project with a generated id and empty collections.
    pub fn new(customer_name: impl Into<String>, address: ProjectAddress) -> Self {
        Self::with_id(ProjectId::generate(), customer_name, address)
    }

    /// Creates a project with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: ProjectId, customer_name: impl Into<String>, address: ProjectAddress) -> Self {
        Self {
            id,
            customer_name: customer_name.into(),
            address,
            attributes: BTreeMap::new(),
            files: Vec::new(),
            acknowledgments: BTreeSet::new(),
        }
    }

    /// Parses one project record from JSON, validating ids and kinds.
    pub fn from_json_str(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|err| format!("invalid project JSON: {err}"))
    }

    /// Builder-style helper for attaching one display attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Files of one document class, in upload order.
    pub fn files_of_kind(&self, kind: FileKind) -> impl Iterator<Item = &ProjectFile> {
        self.files.iter().filter(move |file| file.kind == kind)
    }

    /// Whether `kind` has been signed off for this project.
    pub fn has_acknowledged(&self, kind: &AcknowledgmentKind) -> bool {
        self.acknowledgments.contains(kind)
    }
}

/// Validation errors for project identifiers and acknowledgment kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    EmptyId,
    InvalidId(String),
    IdTooLong(usize),
    InvalidAcknowledgmentKind(String),
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "project id cannot be empty"),
            Self::InvalidId(value) => {
                write!(f, "project id must not contain whitespace: `{value}`")
            }
            Self::IdTooLong(len) => write!(
                f,
                "project id has {len} chars; max is {MAX_PROJECT_ID_CHARS}"
            ),
            Self::InvalidAcknowledgmentKind(value) => write!(
                f,
                "acknowledgment kind is invalid: `{value}`; expected [a-z0-9_-]"
            ),
        }
    }
}

impl Error for ProjectValidationError {}
