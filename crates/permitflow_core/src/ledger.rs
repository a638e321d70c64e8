//! Acknowledgment ledger and submission gating.
//!
//! # Responsibility
//! - Record sign-offs against registered projects.
//! - Evaluate submission readiness against an externally supplied policy.
//!
//! # Invariants
//! - Updates are unions: an acknowledgment, once recorded, is never removed.
//! - Updating an unknown project fails with `NotFound`; reads degrade to empty.

use crate::model::project::{AcknowledgmentKind, ProjectId, ProjectValidationError};
use crate::registry::project_registry::{ProjectRegistry, StoreResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Set of acknowledgments to merge into a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcknowledgmentUpdate {
    kinds: BTreeSet<AcknowledgmentKind>,
}

impl AcknowledgmentUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: AcknowledgmentKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    /// Builds an update from checkbox state, e.g. `{"safety": true}`.
    ///
    /// Unchecked (`false`) entries are skipped: unchecking never revokes.
    pub fn from_checked<K: AsRef<str>>(
        checked: impl IntoIterator<Item = (K, bool)>,
    ) -> Result<Self, ProjectValidationError> {
        let mut kinds = BTreeSet::new();
        for (key, is_checked) in checked {
            if is_checked {
                kinds.insert(AcknowledgmentKind::parse(key)?);
            }
        }
        Ok(Self { kinds })
    }

    /// Parses raw kind strings, normalizing each one.
    pub fn parse_all<K: AsRef<str>>(
        values: impl IntoIterator<Item = K>,
    ) -> Result<Self, ProjectValidationError> {
        Self::from_checked(values.into_iter().map(|value| (value, true)))
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kinds(&self) -> &BTreeSet<AcknowledgmentKind> {
        &self.kinds
    }
}

impl FromIterator<AcknowledgmentKind> for AcknowledgmentUpdate {
    fn from_iter<T: IntoIterator<Item = AcknowledgmentKind>>(iter: T) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, bool>> for AcknowledgmentUpdate {
    type Error = ProjectValidationError;

    fn try_from(value: BTreeMap<String, bool>) -> Result<Self, Self::Error> {
        Self::from_checked(value)
    }
}

/// Acknowledgments required before a project can be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPolicy {
    #[serde(default)]
    pub required: BTreeSet<AcknowledgmentKind>,
}

impl SubmissionPolicy {
    pub fn new(required: impl IntoIterator<Item = AcknowledgmentKind>) -> Self {
        Self {
            required: required.into_iter().collect(),
        }
    }
}

/// Readiness snapshot for the submit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionStatus {
    pub ready: bool,
    /// Required kinds not yet acknowledged, sorted.
    pub missing: Vec<AcknowledgmentKind>,
}

/// Ledger operations over the acknowledgment sets stored on projects.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcknowledgmentLedger;

impl AcknowledgmentLedger {
    /// Merges `update` into the project's acknowledgments.
    ///
    /// Returns the kinds that were newly recorded (empty when all were
    /// already present).
    pub fn update_acknowledgments(
        &self,
        registry: &mut ProjectRegistry,
        id: &ProjectId,
        update: &AcknowledgmentUpdate,
    ) -> StoreResult<BTreeSet<AcknowledgmentKind>> {
        let project = registry.get_project_mut(id)?;
        let mut added = BTreeSet::new();
        for kind in &update.kinds {
            if project.acknowledgments.insert(kind.clone()) {
                added.insert(kind.clone());
            }
        }

        info!(
            "event=ack_update module=ledger status=ok project_id={} added={} total={}",
            id,
            added.len(),
            project.acknowledgments.len()
        );
        Ok(added)
    }

    /// Returns the current set, or an empty set for unknown projects.
    pub fn get_acknowledgments(
        &self,
        registry: &ProjectRegistry,
        id: &ProjectId,
    ) -> BTreeSet<AcknowledgmentKind> {
        registry
            .get_project_by_id(id)
            .map(|project| project.acknowledgments.clone())
            .unwrap_or_default()
    }

    /// Returns required kinds the project has not yet acknowledged.
    ///
    /// Unknown projects are missing every required kind.
    pub fn missing_acknowledgments(
        &self,
        registry: &ProjectRegistry,
        id: &ProjectId,
        policy: &SubmissionPolicy,
    ) -> Vec<AcknowledgmentKind> {
        match registry.get_project_by_id(id) {
            Some(project) => policy
                .required
                .iter()
                .filter(|kind| !project.has_acknowledged(kind))
                .cloned()
                .collect(),
            None => policy.required.iter().cloned().collect(),
        }
    }

    /// A project is ready when its acknowledgments cover `policy.required`.
    pub fn submission_status(
        &self,
        registry: &ProjectRegistry,
        id: &ProjectId,
        policy: &SubmissionPolicy,
    ) -> SubmissionStatus {
        let missing = self.missing_acknowledgments(registry, id, policy);
        SubmissionStatus {
            ready: registry.contains(id) && missing.is_empty(),
            missing,
        }
    }

    pub fn is_submission_ready(
        &self,
        registry: &ProjectRegistry,
        id: &ProjectId,
        policy: &SubmissionPolicy,
    ) -> bool {
        self.submission_status(registry, id, policy).ready
    }
}
