//! Per-class parse queue membership.
//!
//! # Responsibility
//! - Track pending intake-form and blueprint parses per project.
//! - Answer "is this project parsing?" in O(1) for per-row UI indicators.
//!
//! # Invariants
//! - Membership is set-valued: one entry per project per class.
//! - Enqueue and completion are idempotent; neither ever fails.
//! - Completion does not require the project to still exist.

use crate::model::project::ProjectId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Document class with its own independent parse queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentClass {
    IntakeForm,
    Blueprint,
}

impl DocumentClass {
    pub const ALL: [DocumentClass; 2] = [DocumentClass::IntakeForm, DocumentClass::Blueprint];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IntakeForm => "intake_form",
            Self::Blueprint => "blueprint",
        }
    }
}

impl Display for DocumentClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pending parse sets, one per document class.
#[derive(Debug, Default)]
pub struct ParseQueue {
    intake_forms: HashSet<ProjectId>,
    blueprints: HashSet<ProjectId>,
}

impl ParseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as parsing for `class`. Returns `false` if already pending.
    pub fn enqueue(&mut self, class: DocumentClass, id: ProjectId) -> bool {
        let inserted = self.set_mut(class).insert(id);
        debug!(
            "event=parse_enqueue module=queue class={} inserted={}",
            class, inserted
        );
        inserted
    }

    pub fn is_parsing(&self, class: DocumentClass, id: &ProjectId) -> bool {
        self.set(class).contains(id)
    }

    /// Clears the pending flag. Returns `false` if nothing was pending.
    pub fn complete(&mut self, class: DocumentClass, id: &ProjectId) -> bool {
        let removed = self.set_mut(class).remove(id);
        debug!(
            "event=parse_complete module=queue class={} removed={}",
            class, removed
        );
        removed
    }

    pub fn enqueue_intake_form_parse(&mut self, id: ProjectId) -> bool {
        self.enqueue(DocumentClass::IntakeForm, id)
    }

    pub fn enqueue_blueprint_parse(&mut self, id: ProjectId) -> bool {
        self.enqueue(DocumentClass::Blueprint, id)
    }

    pub fn is_intake_form_parsing(&self, id: &ProjectId) -> bool {
        self.is_parsing(DocumentClass::IntakeForm, id)
    }

    pub fn is_blueprint_parsing(&self, id: &ProjectId) -> bool {
        self.is_parsing(DocumentClass::Blueprint, id)
    }

    pub fn complete_intake_form_parse(&mut self, id: &ProjectId) -> bool {
        self.complete(DocumentClass::IntakeForm, id)
    }

    pub fn complete_blueprint_parse(&mut self, id: &ProjectId) -> bool {
        self.complete(DocumentClass::Blueprint, id)
    }

    /// Returns pending ids for one class, sorted for stable inspection.
    pub fn pending(&self, class: DocumentClass) -> Vec<ProjectId> {
        let mut ids = self.set(class).iter().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    pub fn pending_count(&self, class: DocumentClass) -> usize {
        self.set(class).len()
    }

    fn set(&self, class: DocumentClass) -> &HashSet<ProjectId> {
        match class {
            DocumentClass::IntakeForm => &self.intake_forms,
            DocumentClass::Blueprint => &self.blueprints,
        }
    }

    fn set_mut(&mut self, class: DocumentClass) -> &mut HashSet<ProjectId> {
        match class {
            DocumentClass::IntakeForm => &mut self.intake_forms,
            DocumentClass::Blueprint => &mut self.blueprints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentClass, ParseQueue};
    use crate::model::project::ProjectId;

    fn id(value: &str) -> ProjectId {
        ProjectId::parse(value).expect("valid id")
    }

    #[test]
    fn classes_are_independent() {
        let mut queue = ParseQueue::new();
        queue.enqueue_intake_form_parse(id("p1"));

        assert!(queue.is_intake_form_parsing(&id("p1")));
        assert!(!queue.is_blueprint_parsing(&id("p1")));
    }

    #[test]
    fn enqueue_twice_keeps_one_entry() {
        let mut queue = ParseQueue::new();
        assert!(queue.enqueue(DocumentClass::Blueprint, id("p1")));
        assert!(!queue.enqueue(DocumentClass::Blueprint, id("p1")));
        assert_eq!(queue.pending_count(DocumentClass::Blueprint), 1);
    }

    #[test]
    fn complete_is_idempotent() {
        let mut queue = ParseQueue::new();
        queue.enqueue_blueprint_parse(id("p1"));
        assert!(queue.complete_blueprint_parse(&id("p1")));
        assert!(!queue.complete_blueprint_parse(&id("p1")));
        assert!(!queue.is_blueprint_parsing(&id("p1")));
    }

    #[test]
    fn pending_is_sorted() {
        let mut queue = ParseQueue::new();
        for value in ["p3", "p1", "p2"] {
            queue.enqueue_intake_form_parse(id(value));
        }
        assert_eq!(
            queue.pending(DocumentClass::IntakeForm),
            vec![id("p1"), id("p2"), id("p3")]
        );
    }
}
