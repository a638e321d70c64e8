//! Project store façade.
//!
//! # Responsibility
//! - Compose registry, parse queues, selection and ledger into one API.
//! - Notify subscribed observers synchronously after every state change.
//!
//! # Invariants
//! - Observers never receive `&mut` access; mutation goes through the façade.
//! - Every emitted event is delivered before the mutating call returns.
//! - No-op calls (re-enqueue, unknown selection, repeated acks) emit nothing.
//! - The store is created explicitly and passed by reference; core keeps no
//!   global instance.

use crate::config::StoreConfig;
use crate::ledger::{AcknowledgmentLedger, AcknowledgmentUpdate, SubmissionStatus};
use crate::model::project::{
    AcknowledgmentKind, AttributeValue, Project, ProjectAddress, ProjectFile, ProjectId,
};
use crate::queue::parse_queue::{DocumentClass, ParseQueue};
use crate::registry::project_registry::{ProjectRegistry, StoreResult};
use crate::selection::SelectionTracker;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Change notification delivered to store observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    ProjectAdded {
        project_id: ProjectId,
    },
    FilesAttached {
        project_id: ProjectId,
        total_files: usize,
    },
    ParseQueued {
        project_id: ProjectId,
        class: DocumentClass,
    },
    ParseCompleted {
        project_id: ProjectId,
        class: DocumentClass,
    },
    SelectionChanged {
        project_id: Option<ProjectId>,
    },
    AcknowledgmentsUpdated {
        project_id: ProjectId,
        added: BTreeSet<AcknowledgmentKind>,
    },
}

impl StoreEvent {
    /// Stable event name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProjectAdded { .. } => "project_added",
            Self::FilesAttached { .. } => "files_attached",
            Self::ParseQueued { .. } => "parse_queued",
            Self::ParseCompleted { .. } => "parse_completed",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::AcknowledgmentsUpdated { .. } => "acknowledgments_updated",
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StoreEvent) + Send>;

#[derive(Default)]
struct ObserverList {
    next_id: u64,
    observers: BTreeMap<SubscriptionId, Observer>,
}

impl ObserverList {
    fn add(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.insert(id, observer);
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(&id).is_some()
    }

    // Subscription order equals id order.
    fn notify(&mut self, event: &StoreEvent) {
        for observer in self.observers.values_mut() {
            observer(event);
        }
    }
}

/// Input of the intake entry point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeRequest {
    /// Externally assigned id; a UUID is generated when `None`.
    pub project_id: Option<ProjectId>,
    pub customer_name: String,
    pub address: ProjectAddress,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub files: Vec<ProjectFile>,
}

/// Single-session coordinator consumed by UI routes and screens.
pub struct ProjectStore {
    config: StoreConfig,
    registry: ProjectRegistry,
    queue: ParseQueue,
    selection: SelectionTracker,
    ledger: AcknowledgmentLedger,
    observers: ObserverList,
    revision: u64,
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl ProjectStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            registry: ProjectRegistry::new(),
            queue: ParseQueue::new(),
            selection: SelectionTracker::new(),
            ledger: AcknowledgmentLedger,
            observers: ObserverList::default(),
            revision: 0,
        }
    }

    /// Registers an observer called synchronously for every change.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&StoreEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.observers.add(Box::new(observer))
    }

    /// Removes an observer. Returns `false` for an unknown or reused handle.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    /// Number of events emitted so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // Registry.

    pub fn add_project(&mut self, project: Project) -> StoreResult<ProjectId> {
        let id = self.registry.add_project(project)?;
        self.emit(StoreEvent::ProjectAdded {
            project_id: id.clone(),
        });
        Ok(id)
    }

    pub fn get_project_by_id(&self, id: &ProjectId) -> Option<&Project> {
        self.registry.get_project_by_id(id)
    }

    pub fn list_projects(&self) -> &[Project] {
        self.registry.list_projects()
    }

    /// Appends uploaded files; called by the upload pipeline.
    pub fn attach_files(
        &mut self,
        id: &ProjectId,
        files: impl IntoIterator<Item = ProjectFile>,
    ) -> StoreResult<usize> {
        let files = files.into_iter().collect::<Vec<_>>();
        if files.is_empty() {
            // Empty batch: no event, but unknown ids still fail.
            return self.registry.attach_files(id, files);
        }
        let total_files = self.registry.attach_files(id, files)?;
        self.emit(StoreEvent::FilesAttached {
            project_id: id.clone(),
            total_files,
        });
        Ok(total_files)
    }

    /// Intake entry point: registers a project and queues its documents.
    pub fn create_project(&mut self, request: IntakeRequest) -> StoreResult<ProjectId> {
        let mut project = Project::with_id(
            request.project_id.unwrap_or_else(ProjectId::generate),
            request.customer_name,
            request.address,
        );
        project.attributes = request.attributes;
        project.files = request.files;

        let id = self.add_project(project)?;
        for class in self.config.intake_documents.classes() {
            self.enqueue_parse(class, &id);
        }
        Ok(id)
    }

    // Parse queues.

    /// Queues `id` for parsing. Unknown ids are ignored and return `false`.
    pub fn enqueue_parse(&mut self, class: DocumentClass, id: &ProjectId) -> bool {
        if !self.registry.contains(id) {
            warn!(
                "event=parse_enqueue module=store status=ignored reason=not_found class={} project_id={}",
                class, id
            );
            return false;
        }
        if !self.queue.enqueue(class, id.clone()) {
            return false;
        }
        self.emit(StoreEvent::ParseQueued {
            project_id: id.clone(),
            class,
        });
        true
    }

    /// Clears a pending parse. Absent entries are a no-op.
    pub fn complete_parse(&mut self, class: DocumentClass, id: &ProjectId) -> bool {
        if !self.queue.complete(class, id) {
            return false;
        }
        self.emit(StoreEvent::ParseCompleted {
            project_id: id.clone(),
            class,
        });
        true
    }

    pub fn is_parsing(&self, class: DocumentClass, id: &ProjectId) -> bool {
        self.queue.is_parsing(class, id)
    }

    pub fn pending_parses(&self, class: DocumentClass) -> Vec<ProjectId> {
        self.queue.pending(class)
    }

    pub fn enqueue_intake_form_parse(&mut self, id: &ProjectId) -> bool {
        self.enqueue_parse(DocumentClass::IntakeForm, id)
    }

    pub fn enqueue_blueprint_parse(&mut self, id: &ProjectId) -> bool {
        self.enqueue_parse(DocumentClass::Blueprint, id)
    }

    pub fn is_intake_form_parsing(&self, id: &ProjectId) -> bool {
        self.queue.is_intake_form_parsing(id)
    }

    pub fn is_blueprint_parsing(&self, id: &ProjectId) -> bool {
        self.queue.is_blueprint_parsing(id)
    }

    pub fn complete_intake_form_parse(&mut self, id: &ProjectId) -> bool {
        self.complete_parse(DocumentClass::IntakeForm, id)
    }

    pub fn complete_blueprint_parse(&mut self, id: &ProjectId) -> bool {
        self.complete_parse(DocumentClass::Blueprint, id)
    }

    // Selection.

    /// Selects a project for detail routes; unknown ids leave selection as is.
    pub fn select_project(&mut self, id: &ProjectId) -> bool {
        if !self.selection.select_project(&self.registry, id) {
            return false;
        }
        self.emit(StoreEvent::SelectionChanged {
            project_id: Some(id.clone()),
        });
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if !self.selection.clear_selection() {
            return false;
        }
        self.emit(StoreEvent::SelectionChanged { project_id: None });
        true
    }

    pub fn get_selected_project_id(&self) -> Option<&ProjectId> {
        self.selection.get_selected_project_id()
    }

    /// Resolves the selection to its project.
    pub fn selected_project(&self) -> Option<&Project> {
        self.get_selected_project_id()
            .and_then(|id| self.registry.get_project_by_id(id))
    }

    // Acknowledgments.

    /// Merges acknowledgments into a project and returns its full set.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not registered; the update is never dropped
    ///   silently.
    pub fn update_acknowledgments(
        &mut self,
        id: &ProjectId,
        update: &AcknowledgmentUpdate,
    ) -> StoreResult<BTreeSet<AcknowledgmentKind>> {
        let added = self
            .ledger
            .update_acknowledgments(&mut self.registry, id, update)?;
        if !added.is_empty() {
            self.emit(StoreEvent::AcknowledgmentsUpdated {
                project_id: id.clone(),
                added,
            });
        }
        Ok(self.get_acknowledgments(id))
    }

    pub fn get_acknowledgments(&self, id: &ProjectId) -> BTreeSet<AcknowledgmentKind> {
        self.ledger.get_acknowledgments(&self.registry, id)
    }

    /// Readiness against the configured submission policy.
    pub fn submission_status(&self, id: &ProjectId) -> SubmissionStatus {
        self.ledger
            .submission_status(&self.registry, id, &self.config.submission_policy)
    }

    pub fn is_submission_ready(&self, id: &ProjectId) -> bool {
        self.submission_status(id).ready
    }

    fn emit(&mut self, event: StoreEvent) {
        self.revision += 1;
        debug!(
            "event=store_notify module=store name={} revision={} observers={}",
            event.name(),
            self.revision,
            self.observers.observers.len()
        );
        self.observers.notify(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectStore, StoreEvent};
    use crate::model::project::{Project, ProjectAddress, ProjectId};
    use std::sync::{Arc, Mutex};

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut store = ProjectStore::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |event: &StoreEvent| {
            sink.lock().expect("lock").push(event.name());
        });

        store
            .add_project(Project::with_id(
                ProjectId::parse("p1").expect("valid id"),
                "Customer",
                ProjectAddress::default(),
            ))
            .expect("add project");
        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));

        store.select_project(&ProjectId::parse("p1").expect("valid id"));
        assert_eq!(*seen.lock().expect("lock"), vec!["project_added"]);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn store_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ProjectStore>();
    }
}
