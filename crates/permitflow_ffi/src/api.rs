//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the project store to Dart via FRB as one opaque handle.
//! - Translate string inputs into validated core types at the boundary.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The Flutter app creates exactly one handle at startup and passes it to
//!   routes; there is no hidden global store.
//! - Unknown ids degrade to empty/`None`/`false` results, except
//!   acknowledgment updates, which report failure.

use log::warn;
use permitflow_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AcknowledgmentUpdate, AttributeValue, DocumentClass, FileKind, IntakeRequest, Project,
    ProjectAddress, ProjectFile, ProjectId, ProjectStore, StoreConfig, StoreEvent,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

const EVENT_BACKLOG_MAX: usize = 256;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreActionResponse {
    pub ok: bool,
    pub project_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl StoreActionResponse {
    fn success(message: impl Into<String>, project_id: &ProjectId) -> Self {
        Self {
            ok: true,
            project_id: Some(project_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            project_id: None,
            message: message.into(),
        }
    }
}

/// One display attribute, already rendered to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeItem {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub name: String,
    pub handle: String,
    /// `intake_form|blueprint|other`.
    pub kind: String,
}

/// Row model for project list/grid views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project_id: String,
    pub customer_name: String,
    pub address_line: String,
    pub file_count: u32,
    pub intake_form_parsing: bool,
    pub blueprint_parsing: bool,
}

/// Detail model for project-scoped routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetail {
    pub summary: ProjectSummary,
    pub attributes: Vec<AttributeItem>,
    pub files: Vec<FileItem>,
    pub acknowledgments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionStatusView {
    pub ready: bool,
    pub missing: Vec<String>,
}

/// Store change notification queued for Dart to drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEventItem {
    pub revision: u64,
    pub name: String,
    pub project_id: Option<String>,
}

/// Opaque store handle owned by the Flutter app.
#[flutter_rust_bridge::frb(opaque)]
pub struct ProjectStoreHandle {
    store: Mutex<ProjectStore>,
    events: Arc<Mutex<VecDeque<StoreEventItem>>>,
}

impl ProjectStoreHandle {
    /// Creates a store configured from `PERMITFLOW_*` environment variables.
    ///
    /// Invalid environment values fall back to defaults and are logged.
    #[flutter_rust_bridge::frb(sync)]
    pub fn new() -> Self {
        let config = StoreConfig::from_env().unwrap_or_else(|err| {
            warn!("event=store_config module=ffi status=fallback error={}", err);
            StoreConfig::default()
        });
        Self::with_config(config)
    }

    /// Creates a store from a JSON config document.
    #[flutter_rust_bridge::frb(sync)]
    pub fn from_config_json(config_json: String) -> Result<Self, String> {
        StoreConfig::from_json_str(&config_json)
            .map(Self::with_config)
            .map_err(|err| err.to_string())
    }

    fn with_config(config: StoreConfig) -> Self {
        let mut store = ProjectStore::new(config);
        let events = Arc::new(Mutex::new(VecDeque::new()));
        let sink = Arc::clone(&events);
        let mut revision = 0_u64;
        store.subscribe(move |event: &StoreEvent| {
            revision += 1;
            let mut backlog = lock_or_recover(&sink);
            if backlog.len() == EVENT_BACKLOG_MAX {
                backlog.pop_front();
            }
            backlog.push_back(to_event_item(revision, event));
        });
        Self {
            store: Mutex::new(store),
            events,
        }
    }

    /// Intake entry point: registers a project and queues its documents.
    #[flutter_rust_bridge::frb(sync)]
    pub fn create_project(
        &self,
        customer_name: String,
        street: String,
        city: String,
        state: String,
        postal_code: String,
        attributes: Vec<AttributeItem>,
    ) -> StoreActionResponse {
        let request = IntakeRequest {
            project_id: None,
            customer_name: customer_name.trim().to_string(),
            address: ProjectAddress {
                street,
                city,
                state,
                postal_code,
            },
            attributes: attributes
                .into_iter()
                .map(|item| (item.key, AttributeValue::Text(item.value)))
                .collect(),
            files: Vec::new(),
        };
        match self.lock().create_project(request) {
            Ok(id) => StoreActionResponse::success("Project created.", &id),
            Err(err) => StoreActionResponse::failure(format!("create_project failed: {err}")),
        }
    }

    /// Imports a full project record (JSON) with its existing id.
    #[flutter_rust_bridge::frb(sync)]
    pub fn add_project_json(&self, project_json: String) -> StoreActionResponse {
        let project = match Project::from_json_str(&project_json) {
            Ok(project) => project,
            Err(err) => return StoreActionResponse::failure(format!("add_project failed: {err}")),
        };
        match self.lock().add_project(project) {
            Ok(id) => StoreActionResponse::success("Project added.", &id),
            Err(err) => StoreActionResponse::failure(format!("add_project failed: {err}")),
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn list_projects(&self) -> Vec<ProjectSummary> {
        let store = self.lock();
        store
            .list_projects()
            .iter()
            .map(|project| to_summary(&store, project))
            .collect()
    }

    /// Returns `None` for unknown or malformed ids ("project not found" view).
    #[flutter_rust_bridge::frb(sync)]
    pub fn get_project(&self, project_id: String) -> Option<ProjectDetail> {
        let id = ProjectId::parse(project_id).ok()?;
        let store = self.lock();
        store
            .get_project_by_id(&id)
            .map(|project| to_detail(&store, project))
    }

    /// Upload pipeline callback: appends one accepted file.
    #[flutter_rust_bridge::frb(sync)]
    pub fn attach_file(
        &self,
        project_id: String,
        name: String,
        handle: String,
        kind: String,
    ) -> StoreActionResponse {
        let id = match ProjectId::parse(project_id) {
            Ok(id) => id,
            Err(err) => return StoreActionResponse::failure(format!("attach_file failed: {err}")),
        };
        let file = ProjectFile::new(name, handle, parse_file_kind(&kind));
        match self.lock().attach_files(&id, [file]) {
            Ok(total) => StoreActionResponse::success(format!("{total} file(s) attached."), &id),
            Err(err) => StoreActionResponse::failure(format!("attach_file failed: {err}")),
        }
    }

    /// `class`: `intake_form|blueprint`. Returns whether the queue changed.
    #[flutter_rust_bridge::frb(sync)]
    pub fn enqueue_parse(&self, project_id: String, class: String) -> bool {
        match parse_target(project_id, &class) {
            Some((id, class)) => self.lock().enqueue_parse(class, &id),
            None => false,
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn complete_parse(&self, project_id: String, class: String) -> bool {
        match parse_target(project_id, &class) {
            Some((id, class)) => self.lock().complete_parse(class, &id),
            None => false,
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn is_parsing(&self, project_id: String, class: String) -> bool {
        match parse_target(project_id, &class) {
            Some((id, class)) => self.lock().is_parsing(class, &id),
            None => false,
        }
    }

    /// Navigation hook; unknown ids leave the selection unchanged.
    #[flutter_rust_bridge::frb(sync)]
    pub fn select_project(&self, project_id: String) -> bool {
        match ProjectId::parse(project_id) {
            Ok(id) => self.lock().select_project(&id),
            Err(_) => false,
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn clear_selection(&self) -> bool {
        self.lock().clear_selection()
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn selected_project_id(&self) -> Option<String> {
        self.lock()
            .get_selected_project_id()
            .map(ToString::to_string)
    }

    /// Records checked acknowledgments. Failure is always reported.
    #[flutter_rust_bridge::frb(sync)]
    pub fn update_acknowledgments(
        &self,
        project_id: String,
        acknowledgments: Vec<String>,
    ) -> StoreActionResponse {
        let id = match ProjectId::parse(project_id) {
            Ok(id) => id,
            Err(err) => {
                return StoreActionResponse::failure(format!("update_acknowledgments failed: {err}"))
            }
        };
        let update = match AcknowledgmentUpdate::parse_all(acknowledgments) {
            Ok(update) => update,
            Err(err) => {
                return StoreActionResponse::failure(format!("update_acknowledgments failed: {err}"))
            }
        };
        match self.lock().update_acknowledgments(&id, &update) {
            Ok(all) => StoreActionResponse::success(
                format!("{} acknowledgment(s) recorded.", all.len()),
                &id,
            ),
            Err(err) => {
                StoreActionResponse::failure(format!("update_acknowledgments failed: {err}"))
            }
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn get_acknowledgments(&self, project_id: String) -> Vec<String> {
        match ProjectId::parse(project_id) {
            Ok(id) => self
                .lock()
                .get_acknowledgments(&id)
                .into_iter()
                .map(String::from)
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn submission_status(&self, project_id: String) -> SubmissionStatusView {
        let Ok(id) = ProjectId::parse(project_id) else {
            return SubmissionStatusView {
                ready: false,
                missing: Vec::new(),
            };
        };
        let status = self.lock().submission_status(&id);
        SubmissionStatusView {
            ready: status.ready,
            missing: status.missing.into_iter().map(String::from).collect(),
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn revision(&self) -> u64 {
        self.lock().revision()
    }

    /// Returns and clears queued change notifications, oldest first.
    #[flutter_rust_bridge::frb(sync)]
    pub fn drain_events(&self) -> Vec<StoreEventItem> {
        lock_or_recover(&self.events).drain(..).collect()
    }

    fn lock(&self) -> MutexGuard<'_, ProjectStore> {
        lock_or_recover(&self.store)
    }
}

impl Default for ProjectStoreHandle {
    fn default() -> Self {
        Self::with_config(StoreConfig::default())
    }
}

// Poisoned locks are recovered; observers may panic.
fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn parse_target(project_id: String, class: &str) -> Option<(ProjectId, DocumentClass)> {
    let class = match class.trim().to_ascii_lowercase().as_str() {
        "intake_form" => DocumentClass::IntakeForm,
        "blueprint" | "blueprints" => DocumentClass::Blueprint,
        _ => return None,
    };
    let id = ProjectId::parse(project_id).ok()?;
    Some((id, class))
}

fn parse_file_kind(value: &str) -> FileKind {
    match value.trim().to_ascii_lowercase().as_str() {
        "intake_form" => FileKind::IntakeForm,
        "blueprint" => FileKind::Blueprint,
        _ => FileKind::Other,
    }
}

fn file_kind_label(kind: FileKind) -> &'static str {
    match kind {
        FileKind::IntakeForm => "intake_form",
        FileKind::Blueprint => "blueprint",
        FileKind::Other => "other",
    }
}

fn to_summary(store: &ProjectStore, project: &Project) -> ProjectSummary {
    ProjectSummary {
        project_id: project.id.to_string(),
        customer_name: project.customer_name.clone(),
        address_line: project.address.one_line(),
        file_count: u32::try_from(project.files.len()).unwrap_or(u32::MAX),
        intake_form_parsing: store.is_intake_form_parsing(&project.id),
        blueprint_parsing: store.is_blueprint_parsing(&project.id),
    }
}

fn to_detail(store: &ProjectStore, project: &Project) -> ProjectDetail {
    ProjectDetail {
        summary: to_summary(store, project),
        attributes: project
            .attributes
            .iter()
            .map(|(key, value)| AttributeItem {
                key: key.clone(),
                value: value.display(),
            })
            .collect(),
        files: project
            .files
            .iter()
            .map(|file| FileItem {
                name: file.name.clone(),
                handle: file.handle.clone(),
                kind: file_kind_label(file.kind).to_string(),
            })
            .collect(),
        acknowledgments: project
            .acknowledgments
            .iter()
            .map(ToString::to_string)
            .collect(),
    }
}

fn to_event_item(revision: u64, event: &StoreEvent) -> StoreEventItem {
    let project_id = match event {
        StoreEvent::ProjectAdded { project_id }
        | StoreEvent::FilesAttached { project_id, .. }
        | StoreEvent::ParseQueued { project_id, .. }
        | StoreEvent::ParseCompleted { project_id, .. }
        | StoreEvent::AcknowledgmentsUpdated { project_id, .. } => Some(project_id.to_string()),
        StoreEvent::SelectionChanged { project_id } => project_id.as_ref().map(ToString::to_string),
    };
    StoreEventItem {
        revision,
        name: event.name().to_string(),
        project_id,
    }
}

#[cfg(test)]
mod tests {
    use super::{core_version, init_logging, ping, AttributeItem, ProjectStoreHandle};

    fn handle_with_project() -> (ProjectStoreHandle, String) {
        let handle = ProjectStoreHandle::default();
        let created = handle.create_project(
            "Acme Homes".to_string(),
            "1 Main St".to_string(),
            "Austin".to_string(),
            "TX".to_string(),
            "78701".to_string(),
            vec![AttributeItem {
                key: "occupancy".to_string(),
                value: "R-3".to_string(),
            }],
        );
        assert!(created.ok, "{}", created.message);
        let project_id = created.project_id.expect("created project id");
        (handle, project_id)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn create_project_queues_documents_and_lists_row() {
        let (handle, project_id) = handle_with_project();

        let rows = handle.list_projects();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].project_id, project_id);
        assert_eq!(rows[0].address_line, "1 Main St, Austin, TX, 78701");
        assert!(rows[0].intake_form_parsing);
        assert!(rows[0].blueprint_parsing);

        assert!(handle.complete_parse(project_id.clone(), "blueprint".to_string()));
        assert!(!handle.is_parsing(project_id, "blueprint".to_string()));
    }

    #[test]
    fn get_project_degrades_to_none() {
        let handle = ProjectStoreHandle::default();
        assert!(handle.get_project("missing".to_string()).is_none());
        assert!(handle.get_project("   ".to_string()).is_none());
    }

    #[test]
    fn acknowledgment_updates_merge_and_report_failures() {
        let (handle, project_id) = handle_with_project();

        let first = handle.update_acknowledgments(project_id.clone(), vec!["safety".to_string()]);
        assert!(first.ok, "{}", first.message);
        let second = handle.update_acknowledgments(project_id.clone(), vec!["Code".to_string()]);
        assert!(second.ok, "{}", second.message);
        assert_eq!(
            handle.get_acknowledgments(project_id),
            vec!["code".to_string(), "safety".to_string()]
        );

        let missing = handle.update_acknowledgments("ghost".to_string(), vec!["safety".to_string()]);
        assert!(!missing.ok);
        assert!(missing.message.contains("project not found"));
    }

    #[test]
    fn add_project_json_imports_and_rejects_duplicates() {
        let handle = ProjectStoreHandle::default();
        let raw = r#"{"id":"permit-7","customer_name":"Acme","attributes":{"stories":2,"sprinklered":true}}"#;

        let added = handle.add_project_json(raw.to_string());
        assert!(added.ok, "{}", added.message);
        let detail = handle
            .get_project("permit-7".to_string())
            .expect("imported project");
        let rendered = detail
            .attributes
            .iter()
            .map(|item| format!("{}={}", item.key, item.value))
            .collect::<Vec<_>>();
        assert_eq!(rendered, vec!["sprinklered=Yes", "stories=2"]);

        let duplicate = handle.add_project_json(raw.to_string());
        assert!(!duplicate.ok);
        assert!(duplicate.message.contains("already registered"));

        let malformed = handle.add_project_json("{".to_string());
        assert!(!malformed.ok);
    }

    #[test]
    fn selection_ignores_unknown_ids() {
        let (handle, project_id) = handle_with_project();
        assert!(handle.select_project(project_id.clone()));
        assert!(!handle.select_project("ghost".to_string()));
        assert_eq!(handle.selected_project_id(), Some(project_id));
    }

    #[test]
    fn drain_events_returns_backlog_once() {
        let (handle, project_id) = handle_with_project();
        let events = handle.drain_events();
        let names = events.iter().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["project_added", "parse_queued", "parse_queued"]);
        assert!(events
            .iter()
            .all(|e| e.project_id.as_deref() == Some(project_id.as_str())));
        assert_eq!(events.last().map(|e| e.revision), Some(handle.revision()));
        assert!(handle.drain_events().is_empty());
    }

    #[test]
    fn config_json_drives_submission_policy() {
        let handle = ProjectStoreHandle::from_config_json(
            r#"{"submission_policy":{"required":["safety"]}}"#.to_string(),
        )
        .expect("valid config");
        let created = handle.create_project(
            "Acme".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            Vec::new(),
        );
        let project_id = created.project_id.expect("created project id");

        let status = handle.submission_status(project_id.clone());
        assert!(!status.ready);
        assert_eq!(status.missing, vec!["safety".to_string()]);

        handle.update_acknowledgments(project_id.clone(), vec!["safety".to_string()]);
        assert!(handle.submission_status(project_id).ready);

        assert!(ProjectStoreHandle::from_config_json("not json".to_string()).is_err());
    }
}
