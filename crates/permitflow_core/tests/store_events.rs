use permitflow_core::{
    AcknowledgmentKind, AcknowledgmentUpdate, DocumentClass, FileKind, IntakeRequest,
    IntakeDocuments, Project, ProjectAddress, ProjectFile, ProjectId, ProjectStore, StoreConfig,
    StoreError, StoreEvent,
};
use std::sync::{Arc, Mutex};

fn id(value: &str) -> ProjectId {
    ProjectId::parse(value).expect("valid id")
}

fn recording_store(config: StoreConfig) -> (ProjectStore, Arc<Mutex<Vec<StoreEvent>>>) {
    let mut store = ProjectStore::new(config);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    store.subscribe(move |event| sink.lock().expect("lock").push(event.clone()));
    (store, events)
}

fn take(events: &Arc<Mutex<Vec<StoreEvent>>>) -> Vec<StoreEvent> {
    std::mem::take(&mut *events.lock().expect("lock"))
}

#[test]
fn mutations_notify_before_returning() {
    let (mut store, events) = recording_store(StoreConfig::default());

    store
        .add_project(Project::with_id(id("p1"), "Customer", ProjectAddress::default()))
        .expect("add project");
    assert_eq!(
        take(&events),
        vec![StoreEvent::ProjectAdded { project_id: id("p1") }]
    );

    store.enqueue_blueprint_parse(&id("p1"));
    store.complete_blueprint_parse(&id("p1"));
    store.select_project(&id("p1"));
    store
        .update_acknowledgments(
            &id("p1"),
            &AcknowledgmentUpdate::new()
                .with(AcknowledgmentKind::parse("safety").expect("valid kind")),
        )
        .expect("update");

    let names = take(&events)
        .iter()
        .map(|event| event.name())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "parse_queued",
            "parse_completed",
            "selection_changed",
            "acknowledgments_updated"
        ]
    );
    assert_eq!(store.revision(), 5);
}

#[test]
fn no_op_calls_do_not_notify() {
    let (mut store, events) = recording_store(StoreConfig::default());
    store
        .add_project(Project::with_id(id("p1"), "Customer", ProjectAddress::default()))
        .expect("add project");
    store.enqueue_intake_form_parse(&id("p1"));
    store.select_project(&id("p1"));
    store
        .update_acknowledgments(
            &id("p1"),
            &AcknowledgmentUpdate::parse_all(["safety"]).expect("valid kinds"),
        )
        .expect("update");
    take(&events);
    let revision = store.revision();

    store.enqueue_intake_form_parse(&id("p1"));
    store.complete_blueprint_parse(&id("p1"));
    store.select_project(&id("p1"));
    store.select_project(&id("ghost"));
    store
        .update_acknowledgments(
            &id("p1"),
            &AcknowledgmentUpdate::parse_all(["safety"]).expect("valid kinds"),
        )
        .expect("update");
    let duplicate =
        store.add_project(Project::with_id(id("p1"), "Dup", ProjectAddress::default()));
    assert_eq!(duplicate, Err(StoreError::DuplicateId(id("p1"))));

    assert!(take(&events).is_empty());
    assert_eq!(store.revision(), revision);
}

#[test]
fn observers_are_called_in_subscription_order() {
    let mut store = ProjectStore::default();
    let order = Arc::new(Mutex::new(Vec::new()));
    for label in ["first", "second", "third"] {
        let sink = Arc::clone(&order);
        store.subscribe(move |_| sink.lock().expect("lock").push(label));
    }

    store
        .add_project(Project::with_id(id("p1"), "Customer", ProjectAddress::default()))
        .expect("add project");
    assert_eq!(*order.lock().expect("lock"), vec!["first", "second", "third"]);
}

#[test]
fn intake_flow_registers_and_queues_expected_documents() {
    let (mut store, events) = recording_store(StoreConfig::default());

    let created = store
        .create_project(IntakeRequest {
            customer_name: "Acme Homes".to_string(),
            files: vec![ProjectFile::new("intake.pdf", "blob://1", FileKind::IntakeForm)],
            ..IntakeRequest::default()
        })
        .expect("create project");

    assert!(store.get_project_by_id(&created).is_some());
    assert!(store.is_intake_form_parsing(&created));
    assert!(store.is_blueprint_parsing(&created));

    let recorded = take(&events);
    assert_eq!(
        recorded,
        vec![
            StoreEvent::ProjectAdded {
                project_id: created.clone()
            },
            StoreEvent::ParseQueued {
                project_id: created.clone(),
                class: DocumentClass::IntakeForm
            },
            StoreEvent::ParseQueued {
                project_id: created,
                class: DocumentClass::Blueprint
            },
        ]
    );
}

#[test]
fn intake_flow_honours_configured_documents_and_explicit_id() {
    let config = StoreConfig {
        intake_documents: IntakeDocuments {
            intake_form: true,
            blueprints: false,
        },
        ..StoreConfig::default()
    };
    let mut store = ProjectStore::new(config);

    let created = store
        .create_project(IntakeRequest {
            project_id: Some(id("permit-42")),
            customer_name: "Acme Homes".to_string(),
            ..IntakeRequest::default()
        })
        .expect("create project");
    assert_eq!(created, id("permit-42"));
    assert!(store.is_intake_form_parsing(&created));
    assert!(!store.is_blueprint_parsing(&created));

    let duplicate = store.create_project(IntakeRequest {
        project_id: Some(id("permit-42")),
        ..IntakeRequest::default()
    });
    assert!(duplicate.is_err());
    assert_eq!(store.list_projects().len(), 1);
}

#[test]
fn attach_files_notifies_with_running_total() {
    let (mut store, events) = recording_store(StoreConfig::default());
    store
        .add_project(Project::with_id(id("p1"), "Customer", ProjectAddress::default()))
        .expect("add project");
    take(&events);

    let total = store
        .attach_files(
            &id("p1"),
            vec![
                ProjectFile::new("A-101.pdf", "blob://a", FileKind::Blueprint),
                ProjectFile::new("A-102.pdf", "blob://b", FileKind::Blueprint),
            ],
        )
        .expect("attach");
    assert_eq!(total, 2);
    assert_eq!(
        take(&events),
        vec![StoreEvent::FilesAttached {
            project_id: id("p1"),
            total_files: 2
        }]
    );

    assert!(store.attach_files(&id("ghost"), Vec::new()).is_err());
    assert!(store.attach_files(&id("p1"), Vec::new()).is_ok());
    assert!(take(&events).is_empty());
}
