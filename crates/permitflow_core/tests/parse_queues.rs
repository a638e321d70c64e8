use permitflow_core::{DocumentClass, Project, ProjectAddress, ProjectId, ProjectStore};

fn store_with(ids: &[&str]) -> ProjectStore {
    let mut store = ProjectStore::default();
    for value in ids {
        store
            .add_project(Project::with_id(
                ProjectId::parse(value).expect("valid id"),
                "Customer",
                ProjectAddress::default(),
            ))
            .expect("add project");
    }
    store
}

fn id(value: &str) -> ProjectId {
    ProjectId::parse(value).expect("valid id")
}

#[test]
fn enqueue_intake_form_twice_matches_once() {
    let mut store = store_with(&["p1"]);

    assert!(store.enqueue_intake_form_parse(&id("p1")));
    assert!(!store.enqueue_intake_form_parse(&id("p1")));
    assert!(store.is_intake_form_parsing(&id("p1")));
    assert_eq!(store.pending_parses(DocumentClass::IntakeForm), vec![id("p1")]);

    store.complete_intake_form_parse(&id("p1"));
    assert!(!store.is_intake_form_parsing(&id("p1")));
}

#[test]
fn completion_clears_pending_blueprint_state() {
    let mut store = store_with(&["p1"]);

    store.enqueue_blueprint_parse(&id("p1"));
    assert!(store.is_blueprint_parsing(&id("p1")));

    assert!(store.complete_blueprint_parse(&id("p1")));
    assert!(!store.is_blueprint_parsing(&id("p1")));
    assert!(!store.complete_blueprint_parse(&id("p1")));
}

#[test]
fn classes_do_not_interfere() {
    let mut store = store_with(&["p1", "p2"]);

    store.enqueue_blueprint_parse(&id("p1"));
    store.enqueue_intake_form_parse(&id("p2"));

    assert!(store.is_blueprint_parsing(&id("p1")));
    assert!(!store.is_intake_form_parsing(&id("p1")));
    assert!(store.is_intake_form_parsing(&id("p2")));
    assert!(!store.is_blueprint_parsing(&id("p2")));
}

#[test]
fn enqueue_for_unknown_project_is_ignored() {
    let mut store = store_with(&[]);

    assert!(!store.enqueue_blueprint_parse(&id("ghost")));
    assert!(!store.is_blueprint_parsing(&id("ghost")));
    assert_eq!(store.revision(), 0);
}

#[test]
fn completing_never_enqueued_id_is_a_no_op() {
    let mut store = store_with(&["p1"]);
    assert!(!store.complete_intake_form_parse(&id("p1")));
    assert!(!store.complete_parse(DocumentClass::Blueprint, &id("ghost")));
}

#[test]
fn abandoned_parse_stays_flagged_until_completed() {
    let mut store = store_with(&["p1", "p2"]);
    store.enqueue_intake_form_parse(&id("p1"));

    store.select_project(&id("p2"));
    store.enqueue_intake_form_parse(&id("p2"));
    store.complete_intake_form_parse(&id("p2"));

    assert!(store.is_intake_form_parsing(&id("p1")));
}
