use permitflow_core::{Project, ProjectAddress, ProjectId, ProjectStore};

fn id(value: &str) -> ProjectId {
    ProjectId::parse(value).expect("valid id")
}

fn store_with(ids: &[&str]) -> ProjectStore {
    let mut store = ProjectStore::default();
    for value in ids {
        store
            .add_project(Project::with_id(id(value), "Customer", ProjectAddress::default()))
            .expect("add project");
    }
    store
}

fn selection_is_valid(store: &ProjectStore) -> bool {
    match store.get_selected_project_id() {
        None => true,
        Some(selected) => store.list_projects().iter().any(|p| &p.id == selected),
    }
}

#[test]
fn starts_with_nothing_selected() {
    let store = store_with(&["p1"]);
    assert_eq!(store.get_selected_project_id(), None);
    assert!(store.selected_project().is_none());
}

#[test]
fn unknown_id_leaves_selection_unchanged() {
    let mut store = store_with(&["p1"]);
    assert!(store.select_project(&id("p1")));

    assert!(!store.select_project(&id("nonexistent")));
    assert_eq!(store.get_selected_project_id(), Some(&id("p1")));
}

#[test]
fn selected_project_resolves_to_registry_entry() {
    let mut store = store_with(&["p1", "p2"]);
    store.select_project(&id("p2"));

    let project = store.selected_project().expect("selection resolves");
    assert_eq!(project.id, id("p2"));
}

#[test]
fn selection_stays_valid_across_mixed_operations() {
    let mut store = store_with(&[]);
    assert!(selection_is_valid(&store));

    for step in ["ghost", "p1", "p2", "missing", "p1"] {
        if step.starts_with('p') && store.get_project_by_id(&id(step)).is_none() {
            store
                .add_project(Project::with_id(id(step), "Customer", ProjectAddress::default()))
                .expect("add project");
        }
        store.select_project(&id(step));
        assert!(selection_is_valid(&store), "invalid selection after `{step}`");
    }

    store.clear_selection();
    assert!(selection_is_valid(&store));
    assert_eq!(store.get_selected_project_id(), None);
}
