//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `permitflow_core` linkage without the Flutter/FFI runtime.
//! - Walk one deterministic intake session and print store state.

use permitflow_core::{
    AcknowledgmentKind, AcknowledgmentUpdate, FileKind, IntakeRequest, ProjectAddress,
    ProjectFile, ProjectId, ProjectStore, StoreConfig, StoreError, SubmissionPolicy,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("permitflow_core ping={}", permitflow_core::ping());
    println!("permitflow_core version={}", permitflow_core::core_version());

    match run_demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_demo() -> Result<(), StoreError> {
    let mut config = StoreConfig::from_env().unwrap_or_default();
    if config.submission_policy.required.is_empty() {
        config.submission_policy = SubmissionPolicy::new([
            AcknowledgmentKind::parse("safety")?,
            AcknowledgmentKind::parse("code")?,
        ]);
    }

    let mut store = ProjectStore::new(config);
    store.subscribe(|event| println!("event {}", event.name()));

    let id = store.create_project(IntakeRequest {
        project_id: Some(ProjectId::parse("demo-1")?),
        customer_name: "Demo Customer".to_string(),
        address: ProjectAddress {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
        },
        ..IntakeRequest::default()
    })?;

    store.attach_files(
        &id,
        [ProjectFile::new("A-101.pdf", "local://A-101.pdf", FileKind::Blueprint)],
    )?;
    store.complete_intake_form_parse(&id);
    store.complete_blueprint_parse(&id);
    store.select_project(&id);

    store.update_acknowledgments(&id, &AcknowledgmentUpdate::parse_all(["safety"])?)?;
    print_status(&store, &id);
    store.update_acknowledgments(&id, &AcknowledgmentUpdate::parse_all(["code"])?)?;
    print_status(&store, &id);
    Ok(())
}

fn print_status(store: &ProjectStore, id: &ProjectId) {
    let status = store.submission_status(id);
    let missing = status
        .missing
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(",");
    println!(
        "project={} selected={} ready={} missing=[{}]",
        id,
        store.get_selected_project_id() == Some(id),
        status.ready,
        missing
    );
}
