//! Core coordinator for PermitFlow.
//! This crate is the single source of truth for project-tracking invariants.

pub mod config;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod queue;
pub mod registry;
pub mod selection;
pub mod store;

pub use config::{ConfigError, IntakeDocuments, StoreConfig};
pub use ledger::{AcknowledgmentLedger, AcknowledgmentUpdate, SubmissionPolicy, SubmissionStatus};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{
    AcknowledgmentKind, AttributeValue, FileKind, Project, ProjectAddress, ProjectFile,
    ProjectId, ProjectValidationError,
};
pub use queue::parse_queue::{DocumentClass, ParseQueue};
pub use registry::project_registry::{ProjectRegistry, StoreError, StoreResult};
pub use selection::SelectionTracker;
pub use store::{IntakeRequest, ProjectStore, StoreEvent, SubscriptionId};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
