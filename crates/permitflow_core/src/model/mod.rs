//! Domain model for permitting projects.
//!
//! # Responsibility
//! - Define canonical data structures shared by registry, queues and ledger.
//! - Keep display-only building specification data typed but opaque to core logic.
//!
//! # Invariants
//! - Every project is identified by a stable, validated `ProjectId`.
//! - Projects are never removed; files and acknowledgments only grow.

pub mod project;
