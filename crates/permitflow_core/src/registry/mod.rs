//! Canonical project registry.
//!
//! # Responsibility
//! - Own the insertion-ordered collection of projects for the session.
//! - Return semantic errors (`DuplicateId`, `NotFound`) instead of panicking.
//!
//! # Invariants
//! - Project ids are unique for the lifetime of the registry.
//! - Projects are never removed or replaced.

pub mod project_registry;
