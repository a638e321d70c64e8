//! Flutter-facing bindings for PermitFlow core.

pub mod api;
