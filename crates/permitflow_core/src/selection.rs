//! Active project selection shared by multi-panel routes.
//!
//! # Invariants
//! - The selected id, when set, resolves in the registry it was checked against.
//! - Selecting an unknown id leaves the previous selection unchanged.

use crate::model::project::ProjectId;
use crate::registry::project_registry::ProjectRegistry;
use log::{debug, warn};

#[derive(Debug, Default)]
pub struct SelectionTracker {
    selected: Option<ProjectId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `id` if it resolves in `registry`.
    ///
    /// Returns whether the selection changed. Unknown ids are a no-op, not an
    /// error: routes may mount before their project is registered.
    pub fn select_project(&mut self, registry: &ProjectRegistry, id: &ProjectId) -> bool {
        if !registry.contains(id) {
            warn!(
                "event=project_select module=selection status=ignored reason=not_found project_id={}",
                id
            );
            return false;
        }
        if self.selected.as_ref() == Some(id) {
            return false;
        }

        debug!(
            "event=project_select module=selection status=ok project_id={}",
            id
        );
        self.selected = Some(id.clone());
        true
    }

    pub fn get_selected_project_id(&self) -> Option<&ProjectId> {
        self.selected.as_ref()
    }

    /// Clears the selection. Returns whether anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        self.selected.take().is_some()
    }
}
