//! In-memory project registry and store error contracts.
//!
//! # Responsibility
//! - Provide add/get/list APIs over the canonical project collection.
//! - Accept file attachments from the upload pipeline.
//!
//! # Invariants
//! - `add_project` rejects duplicate ids and leaves content unchanged.
//! - `list_projects` order equals insertion order.
//! - Lookups by id are O(1) through the index map.

use crate::model::project::{Project, ProjectFile, ProjectId, ProjectValidationError};
use log::{info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by registry and ledger mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    DuplicateId(ProjectId),
    NotFound(ProjectId),
    InvalidProject(ProjectValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "project id already registered: {id}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::InvalidProject(err) => write!(f, "invalid project: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidProject(err) => Some(err),
            Self::DuplicateId(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<ProjectValidationError> for StoreError {
    fn from(value: ProjectValidationError) -> Self {
        Self::InvalidProject(value)
    }
}

/// Insertion-ordered project collection with O(1) id lookup.
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
    index: HashMap<ProjectId, usize>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one project.
    ///
    /// # Errors
    /// - `DuplicateId` when a project with the same id is already registered.
    pub fn add_project(&mut self, project: Project) -> StoreResult<ProjectId> {
        if self.index.contains_key(&project.id) {
            warn!(
                "event=project_add module=registry status=rejected error_code=duplicate_id project_id={}",
                project.id
            );
            return Err(StoreError::DuplicateId(project.id));
        }

        let id = project.id.clone();
        self.index.insert(id.clone(), self.projects.len());
        self.projects.push(project);
        info!(
            "event=project_add module=registry status=ok project_id={} total={}",
            id,
            self.projects.len()
        );
        Ok(id)
    }

    /// Returns one project, or `None` when the id is unknown.
    pub fn get_project_by_id(&self, id: &ProjectId) -> Option<&Project> {
        self.index
            .get(id)
            .and_then(|&slot| self.projects.get(slot))
    }

    /// Returns all projects in insertion order.
    pub fn list_projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn contains(&self, id: &ProjectId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Appends uploaded files to a project, keeping their order.
    ///
    /// Returns the project's file count after the append.
    pub fn attach_files(
        &mut self,
        id: &ProjectId,
        files: impl IntoIterator<Item = ProjectFile>,
    ) -> StoreResult<usize> {
        let project = self.get_project_mut(id)?;
        let before = project.files.len();
        project.files.extend(files);
        let after = project.files.len();
        info!(
            "event=files_attach module=registry status=ok project_id={} added={} total={}",
            id,
            after - before,
            after
        );
        Ok(after)
    }

    pub(crate) fn get_project_mut(&mut self, id: &ProjectId) -> StoreResult<&mut Project> {
        self.index
            .get(id)
            .and_then(|&slot| self.projects.get_mut(slot))
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}
