//! Project catalog: owns every project and hands out list overviews.

use serde::Serialize;

use crate::error::CoreError;
use crate::progress::{self, Progress, ProgressStrategy};
use crate::project::{NewProject, Project, PropertyType};
use crate::types::{Amount, CalendarDate, ProjectId};

/// One row of the purchaser's project list.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectOverview {
    pub id: ProjectId,
    pub name: String,
    pub location: String,
    pub property_type: PropertyType,
    pub total_price: Amount,
    pub progress: Progress,
    pub total_paid: Amount,
    pub milestone_count: usize,
    pub expected_completion: CalendarDate,
}

/// All tracked projects, in insertion order.
#[derive(Debug, Default)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
}

impl ProjectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a project from its input and take ownership of it.
    pub fn insert(&mut self, input: NewProject) -> Result<&Project, CoreError> {
        let project = Project::create(input)?;
        self.projects.push(project);
        Ok(self.projects.last().expect("project was just pushed"))
    }

    /// Hard-delete a project. Irreversible.
    pub fn remove(&mut self, id: ProjectId) -> Result<(), CoreError> {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::ProjectNotFound { id })?;
        self.projects.remove(index);
        Ok(())
    }

    pub fn get(&self, id: ProjectId) -> Result<&Project, CoreError> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or(CoreError::ProjectNotFound { id })
    }

    pub fn get_mut(&mut self, id: ProjectId) -> Result<&mut Project, CoreError> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::ProjectNotFound { id })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// List rows for every project, insertion order, progress computed
    /// under the chosen strategy.
    pub fn overviews(&self, strategy: ProgressStrategy) -> Vec<ProjectOverview> {
        self.projects
            .iter()
            .map(|project| {
                let progress = match strategy {
                    ProgressStrategy::Declared => Progress::Declared(project.declared_progress),
                    ProgressStrategy::Derived => {
                        Progress::Derived(progress::derived_progress(project.ledger.milestones()))
                    }
                };
                ProjectOverview {
                    id: project.id,
                    name: project.name.clone(),
                    location: project.location.clone(),
                    property_type: project.property_type,
                    total_price: project.total_price,
                    progress,
                    total_paid: project.ledger.total_paid(),
                    milestone_count: project.ledger.len(),
                    expected_completion: project.expected_completion,
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
