//! # Project Store
//!
//! Create/read/update/delete for [`Project`] records over any
//! [`KeyValueMedium`]. The whole collection is one JSON array stored under
//! [`PROJECTS_KEY`]; every operation reads it, and every mutation writes it
//! back in full.
//!
//! The store is an ordinary value that owns its medium. Open it once at
//! startup and pass it where it is needed; tests hand it a [`MemoryMedium`].
//!
//! ## Example
//!
//! ```rust
//! use quote_core::project::{MeasurementDraft, ProjectDraft};
//! use quote_core::store::{MemoryMedium, ProjectStore};
//!
//! let mut store = ProjectStore::new(MemoryMedium::new());
//! let project = store.create(ProjectDraft::new("A", "123").with_title("T"))?;
//!
//! let measurement = store.add_measurement(
//!     &project.id,
//!     MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0),
//! )?;
//! assert_eq!(measurement.total_meters, "3.85");
//!
//! let stored = store.get(&project.id)?.unwrap();
//! assert_eq!(stored.measurements.len(), 1);
//! # Ok::<(), quote_core::errors::QuoteError>(())
//! ```

mod file_medium;
mod medium;

pub use file_medium::{FileMedium, LockInfo};
pub use medium::{KeyValueMedium, MemoryMedium};

use serde::{Deserialize, Serialize};

use crate::errors::{QuoteError, QuoteResult};
use crate::project::{
    Measurement, MeasurementDraft, Project, ProjectDraft, ProjectPatch, ProjectSummary, RecordId,
};

/// Fixed key holding the serialized project collection
pub const PROJECTS_KEY: &str = "interior_projects";

/// Figures for the project list header.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub project_count: usize,
    pub measurement_count: usize,
    /// Sum of every project's curtain subtotal (rod costs excluded)
    pub total_value: f64,
}

/// Project repository over a key-value medium.
#[derive(Debug)]
pub struct ProjectStore<M: KeyValueMedium> {
    medium: M,
}

impl<M: KeyValueMedium> ProjectStore<M> {
    pub fn new(medium: M) -> Self {
        ProjectStore { medium }
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Give the medium back, closing the store.
    pub fn into_medium(self) -> M {
        self.medium
    }

    /// All projects, in stored order.
    pub fn list(&self) -> QuoteResult<Vec<Project>> {
        let projects = self.load_all()?;
        tracing::debug!(count = projects.len(), "listed projects");
        Ok(projects)
    }

    /// All projects, newest first.
    pub fn list_recent(&self) -> QuoteResult<Vec<Project>> {
        let mut projects = self.load_all()?;
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    /// List-view summaries, newest first.
    pub fn summaries(&self) -> QuoteResult<Vec<ProjectSummary>> {
        Ok(self.list_recent()?.iter().map(Project::summary).collect())
    }

    /// Totals across every project.
    pub fn dashboard(&self) -> QuoteResult<DashboardStats> {
        let projects = self.load_all()?;
        Ok(projects.iter().map(Project::summary).fold(
            DashboardStats {
                project_count: projects.len(),
                ..Default::default()
            },
            |mut stats, summary| {
                stats.measurement_count += summary.measurement_count;
                stats.total_value += summary.total_cost;
                stats
            },
        ))
    }

    /// Validate a draft, assign id and timestamp, persist, and return the record.
    pub fn create(&mut self, draft: ProjectDraft) -> QuoteResult<Project> {
        let project = Project::from_draft(draft)?;
        let mut projects = self.load_all()?;
        projects.push(project.clone());
        self.save_all(&projects)?;
        tracing::info!(id = %project.id, client = %project.client_name, "created project");
        Ok(project)
    }

    /// Look up a project. A missing id is `Ok(None)`, not an error.
    pub fn get(&self, id: &RecordId) -> QuoteResult<Option<Project>> {
        let project = self.load_all()?.into_iter().find(|p| &p.id == id);
        tracing::debug!(%id, found = project.is_some(), "get project");
        Ok(project)
    }

    /// Look up a project that must exist.
    pub fn require(&self, id: &RecordId) -> QuoteResult<Project> {
        self.get(id)?.ok_or_else(|| QuoteError::project_not_found(id))
    }

    /// Merge the supplied fields onto an existing project and persist it.
    pub fn update(&mut self, id: &RecordId, patch: ProjectPatch) -> QuoteResult<Project> {
        patch.validate()?;
        let mut projects = self.load_all()?;
        let project = projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| QuoteError::project_not_found(id))?;
        project.apply_patch(patch);
        let updated = project.clone();
        self.save_all(&projects)?;
        tracing::debug!(%id, measurements = updated.measurements.len(), "updated project");
        Ok(updated)
    }

    /// Remove a project and its measurements. Returns whether anything was removed.
    pub fn delete(&mut self, id: &RecordId) -> QuoteResult<bool> {
        let mut projects = self.load_all()?;
        let before = projects.len();
        projects.retain(|p| &p.id != id);
        if projects.len() == before {
            tracing::debug!(%id, "delete of unknown project ignored");
            return Ok(false);
        }
        self.save_all(&projects)?;
        tracing::info!(%id, "deleted project");
        Ok(true)
    }

    /// Price a draft and append it to a project's measurements.
    pub fn add_measurement(&mut self, project_id: &RecordId, draft: MeasurementDraft) -> QuoteResult<Measurement> {
        let measurement = draft.into_measurement()?;
        let mut project = self.require(project_id)?;
        project.add_measurement(measurement.clone());
        self.update(project_id, ProjectPatch::measurements(project.measurements))?;
        tracing::info!(
            project = %project_id,
            measurement = %measurement.id,
            total_cost = %measurement.total_cost,
            "added measurement"
        );
        Ok(measurement)
    }

    /// Delete one measurement from a project.
    pub fn remove_measurement(&mut self, project_id: &RecordId, measurement_id: &RecordId) -> QuoteResult<Measurement> {
        let mut project = self.require(project_id)?;
        let removed = project
            .remove_measurement(measurement_id)
            .ok_or_else(|| QuoteError::measurement_not_found(measurement_id))?;
        self.update(project_id, ProjectPatch::measurements(project.measurements))?;
        tracing::info!(project = %project_id, measurement = %measurement_id, "removed measurement");
        Ok(removed)
    }

    fn load_all(&self) -> QuoteResult<Vec<Project>> {
        match self.medium.read(PROJECTS_KEY)? {
            None => Ok(Vec::new()),
            Some(blob) if blob.trim().is_empty() => Ok(Vec::new()),
            Some(blob) => serde_json::from_str(&blob).map_err(|e| {
                tracing::warn!(key = PROJECTS_KEY, error = %e, "stored projects are unreadable");
                QuoteError::Serialization {
                    reason: format!("Invalid project data under '{}': {}", PROJECTS_KEY, e),
                }
            }),
        }
    }

    fn save_all(&mut self, projects: &[Project]) -> QuoteResult<()> {
        let blob = serde_json::to_string(projects)?;
        self.medium.write(PROJECTS_KEY, &blob)
    }
}
