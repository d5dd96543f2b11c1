use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::data::aggregate::{compute_dashboard, DashboardArtifacts};
use crate::data::filter::FilterCriteria;
use crate::data::model::InsuranceDataset;

// ---------------------------------------------------------------------------
// Interaction phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Showing the artifacts of `applied`.
    Idle,
    /// Set only while `recompute_with` runs. The pipeline is synchronous,
    /// so rendering code always observes `Idle`.
    Computing,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub dataset: Arc<InsuranceDataset>,

    /// Criteria bound to the filter widgets; edited freely during a frame.
    pub criteria: FilterCriteria,

    /// Startup criteria, restored by the reset button.
    initial: FilterCriteria,

    /// Criteria the current artifacts were computed from.
    applied: FilterCriteria,

    /// Charts and metrics currently on screen.
    artifacts: DashboardArtifacts,

    phase: Phase,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state and compute the first set of artifacts.
    ///
    /// `preferred_region` is used when the dataset contains it, otherwise
    /// the first region in the file.
    pub fn new(dataset: Arc<InsuranceDataset>, preferred_region: &str) -> Self {
        let region = if dataset.regions().iter().any(|r| r == preferred_region) {
            preferred_region.to_string()
        } else {
            let fallback = dataset.regions().first().cloned().unwrap_or_default();
            log::warn!("Region '{preferred_region}' not in dataset, defaulting to '{fallback}'");
            fallback
        };

        let criteria = FilterCriteria::full_range(&dataset, region);
        let artifacts = compute_dashboard(&dataset, &criteria);

        Self {
            dataset,
            initial: criteria.clone(),
            applied: criteria.clone(),
            criteria,
            artifacts,
            phase: Phase::Idle,
            status_message: None,
        }
    }

    pub fn artifacts(&self) -> &DashboardArtifacts {
        &self.artifacts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Restore the startup criteria; takes effect on the next `sync`.
    pub fn reset_filters(&mut self) {
        self.criteria = self.initial.clone();
    }

    /// Keep the age interval ordered after one of its ends moved.
    pub fn clamp_age_range(&mut self, moved_min: bool) {
        if self.criteria.age_min > self.criteria.age_max {
            if moved_min {
                self.criteria.age_max = self.criteria.age_min;
            } else {
                self.criteria.age_min = self.criteria.age_max;
            }
        }
    }

    /// Recompute when the widget criteria differ from the applied ones.
    ///
    /// Called once per frame after all widgets ran, so several edits in
    /// one frame collapse into a single recompute of the latest values.
    /// Returns whether a recompute happened.
    pub fn sync(&mut self) -> bool {
        if self.criteria == self.applied {
            return false;
        }
        self.recompute_with(compute_dashboard);
        true
    }

    /// Run `pipeline` on the current criteria and swap in its output.
    ///
    /// A panicking pipeline leaves the previous artifacts on screen and
    /// sets `status_message`; the criteria still count as applied so the
    /// same selection is not retried every frame.
    pub fn recompute_with(
        &mut self,
        pipeline: impl FnOnce(&InsuranceDataset, &FilterCriteria) -> DashboardArtifacts,
    ) {
        self.phase = Phase::Computing;
        let criteria = self.criteria.clone();
        let dataset = Arc::clone(&self.dataset);

        let result = panic::catch_unwind(AssertUnwindSafe(|| pipeline(&dataset, &criteria)));
        match result {
            Ok(artifacts) => {
                log::debug!(
                    "Recomputed dashboard for {criteria:?}: {} records",
                    artifacts.metrics.total_customers
                );
                self.artifacts = artifacts;
                self.status_message = None;
            }
            Err(_) => {
                log::error!(
                    "Dashboard computation panicked for {criteria:?}; keeping previous view"
                );
                self.status_message =
                    Some("Error: could not compute the dashboard for this selection".into());
            }
        }
        self.applied = criteria;
        self.phase = Phase::Idle;
    }
}
