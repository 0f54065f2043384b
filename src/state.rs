use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::data::chart::{write_charts_json, ChartSpec};
use crate::data::filter::FilterSelection;
use crate::data::model::Dataset;
use crate::data::terms::TermAxis;
use crate::data::view::{compute_view, ChartOutcome, DashboardView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never modified.
    dataset: Dataset,

    /// Canonical x-axis for every chart.
    axis: TermAxis,

    /// File the dataset came from.
    pub source: PathBuf,

    /// Current filter widget values.
    selection: FilterSelection,

    /// Options and charts for `selection` (recomputed on every change).
    view: DashboardView,

    /// Overlay every section's median bid in one extra plot.
    pub compare_sections: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Dataset, axis: TermAxis, source: PathBuf) -> Self {
        let mut selection = FilterSelection::default();
        let view = compute_view(&dataset, &axis, &mut selection);
        Self {
            dataset,
            axis,
            source,
            selection,
            view,
            compare_sections: false,
            status_message: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Charts currently on screen, if any.
    pub fn charts(&self) -> &[ChartSpec] {
        match &self.view.charts {
            ChartOutcome::Charts(charts) => charts,
            _ => &[],
        }
    }

    /// Recompute options and charts after a selection change.
    fn refresh(&mut self) {
        self.view = compute_view(&self.dataset, &self.axis, &mut self.selection);
    }

    pub fn set_school_department(&mut self, value: Option<String>) {
        self.selection.school_department = value;
        self.refresh();
    }

    pub fn set_course(&mut self, value: Option<String>) {
        self.selection.course_code = value;
        self.refresh();
    }

    pub fn set_bidding_window(&mut self, value: Option<String>) {
        self.selection.bidding_window = value;
        self.refresh();
    }

    pub fn set_instructor(&mut self, value: Option<String>) {
        self.selection.instructor = value;
        self.refresh();
    }

    /// Tick or untick a section. Newly ticked sections go last.
    pub fn toggle_section(&mut self, section: &str) {
        let sections = &mut self.selection.sections;
        if let Some(pos) = sections.iter().position(|s| s == section) {
            sections.remove(pos);
        } else {
            sections.push(section.to_string());
        }
        self.refresh();
    }

    /// Select all sections currently offered.
    pub fn select_all_sections(&mut self) {
        let offered: Vec<String> = self
            .view
            .options
            .sections
            .iter()
            .map(|o| o.value.clone())
            .collect();
        for section in offered {
            if !self.selection.sections.contains(&section) {
                self.selection.sections.push(section);
            }
        }
        self.refresh();
    }

    pub fn select_no_sections(&mut self) {
        self.selection.sections.clear();
        self.refresh();
    }

    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::default();
        self.refresh();
    }

    /// Write the charts on screen as JSON.
    pub fn export_charts(&self, path: &Path) -> Result<usize> {
        let charts = self.charts();
        write_charts_json(charts, path)?;
        log::info!("Exported {} charts to {}", charts.len(), path.display());
        Ok(charts.len())
    }
}
