//! Layout solver execution and result decoding.

use super::config::{CeilingSpec, LayoutConfig};
use super::objective::{aspect_ratio, panel_dimension, truncate_count, PanelObjective, MIN_PANEL_MM};
use crate::error::{Error, Result};
use crate::qio::{Bounds, QioRunner};

/// A buildable panel grid for one ceiling.
///
/// Geometry is always recomputed from the integer panel counts, never read
/// off the optimizer's continuous relaxation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelLayout {
    /// Panel count along the length axis.
    pub panels_x: u32,

    /// Panel count along the width axis.
    pub panels_y: u32,

    /// `panels_x * panels_y`.
    pub total_panels: u32,

    /// Panel dimension along the length axis.
    pub panel_width_mm: f64,

    /// Panel dimension along the width axis.
    pub panel_height_mm: f64,

    /// Long side over short side of one panel.
    pub aspect_ratio: f64,

    /// Total panel area in square metres.
    pub coverage_sqm: f64,

    /// Engine generations actually run.
    pub iterations: usize,

    /// Wall-clock duration of the optimization.
    pub execution_time_ms: f64,

    /// Final penalty of the decoded grid; zero means every constraint is
    /// met exactly, larger values record the remaining violations.
    pub fitness: f64,
}

/// Solves the panel-grid layout problem for a ceiling.
///
/// # Usage
///
/// ```
/// use quopt::layout::{CeilingSpec, LayoutConfig, LayoutRunner};
///
/// let spec = CeilingSpec::new(4800.0, 3600.0).with_panel_gap_mm(50.0);
/// let config = LayoutConfig::default().with_seed(42);
/// let layout = LayoutRunner::run(&spec, &config).unwrap();
/// assert_eq!(layout.total_panels, layout.panels_x * layout.panels_y);
/// ```
pub struct LayoutRunner;

impl LayoutRunner {
    /// Runs the layout optimization.
    ///
    /// Searches the continuous `(nx, ny)` relaxation with the QIO engine,
    /// then floors the best solution to integer counts and rebuilds the
    /// exact geometry from those integers.
    pub fn run(spec: &CeilingSpec, config: &LayoutConfig) -> Result<PanelLayout> {
        spec.validate().map_err(Error::InvalidConfig)?;

        let bounds = Bounds::new(&[
            (1.0, (spec.available_length_mm() / MIN_PANEL_MM).max(2.0)),
            (1.0, (spec.available_width_mm() / MIN_PANEL_MM).max(2.0)),
        ])?;
        let objective = PanelObjective::new(spec);

        let result = QioRunner::run(&objective, &bounds, &config.engine())?;

        let panels_x = truncate_count(result.best_solution[0]);
        let panels_y = truncate_count(result.best_solution[1]);
        let panel_width_mm =
            panel_dimension(spec.available_length_mm(), spec.panel_gap_mm, panels_x);
        let panel_height_mm =
            panel_dimension(spec.available_width_mm(), spec.panel_gap_mm, panels_y);
        let total_panels = panels_x * panels_y;

        Ok(PanelLayout {
            panels_x,
            panels_y,
            total_panels,
            panel_width_mm,
            panel_height_mm,
            aspect_ratio: aspect_ratio(panel_width_mm, panel_height_mm),
            coverage_sqm: total_panels as f64 * panel_width_mm * panel_height_mm / 1e6,
            iterations: result.iterations,
            execution_time_ms: result.execution_time_ms,
            fitness: result.best_fitness,
        })
    }
}
