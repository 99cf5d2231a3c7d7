//! Panel-grid geometry and the composite layout penalty.

use super::config::CeilingSpec;
use crate::qio::Objective;

/// Smallest buildable panel dimension.
pub(crate) const MIN_PANEL_MM: f64 = 200.0;

/// Penalty per millimetre a panel dimension exceeds the maximum size.
const OVERSIZE_PENALTY_PER_MM: f64 = 1000.0;
/// Penalty per unit of aspect-ratio deviation from the target.
const ASPECT_PENALTY: f64 = 100.0;
/// Flat penalty when a panel dimension drops below [`MIN_PANEL_MM`].
const UNDERSIZE_PENALTY: f64 = 500.0;
/// Penalty per panel, discouraging needlessly fine grids.
const PANEL_COUNT_PENALTY: f64 = 5.0;
/// Penalty per unit of uncovered available-area fraction.
const COVERAGE_PENALTY: f64 = 200.0;

/// Panel dimension along one axis: the available span minus the `count - 1`
/// inter-panel gaps, split evenly.
pub(crate) fn panel_dimension(span_mm: f64, gap_mm: f64, count: u32) -> f64 {
    (span_mm - (count - 1) as f64 * gap_mm) / count as f64
}

/// Truncates a continuous panel count to a buildable integer, at least 1.
pub(crate) fn truncate_count(value: f64) -> u32 {
    value.trunc().max(1.0) as u32
}

/// Long side over short side.
pub(crate) fn aspect_ratio(width: f64, height: f64) -> f64 {
    width.max(height) / width.min(height)
}

/// Minimized objective over the continuous `(nx, ny)` relaxation.
///
/// Counts are truncated to integers before the penalty is computed, so the
/// engine explores a piecewise-constant landscape whose plateaus are the
/// buildable grids.
#[derive(Debug, Clone)]
pub(crate) struct PanelObjective {
    available_length_mm: f64,
    available_width_mm: f64,
    panel_gap_mm: f64,
    target_aspect_ratio: f64,
    max_panel_size_mm: f64,
}

impl PanelObjective {
    pub(crate) fn new(spec: &CeilingSpec) -> Self {
        Self {
            available_length_mm: spec.available_length_mm(),
            available_width_mm: spec.available_width_mm(),
            panel_gap_mm: spec.panel_gap_mm,
            target_aspect_ratio: spec.target_aspect_ratio,
            max_panel_size_mm: spec.max_panel_size_mm,
        }
    }

    /// Composite penalty for an integer grid.
    pub(crate) fn penalty(&self, panels_x: u32, panels_y: u32) -> f64 {
        let width = panel_dimension(self.available_length_mm, self.panel_gap_mm, panels_x);
        let height = panel_dimension(self.available_width_mm, self.panel_gap_mm, panels_y);

        let mut penalty = 0.0;
        if width > self.max_panel_size_mm {
            penalty += OVERSIZE_PENALTY_PER_MM * (width - self.max_panel_size_mm);
        }
        if height > self.max_panel_size_mm {
            penalty += OVERSIZE_PENALTY_PER_MM * (height - self.max_panel_size_mm);
        }

        penalty += ASPECT_PENALTY * (aspect_ratio(width, height) - self.target_aspect_ratio).abs();

        if width < MIN_PANEL_MM || height < MIN_PANEL_MM {
            penalty += UNDERSIZE_PENALTY;
        }

        let total_panels = (panels_x * panels_y) as f64;
        penalty += PANEL_COUNT_PENALTY * total_panels;

        let coverage = total_panels * width * height
            / (self.available_length_mm * self.available_width_mm);
        penalty += COVERAGE_PENALTY * (1.0 - coverage);

        penalty
    }
}

impl Objective for PanelObjective {
    fn evaluate(&self, position: &[f64]) -> f64 {
        self.penalty(truncate_count(position[0]), truncate_count(position[1]))
    }
}
