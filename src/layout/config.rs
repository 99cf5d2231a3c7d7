//! Ceiling specification and layout solver configuration.

use crate::qio::{Direction, QioConfig};

/// The ceiling to partition, with its construction constraints.
///
/// All linear dimensions are millimetres. The perimeter gap is subtracted
/// from both ends of each axis before panels are placed; the panel gap
/// separates adjacent panels.
///
/// ```
/// use quopt::layout::CeilingSpec;
///
/// let spec = CeilingSpec::new(4800.0, 3600.0)
///     .with_panel_gap_mm(50.0)
///     .with_target_aspect_ratio(1.4);
/// assert_eq!(spec.available_length_mm(), 4400.0);
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CeilingSpec {
    /// Ceiling length along the x axis.
    pub length_mm: f64,

    /// Ceiling width along the y axis.
    pub width_mm: f64,

    /// Fixed clearance kept along every edge of the ceiling.
    pub perimeter_gap_mm: f64,

    /// Clearance between adjacent panels.
    pub panel_gap_mm: f64,

    /// Desired panel aspect ratio, expressed as long side over short side.
    pub target_aspect_ratio: f64,

    /// Largest manufacturable panel dimension.
    pub max_panel_size_mm: f64,
}

impl CeilingSpec {
    /// Creates a spec for the given ceiling with default constraints:
    /// 200 mm perimeter gap, 200 mm panel gap, 1.5 target aspect ratio,
    /// 2400 mm maximum panel size.
    pub fn new(length_mm: f64, width_mm: f64) -> Self {
        Self {
            length_mm,
            width_mm,
            perimeter_gap_mm: 200.0,
            panel_gap_mm: 200.0,
            target_aspect_ratio: 1.5,
            max_panel_size_mm: 2400.0,
        }
    }

    /// Sets the perimeter gap.
    pub fn with_perimeter_gap_mm(mut self, gap: f64) -> Self {
        self.perimeter_gap_mm = gap;
        self
    }

    /// Sets the inter-panel gap.
    pub fn with_panel_gap_mm(mut self, gap: f64) -> Self {
        self.panel_gap_mm = gap;
        self
    }

    /// Sets the target aspect ratio.
    pub fn with_target_aspect_ratio(mut self, ratio: f64) -> Self {
        self.target_aspect_ratio = ratio;
        self
    }

    /// Sets the maximum panel dimension.
    pub fn with_max_panel_size_mm(mut self, size: f64) -> Self {
        self.max_panel_size_mm = size;
        self
    }

    /// Span left for panels along the x axis after perimeter gaps.
    pub fn available_length_mm(&self) -> f64 {
        self.length_mm - 2.0 * self.perimeter_gap_mm
    }

    /// Span left for panels along the y axis after perimeter gaps.
    pub fn available_width_mm(&self) -> f64 {
        self.width_mm - 2.0 * self.perimeter_gap_mm
    }

    /// Validates the spec.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("length_mm", self.length_mm),
            ("width_mm", self.width_mm),
            ("target_aspect_ratio", self.target_aspect_ratio),
            ("max_panel_size_mm", self.max_panel_size_mm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be positive and finite, got {value}"));
            }
        }
        for (name, value) in [
            ("perimeter_gap_mm", self.perimeter_gap_mm),
            ("panel_gap_mm", self.panel_gap_mm),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "{name} must be non-negative and finite, got {value}"
                ));
            }
        }
        if self.available_length_mm() <= 0.0 || self.available_width_mm() <= 0.0 {
            return Err(format!(
                "perimeter gap {} mm leaves no panel area on a {} x {} mm ceiling",
                self.perimeter_gap_mm, self.length_mm, self.width_mm
            ));
        }
        Ok(())
    }
}

/// Configuration for the layout solver.
///
/// Defaults carry the engine tuning that works well on the small
/// two-variable panel-grid search; see [`QioConfig::layout`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Engine population size.
    pub population_size: usize,

    /// Engine base tunneling rate.
    pub tunneling_rate: f64,

    /// Engine initial annealing temperature.
    pub initial_temperature: f64,

    /// Engine geometric cooling factor.
    pub cooling_rate: f64,

    /// Engine entanglement strength.
    pub entanglement_strength: f64,

    /// Maximum engine generations.
    pub max_iterations: usize,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            population_size: 75,
            tunneling_rate: 0.15,
            initial_temperature: 2.0,
            cooling_rate: 0.98,
            entanglement_strength: 0.25,
            max_iterations: 150,
            seed: None,
        }
    }
}

impl LayoutConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the engine configuration this layout config describes.
    ///
    /// The layout objective is always minimized.
    pub(crate) fn engine(&self) -> QioConfig {
        let mut config = QioConfig::layout()
            .with_population_size(self.population_size)
            .with_tunneling_rate(self.tunneling_rate)
            .with_initial_temperature(self.initial_temperature)
            .with_cooling_rate(self.cooling_rate)
            .with_entanglement_strength(self.entanglement_strength)
            .with_max_iterations(self.max_iterations)
            .with_direction(Direction::Minimize);
        config.seed = self.seed;
        config
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.engine().validate()
    }
}
