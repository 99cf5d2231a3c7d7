//! QIO engine configuration.

/// Optimization direction.
///
/// The engine always maximizes internally; under `Minimize` it maximizes
/// the negated objective and reports results back in the caller's original
/// sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Lower objective values are better (the default).
    #[default]
    Minimize,
    /// Higher objective values are better.
    Maximize,
}

/// Configuration for the quantum-inspired optimizer.
///
/// Controls population size, the operator rates, the annealing schedule,
/// and termination.
///
/// # Defaults
///
/// ```
/// use quopt::qio::QioConfig;
///
/// let config = QioConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_iterations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use quopt::qio::{Direction, QioConfig};
///
/// let config = QioConfig::default()
///     .with_population_size(80)
///     .with_tunneling_rate(0.2)
///     .with_direction(Direction::Maximize)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QioConfig {
    /// Number of states in the population.
    ///
    /// Larger populations increase diversity but cost one objective
    /// evaluation per state per generation. Typical range: 30–150.
    pub population_size: usize,

    /// Base probability of a tunneling jump, scaled by the current
    /// temperature (0.0–1.0).
    pub tunneling_rate: f64,

    /// Starting annealing temperature. Scales both tunneling probability
    /// and jump magnitude.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1). Higher = slower cooling.
    pub cooling_rate: f64,

    /// Probability that a crossover pair's phases become correlated
    /// (0.0–1.0).
    pub entanglement_strength: f64,

    /// Maximum number of generations.
    pub max_iterations: usize,

    /// Generations that must elapse before the convergence stop may fire.
    ///
    /// Guards against a homogeneous initial population ending the run
    /// immediately. Set to 0 to allow stopping from the first generation.
    pub min_iterations: usize,

    /// Population fitness standard deviation below which the run stops
    /// early.
    pub convergence_epsilon: f64,

    /// Whether the objective is minimized or maximized.
    pub direction: Direction,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for QioConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            tunneling_rate: 0.1,
            initial_temperature: 1.0,
            cooling_rate: 0.95,
            entanglement_strength: 0.3,
            max_iterations: 100,
            min_iterations: 10,
            convergence_epsilon: 1e-3,
            direction: Direction::Minimize,
            seed: None,
        }
    }
}

impl QioConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the base tunneling rate.
    pub fn with_tunneling_rate(mut self, rate: f64) -> Self {
        self.tunneling_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the initial annealing temperature.
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    /// Sets the geometric cooling factor.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Sets the entanglement strength.
    pub fn with_entanglement_strength(mut self, strength: f64) -> Self {
        self.entanglement_strength = strength.clamp(0.0, 1.0);
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the convergence-stop floor (0 to disable).
    pub fn with_min_iterations(mut self, n: usize) -> Self {
        self.min_iterations = n;
        self
    }

    /// Sets the convergence threshold on population fitness spread.
    pub fn with_convergence_epsilon(mut self, epsilon: f64) -> Self {
        self.convergence_epsilon = epsilon.max(0.0);
        self
    }

    /// Sets the optimization direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset tuned for the ceiling panel layout problem.
    ///
    /// A small integer-grid search benefits from a hotter, slower-cooling
    /// schedule and a larger population:
    ///
    /// - Population: 75, Tunneling: 0.15, T₀: 2.0
    /// - Cooling: 0.98, Entanglement: 0.25, Iterations: 150
    pub fn layout() -> Self {
        Self {
            population_size: 75,
            tunneling_rate: 0.15,
            initial_temperature: 2.0,
            cooling_rate: 0.98,
            entanglement_strength: 0.25,
            max_iterations: 150,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.tunneling_rate) {
            return Err(format!(
                "tunneling_rate must be in [0, 1], got {}",
                self.tunneling_rate
            ));
        }
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.entanglement_strength) {
            return Err(format!(
                "entanglement_strength must be in [0, 1], got {}",
                self.entanglement_strength
            ));
        }
        if self.convergence_epsilon < 0.0 {
            return Err("convergence_epsilon must be non-negative".into());
        }
        Ok(())
    }
}
