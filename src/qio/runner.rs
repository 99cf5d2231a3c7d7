//! QIO generation loop execution.

use super::config::{Direction, QioConfig};
use super::state::QuantumState;
use super::types::{Bounds, Objective};
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::f64::consts::{FRAC_PI_4, PI, TAU};
use std::time::Instant;

/// Tournament size for amplitude-weighted selection.
const TOURNAMENT_SIZE: usize = 3;
/// Guard added to fitness inside selection weights.
const SELECTION_EPSILON: f64 = 1e-10;
/// Std-dev of the Gaussian phase perturbation applied to selection winners.
const PHASE_NOISE_SIGMA: f64 = 0.1;
/// Std-dev of the Gaussian noise added to crossover child amplitudes.
const AMPLITUDE_NOISE_SIGMA: f64 = 0.05;
/// Lower bound on crossover child amplitudes.
const AMPLITUDE_FLOOR: f64 = 0.1;
/// Tunneling jump std-dev per unit temperature.
const TUNNEL_SIGMA_FACTOR: f64 = 0.5;
/// Phase shift applied on a tunneling jump.
const TUNNEL_PHASE_SHIFT: f64 = FRAC_PI_4;
/// Amplitude decay applied on a tunneling jump.
const TUNNEL_AMPLITUDE_DECAY: f64 = 0.9;
/// Per-individual probability of an interference merge each generation.
const INTERFERENCE_RATE: f64 = 0.3;

/// Result of a QIO optimization run.
///
/// `best_solution` and `best_fitness` always come from the elitist
/// best-ever record, never from the final (possibly degraded) population.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QioResult {
    /// The best position found, within bounds.
    pub best_solution: Vec<f64>,

    /// Objective value of `best_solution`, in the caller's orientation.
    pub best_fitness: f64,

    /// Generations actually run (early convergence may stop short of the
    /// configured maximum).
    pub iterations: usize,

    /// Best-so-far objective value after each generation, in the caller's
    /// orientation. `len() == iterations`.
    pub convergence_history: Vec<f64>,

    /// Collapsed positions of the population at stop time.
    pub final_population: Vec<Vec<f64>>,

    /// Wall-clock duration of the run.
    pub execution_time_ms: f64,
}

/// Executes the quantum-inspired optimization loop.
///
/// # Usage
///
/// ```
/// use quopt::qio::{Bounds, QioConfig, QioRunner};
///
/// let bounds = Bounds::new(&[(-5.0, 5.0)]).unwrap();
/// let config = QioConfig::default().with_seed(42);
/// let result = QioRunner::run(&|x: &[f64]| x[0].abs(), &bounds, &config).unwrap();
/// assert!(bounds.contains(&result.best_solution));
/// ```
pub struct QioRunner;

impl QioRunner {
    /// Runs the optimizer.
    ///
    /// Each generation: measure fitness, update the elitist record, select
    /// by amplitude-weighted tournament, entangle pairs, tunnel, interfere,
    /// cool. Stops at `max_iterations` or when the population fitness
    /// spread collapses (after `min_iterations` generations).
    pub fn run<O: Objective>(
        objective: &O,
        bounds: &Bounds,
        config: &QioConfig,
    ) -> Result<QioResult> {
        config.validate().map_err(Error::InvalidConfig)?;

        let start = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut states = superposition(bounds, config.population_size, &mut rng);
        let mut temperature = config.initial_temperature;

        // Elitist record; replaced by the first measured generation.
        let mut best = QuantumState::new(Vec::new(), 0.0, 0.0);
        let mut convergence_history = Vec::with_capacity(config.max_iterations);
        let mut iterations = 0usize;

        for iteration in 0..config.max_iterations {
            // 1. Measure: collapse each state and evaluate it.
            for state in states.iter_mut() {
                let raw = objective.evaluate(&state.collapse());
                state.fitness = oriented(config.direction, raw);
            }

            // 2. Elitist update. A generation where nothing evaluates to a
            // finite fitness gives selection nothing to weigh.
            let generation_best =
                find_fittest(&states).ok_or(Error::DegenerateFitness)?;
            if generation_best.fitness > best.fitness {
                best = generation_best.clone();
            }

            // 3. Record progress in the caller's orientation.
            let best_so_far = oriented(config.direction, best.fitness);
            convergence_history.push(best_so_far);
            objective.on_iteration(iteration + 1, best_so_far);
            iterations = iteration + 1;

            // 4-7. Generation operators.
            states = select(&states, &mut rng);
            states = entangle(states, config.entanglement_strength, &mut rng);
            tunnel(
                &mut states,
                bounds,
                temperature,
                config.tunneling_rate,
                &mut rng,
            );
            states = interfere(states, &mut rng);

            // 8. Anneal.
            temperature *= config.cooling_rate;

            // 9. Convergence stop, gated by the iteration floor.
            if iterations >= config.min_iterations
                && fitness_std_dev(&states) < config.convergence_epsilon
            {
                break;
            }
        }

        Ok(QioResult {
            best_solution: best.collapse(),
            best_fitness: oriented(config.direction, best.fitness),
            iterations,
            convergence_history,
            final_population: states.iter().map(QuantumState::collapse).collect(),
            execution_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

/// Maps between the caller's orientation and the internal
/// higher-is-better fitness. Involutive, so it converts both ways.
fn oriented(direction: Direction, value: f64) -> f64 {
    match direction {
        Direction::Minimize => -value,
        Direction::Maximize => value,
    }
}

/// Initial population: uniform positions across the search box, equal
/// amplitudes normalized over the population, uniform random phases.
fn superposition<R: Rng>(bounds: &Bounds, population_size: usize, rng: &mut R) -> Vec<QuantumState> {
    let amplitude = 1.0 / (population_size as f64).sqrt();
    (0..population_size)
        .map(|_| QuantumState::new(bounds.sample(rng), amplitude, rng.random_range(0.0..TAU)))
        .collect()
}

/// Amplitude-weighted tournament selection.
///
/// Draws a size-3 tournament with replacement, then picks within it by a
/// weighted draw on `amplitude² · (fitness + ε)` with weights floored at
/// zero. A degenerate total weight falls back to the tournament's fittest
/// member. Winners are cloned with Gaussian phase noise.
fn select<R: Rng>(states: &[QuantumState], rng: &mut R) -> Vec<QuantumState> {
    let n = states.len();
    (0..n)
        .map(|_| {
            let picks: [usize; TOURNAMENT_SIZE] =
                std::array::from_fn(|_| rng.random_range(0..n));
            let weights = picks.map(|i| {
                let s = &states[i];
                (s.amplitude * s.amplitude * (s.fitness + SELECTION_EPSILON)).max(0.0)
            });
            let total: f64 = weights.iter().sum();

            let winner = if total > 0.0 && total.is_finite() {
                let mut roll = rng.random_range(0.0..total);
                let mut chosen = picks[TOURNAMENT_SIZE - 1];
                for (&idx, &w) in picks.iter().zip(weights.iter()) {
                    roll -= w;
                    if roll <= 0.0 {
                        chosen = idx;
                        break;
                    }
                }
                chosen
            } else {
                let mut chosen = picks[0];
                for &idx in &picks[1..] {
                    if states[idx].fitness > states[chosen].fitness {
                        chosen = idx;
                    }
                }
                chosen
            };

            let mut winner = states[winner].clone();
            let noise: f64 = rng.sample(StandardNormal);
            winner.phase += PHASE_NOISE_SIGMA * noise;
            winner
        })
        .collect()
}

/// Entanglement crossover: shuffle, pair consecutive states, convex-mix
/// each pair. An unpaired leftover passes through unchanged.
fn entangle<R: Rng>(
    mut states: Vec<QuantumState>,
    entanglement_strength: f64,
    rng: &mut R,
) -> Vec<QuantumState> {
    states.shuffle(rng);

    let mut next = Vec::with_capacity(states.len());
    let mut pairs = states.chunks_exact(2);
    for pair in pairs.by_ref() {
        let (first, second) = entangle_pair(&pair[0], &pair[1], entanglement_strength, rng);
        next.push(first);
        next.push(second);
    }
    if let [leftover] = pairs.remainder() {
        next.push(leftover.clone());
    }
    next
}

fn entangle_pair<R: Rng>(
    p1: &QuantumState,
    p2: &QuantumState,
    entanglement_strength: f64,
    rng: &mut R,
) -> (QuantumState, QuantumState) {
    let c = rng.random::<f64>();
    let mix = |w: f64| -> Vec<f64> {
        p1.position
            .iter()
            .zip(p2.position.iter())
            .map(|(&x, &y)| w * x + (1.0 - w) * y)
            .collect()
    };
    let position1 = mix(c);
    let position2 = mix(1.0 - c);

    // Correlated phases with probability `entanglement_strength`: both
    // children share the mean phase, the second offset by pi.
    let (phase1, phase2) = if rng.random::<f64>() < entanglement_strength {
        let shared = (p1.phase + p2.phase) / 2.0;
        (shared, shared + PI)
    } else {
        (p1.phase, p2.phase)
    };

    let mean_amplitude = (p1.amplitude + p2.amplitude) / 2.0;
    let mean_fitness = (p1.fitness + p2.fitness) / 2.0;

    let noise1: f64 = rng.sample(StandardNormal);
    let noise2: f64 = rng.sample(StandardNormal);
    let first = QuantumState {
        position: position1,
        amplitude: (mean_amplitude + AMPLITUDE_NOISE_SIGMA * noise1).max(AMPLITUDE_FLOOR),
        phase: phase1,
        fitness: mean_fitness,
    };
    let second = QuantumState {
        position: position2,
        amplitude: (mean_amplitude + AMPLITUDE_NOISE_SIGMA * noise2).max(AMPLITUDE_FLOOR),
        phase: phase2,
        fitness: mean_fitness,
    };
    (first, second)
}

/// Tunneling: each state independently takes a Gaussian jump with
/// probability `tunneling_rate · temperature`. The jump is clamped to
/// bounds, shifts the phase by π/4, and decays the amplitude.
fn tunnel<R: Rng>(
    states: &mut [QuantumState],
    bounds: &Bounds,
    temperature: f64,
    tunneling_rate: f64,
    rng: &mut R,
) {
    let jump_probability = tunneling_rate * temperature;
    let sigma = TUNNEL_SIGMA_FACTOR * temperature;

    for state in states.iter_mut() {
        if rng.random::<f64>() >= jump_probability {
            continue;
        }
        for (value, bound) in state.position.iter_mut().zip(bounds.iter()) {
            let step: f64 = rng.sample(StandardNormal);
            *value = bound.clamp(*value + sigma * step);
        }
        state.phase += TUNNEL_PHASE_SHIFT;
        state.amplitude *= TUNNEL_AMPLITUDE_DECAY;
    }
}

/// Interference: each state, with probability 0.3, is replaced by its merge
/// with the next state in the population (wrapping). Merges read the
/// pre-interference snapshot, so replacements do not chain.
fn interfere<R: Rng>(states: Vec<QuantumState>, rng: &mut R) -> Vec<QuantumState> {
    let n = states.len();
    (0..n)
        .map(|i| {
            if rng.random::<f64>() < INTERFERENCE_RATE {
                states[i].interfere_with(&states[(i + 1) % n])
            } else {
                states[i].clone()
            }
        })
        .collect()
}

/// The fittest state with a finite fitness, if any.
fn find_fittest(states: &[QuantumState]) -> Option<&QuantumState> {
    states
        .iter()
        .filter(|s| s.fitness.is_finite())
        .max_by(|a, b| {
            a.fitness
                .partial_cmp(&b.fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Population fitness standard deviation.
fn fitness_std_dev(states: &[QuantumState]) -> f64 {
    let n = states.len() as f64;
    let mean = states.iter().map(|s| s.fitness).sum::<f64>() / n;
    let variance = states
        .iter()
        .map(|s| {
            let d = s.fitness - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    #[test]
    fn test_sphere_converges() {
        let bounds = Bounds::new(&[(0.0, 10.0), (0.0, 10.0)]).unwrap();
        let config = QioConfig::default().with_max_iterations(100).with_seed(42);

        let result = QioRunner::run(&sphere, &bounds, &config).unwrap();

        assert!(
            result.best_fitness < 1.0,
            "expected near-zero cost on 2D sphere, got {}",
            result.best_fitness
        );
    }

    #[test]
    fn test_best_solution_within_bounds() {
        let bounds = Bounds::new(&[(0.0, 10.0), (-3.0, 3.0), (100.0, 101.0)]).unwrap();
        let config = QioConfig::default().with_max_iterations(30).with_seed(7);

        let result = QioRunner::run(&sphere, &bounds, &config).unwrap();

        assert!(bounds.contains(&result.best_solution));
        for position in &result.final_population {
            assert!(
                bounds.contains(position),
                "population member escaped bounds: {position:?}"
            );
        }
    }

    #[test]
    fn test_history_length_and_monotonicity() {
        let bounds = Bounds::new(&[(-5.0, 5.0), (-5.0, 5.0)]).unwrap();
        let config = QioConfig::default().with_max_iterations(40).with_seed(3);

        let result = QioRunner::run(&sphere, &bounds, &config).unwrap();

        assert_eq!(result.convergence_history.len(), result.iterations);
        assert!(result.iterations <= 40);
        for window in result.convergence_history.windows(2) {
            assert!(
                window[1] <= window[0] + 1e-12,
                "minimized history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let bounds = Bounds::new(&[(0.0, 10.0), (0.0, 10.0)]).unwrap();
        let config = QioConfig::default().with_max_iterations(25).with_seed(1234);

        let a = QioRunner::run(&sphere, &bounds, &config).unwrap();
        let b = QioRunner::run(&sphere, &bounds, &config).unwrap();

        assert_eq!(a.best_fitness, b.best_fitness);
        assert_eq!(a.best_solution, b.best_solution);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.convergence_history, b.convergence_history);
    }

    #[test]
    fn test_maximize_direction() {
        // Peak of -(x - 5)^2 at x = 5.
        let bounds = Bounds::new(&[(0.0, 10.0)]).unwrap();
        let config = QioConfig::default()
            .with_direction(Direction::Maximize)
            .with_max_iterations(100)
            .with_seed(42);

        let result =
            QioRunner::run(&|x: &[f64]| -(x[0] - 5.0) * (x[0] - 5.0), &bounds, &config).unwrap();

        assert!(
            result.best_fitness > -0.5,
            "expected a peak near zero, got {}",
            result.best_fitness
        );
        assert!((result.best_solution[0] - 5.0).abs() < 1.0);
        for window in result.convergence_history.windows(2) {
            assert!(window[1] >= window[0] - 1e-12);
        }
    }

    #[test]
    fn test_all_nan_objective_is_degenerate() {
        let bounds = Bounds::new(&[(0.0, 1.0)]).unwrap();
        let config = QioConfig::default().with_seed(42);

        let result = QioRunner::run(&|_: &[f64]| f64::NAN, &bounds, &config);

        assert!(matches!(result, Err(Error::DegenerateFitness)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bounds = Bounds::new(&[(0.0, 1.0)]).unwrap();
        let config = QioConfig::default().with_population_size(1);

        let result = QioRunner::run(&sphere, &bounds, &config);

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_constant_objective_stops_at_floor() {
        // A flat landscape collapses the fitness spread immediately, so the
        // run stops exactly when the floor allows it.
        let bounds = Bounds::new(&[(0.0, 1.0)]).unwrap();
        let config = QioConfig::default()
            .with_max_iterations(100)
            .with_min_iterations(10)
            .with_seed(9);

        let result = QioRunner::run(&|_: &[f64]| 7.0, &bounds, &config).unwrap();

        assert_eq!(result.iterations, 10);
        assert_eq!(result.convergence_history.len(), 10);
        assert_eq!(result.best_fitness, 7.0);
    }

    #[test]
    fn test_constant_objective_without_floor_stops_first_generation() {
        let bounds = Bounds::new(&[(0.0, 1.0)]).unwrap();
        let config = QioConfig::default()
            .with_max_iterations(100)
            .with_min_iterations(0)
            .with_seed(9);

        let result = QioRunner::run(&|_: &[f64]| 7.0, &bounds, &config).unwrap();

        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_single_iteration_run() {
        let bounds = Bounds::new(&[(0.0, 10.0)]).unwrap();
        let config = QioConfig::default().with_max_iterations(1).with_seed(5);

        let result = QioRunner::run(&sphere, &bounds, &config).unwrap();

        assert_eq!(result.iterations, 1);
        assert_eq!(result.convergence_history.len(), 1);
        assert!(bounds.contains(&result.best_solution));
        assert_eq!(result.final_population.len(), 50);
    }

    #[test]
    fn test_on_iteration_called_once_per_generation() {
        struct Counting {
            calls: AtomicUsize,
        }

        impl Objective for Counting {
            fn evaluate(&self, position: &[f64]) -> f64 {
                position.iter().map(|v| v * v).sum()
            }

            fn on_iteration(&self, _iteration: usize, _best_fitness: f64) {
                self.calls.fetch_add(1, Ordering::Relaxed);
            }
        }

        let objective = Counting {
            calls: AtomicUsize::new(0),
        };
        let bounds = Bounds::new(&[(-2.0, 2.0)]).unwrap();
        let config = QioConfig::default().with_max_iterations(15).with_seed(11);

        let result = QioRunner::run(&objective, &bounds, &config).unwrap();

        assert_eq!(objective.calls.load(Ordering::Relaxed), result.iterations);
    }

    #[test]
    fn test_selection_preserves_population_size() {
        let mut rng = StdRng::seed_from_u64(42);
        let bounds = Bounds::new(&[(0.0, 1.0)]).unwrap();
        let mut states = superposition(&bounds, 9, &mut rng);
        for (i, s) in states.iter_mut().enumerate() {
            s.fitness = i as f64;
        }

        let selected = select(&states, &mut rng);
        assert_eq!(selected.len(), 9);

        let entangled = entangle(selected, 0.3, &mut rng);
        assert_eq!(entangled.len(), 9);
    }

    #[test]
    fn test_entangle_children_stay_between_parents() {
        let mut rng = StdRng::seed_from_u64(1);
        let p1 = QuantumState::new(vec![0.0, 0.0], 0.5, 0.0);
        let p2 = QuantumState::new(vec![2.0, 4.0], 0.5, 1.0);

        let (c1, c2) = entangle_pair(&p1, &p2, 1.0, &mut rng);
        for child in [&c1, &c2] {
            assert!(child.position[0] >= 0.0 && child.position[0] <= 2.0);
            assert!(child.position[1] >= 0.0 && child.position[1] <= 4.0);
            assert!(child.amplitude >= AMPLITUDE_FLOOR);
        }
        // Fully entangled pair: correlated phases, second offset by pi.
        assert!((c2.phase - c1.phase - PI).abs() < 1e-12);
    }

    #[test]
    fn test_tunnel_keeps_states_in_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let bounds = Bounds::new(&[(0.0, 1.0), (-1.0, 1.0)]).unwrap();
        let mut states = superposition(&bounds, 20, &mut rng);

        // Rate and temperature high enough that every state jumps.
        tunnel(&mut states, &bounds, 10.0, 1.0, &mut rng);

        for state in &states {
            assert!(bounds.contains(&state.position));
            assert!(state.amplitude > 0.0);
        }
    }

    proptest! {
        #[test]
        fn prop_best_solution_within_arbitrary_bounds(
            pairs in prop::collection::vec((-100.0f64..100.0, 0.0f64..50.0), 1..5),
            seed in 0u64..1000,
        ) {
            let pairs: Vec<(f64, f64)> =
                pairs.into_iter().map(|(min, width)| (min, min + width)).collect();
            let bounds = Bounds::new(&pairs).unwrap();
            let config = QioConfig::default()
                .with_population_size(10)
                .with_max_iterations(5)
                .with_min_iterations(0)
                .with_seed(seed);

            let result = QioRunner::run(&sphere, &bounds, &config).unwrap();

            prop_assert!(bounds.contains(&result.best_solution));
            prop_assert_eq!(result.convergence_history.len(), result.iterations);
            prop_assert!(result.iterations <= 5);
        }
    }
}
