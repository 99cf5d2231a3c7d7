//! Quantum-inspired stochastic optimization.
//!
//! Provides a generic population-based optimizer whose operators borrow
//! quantum vocabulary as exploration metaphors, plus one domain adapter
//! built on it:
//!
//! - **QIO engine** ([`qio`]): candidate solutions evolve as amplitude/phase
//!   carrying states through superposition sampling, amplitude-weighted
//!   tournament selection, entanglement-style crossover, temperature-scaled
//!   tunneling jumps, and pairwise interference merging, under a geometric
//!   annealing schedule. This is a classical metaheuristic, not quantum
//!   computation.
//! - **Ceiling layout** ([`layout`]): partitions a rectangular ceiling into
//!   a grid of equal panels under gap, size, and aspect-ratio constraints by
//!   driving the engine over a 2-variable relaxation and decoding the result
//!   into buildable integer panel counts.
//!
//! # Architecture
//!
//! The engine is domain-agnostic: problems plug in through the
//! [`qio::Objective`] trait and a validated [`qio::Bounds`] box constraint.
//! Runners are stateless: every run owns its population, temperature, and
//! RNG as locals, so concurrent runs share nothing and a fixed seed makes a
//! run reproducible.
//!
//! # Example
//!
//! ```
//! use quopt::qio::{Bounds, QioConfig, QioRunner};
//!
//! let bounds = Bounds::new(&[(0.0, 10.0), (0.0, 10.0)]).unwrap();
//! let config = QioConfig::default().with_seed(42);
//! let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
//!
//! let result = QioRunner::run(&sphere, &bounds, &config).unwrap();
//! assert!(result.best_fitness < 1.0);
//! ```

pub mod error;
pub mod layout;
pub mod qio;

pub use error::{Error, Result};
