//! Ceiling panel layout solver.
//!
//! Partitions a rectangular ceiling into a grid of equal panels under
//! construction constraints: fixed perimeter clearance, inter-panel gaps,
//! a maximum manufacturable panel size, a minimum sane panel size, and a
//! preferred aspect ratio.
//!
//! The grid search is a two-variable integer problem (panel counts along
//! each axis) relaxed to continuous coordinates for the [`crate::qio`]
//! engine and decoded back to integers afterwards. The decoded geometry is
//! always rebuilt from the integer counts, so every returned layout is
//! buildable regardless of where the continuous search landed.
//!
//! # Key Types
//!
//! - [`CeilingSpec`]: the ceiling and its constraints
//! - [`LayoutConfig`]: solver tuning (engine parameters + seed)
//! - [`LayoutRunner`]: runs the optimization
//! - [`PanelLayout`]: the decoded, buildable grid

mod config;
mod objective;
mod runner;

pub use config::{CeilingSpec, LayoutConfig};
pub use runner::{LayoutRunner, PanelLayout};
