//! Crate-wide error type.

/// Errors produced by the optimizer and the layout adapter.
///
/// All validation happens before the generation loop starts; once a run
/// is underway the only runtime failure is a degenerate fitness landscape.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A bound interval with `min > max` or a non-finite endpoint.
    #[error("invalid bound: [{min}, {max}]")]
    InvalidBound {
        /// Lower endpoint as given.
        min: f64,
        /// Upper endpoint as given.
        max: f64,
    },

    /// A bounds list with no dimensions.
    #[error("bounds must contain at least one dimension")]
    EmptyBounds,

    /// A configuration or problem specification that failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Every individual in a generation evaluated to a non-finite fitness,
    /// so amplitude-weighted selection has nothing to work with.
    #[error("all fitness values in the population are non-finite")]
    DegenerateFitness,
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;
