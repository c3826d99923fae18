use flowstress_solvers::equation::bisection;
use thiserror::Error;

/// Errors produced by the rheology models and pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A physical input is outside its valid domain, such as a non-positive
    /// temperature, volume, or grain size.
    #[error("invalid input: {reason}")]
    Domain { reason: String },

    /// The equation of state does not cross the target pressure anywhere in
    /// the volume bracket, so the conditions are outside the model's range.
    #[error(
        "no molar volume in [{}, {}] cm³/mol gives {pressure} Pa at {temperature} K \
         (bracket pressures {} Pa and {} Pa)",
        .bracket[0], .bracket[1], .endpoint_pressures[0], .endpoint_pressures[1]
    )]
    RootNotFound {
        temperature: f64,
        pressure: f64,
        bracket: [f64; 2],
        endpoint_pressures: [f64; 2],
    },

    /// The volume solve used up its iteration budget.
    #[error("volume solve at {temperature} K and {pressure} Pa did not converge in {iters} iterations")]
    Convergence {
        temperature: f64,
        pressure: f64,
        iters: usize,
    },

    #[error("unknown piezometer `{0}`")]
    UnknownPiezometer(String),

    #[error("unknown flow law `{0}`")]
    UnknownFlowLaw(String),

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to parse configuration")]
    ConfigParse(#[from] toml::de::Error),

    /// Any other root-finder failure.
    #[error("volume solve failed")]
    Solver(#[from] bisection::Error),
}

impl Error {
    pub(crate) fn domain(reason: impl Into<String>) -> Self {
        Self::Domain {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Returns `value` if it is finite and strictly positive.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, Error> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::domain(format!("{name} must be finite and positive, got {value}")))
    }
}

/// Returns `value` if it is finite and not negative.
pub(crate) fn require_non_negative(name: &str, value: f64) -> Result<f64, Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::domain(format!("{name} must be finite and non-negative, got {value}")))
    }
}
