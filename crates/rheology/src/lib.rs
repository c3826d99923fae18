//! Flow stress calculations for crustal deformation.
//!
//! The crate turns temperature, pressure, and recrystallized grain size into
//! strain-rate and fault slip-rate estimates:
//!
//! - [`CoefficientMatrix`]: temperature-dependent coefficients of the
//!   Pitzer and Sterner (1994) equation of state
//! - [`EquationOfState`]: pressure as a function of molar volume
//! - [`FugacitySolver`]: inverts the equation of state with bisection and
//!   evaluates water fugacity at the solved volume
//! - [`PiezometerModel`]: grain size to differential stress
//! - [`FlowLawModel`]: stress, fugacity, and temperature to strain rate
//! - [`DeformationPipeline`]: runs the stages over arrays of inputs
//!
//! Static reference data (piezometer and flow-law tables, solver settings)
//! lives in [`RheologyConfig`], which can be loaded from TOML and injected
//! into the models.
//!
//! Internally, temperature is always in kelvin and pressure in pascals.
//! The [`units`] module converts user-facing °C and MPa at the boundary.

mod coefficients;
mod config;
mod eos;
mod error;
mod flow_law;
mod fugacity;
mod piezometer;
mod pipeline;

pub mod units;

pub use coefficients::{CoefficientMatrix, Coefficients, PITZER_STERNER_1994};
pub use config::{RheologyConfig, SolverSettings};
pub use eos::{EquationOfState, GAS_CONSTANT, pressure};
pub use error::Error;
pub use flow_law::{
    FlowLawModel, FlowLawSpec, FlowLawTable, MOLAR_GAS_CONSTANT, SECONDS_PER_YEAR, slip_rate,
};
pub use fugacity::{
    DEFAULT_VOLUME_BRACKET, FugacityGrid, FugacitySolution, FugacitySolver, TargetPressure,
    fugacity,
};
pub use piezometer::{PiezometerModel, PiezometerSpec, PiezometerTable};
pub use pipeline::{
    Condition, ConditionPairing, DeformationPipeline, DeformationRun, DeformationSample,
    FugacityOutcome, PipelineInputs, cartesian,
};
