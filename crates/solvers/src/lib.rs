//! Numerical solvers for the flowstress workspace.
//!
//! Solvers are generic over the [`Model`] and problem traits defined in
//! `flowstress-core`, so the same root finder drives the equation of state
//! and any test model alike.
//!
//! - [`equation`]: root finding for [`EquationProblem`]s
//!
//! [`Model`]: flowstress_core::Model
//! [`EquationProblem`]: flowstress_core::EquationProblem

pub mod equation;
