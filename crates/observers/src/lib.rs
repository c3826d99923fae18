//! Reusable observers for the flowstress solvers.
//!
//! # Modules
//!
//! - [`traits`]: [`HasResidual`], which lets one observer work across solver
//!   event types
//! - [`TraceObserver`]: emits a `tracing` event for every solver evaluation
//!
//! [`HasResidual`]: traits::HasResidual

pub mod traits;

mod trace;

pub use trace::TraceObserver;
