//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, so an
//! observer can be written once against the capabilities it needs.
//!
//! # Example
//!
//! ```rust
//! use flowstress_core::Observer;
//! use flowstress_observers::traits::HasResidual;
//!
//! #[derive(Default)]
//! struct WorstResidual(f64);
//!
//! impl<E: HasResidual, A> Observer<E, A> for WorstResidual {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         self.0 = self.0.max(event.residual().abs());
//!         None
//!     }
//! }
//! ```

use flowstress_core::{EquationProblem, Model};

use flowstress_solvers::equation::bisection;

/// An event that carries an evaluated point and its residual.
pub trait HasResidual {
    /// Returns the solver variable that was evaluated.
    fn x(&self) -> f64;

    /// Returns the residual for this event.
    ///
    /// Returns `f64::NAN` when the evaluation failed and no residual exists.
    fn residual(&self) -> f64;

    /// Returns a short label for the kind of evaluation.
    fn stage(&self) -> &'static str;
}

impl<M, P> HasResidual for bisection::Event<'_, M, P>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    fn x(&self) -> f64 {
        bisection::Event::x(self)
    }

    fn residual(&self) -> f64 {
        bisection::Event::residual(self)
    }

    fn stage(&self) -> &'static str {
        match self {
            bisection::Event::Left { .. } => "left",
            bisection::Event::Right { .. } => "right",
            bisection::Event::Midpoint { .. } => "midpoint",
        }
    }
}
