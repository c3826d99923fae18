use flowstress_core::{EquationProblem, Model};

use crate::equation::EvaluateResult;

use super::Bracket;

/// Event emitted by the bisection solver for each evaluation.
pub enum Event<'a, M, P>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    /// Left bracket endpoint evaluation.
    Left {
        /// The x value that was evaluated.
        x: f64,
        /// The result of the evaluation.
        result: &'a EvaluateResult<M, P, 1>,
    },
    /// Right bracket endpoint evaluation.
    Right {
        /// The x value that was evaluated.
        x: f64,
        /// The result of the evaluation.
        result: &'a EvaluateResult<M, P, 1>,
    },
    /// Midpoint evaluation inside a bracket with a sign change.
    Midpoint {
        /// 1-based iteration counter.
        iter: usize,
        /// The x value that was evaluated.
        x: f64,
        /// Bracket that `x` splits.
        bracket: &'a Bracket,
        /// The result of the evaluation.
        result: &'a EvaluateResult<M, P, 1>,
    },
}

impl<'a, M, P> Event<'a, M, P>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    /// Returns the evaluated x value.
    #[must_use]
    pub fn x(&self) -> f64 {
        match self {
            Event::Left { x, .. } | Event::Right { x, .. } | Event::Midpoint { x, .. } => *x,
        }
    }

    /// Returns the evaluation result.
    #[must_use]
    pub fn result(&self) -> &'a EvaluateResult<M, P, 1> {
        match self {
            Event::Left { result, .. }
            | Event::Right { result, .. }
            | Event::Midpoint { result, .. } => result,
        }
    }

    /// Returns the residual, or `NaN` if the evaluation failed.
    #[must_use]
    pub fn residual(&self) -> f64 {
        self.result().as_ref().map_or(f64::NAN, |eval| eval.residual())
    }
}
