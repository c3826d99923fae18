//! Bisection root finding on a bracketed interval.
//!
//! # Algorithm
//!
//! Both endpoints are evaluated first. If their residuals share a sign the
//! interval does not enclose a root and the solver fails with
//! [`BracketError::NoSignChange`]; it never widens or clamps the bracket.
//! Otherwise the midpoint replaces the endpoint whose residual has the same
//! sign, halving the interval each iteration until the bracket width or the
//! best residual meets the [`Config`] tolerances.
//!
//! Only residual signs are used, so the method needs no derivatives and
//! converges for any continuous residual with a sign change.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per evaluation: [`Event::Left`],
//! [`Event::Right`], then one [`Event::Midpoint`] per iteration. Observers
//! can return [`Action::StopEarly`] to end the search with the best
//! evaluation found so far.

mod action;
mod best;
mod bracket;
mod config;
mod decision;
mod error;
mod eval_context;
mod event;
mod solution;

pub use action::Action;
pub use bracket::{Bracket, BracketError, Sign};
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use flowstress_core::{EquationProblem, Model, Observer};

use best::Best;
use bracket::Bounds;
use decision::Decision;
use eval_context::EvalContext;

/// Finds a root of the equation using the bisection method.
///
/// The bracket endpoints may be given in either order.
///
/// # Errors
///
/// Returns an error if the bracket is invalid or does not enclose a sign
/// change, a residual is not finite, or the model or problem fails.
pub fn solve<M, P, Obs>(
    model: &M,
    problem: &P,
    bracket: [f64; 2],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M, P>, Action>,
{
    let bounds = Bounds::new(bracket)?;
    let mut ctx = EvalContext::new(model, problem, &mut observer);
    let mut best = Best::empty();

    let (eval, decision) = ctx.left_endpoint(bounds.left);
    if let Some(eval) = eval {
        best.update(eval);
    }
    let left_sign = match decision {
        Decision::Continue(sign) => sign,
        Decision::StopEarly => return best.finish(Status::StoppedByObserver, 0),
        Decision::Error(error) => return Err(error),
    };
    if best.is_residual_converged(config.residual_tol()) {
        return best.finish(Status::Converged, 0);
    }

    let (eval, decision) = ctx.right_endpoint(bounds.right);
    if let Some(eval) = eval {
        best.update(eval);
    }
    let right_sign = match decision {
        Decision::Continue(sign) => sign,
        Decision::StopEarly => return best.finish(Status::StoppedByObserver, 0),
        Decision::Error(error) => return Err(error),
    };
    if best.is_residual_converged(config.residual_tol()) {
        return best.finish(Status::Converged, 0);
    }

    let mut bracket = Bracket::new(bounds, left_sign, right_sign)?;

    for iter in 1..=config.max_iters() {
        let x = bracket.midpoint();
        let (eval, decision) = ctx.midpoint(iter, &bracket);
        if let Some(eval) = eval {
            best.update(eval);
        }

        match decision {
            Decision::Continue(sign) => bracket.shrink(x, sign),
            Decision::StopEarly => return best.finish(Status::StoppedByObserver, iter),
            Decision::Error(error) => return Err(error),
        }

        if best.is_residual_converged(config.residual_tol())
            || bracket.is_x_converged(config.x_abs_tol(), config.x_rel_tol())
        {
            return best.finish(Status::Converged, iter);
        }
    }

    best.finish(Status::MaxIters, config.max_iters())
}

/// Runs bisection without observation.
///
/// # Errors
///
/// Returns an error under the same conditions as [`solve`].
pub fn solve_unobserved<M, P>(
    model: &M,
    problem: &P,
    bracket: [f64; 2],
    config: &Config,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    solve(model, problem, bracket, config, ())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;
    use thiserror::Error;

    /// Model that squares its input.
    struct SquareModel;

    impl Model for SquareModel {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Self::Error> {
            Ok(input * input)
        }
    }

    /// Decreasing model, shaped like pressure against molar volume.
    struct Reciprocal;

    impl Model for Reciprocal {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Self::Error> {
            Ok(100.0 / input)
        }
    }

    /// Drives the model output to a target value.
    struct TargetOutput {
        target: f64,
    }

    impl EquationProblem<1> for TargetOutput {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn input(&self, x: &[f64; 1]) -> Result<f64, Self::Error> {
            Ok(x[0])
        }

        fn residuals(&self, _input: &f64, output: &f64) -> Result<[f64; 1], Self::Error> {
            Ok([output - self.target])
        }
    }

    #[test]
    fn finds_square_root() {
        let problem = TargetOutput { target: 9.0 };

        let solution = solve_unobserved(&SquareModel, &problem, [0.0, 10.0], &Config::default())
            .expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 3.0, epsilon = 1e-10);
        assert_relative_eq!(solution.snapshot.output, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn finds_root_of_decreasing_function() {
        let problem = TargetOutput { target: 8.0 };

        let solution = solve_unobserved(&Reciprocal, &problem, [5.0, 30.0], &Config::default())
            .expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 12.5, epsilon = 1e-10);
    }

    #[test]
    fn normalizes_reversed_bracket() {
        let problem = TargetOutput { target: 36.0 };

        let solution = solve_unobserved(&SquareModel, &problem, [10.0, 0.0], &Config::default())
            .expect("should solve with reversed bracket");

        assert_relative_eq!(solution.x, 6.0, epsilon = 1e-10);
    }

    #[test]
    fn endpoint_root_returns_without_iterating() {
        let problem = TargetOutput { target: 4.0 };

        let solution = solve_unobserved(&SquareModel, &problem, [2.0, 10.0], &Config::default())
            .expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert_eq!(solution.iters, 0);
        assert_relative_eq!(solution.x, 2.0);
    }

    #[test]
    fn errors_without_sign_change() {
        let problem = TargetOutput { target: 9.0 };

        let result = solve_unobserved(&SquareModel, &problem, [5.0, 10.0], &Config::default());

        assert!(matches!(
            result,
            Err(Error::InvalidBracket(BracketError::NoSignChange))
        ));
    }

    #[test]
    fn errors_on_degenerate_bracket() {
        let problem = TargetOutput { target: 25.0 };

        let result = solve_unobserved(&SquareModel, &problem, [5.0, 5.0], &Config::default());
        assert!(matches!(
            result,
            Err(Error::InvalidBracket(BracketError::ZeroWidth))
        ));

        let result = solve_unobserved(&SquareModel, &problem, [f64::NAN, 5.0], &Config::default());
        assert!(matches!(
            result,
            Err(Error::InvalidBracket(BracketError::NonFinite))
        ));
    }

    #[test]
    fn iteration_limit_reports_max_iters() {
        let problem = TargetOutput { target: 9.0 };
        let config = Config::new(3, 0.0, 0.0, 0.0).expect("valid config");

        let solution =
            solve_unobserved(&SquareModel, &problem, [0.0, 10.0], &config).expect("should finish");

        assert_eq!(solution.status, Status::MaxIters);
        assert_eq!(solution.iters, 3);
        // Midpoints 5.0, 2.5, 3.75: 2.5 has the smallest residual.
        assert_relative_eq!(solution.x, 2.5);
    }

    #[test]
    fn observer_sees_endpoints_then_midpoints() {
        let problem = TargetOutput { target: 9.0 };

        let mut kinds = Vec::new();
        let observer = |event: &Event<'_, SquareModel, TargetOutput>| {
            kinds.push(match event {
                Event::Left { .. } => "left",
                Event::Right { .. } => "right",
                Event::Midpoint { iter, .. } => {
                    if *iter >= 2 {
                        return Some(Action::StopEarly);
                    }
                    "mid"
                }
            });
            None
        };

        let solution = solve(&SquareModel, &problem, [0.0, 10.0], &Config::default(), observer)
            .expect("should stop cleanly");

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.iters, 2);
        assert_eq!(kinds, vec!["left", "right", "mid"]);
    }

    #[derive(Debug, Error)]
    #[error("undefined below {0}")]
    struct Undefined(f64);

    /// Model that fails for inputs below a threshold.
    struct FailsBelow(f64);

    impl Model for FailsBelow {
        type Input = f64;
        type Output = f64;
        type Error = Undefined;

        fn call(&self, input: &f64) -> Result<f64, Self::Error> {
            if *input < self.0 {
                Err(Undefined(self.0))
            } else {
                Ok(*input)
            }
        }
    }

    #[test]
    fn model_failure_propagates() {
        let problem = TargetOutput { target: 1.0 };

        let result = solve_unobserved(&FailsBelow(0.0), &problem, [-1.0, 3.0], &Config::default());

        assert!(matches!(result, Err(Error::Model(_))));
    }

    /// Model that returns NaN at its input's sign change.
    struct NanAtZero;

    impl Model for NanAtZero {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Self::Error> {
            Ok(if *input == 0.0 { f64::NAN } else { *input })
        }
    }

    #[test]
    fn non_finite_residual_is_an_error() {
        let problem = TargetOutput { target: 0.0 };

        let result = solve_unobserved(&NanAtZero, &problem, [-1.0, 1.0], &Config::default());

        assert!(matches!(result, Err(Error::NonFiniteResidual { x, .. }) if x == 0.0));
    }
}
