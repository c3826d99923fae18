use flowstress_core::{EquationProblem, Model, Observer};

use crate::equation::{Evaluation, EvaluateResult, evaluate};

use super::{Action, Bracket, Error, Event, decision::Decision};

type EvalOutcome<I, O> = (Option<Evaluation<I, O, 1>>, Decision);

/// Evaluates points and routes each result through the observer.
pub(super) struct EvalContext<'ctx, M, P, Obs> {
    model: &'ctx M,
    problem: &'ctx P,
    observer: &'ctx mut Obs,
}

impl<'ctx, M, P, Obs> EvalContext<'ctx, M, P, Obs>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
    Obs: for<'evt> Observer<Event<'evt, M, P>, Action>,
{
    pub(super) fn new(model: &'ctx M, problem: &'ctx P, observer: &'ctx mut Obs) -> Self {
        Self {
            model,
            problem,
            observer,
        }
    }

    pub(super) fn left_endpoint(&mut self, x: f64) -> EvalOutcome<M::Input, M::Output> {
        let result = evaluate(self.model, self.problem, [x]);
        let action = self.observer.observe(&Event::Left { x, result: &result });
        Self::decide(x, result, action)
    }

    pub(super) fn right_endpoint(&mut self, x: f64) -> EvalOutcome<M::Input, M::Output> {
        let result = evaluate(self.model, self.problem, [x]);
        let action = self.observer.observe(&Event::Right { x, result: &result });
        Self::decide(x, result, action)
    }

    pub(super) fn midpoint(
        &mut self,
        iter: usize,
        bracket: &Bracket,
    ) -> EvalOutcome<M::Input, M::Output> {
        let x = bracket.midpoint();
        let result = evaluate(self.model, self.problem, [x]);
        let action = self.observer.observe(&Event::Midpoint {
            iter,
            x,
            bracket,
            result: &result,
        });
        Self::decide(x, result, action)
    }

    /// Splits an evaluation into the part kept for the best solution and the
    /// control flow decision.
    ///
    /// Non-finite residuals are treated as failures and never become best.
    fn decide(
        x: f64,
        result: EvaluateResult<M, P, 1>,
        action: Option<Action>,
    ) -> EvalOutcome<M::Input, M::Output> {
        let (residual, eval) = match result {
            Ok(eval) if eval.residual().is_finite() => (Ok(eval.residual()), Some(eval)),
            Ok(eval) => (
                Err(Error::NonFiniteResidual {
                    x,
                    residual: eval.residual(),
                }),
                None,
            ),
            Err(error) => (Err(Error::from(error)), None),
        };
        (eval, Decision::new(action, residual))
    }
}
