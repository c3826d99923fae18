use flowstress_core::Observer;
use tracing::debug;

use crate::traits::HasResidual;

/// Logs every solver evaluation at `debug` level and never intervenes.
///
/// The observer also counts evaluations, including failed ones, so callers
/// can report solver effort after a solve.
#[derive(Debug, Clone, Default)]
pub struct TraceObserver {
    label: &'static str,
    evaluations: usize,
}

impl TraceObserver {
    /// Creates an observer whose events are tagged with `label`.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            evaluations: 0,
        }
    }

    /// Returns the number of evaluations observed so far.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}

impl<E: HasResidual, A> Observer<E, A> for TraceObserver {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.evaluations += 1;
        let residual = event.residual();
        if residual.is_nan() {
            debug!(
                solver = self.label,
                stage = event.stage(),
                x = event.x(),
                "evaluation failed"
            );
        } else {
            debug!(
                solver = self.label,
                stage = event.stage(),
                x = event.x(),
                residual,
                "evaluated"
            );
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;
    use flowstress_core::{EquationProblem, Model};
    use flowstress_solvers::equation::bisection::{self, Config, Status};

    struct Linear;

    impl Model for Linear {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Self::Error> {
            Ok(2.0 * input - 1.0)
        }
    }

    struct Zero;

    impl EquationProblem<1> for Zero {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn input(&self, x: &[f64; 1]) -> Result<f64, Self::Error> {
            Ok(x[0])
        }

        fn residuals(&self, _input: &f64, output: &f64) -> Result<[f64; 1], Self::Error> {
            Ok([*output])
        }
    }

    #[test]
    fn counts_every_evaluation_without_steering() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_test_writer()
                .finish(),
        );

        let mut trace = TraceObserver::new("linear");
        let config = Config::new(8, 0.0, 0.0, 0.0).expect("valid config");

        let observer = |event: &bisection::Event<'_, Linear, Zero>| {
            Observer::<_, bisection::Action>::observe(&mut trace, event)
        };
        let solution =
            bisection::solve(&Linear, &Zero, [0.0, 3.0], &config, observer).expect("solves");

        assert_eq!(solution.status, Status::MaxIters);
        // Two endpoints plus one midpoint per iteration.
        assert_eq!(trace.evaluations(), 2 + 8);
        assert_relative_eq!(solution.x, 0.5, epsilon = 0.02);
    }
}
