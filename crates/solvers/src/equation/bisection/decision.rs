use super::{Action, Error, Sign};

/// Control flow outcome for a single evaluation.
#[derive(Debug)]
pub(super) enum Decision {
    Continue(Sign),
    StopEarly,
    Error(Error),
}

impl Decision {
    /// Combines the observer action with the residual outcome.
    ///
    /// An observer request to stop wins over an evaluation failure.
    pub(super) fn new(action: Option<Action>, residual: Result<f64, Error>) -> Self {
        match (action, residual) {
            (Some(Action::StopEarly), _) => Decision::StopEarly,
            (None, Ok(value)) => Decision::Continue(Sign::of(value)),
            (None, Err(error)) => Decision::Error(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continues_with_residual_sign() {
        assert!(matches!(
            Decision::new(None, Ok(-0.1)),
            Decision::Continue(Sign::Negative)
        ));
    }

    #[test]
    fn stop_early_ignores_failure() {
        let failed = Err(Error::NoSuccessfulEvaluation);
        assert!(matches!(
            Decision::new(Some(Action::StopEarly), failed),
            Decision::StopEarly
        ));
    }

    #[test]
    fn failure_without_action_is_an_error() {
        let failed = Err(Error::NonFiniteResidual {
            x: 1.0,
            residual: f64::NAN,
        });
        assert!(matches!(Decision::new(None, failed), Decision::Error(_)));
    }
}
