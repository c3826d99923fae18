use thiserror::Error;

/// Errors that can occur when creating a [`Bracket`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BracketError {
    /// One or both endpoints are non-finite.
    #[error("non-finite endpoint(s)")]
    NonFinite,
    /// Endpoints are equal, giving zero width.
    #[error("zero width")]
    ZeroWidth,
    /// Endpoint residuals share a sign, so no root is enclosed.
    #[error("no sign change")]
    NoSignChange,
}

/// The sign of a residual, as seen by the bracket update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Residual is positive (or zero).
    Positive,
    /// Residual is negative.
    Negative,
}

impl Sign {
    /// Returns the sign of a residual value.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

/// Ordered, finite endpoints that have not been evaluated yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Bounds {
    pub(super) left: f64,
    pub(super) right: f64,
}

impl Bounds {
    /// Validates the endpoints and orders them so that `left < right`.
    pub(super) fn new([a, b]: [f64; 2]) -> Result<Self, BracketError> {
        if !a.is_finite() || !b.is_finite() {
            return Err(BracketError::NonFinite);
        }

        #[allow(clippy::float_cmp)]
        if a == b {
            return Err(BracketError::ZeroWidth);
        }

        Ok(if a < b {
            Self { left: a, right: b }
        } else {
            Self { left: b, right: a }
        })
    }
}

/// A search interval whose endpoint residuals have opposite signs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    left: f64,
    right: f64,
    left_sign: Sign,
}

impl Bracket {
    /// Creates a bracket from evaluated bounds.
    pub(super) fn new(
        bounds: Bounds,
        left_sign: Sign,
        right_sign: Sign,
    ) -> Result<Self, BracketError> {
        if left_sign == right_sign {
            return Err(BracketError::NoSignChange);
        }

        Ok(Self {
            left: bounds.left,
            right: bounds.right,
            left_sign,
        })
    }

    /// Returns the current endpoints as `[left, right]`.
    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        [self.left, self.right]
    }

    /// Returns the midpoint of the bracket.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.left + self.right)
    }

    /// Returns the bracket width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Returns true once the width is within `abs_tol + rel_tol·|midpoint|`.
    #[must_use]
    pub fn is_x_converged(&self, abs_tol: f64, rel_tol: f64) -> bool {
        self.width() <= abs_tol + rel_tol * self.midpoint().abs()
    }

    /// Replaces the endpoint whose residual shares `sign` with `x`.
    pub(super) fn shrink(&mut self, x: f64, sign: Sign) {
        if sign == self.left_sign {
            self.left = x;
        } else {
            self.right = x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn bounds_are_ordered() {
        let bounds = Bounds::new([30.0, 5.0]).expect("valid bounds");
        assert_relative_eq!(bounds.left, 5.0);
        assert_relative_eq!(bounds.right, 30.0);
    }

    #[test]
    fn bounds_reject_bad_endpoints() {
        assert_eq!(Bounds::new([f64::NAN, 1.0]), Err(BracketError::NonFinite));
        assert_eq!(
            Bounds::new([0.0, f64::NEG_INFINITY]),
            Err(BracketError::NonFinite)
        );
        assert_eq!(Bounds::new([2.0, 2.0]), Err(BracketError::ZeroWidth));
    }

    #[test]
    fn same_signs_do_not_bracket() {
        let bounds = Bounds::new([0.0, 1.0]).expect("valid bounds");
        assert_eq!(
            Bracket::new(bounds, Sign::Negative, Sign::Negative),
            Err(BracketError::NoSignChange)
        );
    }

    #[test]
    fn shrink_keeps_the_sign_change() {
        // Decreasing residual, like pressure minus target over molar volume.
        let bounds = Bounds::new([5.0, 30.0]).expect("valid bounds");
        let mut bracket =
            Bracket::new(bounds, Sign::Positive, Sign::Negative).expect("valid bracket");

        bracket.shrink(17.5, Sign::Positive);
        assert_eq!(bracket.as_array(), [17.5, 30.0]);

        bracket.shrink(23.75, Sign::Negative);
        assert_eq!(bracket.as_array(), [17.5, 23.75]);
        assert_relative_eq!(bracket.width(), 6.25);
    }

    #[test]
    fn zero_residual_counts_as_positive() {
        assert_eq!(Sign::of(0.0), Sign::Positive);
        assert_eq!(Sign::of(-1e-300), Sign::Negative);
    }
}
