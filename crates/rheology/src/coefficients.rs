use std::ops::Index;

use crate::error::{Error, require_positive};

/// Number of coefficients in the Pitzer and Sterner equation of state.
pub const COEFFICIENT_COUNT: usize = 10;

/// Fixed polynomial constants that generate the equation-of-state
/// coefficients.
///
/// Row `i` produces coefficient `c_i` at temperature `T` as
///
/// ```text
/// c_i = A_i0·T⁻⁴ + A_i1·T⁻² + A_i2·T⁻¹ + A_i3 + A_i4·T + A_i5·T²
/// ```
///
/// Columns 6 through 9 are not part of the polynomial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientMatrix {
    rows: [[f64; COEFFICIENT_COUNT]; COEFFICIENT_COUNT],
}

/// Constants for H2O from Table 1 of Pitzer and Sterner (1994).
pub const PITZER_STERNER_1994: CoefficientMatrix = CoefficientMatrix::new([
    [0.0, 0.0, 0.246_576_88e6, 0.513_599_51e2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.586_389_65, -0.286_469_39e-2, 0.313_755_77e-4, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, -0.627_838_40e1, 0.147_915_99e-1, 0.357_795_79e-3, 0.154_329_25e-7, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, -0.427_198_75, -0.163_251_55e-4, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.566_549_78e4, -0.165_801_67e2, 0.765_607_62e-1, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.109_178_83, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.388_786_56e13, -0.134_948_78e9, 0.309_165_64e6, 0.755_911_05e1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, -0.655_378_98e5, 0.188_106_75e3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [-0.141_824_35e14, 0.181_653_90e9, -0.197_690_68e6, -0.235_303_18e2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.920_933_75e5, 0.122_467_77e3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
]);

impl CoefficientMatrix {
    /// Creates a matrix from literature constants, one row per coefficient.
    #[must_use]
    pub const fn new(rows: [[f64; COEFFICIENT_COUNT]; COEFFICIENT_COUNT]) -> Self {
        Self { rows }
    }

    /// Returns the raw rows of the matrix.
    #[must_use]
    pub fn rows(&self) -> &[[f64; COEFFICIENT_COUNT]; COEFFICIENT_COUNT] {
        &self.rows
    }

    /// Evaluates the coefficients at `temperature` (K).
    ///
    /// Each call returns a fresh vector; nothing is cached between calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] if the temperature is not finite and positive.
    pub fn at(&self, temperature: f64) -> Result<Coefficients, Error> {
        let t = require_positive("temperature (K)", temperature)?;
        let powers = [t.powi(-4), t.powi(-2), t.recip(), 1.0, t, t * t];

        let mut values = [0.0; COEFFICIENT_COUNT];
        for (value, row) in values.iter_mut().zip(&self.rows) {
            *value = row.iter().zip(&powers).map(|(a, p)| a * p).sum();
        }

        Ok(Coefficients(values))
    }

    /// Evaluates the coefficients for each temperature, in input order.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::Domain`] for an invalid temperature.
    pub fn at_each(&self, temperatures: &[f64]) -> Result<Vec<Coefficients>, Error> {
        temperatures.iter().map(|&t| self.at(t)).collect()
    }
}

impl Default for CoefficientMatrix {
    fn default() -> Self {
        PITZER_STERNER_1994
    }
}

/// Equation-of-state coefficients `c0..c9` at one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients([f64; COEFFICIENT_COUNT]);

impl Coefficients {
    /// Returns the coefficients as an array.
    #[must_use]
    pub fn as_array(&self) -> &[f64; COEFFICIENT_COUNT] {
        &self.0
    }

    /// `c1 + c2·ρ + c3·ρ² + c4·ρ³ + c5·ρ⁴`, shared by the pressure and
    /// fugacity expressions.
    pub(crate) fn density_polynomial(&self, den: f64) -> f64 {
        let c = &self.0;
        c[1] + den * (c[2] + den * (c[3] + den * (c[4] + den * c[5])))
    }
}

impl Index<usize> for Coefficients {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}
