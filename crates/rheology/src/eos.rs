use flowstress_core::Model;

use crate::{
    coefficients::{CoefficientMatrix, Coefficients},
    error::{Error, require_positive},
};

/// Gas constant in Pa·cm³/(mol·K), the unit system of the equation of state.
pub const GAS_CONSTANT: f64 = 8_314_472.0;

/// Evaluates the Pitzer and Sterner (1994) equation of state (their Eq. 2).
///
/// `temperature` is in kelvin and `volume` is the molar volume in cm³/mol.
/// Returns the pressure in pascals.
///
/// # Errors
///
/// Returns [`Error::Domain`] if the temperature or volume is not finite and
/// positive, or if the rational term's denominator vanishes.
pub fn pressure(temperature: f64, volume: f64, c: &Coefficients) -> Result<f64, Error> {
    let t = require_positive("temperature (K)", temperature)?;
    let den = require_positive("molar volume (cm³/mol)", volume)?.recip();

    let num = c[2] + 2.0 * c[3] * den + 3.0 * c[4] * den.powi(2) + 4.0 * c[5] * den.powi(3);
    let denom = c.density_polynomial(den).powi(2);
    if denom == 0.0 {
        return Err(Error::domain(format!(
            "equation of state is singular at molar volume {volume} cm³/mol"
        )));
    }

    let den2 = den * den;
    let reduced = den + c[0] * den2 - den2 * (num / denom)
        + c[6] * den2 * (-c[7] * den).exp()
        + c[8] * den2 * (-c[9] * den).exp();

    Ok(reduced * GAS_CONSTANT * t)
}

/// The equation of state at a fixed temperature, as a [`Model`] from molar
/// volume (cm³/mol) to pressure (Pa).
///
/// The coefficients are computed once, when the model is built, and belong
/// to this model alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquationOfState {
    temperature: f64,
    coefficients: Coefficients,
}

impl EquationOfState {
    /// Builds the equation of state for `temperature` (K).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] if the temperature is not finite and positive.
    pub fn new(matrix: &CoefficientMatrix, temperature: f64) -> Result<Self, Error> {
        Ok(Self {
            temperature,
            coefficients: matrix.at(temperature)?,
        })
    }

    /// Returns the temperature in kelvin.
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns the coefficients at this temperature.
    #[must_use]
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Returns the pressure (Pa) at molar volume `volume` (cm³/mol).
    ///
    /// # Errors
    ///
    /// See [`pressure`].
    pub fn pressure_at(&self, volume: f64) -> Result<f64, Error> {
        pressure(self.temperature, volume, &self.coefficients)
    }
}

impl Model for EquationOfState {
    type Input = f64;
    type Output = f64;
    type Error = Error;

    fn call(&self, volume: &f64) -> Result<f64, Self::Error> {
        self.pressure_at(*volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::PITZER_STERNER_1994;

    fn eos(t: f64) -> EquationOfState {
        EquationOfState::new(&PITZER_STERNER_1994, t).expect("valid temperature")
    }

    #[test]
    fn pressure_at_bracket_endpoints() {
        let eos = eos(723.15);

        assert_relative_eq!(eos.pressure_at(5.0).unwrap(), 8.818_035e10, max_relative = 1e-6);
        assert_relative_eq!(eos.pressure_at(30.0).unwrap(), 9.177_290e7, max_relative = 1e-6);
    }

    #[test]
    fn pressure_decreases_with_volume() {
        let eos = eos(823.15);
        let pressures: Vec<f64> = (0..=250_u32)
            .map(|i| eos.pressure_at(5.0 + 0.1 * f64::from(i)).unwrap())
            .collect();

        assert!(pressures.windows(2).all(|pair| pair[1] < pair[0]));
    }

    #[test]
    fn approaches_ideal_gas_at_large_volume() {
        let t = 1000.0;
        let volume = 1.0e7;
        let ideal = GAS_CONSTANT * t / volume;

        assert_relative_eq!(eos(t).pressure_at(volume).unwrap(), ideal, max_relative = 1e-3);
    }

    #[test]
    fn rejects_non_positive_volume() {
        let eos = eos(723.15);
        assert!(matches!(eos.pressure_at(0.0), Err(Error::Domain { .. })));
        assert!(matches!(eos.pressure_at(-5.0), Err(Error::Domain { .. })));
    }

    #[test]
    fn model_call_matches_free_function() {
        let eos = eos(673.15);
        let direct = pressure(673.15, 20.0, eos.coefficients()).unwrap();
        assert_eq!(eos.call(&20.0).unwrap(), direct);
    }
}
