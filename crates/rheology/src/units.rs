//! Conversions between user-facing units and the internal SI values.
//!
//! Inputs arrive in °C and MPa and are converted here exactly once, through
//! `uom`, so the numerical core only ever sees kelvin and pascals.

use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::{megapascal, pascal},
    thermodynamic_temperature::{degree_celsius, kelvin},
};

/// Builds a temperature from degrees Celsius.
#[must_use]
pub fn celsius(value: f64) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<degree_celsius>(value)
}

/// Builds a pressure from megapascals.
#[must_use]
pub fn megapascals(value: f64) -> Pressure {
    Pressure::new::<megapascal>(value)
}

/// Returns a temperature in kelvin.
#[must_use]
pub fn to_kelvin(temperature: ThermodynamicTemperature) -> f64 {
    temperature.get::<kelvin>()
}

/// Returns a pressure in pascals.
#[must_use]
pub fn to_pascals(pressure: Pressure) -> f64 {
    pressure.get::<pascal>()
}

/// Returns a pressure in megapascals.
#[must_use]
pub fn to_megapascals(pressure: Pressure) -> f64 {
    pressure.get::<megapascal>()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn celsius_to_kelvin() {
        assert_relative_eq!(to_kelvin(celsius(450.0)), 723.15, epsilon = 1e-10);
        assert_relative_eq!(to_kelvin(celsius(-273.15)), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn megapascals_to_pascals() {
        assert_relative_eq!(to_pascals(megapascals(400.0)), 4.0e8);
        assert_relative_eq!(to_megapascals(Pressure::new::<pascal>(2.5e6)), 2.5);
    }
}
