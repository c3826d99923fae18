use std::convert::Infallible;

use flowstress_core::{EquationProblem, Observer};
use flowstress_observers::TraceObserver;
use flowstress_solvers::equation::bisection::{self, BracketError, Config, Status};
use tracing::debug;
use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::megapascal,
};

use crate::{
    coefficients::{CoefficientMatrix, Coefficients},
    eos::{EquationOfState, GAS_CONSTANT},
    error::{Error, require_positive},
    units,
};

/// Molar volume bracket (cm³/mol) searched by default.
///
/// Water at crustal pressures and temperatures has a molar volume inside
/// this range, and the equation of state has a single root there.
pub const DEFAULT_VOLUME_BRACKET: [f64; 2] = [5.0, 30.0];

/// Evaluates water fugacity (Eq. 1 of Pitzer and Sterner, 1994).
///
/// `temperature` in K, `pressure` in Pa and `volume` in cm³/mol, where
/// `volume` should solve the equation of state at that temperature and
/// pressure. Returns the fugacity in MPa.
///
/// # Errors
///
/// Returns [`Error::Domain`] for non-positive inputs or degenerate
/// coefficients.
pub fn fugacity(
    temperature: f64,
    pressure: f64,
    volume: f64,
    c: &Coefficients,
) -> Result<f64, Error> {
    let t = require_positive("temperature (K)", temperature)?;
    let p = require_positive("pressure (Pa)", pressure)?;
    let den = require_positive("molar volume (cm³/mol)", volume)?.recip();

    let poly = c.density_polynomial(den);
    #[allow(clippy::float_cmp)]
    if poly == 0.0 || c[1] == 0.0 || c[7] == 0.0 || c[9] == 0.0 {
        return Err(Error::domain(format!(
            "fugacity is undefined at {t} K for molar volume {volume} cm³/mol"
        )));
    }

    let quotient = c[0] * den + (poly.recip() - c[1].recip())
        - c[6] / c[7] * ((-c[7] * den).exp() - 1.0)
        - c[8] / c[9] * ((-c[9] * den).exp() - 1.0);
    let rt = GAS_CONSTANT * t;
    let ln_f = den.ln() + quotient + p / (den * rt) + rt.ln() - 1.0;

    Ok(ln_f.exp() / 1e6)
}

/// Residual `P(V) − P_target` for the volume solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPressure {
    /// Target pressure in pascals.
    pub pressure: f64,
}

impl EquationProblem<1> for TargetPressure {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<f64, Self::Error> {
        Ok(x[0])
    }

    fn residuals(&self, _volume: &f64, pressure: &f64) -> Result<[f64; 1], Self::Error> {
        Ok([pressure - self.pressure])
    }
}

/// A solved molar volume and the fugacity evaluated there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FugacitySolution {
    /// Molar volume in cm³/mol.
    pub volume: f64,
    /// Water fugacity.
    pub fugacity: Pressure,
    /// Bisection iterations used.
    pub iters: usize,
    /// Equation-of-state evaluations, endpoints included.
    pub evaluations: usize,
}

impl FugacitySolution {
    /// Returns the fugacity in MPa.
    #[must_use]
    pub fn fugacity_mpa(&self) -> f64 {
        units::to_megapascals(self.fugacity)
    }
}

/// Solves the equation of state for molar volume and evaluates fugacity.
///
/// Every solve builds its own coefficients for the requested temperature,
/// so results never depend on earlier calls.
#[derive(Debug, Clone, PartialEq)]
pub struct FugacitySolver {
    matrix: CoefficientMatrix,
    bracket: [f64; 2],
    config: Config,
}

impl Default for FugacitySolver {
    fn default() -> Self {
        Self::new(CoefficientMatrix::default())
    }
}

impl FugacitySolver {
    /// Creates a solver over [`DEFAULT_VOLUME_BRACKET`] with default tolerances.
    #[must_use]
    pub fn new(matrix: CoefficientMatrix) -> Self {
        Self {
            matrix,
            bracket: DEFAULT_VOLUME_BRACKET,
            config: Config::default(),
        }
    }

    /// Replaces the molar volume bracket (cm³/mol).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] unless both endpoints are finite, positive,
    /// and distinct.
    pub fn with_bracket(mut self, bracket: [f64; 2]) -> Result<Self, Error> {
        let [a, b] = bracket;
        require_positive("bracket endpoint (cm³/mol)", a)?;
        require_positive("bracket endpoint (cm³/mol)", b)?;
        #[allow(clippy::float_cmp)]
        if a == b {
            return Err(Error::domain("volume bracket has zero width"));
        }
        self.bracket = if a < b { [a, b] } else { [b, a] };
        Ok(self)
    }

    /// Replaces the bisection tolerances and iteration limit.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Returns the molar volume bracket (cm³/mol), ordered low to high.
    #[must_use]
    pub fn bracket(&self) -> [f64; 2] {
        self.bracket
    }

    /// Returns the coefficient matrix.
    #[must_use]
    pub fn matrix(&self) -> &CoefficientMatrix {
        &self.matrix
    }

    /// Solves for the molar volume at the given conditions and evaluates the
    /// fugacity there.
    ///
    /// # Errors
    ///
    /// - [`Error::Domain`] for a non-positive temperature or pressure.
    /// - [`Error::RootNotFound`] if the target pressure lies outside the
    ///   pressures at the bracket endpoints.
    /// - [`Error::Convergence`] if the iteration limit is reached.
    pub fn solve(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<FugacitySolution, Error> {
        self.solve_si(units::to_kelvin(temperature), units::to_pascals(pressure))
    }

    /// Like [`solve`](Self::solve), with temperature in K and pressure in Pa.
    ///
    /// # Errors
    ///
    /// See [`solve`](Self::solve).
    pub fn solve_si(&self, temperature: f64, pressure: f64) -> Result<FugacitySolution, Error> {
        let p = require_positive("pressure (Pa)", pressure)?;
        let eos = EquationOfState::new(&self.matrix, temperature)?;
        let problem = TargetPressure { pressure: p };

        let mut trace = TraceObserver::new("molar_volume");
        let observer = |event: &bisection::Event<'_, EquationOfState, TargetPressure>| {
            Observer::<_, bisection::Action>::observe(&mut trace, event)
        };
        let solution = bisection::solve(&eos, &problem, self.bracket, &self.config, observer)
            .map_err(|error| self.lift_solver_error(error, &eos, p))?;
        let evaluations = trace.evaluations();

        if solution.status != Status::Converged {
            return Err(Error::Convergence {
                temperature,
                pressure: p,
                iters: solution.iters,
            });
        }

        let volume = solution.x;
        let fugacity_mpa = fugacity(temperature, p, volume, eos.coefficients())?;
        debug!(
            temperature,
            pressure = p,
            volume,
            fugacity_mpa,
            iters = solution.iters,
            evaluations,
            "solved fugacity"
        );

        Ok(FugacitySolution {
            volume,
            fugacity: Pressure::new::<megapascal>(fugacity_mpa),
            iters: solution.iters,
            evaluations,
        })
    }

    /// Returns the fugacity in MPa for a temperature in K and pressure in Pa.
    ///
    /// # Errors
    ///
    /// See [`solve`](Self::solve).
    pub fn fugacity(&self, temperature: f64, pressure: f64) -> Result<f64, Error> {
        self.solve_si(temperature, pressure)
            .map(|solution| solution.fugacity_mpa())
    }

    /// Evaluates fugacity over the grid of every temperature and pressure.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; no partial grid is produced.
    pub fn grid(
        &self,
        temperatures: &[ThermodynamicTemperature],
        pressures: &[Pressure],
    ) -> Result<FugacityGrid, Error> {
        let temperatures: Vec<f64> = temperatures.iter().copied().map(units::to_kelvin).collect();
        let pressures: Vec<f64> = pressures.iter().copied().map(units::to_pascals).collect();

        let mut values = Vec::with_capacity(temperatures.len() * pressures.len());
        for &p in &pressures {
            for &t in &temperatures {
                values.push(self.fugacity(t, p)?);
            }
        }

        Ok(FugacityGrid {
            temperatures,
            pressures,
            values,
        })
    }

    /// Maps solver failures back to domain errors where possible.
    fn lift_solver_error(&self, error: bisection::Error, eos: &EquationOfState, p: f64) -> Error {
        match error {
            bisection::Error::InvalidBracket(BracketError::NoSignChange) => {
                let [low, high] = self.bracket;
                Error::RootNotFound {
                    temperature: eos.temperature(),
                    pressure: p,
                    bracket: self.bracket,
                    endpoint_pressures: [
                        eos.pressure_at(low).unwrap_or(f64::NAN),
                        eos.pressure_at(high).unwrap_or(f64::NAN),
                    ],
                }
            }
            bisection::Error::NonFiniteResidual { x, residual } => Error::domain(format!(
                "equation of state gives a non-finite pressure ({residual} Pa residual) \
                 at {x} cm³/mol and {} K",
                eos.temperature()
            )),
            bisection::Error::Model(source) => match source.downcast::<Error>() {
                Ok(error) => *error,
                Err(source) => Error::Solver(bisection::Error::Model(source)),
            },
            other => Error::Solver(other),
        }
    }
}

/// Fugacity (MPa) over a temperature × pressure grid.
///
/// Values are stored row by row: row `j` holds pressure `j` at every
/// temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct FugacityGrid {
    temperatures: Vec<f64>,
    pressures: Vec<f64>,
    values: Vec<f64>,
}

impl FugacityGrid {
    /// Grid temperatures in K.
    #[must_use]
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    /// Grid pressures in Pa.
    #[must_use]
    pub fn pressures(&self) -> &[f64] {
        &self.pressures
    }

    /// Returns the fugacity at `(pressure_idx, temperature_idx)`.
    #[must_use]
    pub fn get(&self, pressure_idx: usize, temperature_idx: usize) -> Option<f64> {
        if temperature_idx >= self.temperatures.len() {
            return None;
        }
        self.values
            .get(pressure_idx * self.temperatures.len() + temperature_idx)
            .copied()
    }

    /// Returns the fugacities at one pressure across all temperatures.
    #[must_use]
    pub fn row(&self, pressure_idx: usize) -> Option<&[f64]> {
        let width = self.temperatures.len();
        let start = pressure_idx.checked_mul(width)?;
        self.values.get(start..start + width)
    }

    /// Returns every value in row order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
