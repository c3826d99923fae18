use flowstress_solvers::equation::bisection::Config;
use serde::{Deserialize, Serialize};

use crate::{
    coefficients::CoefficientMatrix,
    error::Error,
    flow_law::{FlowLawModel, FlowLawTable},
    fugacity::{DEFAULT_VOLUME_BRACKET, FugacitySolver},
    piezometer::{PiezometerModel, PiezometerTable},
    pipeline::DeformationPipeline,
};

/// Static reference data and solver settings.
///
/// Sections left out of a TOML document keep their defaults, so a file only
/// needs to list what it changes. A `[piezometers]` or `[flow_laws]` table
/// that is present replaces the literature table entirely.
///
/// ```
/// use flowstress_rheology::RheologyConfig;
///
/// let config = RheologyConfig::from_toml_str(
///     r#"
///     [solver]
///     max_iters = 200
///
///     [piezometers.HK10]
///     constant_b = 2451.0
///     exponent = -1.26
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.solver.max_iters, 200);
/// assert!(config.piezometers.get("ST03").is_err());
/// assert!(config.flow_laws.get("H01").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RheologyConfig {
    pub solver: SolverSettings,
    pub piezometers: PiezometerTable,
    pub flow_laws: FlowLawTable,
}

impl Default for RheologyConfig {
    fn default() -> Self {
        Self {
            solver: SolverSettings::default(),
            piezometers: PiezometerTable::literature(),
            flow_laws: FlowLawTable::literature(),
        }
    }
}

impl RheologyConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed TOML or unknown keys and
    /// [`Error::InvalidConfig`] for values that fail validation.
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every table entry and the solver settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<(), Error> {
        self.solver.solver_config()?;
        self.solver.validate_bracket()?;
        self.piezometers.validate()?;
        self.flow_laws.validate()
    }

    /// Builds a fugacity solver with the configured bracket and tolerances.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the solver settings are invalid.
    pub fn fugacity_solver(&self) -> Result<FugacitySolver, Error> {
        let config = self.solver.solver_config()?;
        self.solver.validate_bracket()?;
        FugacitySolver::new(CoefficientMatrix::default())
            .with_bracket(self.solver.bracket)
            .map(|solver| solver.with_config(config))
            .map_err(|error| Error::invalid_config(error.to_string()))
    }

    #[must_use]
    pub fn piezometer_model(&self) -> PiezometerModel {
        PiezometerModel::new(self.piezometers.clone())
    }

    #[must_use]
    pub fn flow_law_model(&self) -> FlowLawModel {
        FlowLawModel::new(self.flow_laws.clone())
    }

    /// Builds a pipeline from all three configured models.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any setting is invalid.
    pub fn pipeline(&self) -> Result<DeformationPipeline, Error> {
        self.validate()?;
        Ok(DeformationPipeline::new(
            self.fugacity_solver()?,
            self.piezometer_model(),
            self.flow_law_model(),
        ))
    }
}

/// Bisection settings for the molar volume solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverSettings {
    /// Molar volume bracket in cm³/mol.
    pub bracket: [f64; 2],
    pub max_iters: usize,
    pub x_abs_tol: f64,
    pub x_rel_tol: f64,
    /// Residual tolerance in Pa.
    pub residual_tol: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        let config = Config::default();
        Self {
            bracket: DEFAULT_VOLUME_BRACKET,
            max_iters: config.max_iters(),
            x_abs_tol: config.x_abs_tol(),
            x_rel_tol: config.x_rel_tol(),
            residual_tol: config.residual_tol(),
        }
    }
}

impl SolverSettings {
    /// Converts to a bisection [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a tolerance is negative or not
    /// finite, or if `max_iters` is zero.
    pub fn solver_config(&self) -> Result<Config, Error> {
        if self.max_iters == 0 {
            return Err(Error::invalid_config("solver max_iters must be at least 1"));
        }
        Config::new(
            self.max_iters,
            self.x_abs_tol,
            self.x_rel_tol,
            self.residual_tol,
        )
        .map_err(|error| Error::invalid_config(format!("solver settings: {error}")))
    }

    fn validate_bracket(&self) -> Result<(), Error> {
        let [a, b] = self.bracket;
        let valid = |v: f64| v.is_finite() && v > 0.0;
        #[allow(clippy::float_cmp)]
        if !valid(a) || !valid(b) || a == b {
            return Err(Error::invalid_config(format!(
                "solver bracket must be two distinct positive volumes, got [{a}, {b}]"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_literature_tables() {
        let config = RheologyConfig::default();

        assert_eq!(config.piezometers, PiezometerTable::literature());
        assert_eq!(config.flow_laws, FlowLawTable::literature());
        assert_eq!(config.solver.bracket, DEFAULT_VOLUME_BRACKET);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_is_the_default() {
        let config = RheologyConfig::from_toml_str("").unwrap();
        assert_eq!(config, RheologyConfig::default());
    }

    #[test]
    fn parses_all_sections() {
        let config = RheologyConfig::from_toml_str(
            r#"
            [solver]
            bracket = [6.0, 28.0]
            max_iters = 200
            x_abs_tol = 1e-10
            x_rel_tol = 1e-10

            [piezometers.HK10]
            constant_b = 2451.0
            exponent = -1.26

            [flow_laws.H01]
            a = 6.3e-12
            n = 4.0
            q = 1.35e5
            "#,
        )
        .unwrap();

        assert_eq!(config.solver.bracket, [6.0, 28.0]);
        assert_eq!(config.solver.max_iters, 200);
        assert_eq!(config.piezometers.ids().collect::<Vec<_>>(), ["HK10"]);
        assert_eq!(config.flow_laws.ids().collect::<Vec<_>>(), ["H01"]);

        let solver = config.fugacity_solver().unwrap();
        assert_eq!(solver.bracket(), [6.0, 28.0]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RheologyConfig::from_toml_str("[solver]\nmax_iter = 5\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));

        let err = RheologyConfig::from_toml_str("[piezometers.X]\nconstant_b = 1.0\nexponent = -1.0\nm = 2\n")
            .unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for source in [
            "[solver]\nmax_iters = 0\n",
            "[solver]\nx_abs_tol = -1.0\n",
            "[solver]\nbracket = [5.0, 5.0]\n",
            "[piezometers.X]\nconstant_b = -1.0\nexponent = -1.0\n",
            "[flow_laws.X]\na = 1.0\nn = 0.0\nq = 1.0\n",
        ] {
            let err = RheologyConfig::from_toml_str(source).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig { .. }), "{source}: {err:?}");
        }
    }
}
