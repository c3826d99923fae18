use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, require_non_negative, require_positive};

/// Molar gas constant in J/(mol·K).
pub const MOLAR_GAS_CONSTANT: f64 = 8.314_459_8;

/// Seconds in a 365-day year.
pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;

/// Parameters of a wet quartz dislocation creep law,
/// `ε̇ = A·σⁿ·f_H2O·exp(−Q / RT)`.
///
/// Stress and fugacity are in MPa, `Q` in J/mol, and `ε̇` in 1/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowLawSpec {
    /// Pre-exponential factor `A`.
    pub a: f64,
    /// Stress exponent `n`.
    pub n: f64,
    /// Activation energy `Q`.
    pub q: f64,
}

impl FlowLawSpec {
    /// Creates a validated flow law.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] unless `a` and `n` are finite and
    /// positive and `q` is finite.
    pub fn new(a: f64, n: f64, q: f64) -> Result<Self, Error> {
        let spec = Self { a, n, q };
        spec.validate()?;
        Ok(spec)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !(self.a.is_finite() && self.a > 0.0) {
            return Err(Error::invalid_config(format!(
                "flow law A must be finite and positive, got {}",
                self.a
            )));
        }
        if !(self.n.is_finite() && self.n > 0.0) {
            return Err(Error::invalid_config(format!(
                "flow law n must be finite and positive, got {}",
                self.n
            )));
        }
        if !self.q.is_finite() {
            return Err(Error::invalid_config(format!(
                "flow law Q must be finite, got {}",
                self.q
            )));
        }
        Ok(())
    }

    /// Returns the strain rate (1/s).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] for a negative stress or fugacity or a
    /// non-positive temperature.
    pub fn strain_rate(&self, stress: f64, fugacity: f64, temperature: f64) -> Result<f64, Error> {
        let sigma = require_non_negative("differential stress (MPa)", stress)?;
        let f = require_non_negative("fugacity (MPa)", fugacity)?;
        let t = require_positive("temperature (K)", temperature)?;

        Ok(self.a * sigma.powf(self.n) * f * (-self.q / (MOLAR_GAS_CONSTANT * t)).exp())
    }
}

/// Converts a strain rate across a shear zone of `width` (m) to a slip rate
/// in mm/yr.
///
/// # Errors
///
/// Returns [`Error::Domain`] for a negative or non-finite width.
pub fn slip_rate(width: f64, strain_rate: f64) -> Result<f64, Error> {
    let w = require_non_negative("shear zone width (m)", width)?;
    Ok(w * 1000.0 * SECONDS_PER_YEAR * strain_rate)
}

/// Flow laws keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowLawTable(BTreeMap<String, FlowLawSpec>);

impl FlowLawTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Published wet quartzite flow laws.
    ///
    /// `KT84` Koch et al., `GT95wm` Gleason and Tullis (1995), `J84` Jaoul
    /// et al. (1984), `K89` Koch et al. (1989), `HC82` Hansen and Carter
    /// (1982), `LP92g`/`LP92a` Luan and Paterson (1992), `H01` Hirth et al.
    /// (2001), `RB04` Rutter and Brodie (2004).
    #[must_use]
    pub fn literature() -> Self {
        [
            ("KT84", 2.2e-6, 2.7, 1.2e5),
            ("GT95wm", 1.8e-8, 4.0, 1.37e5),
            ("J84", 2.88e-3, 1.8, 1.51e5),
            ("K89", 1.1e-6, 2.7, 1.34e5),
            ("HC82", 1.99e-2, 1.8, 1.67e5),
            ("LP92g", 6.6e-8, 3.1, 1.35e5),
            ("LP92a", 3.98e-10, 4.0, 1.35e5),
            ("H01", 6.3e-12, 4.0, 1.35e5),
            ("RB04", 1.2e-5, 2.97, 2.42e5),
        ]
        .into_iter()
        .map(|(id, a, n, q)| (id.to_owned(), FlowLawSpec { a, n, q }))
        .collect()
    }

    /// Adds or replaces a flow law, returning the previous one.
    pub fn insert(&mut self, id: impl Into<String>, spec: FlowLawSpec) -> Option<FlowLawSpec> {
        self.0.insert(id.into(), spec)
    }

    /// Looks up a flow law.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFlowLaw`] if `id` is not in the table.
    pub fn get(&self, id: &str) -> Result<&FlowLawSpec, Error> {
        self.0
            .get(id)
            .ok_or_else(|| Error::UnknownFlowLaw(id.to_owned()))
    }

    /// Iterates over ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        self.0.values().try_for_each(FlowLawSpec::validate)
    }
}

impl FromIterator<(String, FlowLawSpec)> for FlowLawTable {
    fn from_iter<T: IntoIterator<Item = (String, FlowLawSpec)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Evaluates strain rates with an injected flow-law table.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLawModel {
    table: FlowLawTable,
}

impl Default for FlowLawModel {
    fn default() -> Self {
        Self::new(FlowLawTable::literature())
    }
}

impl FlowLawModel {
    #[must_use]
    pub fn new(table: FlowLawTable) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &FlowLawTable {
        &self.table
    }

    /// Returns the strain rate (1/s) for stress and fugacity in MPa and
    /// temperature in K.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFlowLaw`] or [`Error::Domain`].
    pub fn strain_rate(
        &self,
        stress: f64,
        fugacity: f64,
        temperature: f64,
        flow_law: &str,
    ) -> Result<f64, Error> {
        self.table
            .get(flow_law)?
            .strain_rate(stress, fugacity, temperature)
    }

    /// Converts a strain rate to a slip rate (mm/yr); see [`slip_rate`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] for a negative or non-finite width.
    pub fn slip_rate(&self, width: f64, strain_rate: f64) -> Result<f64, Error> {
        slip_rate(width, strain_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn h01_reference_value() {
        let model = FlowLawModel::default();
        let rate = model
            .strain_rate(78.759_729_39, 116.716_517, 723.15, "H01")
            .unwrap();

        assert_relative_eq!(rate, 5.018_153e-12, max_relative = 1e-6);
    }

    #[test]
    fn zero_stress_gives_zero_strain_rate() {
        let model = FlowLawModel::default();
        for id in model.table().ids() {
            let rate = model.strain_rate(0.0, 120.0, 723.15, id).unwrap();
            assert_eq!(rate, 0.0, "{id}");
        }
    }

    #[test]
    fn strain_rate_scales_linearly_with_fugacity() {
        let spec = FlowLawSpec::new(1.1e-6, 2.7, 1.34e5).unwrap();
        let single = spec.strain_rate(50.0, 100.0, 700.0).unwrap();
        let double = spec.strain_rate(50.0, 200.0, 700.0).unwrap();

        assert_relative_eq!(double, 2.0 * single, max_relative = 1e-12);
    }

    #[test]
    fn unknown_id_is_reported() {
        let model = FlowLawModel::default();
        let err = model.strain_rate(10.0, 10.0, 700.0, "nope").unwrap_err();
        assert!(matches!(err, Error::UnknownFlowLaw(id) if id == "nope"));
    }

    #[test]
    fn rejects_bad_inputs() {
        let spec = FlowLawTable::literature().get("H01").copied().unwrap();
        assert!(matches!(spec.strain_rate(-1.0, 10.0, 700.0), Err(Error::Domain { .. })));
        assert!(matches!(spec.strain_rate(1.0, 10.0, 0.0), Err(Error::Domain { .. })));
        assert!(FlowLawSpec::new(0.0, 4.0, 1.35e5).is_err());
        assert!(FlowLawSpec::new(1.0, f64::NAN, 1.35e5).is_err());
    }

    #[test]
    fn slip_rate_converts_to_mm_per_year() {
        assert_relative_eq!(slip_rate(1000.0, 5.018_153e-12).unwrap(), 158.252_47, max_relative = 1e-6);
        assert_relative_eq!(slip_rate(1.0, 1.0 / SECONDS_PER_YEAR).unwrap(), 1000.0);
        assert!(slip_rate(-1.0, 1e-12).is_err());
    }
}
