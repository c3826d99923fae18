use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, require_positive};

/// Constants of a recrystallized grain-size piezometer, `d = B·σ^m`.
///
/// Grain size is in µm and stress in MPa, matching the calibrations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PiezometerSpec {
    /// Constant `B`.
    pub constant_b: f64,
    /// Exponent `m`; negative for every published calibration.
    pub exponent: f64,
}

impl PiezometerSpec {
    /// Creates a validated piezometer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] unless `constant_b` is finite and
    /// positive and `exponent` is finite and non-zero.
    pub fn new(constant_b: f64, exponent: f64) -> Result<Self, Error> {
        let spec = Self {
            constant_b,
            exponent,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !(self.constant_b.is_finite() && self.constant_b > 0.0) {
            return Err(Error::invalid_config(format!(
                "piezometer constant must be finite and positive, got {}",
                self.constant_b
            )));
        }
        if !self.exponent.is_finite() || self.exponent == 0.0 {
            return Err(Error::invalid_config(format!(
                "piezometer exponent must be finite and non-zero, got {}",
                self.exponent
            )));
        }
        Ok(())
    }

    /// Inverts the piezometer: `σ = exp((ln d − ln B) / m)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] if the grain size is not finite and positive.
    pub fn stress(&self, grain_size: f64) -> Result<f64, Error> {
        let d = require_positive("grain size (µm)", grain_size)?;
        Ok(((d.ln() - self.constant_b.ln()) / self.exponent).exp())
    }
}

/// Piezometer calibrations keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PiezometerTable(BTreeMap<String, PiezometerSpec>);

impl PiezometerTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Published quartz piezometers.
    ///
    /// - `ST03`: Stipp and Tullis (2003)
    /// - `HK10`: Holyoke and Kronenberg (2010)
    /// - `K83`: Koch (1983), as given by Gleason and Tullis (1993)
    /// - `T77`: Twiss (1977)
    #[must_use]
    pub fn literature() -> Self {
        [
            ("ST03", 3631.0, -1.26),
            ("HK10", 2451.0, -1.26),
            ("K83", 339.0, -0.58),
            ("T77", 1.45e4, -1.47),
        ]
        .into_iter()
        .map(|(id, constant_b, exponent)| {
            (
                id.to_owned(),
                PiezometerSpec {
                    constant_b,
                    exponent,
                },
            )
        })
        .collect()
    }

    /// Adds or replaces a calibration, returning the previous one.
    pub fn insert(&mut self, id: impl Into<String>, spec: PiezometerSpec) -> Option<PiezometerSpec> {
        self.0.insert(id.into(), spec)
    }

    /// Looks up a calibration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPiezometer`] if `id` is not in the table.
    pub fn get(&self, id: &str) -> Result<&PiezometerSpec, Error> {
        self.0
            .get(id)
            .ok_or_else(|| Error::UnknownPiezometer(id.to_owned()))
    }

    /// Iterates over ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        self.0.values().try_for_each(PiezometerSpec::validate)
    }
}

impl FromIterator<(String, PiezometerSpec)> for PiezometerTable {
    fn from_iter<T: IntoIterator<Item = (String, PiezometerSpec)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Converts grain size to differential stress with an injected table.
#[derive(Debug, Clone, PartialEq)]
pub struct PiezometerModel {
    table: PiezometerTable,
}

impl Default for PiezometerModel {
    fn default() -> Self {
        Self::new(PiezometerTable::literature())
    }
}

impl PiezometerModel {
    #[must_use]
    pub fn new(table: PiezometerTable) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &PiezometerTable {
        &self.table
    }

    /// Returns the differential stress (MPa) for a grain size (µm).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPiezometer`] or [`Error::Domain`].
    pub fn stress(&self, grain_size: f64, piezometer: &str) -> Result<f64, Error> {
        self.table.get(piezometer)?.stress(grain_size)
    }

    /// Returns one stress per grain size, in input order.
    ///
    /// # Errors
    ///
    /// Returns the first error; see [`stress`](Self::stress).
    pub fn stresses(&self, grain_sizes: &[f64], piezometer: &str) -> Result<Vec<f64>, Error> {
        let spec = self.table.get(piezometer)?;
        grain_sizes.iter().map(|&d| spec.stress(d)).collect()
    }
}
