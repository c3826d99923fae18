use tracing::{info, info_span, warn};

use crate::{
    error::Error, flow_law::FlowLawModel, fugacity::FugacitySolver, piezometer::PiezometerModel,
    units,
};

/// A temperature (K) and pressure (Pa) at which fugacity is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    pub temperature: f64,
    pub pressure: f64,
}

/// How temperatures and pressures combine into conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionPairing {
    /// The `i`th temperature with the `i`th pressure. Lengths must match.
    Elementwise,
    /// Every temperature with every pressure, temperature-major.
    CrossProduct,
}

impl ConditionPairing {
    /// Pairs temperatures (K) with pressures (Pa).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] for [`Elementwise`](Self::Elementwise)
    /// pairing of slices with different lengths.
    pub fn conditions(
        self,
        temperatures: &[f64],
        pressures: &[f64],
    ) -> Result<Vec<Condition>, Error> {
        let pair = |(temperature, pressure)| Condition {
            temperature,
            pressure,
        };
        match self {
            Self::Elementwise => {
                if temperatures.len() != pressures.len() {
                    return Err(Error::domain(format!(
                        "elementwise pairing needs as many pressures as temperatures, got {} and {}",
                        pressures.len(),
                        temperatures.len()
                    )));
                }
                Ok(temperatures
                    .iter()
                    .copied()
                    .zip(pressures.iter().copied())
                    .map(pair)
                    .collect())
            }
            Self::CrossProduct => Ok(cartesian(temperatures, pressures).map(pair).collect()),
        }
    }
}

/// Iterates over every `(outer, inner)` pair, outer-major.
///
/// Item `i · inner.len() + j` is `(outer[i], inner[j])`.
pub fn cartesian<'a, A: Copy, B: Copy>(
    outer: &'a [A],
    inner: &'a [B],
) -> impl Iterator<Item = (A, B)> + 'a {
    outer
        .iter()
        .flat_map(move |&a| inner.iter().map(move |&b| (a, b)))
}

/// User-facing inputs for a [`DeformationPipeline`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineInputs {
    pub temperatures_c: Vec<f64>,
    pub pressures_mpa: Vec<f64>,
    pub grain_sizes_um: Vec<f64>,
    pub widths_m: Vec<f64>,
    pub piezometer: String,
    pub flow_law: String,
    pub pairing: ConditionPairing,
}

impl PipelineInputs {
    /// Converts to kelvin and pascals and pairs them.
    ///
    /// # Errors
    ///
    /// See [`ConditionPairing::conditions`].
    pub fn conditions(&self) -> Result<Vec<Condition>, Error> {
        let temperatures: Vec<f64> = self
            .temperatures_c
            .iter()
            .map(|&t| units::to_kelvin(units::celsius(t)))
            .collect();
        let pressures: Vec<f64> = self
            .pressures_mpa
            .iter()
            .map(|&p| units::to_pascals(units::megapascals(p)))
            .collect();
        self.pairing.conditions(&temperatures, &pressures)
    }
}

/// Fugacity at one condition, or why it could not be computed.
#[derive(Debug)]
pub struct FugacityOutcome {
    pub condition: Condition,
    pub result: Result<f64, Error>,
}

/// Runs the fugacity, stress, strain-rate, and slip-rate stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeformationPipeline {
    solver: FugacitySolver,
    piezometers: PiezometerModel,
    flow_laws: FlowLawModel,
}

impl DeformationPipeline {
    #[must_use]
    pub fn new(
        solver: FugacitySolver,
        piezometers: PiezometerModel,
        flow_laws: FlowLawModel,
    ) -> Self {
        Self {
            solver,
            piezometers,
            flow_laws,
        }
    }

    #[must_use]
    pub fn solver(&self) -> &FugacitySolver {
        &self.solver
    }

    /// Runs every stage.
    ///
    /// Strain rates are stress-major over the conditions and slip rates are
    /// width-major over the strain rates.
    ///
    /// # Errors
    ///
    /// Returns the first error from any stage. Nothing is returned for a
    /// partially completed run.
    pub fn run(&self, inputs: &PipelineInputs) -> Result<DeformationRun, Error> {
        let span = info_span!(
            "deformation_run",
            piezometer = %inputs.piezometer,
            flow_law = %inputs.flow_law,
            pairing = ?inputs.pairing,
        );
        let _guard = span.enter();

        // Look ids up first so a typo fails before any solve.
        self.piezometers.table().get(&inputs.piezometer)?;
        let flow_law = *self.flow_laws.table().get(&inputs.flow_law)?;

        let conditions = inputs.conditions()?;
        let fugacity = self.fugacities(&conditions)?;
        let differential_stress = self
            .piezometers
            .stresses(&inputs.grain_sizes_um, &inputs.piezometer)?;

        let per_condition: Vec<(f64, f64)> = conditions
            .iter()
            .zip(&fugacity)
            .map(|(c, &f)| (c.temperature, f))
            .collect();
        let strain_rate = cartesian(&differential_stress, &per_condition)
            .map(|(stress, (temperature, f))| flow_law.strain_rate(stress, f, temperature))
            .collect::<Result<Vec<_>, _>>()?;

        let slip_rate = cartesian(&inputs.widths_m, &strain_rate)
            .map(|(width, rate)| self.flow_laws.slip_rate(width, rate))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            conditions = conditions.len(),
            grain_sizes = differential_stress.len(),
            strain_rates = strain_rate.len(),
            slip_rates = slip_rate.len(),
            "deformation run complete"
        );

        Ok(DeformationRun {
            conditions,
            grain_sizes: inputs.grain_sizes_um.clone(),
            widths: inputs.widths_m.clone(),
            fugacity,
            differential_stress,
            strain_rate,
            slip_rate,
        })
    }

    /// Fugacity (MPa) at each condition, in order.
    ///
    /// # Errors
    ///
    /// Returns the first failed solve.
    pub fn fugacities(&self, conditions: &[Condition]) -> Result<Vec<f64>, Error> {
        conditions
            .iter()
            .map(|c| self.solver.fugacity(c.temperature, c.pressure))
            .collect()
    }

    /// Evaluates fugacity at every condition, keeping failures alongside
    /// successes.
    ///
    /// # Errors
    ///
    /// Only fails if the inputs cannot be paired.
    pub fn fugacity_report(&self, inputs: &PipelineInputs) -> Result<Vec<FugacityOutcome>, Error> {
        let outcomes = inputs
            .conditions()?
            .into_iter()
            .map(|condition| {
                let result = self
                    .solver
                    .fugacity(condition.temperature, condition.pressure);
                if let Err(error) = &result {
                    warn!(
                        temperature = condition.temperature,
                        pressure = condition.pressure,
                        %error,
                        "fugacity solve failed"
                    );
                }
                FugacityOutcome { condition, result }
            })
            .collect();
        Ok(outcomes)
    }
}

/// Results of one [`DeformationPipeline::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeformationRun {
    conditions: Vec<Condition>,
    grain_sizes: Vec<f64>,
    widths: Vec<f64>,
    fugacity: Vec<f64>,
    differential_stress: Vec<f64>,
    strain_rate: Vec<f64>,
    slip_rate: Vec<f64>,
}

/// One combination of condition, grain size, and width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformationSample {
    pub condition: Condition,
    /// µm
    pub grain_size: f64,
    /// m
    pub width: f64,
    /// MPa
    pub fugacity: f64,
    /// MPa
    pub differential_stress: f64,
    /// 1/s
    pub strain_rate: f64,
    /// mm/yr
    pub slip_rate: f64,
}

impl DeformationRun {
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Fugacity (MPa), one per condition.
    #[must_use]
    pub fn fugacity(&self) -> &[f64] {
        &self.fugacity
    }

    /// Differential stress (MPa), one per grain size.
    #[must_use]
    pub fn differential_stress(&self) -> &[f64] {
        &self.differential_stress
    }

    /// Strain rate (1/s) at `stress_idx · n_conditions + condition_idx`.
    #[must_use]
    pub fn strain_rate(&self) -> &[f64] {
        &self.strain_rate
    }

    /// Slip rate (mm/yr) at `width_idx · n_strain + strain_idx`.
    #[must_use]
    pub fn slip_rate(&self) -> &[f64] {
        &self.slip_rate
    }

    /// Strain rates grouped by grain size: one chunk of `n_conditions`
    /// values per grain size.
    pub fn strain_rate_by_grain(&self) -> impl Iterator<Item = &[f64]> {
        self.strain_rate.chunks(self.conditions.len().max(1))
    }

    /// Slip rates grouped by width and then grain size, one chunk of
    /// `n_conditions` values each.
    pub fn slip_rate_by_grain(&self) -> impl Iterator<Item = &[f64]> {
        self.slip_rate.chunks(self.conditions.len().max(1))
    }

    /// Every sample, in slip-rate order.
    #[must_use]
    pub fn samples(&self) -> Vec<DeformationSample> {
        let nc = self.conditions.len();
        let n_strain = self.strain_rate.len();
        self.slip_rate
            .iter()
            .enumerate()
            .map(|(idx, &slip_rate)| {
                let (w, k) = (idx / n_strain, idx % n_strain);
                let (s, c) = (k / nc, k % nc);
                DeformationSample {
                    condition: self.conditions[c],
                    grain_size: self.grain_sizes[s],
                    width: self.widths[w],
                    fugacity: self.fugacity[c],
                    differential_stress: self.differential_stress[s],
                    strain_rate: self.strain_rate[k],
                    slip_rate,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cartesian_is_outer_major() {
        let pairs: Vec<_> = cartesian(&[1, 2], &['a', 'b', 'c']).collect();
        assert_eq!(
            pairs,
            [(1, 'a'), (1, 'b'), (1, 'c'), (2, 'a'), (2, 'b'), (2, 'c')]
        );
        assert_eq!(cartesian::<i32, i32>(&[], &[1, 2]).count(), 0);
    }

    #[test]
    fn elementwise_pairs_by_index() {
        let conditions = ConditionPairing::Elementwise
            .conditions(&[700.0, 800.0], &[1e8, 2e8])
            .unwrap();
        assert_eq!(
            conditions,
            [
                Condition {
                    temperature: 700.0,
                    pressure: 1e8
                },
                Condition {
                    temperature: 800.0,
                    pressure: 2e8
                },
            ]
        );
    }

    #[test]
    fn elementwise_rejects_mismatched_lengths() {
        let err = ConditionPairing::Elementwise
            .conditions(&[700.0, 800.0], &[1e8])
            .unwrap_err();
        assert!(matches!(err, Error::Domain { .. }));
    }

    #[test]
    fn cross_product_is_temperature_major() {
        let conditions = ConditionPairing::CrossProduct
            .conditions(&[700.0, 800.0], &[1e8, 2e8, 3e8])
            .unwrap();
        let temperatures: Vec<f64> = conditions.iter().map(|c| c.temperature).collect();
        let pressures: Vec<f64> = conditions.iter().map(|c| c.pressure).collect();

        assert_eq!(temperatures, [700.0, 700.0, 700.0, 800.0, 800.0, 800.0]);
        assert_eq!(pressures, [1e8, 2e8, 3e8, 1e8, 2e8, 3e8]);
    }
}
