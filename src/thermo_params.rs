use lattice_gas_common::{ThermoBounds, ThermoConfig};
use serde::{Deserialize, Serialize};

/// Temperature and chemical potential of the reservoir.
///
/// Both values always lie inside their configured closed ranges; the only
/// mutators are additive adjustments that clamp at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermoParams {
    temperature: f64,
    chemical_potential: f64,
    bounds: ThermoBounds,
}

impl Default for ThermoParams {
    fn default() -> Self {
        Self::new(0.3, -2.5, ThermoBounds::default())
    }
}

impl ThermoParams {
    /// Creates parameters, clamping the initial values into `bounds`.
    pub fn new(temperature: f64, chemical_potential: f64, bounds: ThermoBounds) -> Self {
        Self {
            temperature: bounds.temperature.clamp(temperature),
            chemical_potential: bounds.chemical_potential.clamp(chemical_potential),
            bounds,
        }
    }

    pub fn from_config(config: &ThermoConfig) -> Self {
        Self::new(config.temperature, config.chemical_potential, config.bounds())
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn chemical_potential(&self) -> f64 {
        self.chemical_potential
    }

    pub fn bounds(&self) -> &ThermoBounds {
        &self.bounds
    }

    /// Adds `delta` to the temperature, then clamps. Returns the new value.
    pub fn adjust_temperature(&mut self, delta: f64) -> f64 {
        self.temperature = self.bounds.temperature.clamp(self.temperature + delta);
        self.temperature
    }

    /// Adds `delta` to the chemical potential, then clamps. Returns the new value.
    pub fn adjust_chemical_potential(&mut self, delta: f64) -> f64 {
        self.chemical_potential = self.bounds.chemical_potential.clamp(self.chemical_potential + delta);
        self.chemical_potential
    }

    pub fn raise_temperature(&mut self) -> f64 {
        self.adjust_temperature(self.bounds.step)
    }

    pub fn lower_temperature(&mut self) -> f64 {
        self.adjust_temperature(-self.bounds.step)
    }

    pub fn raise_chemical_potential(&mut self) -> f64 {
        self.adjust_chemical_potential(self.bounds.step)
    }

    pub fn lower_chemical_potential(&mut self) -> f64 {
        self.adjust_chemical_potential(-self.bounds.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_reference_program() {
        let params = ThermoParams::default();
        assert_eq!(params.temperature(), 0.3);
        assert_eq!(params.chemical_potential(), -2.5);
    }

    #[test]
    fn large_deltas_clamp_exactly() {
        let mut params = ThermoParams::default();
        assert_eq!(params.adjust_temperature(-10.0), 0.1);
        assert_eq!(params.adjust_chemical_potential(10.0), -1.0);
        assert_eq!(params.adjust_temperature(10.0), 1.0);
        assert_eq!(params.adjust_chemical_potential(-10.0), -3.0);
    }

    #[test]
    fn fixed_steps_move_by_tenths() {
        let mut params = ThermoParams::default();
        assert_relative_eq!(params.raise_temperature(), 0.4, epsilon = 1e-12);
        assert_relative_eq!(params.lower_temperature(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(params.raise_chemical_potential(), -2.4, epsilon = 1e-12);
        assert_relative_eq!(params.lower_chemical_potential(), -2.5, epsilon = 1e-12);
    }

    #[test]
    fn repeated_lowering_never_reaches_zero_temperature() {
        let mut params = ThermoParams::default();
        for _ in 0..50 {
            params.lower_temperature();
        }
        assert_eq!(params.temperature(), 0.1);
        assert!(params.temperature() > 0.0);
    }

    #[test]
    fn construction_clamps_out_of_range_values() {
        let params = ThermoParams::new(0.0, 0.0, ThermoBounds::default());
        assert_eq!(params.temperature(), 0.1);
        assert_eq!(params.chemical_potential(), -1.0);
    }
}
