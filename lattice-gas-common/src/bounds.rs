use serde::{Deserialize, Serialize};

/// Closed interval a thermodynamic parameter is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
}

impl ParameterRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamps `value` into `[min, max]`. NaN collapses to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Temperature range used when nothing else is configured. The lower bound keeps `T` strictly positive.
pub const DEFAULT_TEMPERATURE_RANGE: ParameterRange = ParameterRange::new(0.1, 1.0);
/// Chemical potential range used when nothing else is configured.
pub const DEFAULT_CHEMICAL_POTENTIAL_RANGE: ParameterRange = ParameterRange::new(-3.0, -1.0);
/// Fixed magnitude of one raise/lower command.
pub const DEFAULT_ADJUST_STEP: f64 = 0.1;

/// Bounds and step size for the temperature and chemical potential.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermoBounds {
    pub temperature: ParameterRange,
    pub chemical_potential: ParameterRange,
    pub step: f64,
}

impl Default for ThermoBounds {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE_RANGE,
            chemical_potential: DEFAULT_CHEMICAL_POTENTIAL_RANGE,
            step: DEFAULT_ADJUST_STEP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_both_ends() {
        let range = ParameterRange::new(-3.0, -1.0);
        assert_eq!(range.clamp(-10.0), -3.0);
        assert_eq!(range.clamp(10.0), -1.0);
        assert_eq!(range.clamp(-2.0), -2.0);
        assert_eq!(range.clamp(f64::NAN), -3.0);
    }

    #[test]
    fn contains_is_closed() {
        assert!(DEFAULT_TEMPERATURE_RANGE.contains(0.1));
        assert!(DEFAULT_TEMPERATURE_RANGE.contains(1.0));
        assert!(!DEFAULT_TEMPERATURE_RANGE.contains(0.0));
    }
}
