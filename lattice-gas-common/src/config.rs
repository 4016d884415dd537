use serde::{Deserialize, Serialize};
use anyhow::Result;
use log::warn;
use crate::bounds::{ParameterRange, ThermoBounds, DEFAULT_ADJUST_STEP, DEFAULT_CHEMICAL_POTENTIAL_RANGE, DEFAULT_TEMPERATURE_RANGE};
use crate::command::ScheduledCommand;
use std::path::Path;

// Configuration for the lattice geometry
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LatticeConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self { width: default_width(), height: default_height() }
    }
}

/// Acceptance rule used by the single-site exchange trial.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceRule {
    /// Glauber rule `q / (1 + q)`.
    #[default]
    HeatBath,
    /// `min(1, q)`. Same stationary distribution, different dynamics.
    Metropolis,
}

// Configuration for the stochastic dynamics
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DynamicsConfig {
    /// Exchange trials performed by one unpaused tick.
    #[serde(default = "default_trials_per_tick")]
    pub trials_per_tick: u32,
    /// RNG seed. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub acceptance: AcceptanceRule,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            trials_per_tick: default_trials_per_tick(),
            seed: None,
            acceptance: AcceptanceRule::HeatBath,
        }
    }
}

// Initial thermodynamic state and the ranges it may be adjusted within
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ThermoConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_chemical_potential")]
    pub chemical_potential: f64,
    #[serde(default = "default_temperature_range")]
    pub temperature_range: [f64; 2],
    #[serde(default = "default_chemical_potential_range")]
    pub chemical_potential_range: [f64; 2],
    #[serde(default = "default_adjust_step")]
    pub adjust_step: f64,
}

impl Default for ThermoConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            chemical_potential: default_chemical_potential(),
            temperature_range: default_temperature_range(),
            chemical_potential_range: default_chemical_potential_range(),
            adjust_step: default_adjust_step(),
        }
    }
}

impl ThermoConfig {
    pub fn bounds(&self) -> ThermoBounds {
        ThermoBounds {
            temperature: ParameterRange::new(self.temperature_range[0], self.temperature_range[1]),
            chemical_potential: ParameterRange::new(
                self.chemical_potential_range[0],
                self.chemical_potential_range[1],
            ),
            step: self.adjust_step,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct RecorderConfig {
    /// Maximum samples kept per series. `None` keeps every sample.
    #[serde(default)]
    pub capacity: Option<usize>,
}

// Settings for the headless frame loop
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RunConfig {
    #[serde(default = "default_frames")]
    pub frames: u64,
    /// The controller always starts paused; the runner unpauses it unless this is set.
    #[serde(default)]
    pub start_paused: bool,
    #[serde(default = "default_log_interval_frames")]
    pub log_interval_frames: u64,
    #[serde(default)]
    pub schedule: Vec<ScheduledCommand>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            start_paused: false,
            log_interval_frames: default_log_interval_frames(),
            schedule: Vec::new(),
        }
    }
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    #[serde(default = "default_true")]
    pub save_series: bool,
    #[serde(default)]
    pub save_snapshots: bool,
    #[serde(default)]
    pub save_final_lattice: bool,
    /// Embed the occupancy grid in every snapshot (large).
    #[serde(default)]
    pub snapshot_lattice: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_filename: default_base_filename(),
            save_series: true,
            save_snapshots: false,
            save_final_lattice: false,
            snapshot_lattice: false,
            format: None,
        }
    }
}

/// Grid of (temperature, chemical potential) points simulated independently.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ScanConfig {
    pub temperatures: Vec<f64>,
    pub chemical_potentials: Vec<f64>,
    #[serde(default = "default_equilibration_frames")]
    pub equilibration_frames: u64,
    #[serde(default = "default_sample_frames")]
    pub sample_frames: u64,
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub lattice: LatticeConfig,
    #[serde(default)]
    pub dynamics: DynamicsConfig,
    #[serde(default)]
    pub thermo: ThermoConfig,
    #[serde(default)]
    pub recorder: RecorderConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub scan: Option<ScanConfig>,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let mut config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants the engine relies on and clamps the initial parameters into range.
    pub fn validate(&mut self) -> Result<()> {
        if self.lattice.width == 0 || self.lattice.height == 0 {
            anyhow::bail!("lattice width and height must be positive.");
        }
        if self.dynamics.trials_per_tick == 0 {
            anyhow::bail!("trials_per_tick must be greater than 0.");
        }
        let bounds = self.thermo.bounds();
        if !(bounds.temperature.min <= bounds.temperature.max) {
            anyhow::bail!("temperature_range must satisfy min <= max.");
        }
        if !(bounds.chemical_potential.min <= bounds.chemical_potential.max) {
            anyhow::bail!("chemical_potential_range must satisfy min <= max.");
        }
        // Temperature is a denominator in the acceptance probability.
        if !(bounds.temperature.min > 0.0) {
            anyhow::bail!("temperature_range minimum must be strictly positive.");
        }
        if !(bounds.step > 0.0) {
            anyhow::bail!("adjust_step must be positive.");
        }
        if self.recorder.capacity == Some(0) {
            anyhow::bail!("recorder capacity must be greater than 0 when set.");
        }

        let temperature = bounds.temperature.clamp(self.thermo.temperature);
        if temperature != self.thermo.temperature {
            warn!("Initial temperature {} outside {:?}; clamped to {}.", self.thermo.temperature, bounds.temperature, temperature);
            self.thermo.temperature = temperature;
        }
        let chemical_potential = bounds.chemical_potential.clamp(self.thermo.chemical_potential);
        if chemical_potential != self.thermo.chemical_potential {
            warn!("Initial chemical potential {} outside {:?}; clamped to {}.", self.thermo.chemical_potential, bounds.chemical_potential, chemical_potential);
            self.thermo.chemical_potential = chemical_potential;
        }

        if let Some(scan) = &self.scan {
            if scan.temperatures.is_empty() || scan.chemical_potentials.is_empty() {
                anyhow::bail!("scan needs at least one temperature and one chemical potential.");
            }
            if scan.sample_frames == 0 {
                anyhow::bail!("scan sample_frames must be greater than 0.");
            }
        }

        Ok(())
    }
}

fn default_width() -> usize {
    160
}

fn default_height() -> usize {
    100
}

fn default_trials_per_tick() -> u32 {
    100
}

fn default_temperature() -> f64 {
    0.3
}

fn default_chemical_potential() -> f64 {
    -2.5
}

fn default_temperature_range() -> [f64; 2] {
    [DEFAULT_TEMPERATURE_RANGE.min, DEFAULT_TEMPERATURE_RANGE.max]
}

fn default_chemical_potential_range() -> [f64; 2] {
    [DEFAULT_CHEMICAL_POTENTIAL_RANGE.min, DEFAULT_CHEMICAL_POTENTIAL_RANGE.max]
}

fn default_adjust_step() -> f64 {
    DEFAULT_ADJUST_STEP
}

fn default_frames() -> u64 {
    2000
}

fn default_log_interval_frames() -> u64 {
    100
}

fn default_base_filename() -> String {
    "lattice_gas".to_string()
}

fn default_true() -> bool {
    true
}

fn default_equilibration_frames() -> u64 {
    500
}

fn default_sample_frames() -> u64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    #[test]
    fn empty_document_matches_reference_defaults() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config.lattice.width, 160);
        assert_eq!(config.lattice.height, 100);
        assert_eq!(config.dynamics.trials_per_tick, 100);
        assert_eq!(config.dynamics.acceptance, AcceptanceRule::HeatBath);
        assert_eq!(config.thermo.temperature, 0.3);
        assert_eq!(config.thermo.chemical_potential, -2.5);
        assert_eq!(config.thermo.bounds(), ThermoBounds::default());
        assert!(config.recorder.capacity.is_none());
        assert!(config.scan.is_none());
    }

    #[test]
    fn parses_schedule_and_overrides() {
        let doc = r#"
            [lattice]
            width = 32
            height = 16

            [dynamics]
            seed = 7
            acceptance = "metropolis"

            [run]
            frames = 10
            schedule = [
                { frame = 2, command = { action = "toggle_pause" } },
                { frame = 5, command = { action = "adjust_temperature", delta = -0.2 } },
            ]
        "#;
        let config = SimulationConfig::from_toml_str(doc).unwrap();
        assert_eq!(config.lattice.width, 32);
        assert_eq!(config.dynamics.seed, Some(7));
        assert_eq!(config.dynamics.acceptance, AcceptanceRule::Metropolis);
        assert_eq!(config.run.schedule.len(), 2);
        assert_eq!(config.run.schedule[0].command, Command::TogglePause);
        assert_eq!(config.run.schedule[1].command, Command::AdjustTemperature(-0.2));
    }

    #[test]
    fn rejects_invalid_geometry_and_ranges() {
        assert!(SimulationConfig::from_toml_str("[lattice]\nwidth = 0").is_err());
        assert!(SimulationConfig::from_toml_str("[dynamics]\ntrials_per_tick = 0").is_err());
        assert!(SimulationConfig::from_toml_str("[thermo]\ntemperature_range = [0.0, 1.0]").is_err());
        assert!(SimulationConfig::from_toml_str("[thermo]\nchemical_potential_range = [-1.0, -3.0]").is_err());
        assert!(SimulationConfig::from_toml_str("[recorder]\ncapacity = 0").is_err());
    }

    #[test]
    fn initial_values_are_clamped() {
        let config = SimulationConfig::from_toml_str("[thermo]\ntemperature = 5.0\nchemical_potential = -9.0").unwrap();
        assert_eq!(config.thermo.temperature, 1.0);
        assert_eq!(config.thermo.chemical_potential, -3.0);
    }
}
