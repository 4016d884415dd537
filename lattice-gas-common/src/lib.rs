pub mod bounds;
pub mod command;
pub mod config;
pub mod snapshot;

// Re-export key types for easier use by dependent crates
pub use bounds::{ParameterRange, ThermoBounds};
pub use command::{Command, ScheduledCommand};
pub use config::{AcceptanceRule, DynamicsConfig, LatticeConfig, OutputConfig, RecorderConfig, RunConfig, ScanConfig, SimulationConfig, ThermoConfig};
pub use snapshot::{FrameSample, Snapshot};
