use serde::{Deserialize, Serialize};

/// User commands a presentation layer forwards into the engine.
///
/// The raise/lower variants apply the fixed adjustment step; the `Adjust*`
/// variants carry an arbitrary delta. Both are clamped by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "delta", rename_all = "snake_case")]
pub enum Command {
    TogglePause,
    Reset,
    SingleStep,
    RaiseTemperature,
    LowerTemperature,
    RaiseChemicalPotential,
    LowerChemicalPotential,
    AdjustTemperature(f64),
    AdjustChemicalPotential(f64),
}

/// A command replayed by the headless runner at the start of `frame`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    pub frame: u64,
    pub command: Command,
}
