//! Grand-canonical lattice gas Monte Carlo engine.
//!
//! A two-dimensional periodic lattice of empty/occupied sites is evolved by
//! single-site heat-bath exchange trials at fixed temperature and chemical
//! potential. A presentation layer drives [`SimulationController`] once per
//! frame and reads the lattice, parameters and recorded series back out.

pub mod controller;
pub mod functional;
pub mod lattice;
pub mod observables;
pub mod output;
pub mod runner;
pub mod scan;
pub mod stats;
pub mod thermo_params;
pub mod update;

pub use controller::SimulationController;
pub use lattice::Lattice;
pub use observables::{measure, Totals};
pub use stats::{Series, SeriesSummary, StatisticsRecorder};
pub use thermo_params::ThermoParams;
pub use update::{acceptance_probability, propose, trial, trial_at, SiteProposal, TrialCounters, TrialOutcome};
