use crate::lattice::Lattice;
use crate::observables::{measure, Totals};
use crate::stats::{Series, StatisticsRecorder};
use crate::thermo_params::ThermoParams;
use crate::update::{trial, TrialCounters, TrialOutcome};
use lattice_gas_common::{AcceptanceRule, Command, FrameSample, SimulationConfig, Snapshot};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Exchange trials per unpaused tick when nothing else is configured.
pub const DEFAULT_TRIALS_PER_TICK: u32 = 100;

/// Owns the lattice, the thermodynamic parameters and the statistics recorder,
/// and exposes the operations a presentation layer drives once per frame.
///
/// Starts paused. Parameters survive `reset`; the lattice and series do not.
pub struct SimulationController {
    lattice: Lattice,
    params: ThermoParams,
    recorder: StatisticsRecorder,
    paused: bool,
    trials_per_tick: u32,
    rule: AcceptanceRule,
    rng: StdRng,
    /// Frames sampled since construction or the last reset.
    frame: u64,
    counters: TrialCounters,
}

impl SimulationController {
    /// Builds a controller from a validated configuration.
    pub fn new(config: &SimulationConfig) -> Self {
        // Seed from config when given so runs are reproducible.
        let rng = match config.dynamics.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let controller = Self {
            lattice: Lattice::new(config.lattice.width, config.lattice.height),
            params: ThermoParams::from_config(&config.thermo),
            recorder: StatisticsRecorder::with_capacity(config.recorder.capacity),
            paused: true,
            trials_per_tick: config.dynamics.trials_per_tick.max(1),
            rule: config.dynamics.acceptance,
            rng,
            frame: 0,
            counters: TrialCounters::default(),
        };
        debug!(
            "Controller created: {}x{} lattice, {} trials/tick, {:?} rule, T={:.2}, mu={:.2}",
            controller.lattice.width(),
            controller.lattice.height(),
            controller.trials_per_tick,
            controller.rule,
            controller.params.temperature(),
            controller.params.chemical_potential()
        );
        controller
    }

    /// Default-sized controller with a fixed seed.
    pub fn with_seed(width: usize, height: usize, seed: u64) -> Self {
        let mut config = SimulationConfig::default();
        config.lattice.width = width;
        config.lattice.height = height;
        config.dynamics.seed = Some(seed);
        Self::new(&config)
    }

    /// Empties the lattice and both series. Parameters and pause state are kept.
    pub fn reset(&mut self) {
        self.lattice = Lattice::new(self.lattice.width(), self.lattice.height());
        self.recorder.clear();
        self.frame = 0;
        self.counters = TrialCounters::default();
        info!("Simulation reset.");
    }

    /// Performs `trials_per_tick` trials unless paused.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        for _ in 0..self.trials_per_tick {
            self.run_trial();
        }
    }

    /// Performs exactly one trial, regardless of the pause state.
    pub fn single_step(&mut self) -> TrialOutcome {
        self.run_trial()
    }

    fn run_trial(&mut self) -> TrialOutcome {
        let outcome = trial(&mut self.lattice, &self.params, self.rule, &mut self.rng);
        self.counters.record(&outcome);
        outcome
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        info!("Simulation {}.", if self.paused { "paused" } else { "running" });
        self.paused
    }

    pub fn adjust_temperature(&mut self, delta: f64) -> f64 {
        let t = self.params.adjust_temperature(delta);
        debug!("Temperature now {:.2}", t);
        t
    }

    pub fn adjust_chemical_potential(&mut self, delta: f64) -> f64 {
        let mu = self.params.adjust_chemical_potential(delta);
        debug!("Chemical potential now {:.2}", mu);
        mu
    }

    /// Dispatches a command forwarded by a presentation layer.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::Reset => self.reset(),
            Command::SingleStep => {
                self.single_step();
            }
            Command::RaiseTemperature => {
                let value = self.params.raise_temperature();
                debug!("Temperature now {:.2}", value);
            }
            Command::LowerTemperature => {
                let value = self.params.lower_temperature();
                debug!("Temperature now {:.2}", value);
            }
            Command::RaiseChemicalPotential => {
                let value = self.params.raise_chemical_potential();
                debug!("Chemical potential now {:.2}", value);
            }
            Command::LowerChemicalPotential => {
                let value = self.params.lower_chemical_potential();
                debug!("Chemical potential now {:.2}", value);
            }
            Command::AdjustTemperature(delta) => {
                self.adjust_temperature(delta);
            }
            Command::AdjustChemicalPotential(delta) => {
                self.adjust_chemical_potential(delta);
            }
        }
    }

    pub fn set_acceptance_rule(&mut self, rule: AcceptanceRule) {
        if rule != self.rule {
            info!("Acceptance rule changed from {:?} to {:?}.", self.rule, rule);
            self.rule = rule;
        }
    }

    /// Current aggregate observables of the lattice.
    pub fn totals(&self) -> Totals {
        measure(&self.lattice)
    }

    /// Measures the lattice and records one sample, whether or not the
    /// controller is paused. Call at most once per frame.
    pub fn sample_frame(&mut self) -> FrameSample {
        let totals = self.totals();
        self.recorder.record(totals.energy, totals.number);
        let sites = self.lattice.num_sites() as f64;
        let mu = self.params.chemical_potential();
        let hamiltonian = totals.hamiltonian(mu);
        let sample = FrameSample {
            frame: self.frame,
            energy: totals.energy,
            number: totals.number,
            hamiltonian,
            number_per_site: totals.number / sites,
            energy_per_site: totals.energy / sites,
            hamiltonian_per_site: hamiltonian / sites,
            temperature: self.params.temperature(),
            chemical_potential: mu,
            paused: self.paused,
        };
        self.frame += 1;
        sample
    }

    /// Wraps `sample` with the lattice dimensions and, optionally, its cells.
    pub fn snapshot(&self, sample: FrameSample, include_cells: bool) -> Snapshot {
        Snapshot {
            sample,
            width: self.lattice.width(),
            height: self.lattice.height(),
            cells: include_cells.then(|| self.lattice.cells().to_vec()),
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Mutable lattice access for seeding initial patterns.
    pub fn lattice_mut(&mut self) -> &mut Lattice {
        &mut self.lattice
    }

    pub fn params(&self) -> &ThermoParams {
        &self.params
    }

    pub fn temperature(&self) -> f64 {
        self.params.temperature()
    }

    pub fn chemical_potential(&self) -> f64 {
        self.params.chemical_potential()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn recorder(&self) -> &StatisticsRecorder {
        &self.recorder
    }

    pub fn energy_series(&self) -> Vec<f64> {
        self.recorder.energy_series()
    }

    pub fn number_series(&self) -> Vec<f64> {
        self.recorder.number_series()
    }

    pub fn series_tail(&self, series: Series, k: usize) -> Vec<f64> {
        self.recorder.series_tail(series, k)
    }

    pub fn trials_per_tick(&self) -> u32 {
        self.trials_per_tick
    }

    pub fn acceptance_rule(&self) -> AcceptanceRule {
        self.rule
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn counters(&self) -> TrialCounters {
        self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::propose;

    fn controller() -> SimulationController {
        SimulationController::with_seed(16, 12, 1234)
    }

    #[test]
    fn starts_paused_with_default_parameters() {
        let c = controller();
        assert!(c.is_paused());
        assert_eq!(c.temperature(), 0.3);
        assert_eq!(c.chemical_potential(), -2.5);
        assert_eq!(c.trials_per_tick(), DEFAULT_TRIALS_PER_TICK);
        assert_eq!(c.lattice().occupied_count(), 0);
        assert!(c.energy_series().is_empty());
    }

    #[test]
    fn paused_tick_does_nothing() {
        let mut c = controller();
        c.tick();
        assert_eq!(c.counters().attempts, 0);
    }

    #[test]
    fn running_tick_performs_batch() {
        let mut c = controller();
        c.toggle_pause();
        c.tick();
        c.tick();
        assert_eq!(c.counters().attempts, 2 * DEFAULT_TRIALS_PER_TICK as u64);
    }

    #[test]
    fn single_step_ignores_pause() {
        let mut c = controller();
        assert!(c.is_paused());
        c.single_step();
        assert_eq!(c.counters().attempts, 1);
    }

    #[test]
    fn sampling_happens_while_paused() {
        let mut c = controller();
        let s0 = c.sample_frame();
        let s1 = c.sample_frame();
        assert_eq!(s0.frame, 0);
        assert_eq!(s1.frame, 1);
        assert!(s1.paused);
        assert_eq!(c.energy_series().len(), 2);
        assert_eq!(c.number_series().len(), 2);
    }

    #[test]
    fn reset_is_idempotent_and_keeps_parameters() {
        let mut c = controller();
        c.adjust_temperature(10.0);
        c.adjust_chemical_potential(10.0);
        c.toggle_pause();
        for _ in 0..50 {
            c.tick();
            c.sample_frame();
        }
        assert!(c.lattice().occupied_count() > 0);

        c.reset();
        let once = (c.lattice().clone(), c.energy_series(), c.number_series());
        c.reset();
        let twice = (c.lattice().clone(), c.energy_series(), c.number_series());
        assert_eq!(once, twice);
        assert!(c.lattice().cells().iter().all(|&v| v == 0));
        assert!(c.energy_series().is_empty());
        assert!(c.number_series().is_empty());
        assert_eq!(c.temperature(), 1.0);
        assert_eq!(c.chemical_potential(), -1.0);
        assert!(!c.is_paused());
    }

    #[test]
    fn commands_clamp_like_direct_calls() {
        let mut c = controller();
        c.apply(Command::AdjustTemperature(-10.0));
        c.apply(Command::AdjustChemicalPotential(10.0));
        assert_eq!(c.temperature(), 0.1);
        assert_eq!(c.chemical_potential(), -1.0);
        c.apply(Command::LowerTemperature);
        c.apply(Command::RaiseChemicalPotential);
        assert_eq!(c.temperature(), 0.1);
        assert_eq!(c.chemical_potential(), -1.0);
        c.apply(Command::TogglePause);
        assert!(!c.is_paused());
        c.apply(Command::SingleStep);
        assert_eq!(c.counters().attempts, 1);
        c.apply(Command::Reset);
        assert_eq!(c.counters().attempts, 0);
    }

    #[test]
    fn switching_to_metropolis_changes_acceptance() {
        let mut c = controller();
        assert_eq!(c.acceptance_rule(), AcceptanceRule::HeatBath);
        c.apply(Command::AdjustTemperature(10.0));
        c.apply(Command::AdjustChemicalPotential(10.0));
        // Isolated particle at T=1, mu=-1: removal lowers H by 1, so q = e.
        c.lattice_mut().set(3, 3, 1);
        let heat_bath = propose(c.lattice(), c.params(), c.acceptance_rule(), 3, 3).probability;
        assert!((heat_bath - 1.0f64.exp() / (1.0 + 1.0f64.exp())).abs() < 1e-12);

        c.set_acceptance_rule(AcceptanceRule::Metropolis);
        assert_eq!(c.acceptance_rule(), AcceptanceRule::Metropolis);
        let metropolis = propose(c.lattice(), c.params(), c.acceptance_rule(), 3, 3).probability;
        assert_eq!(metropolis, 1.0);

        // Inserting next to it costs nothing (-1 bond, +1 particle), so Metropolis always accepts.
        assert_eq!(propose(c.lattice(), c.params(), c.acceptance_rule(), 4, 3).probability, 1.0);
        c.set_acceptance_rule(AcceptanceRule::HeatBath);
        assert_eq!(propose(c.lattice(), c.params(), c.acceptance_rule(), 4, 3).probability, 0.5);
    }

    #[test]
    fn raise_and_lower_commands_use_fixed_step() {
        let mut c = controller();
        c.apply(Command::RaiseTemperature);
        assert!((c.temperature() - 0.4).abs() < 1e-12);
        c.apply(Command::LowerTemperature);
        c.apply(Command::LowerTemperature);
        assert!((c.temperature() - 0.2).abs() < 1e-12);
        c.apply(Command::RaiseChemicalPotential);
        assert!((c.chemical_potential() + 2.4).abs() < 1e-12);
        c.apply(Command::LowerChemicalPotential);
        c.apply(Command::LowerChemicalPotential);
        assert!((c.chemical_potential() + 2.6).abs() < 1e-12);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let mut a = controller();
        let mut b = controller();
        a.toggle_pause();
        b.toggle_pause();
        a.adjust_chemical_potential(1.5);
        b.adjust_chemical_potential(1.5);
        for _ in 0..20 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.lattice(), b.lattice());
    }

    #[test]
    fn snapshot_optionally_carries_cells() {
        let mut c = controller();
        let sample = c.sample_frame();
        assert!(c.snapshot(sample.clone(), false).cells.is_none());
        let snap = c.snapshot(sample, true);
        assert_eq!(snap.cells.map(|cells| cells.len()), Some(16 * 12));
    }
}
