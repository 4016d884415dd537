//! Single-site grand-canonical exchange trial.
//!
//! A trial proposes flipping one site between empty and occupied and accepts
//! with a probability that satisfies detailed balance with respect to
//! `exp(-(E - mu N) / T)`.

use crate::functional::{grand_hamiltonian, local_energy, local_number};
use crate::lattice::Lattice;
use crate::thermo_params::ThermoParams;
use lattice_gas_common::AcceptanceRule;
use log::trace;
use rand::Rng;

/// Probability of accepting a move from Hamiltonian `h_current` to `h_new` at `temperature`.
///
/// Heat bath: `q / (1 + q)` with `q = exp((h_current - h_new) / T)`.
/// Metropolis: `min(1, q)`.
/// When `q` overflows the result saturates at 1; the result is never NaN.
pub fn acceptance_probability(rule: AcceptanceRule, h_current: f64, h_new: f64, temperature: f64) -> f64 {
    let temperature = temperature.max(f64::MIN_POSITIVE);
    let q = ((h_current - h_new) / temperature).exp();
    if q.is_nan() {
        return 0.0;
    }
    if q.is_infinite() {
        return 1.0;
    }
    match rule {
        AcceptanceRule::HeatBath => q / (1.0 + q),
        AcceptanceRule::Metropolis => q.min(1.0),
    }
}

/// The quantities evaluated when proposing a flip of site `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteProposal {
    pub x: i64,
    pub y: i64,
    pub occupied: u8,
    pub neighbor_sum: u8,
    pub energy_current: f64,
    pub energy_new: f64,
    pub number_current: f64,
    pub number_new: f64,
    pub hamiltonian_current: f64,
    pub hamiltonian_new: f64,
    pub probability: f64,
}

/// Evaluates a flip of `(x, y)` without touching the lattice.
pub fn propose(lattice: &Lattice, params: &ThermoParams, rule: AcceptanceRule, x: i64, y: i64) -> SiteProposal {
    let occupied = lattice.get(x, y);
    let neighbor_sum = lattice.neighbor_sum(x, y);
    let flipped = 1 - occupied;
    let mu = params.chemical_potential();

    let energy_current = local_energy(occupied, neighbor_sum);
    let energy_new = local_energy(flipped, neighbor_sum);
    let number_current = local_number(occupied, neighbor_sum);
    let number_new = local_number(flipped, neighbor_sum);

    let hamiltonian_current = grand_hamiltonian(energy_current, number_current, mu);
    let hamiltonian_new = grand_hamiltonian(energy_new, number_new, mu);

    SiteProposal {
        x,
        y,
        occupied,
        neighbor_sum,
        energy_current,
        energy_new,
        number_current,
        number_new,
        hamiltonian_current,
        hamiltonian_new,
        probability: acceptance_probability(rule, hamiltonian_current, hamiltonian_new, params.temperature()),
    }
}

/// Result of one trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    pub x: i64,
    pub y: i64,
    pub probability: f64,
    pub accepted: bool,
}

/// Runs a trial on `(x, y)` with the uniform draw `u` in `[0, 1)`. Flips the site when `u < p`.
pub fn trial_at(
    lattice: &mut Lattice,
    params: &ThermoParams,
    rule: AcceptanceRule,
    x: i64,
    y: i64,
    u: f64,
) -> TrialOutcome {
    let proposal = propose(lattice, params, rule, x, y);
    let accepted = u < proposal.probability;
    if accepted {
        lattice.flip(x, y);
    }
    trace!("trial ({}, {}) p={:.4} u={:.4} accepted={}", x, y, proposal.probability, u, accepted);
    TrialOutcome {
        x,
        y,
        probability: proposal.probability,
        accepted,
    }
}

/// Runs a trial on a site chosen uniformly over the whole lattice.
pub fn trial<R: Rng>(
    lattice: &mut Lattice,
    params: &ThermoParams,
    rule: AcceptanceRule,
    rng: &mut R,
) -> TrialOutcome {
    let x = rng.random_range(0..lattice.width()) as i64;
    let y = rng.random_range(0..lattice.height()) as i64;
    let u: f64 = rng.random();
    trial_at(lattice, params, rule, x, y, u)
}

/// Running count of attempted and accepted trials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialCounters {
    pub attempts: u64,
    pub accepted: u64,
}

impl TrialCounters {
    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.attempts += 1;
        if outcome.accepted {
            self.accepted += 1;
        }
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempts as f64
        }
    }
}
