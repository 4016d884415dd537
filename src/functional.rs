//! Local energy and particle-number contributions of a single site.
//!
//! These define the lattice-gas Hamiltonian: occupied neighbours attract, and
//! every occupied site carries one particle.

/// Energy of a site: `-occupied * neighbor_sum`.
#[inline(always)]
pub fn local_energy(occupied: u8, neighbor_sum: u8) -> f64 {
    -(occupied as f64) * neighbor_sum as f64
}

/// Particle number of a site.
#[inline(always)]
pub fn local_number(occupied: u8, _neighbor_sum: u8) -> f64 {
    occupied as f64
}

/// Grand-canonical weight exponent `e - mu * n`.
#[inline(always)]
pub fn grand_hamiltonian(energy: f64, number: f64, chemical_potential: f64) -> f64 {
    energy - chemical_potential * number
}
