use crate::functional::{grand_hamiltonian, local_number};
use crate::lattice::Lattice;

/// Aggregate energy and particle number of a whole lattice.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Occupied nearest-neighbour pairs, each counted once.
    pub bonds: u64,
    /// `-bonds`.
    pub energy: f64,
    pub number: f64,
}

impl Totals {
    pub fn hamiltonian(&self, chemical_potential: f64) -> f64 {
        grand_hamiltonian(self.energy, self.number, chemical_potential)
    }
}

/// Sums the observables over every site.
///
/// Bonds are counted only through the up and left neighbours of each
/// occupied site so every attractive pair contributes exactly once.
pub fn measure(lattice: &Lattice) -> Totals {
    let mut bonds = 0u64;
    let mut number = 0.0;
    for (x, y, occupied) in lattice.iter() {
        if occupied == 0 {
            continue;
        }
        let (x, y) = (x as i64, y as i64);
        number += local_number(occupied, 0);
        bonds += u64::from(lattice.get(x, y - 1)) + u64::from(lattice.get(x - 1, y));
    }
    Totals {
        bonds,
        energy: -(bonds as f64),
        number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::local_energy;

    #[test]
    fn empty_lattice_has_zero_totals() {
        let totals = measure(&Lattice::new(6, 4));
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn full_lattice_has_two_bonds_per_site() {
        let mut lattice = Lattice::new(5, 4);
        for y in 0..4 {
            for x in 0..5 {
                lattice.set(x, y, 1);
            }
        }
        let totals = measure(&lattice);
        assert_eq!(totals.number, 20.0);
        assert_eq!(totals.bonds, 40);
        assert_eq!(totals.energy, -40.0);
        assert_eq!(totals.hamiltonian(-2.0), -40.0 + 40.0);
    }

    #[test]
    fn pair_across_seam_is_counted_once() {
        let mut lattice = Lattice::new(4, 4);
        lattice.set(0, 2, 1);
        lattice.set(3, 2, 1);
        let totals = measure(&lattice);
        assert_eq!(totals.bonds, 1);
        assert_eq!(totals.number, 2.0);
    }

    #[test]
    fn bonds_are_half_the_local_energy_sum() {
        let mut lattice = Lattice::new(6, 6);
        for &(x, y) in &[(0, 0), (1, 0), (1, 1), (4, 5), (5, 5), (0, 5), (3, 3)] {
            lattice.set(x, y, 1);
        }
        let local_sum: f64 = lattice
            .iter()
            .map(|(x, y, c)| local_energy(c, lattice.neighbor_sum(x as i64, y as i64)))
            .sum();
        assert_eq!(measure(&lattice).energy * 2.0, local_sum);
    }
}
