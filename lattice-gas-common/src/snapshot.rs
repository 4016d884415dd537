use serde::{Deserialize, Serialize};

/// Macroscopic state of the lattice gas measured once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)] // Derive traits for easy saving/loading
pub struct FrameSample {
    /// Frame index, starting at 0 after construction or reset.
    pub frame: u64,
    /// Total energy, `-(number of occupied nearest-neighbour bonds)`.
    pub energy: f64,
    /// Total number of occupied sites.
    pub number: f64,
    /// Grand-canonical Hamiltonian `energy - mu * number`.
    pub hamiltonian: f64,
    /// Per-site values of the three totals above.
    pub number_per_site: f64,
    pub energy_per_site: f64,
    pub hamiltonian_per_site: f64,
    pub temperature: f64,
    pub chemical_potential: f64,
    /// Whether the controller was paused when the sample was taken.
    pub paused: bool,
}

/// A frame sample, optionally with the full occupancy grid (row-major, 0/1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub sample: FrameSample,
    pub width: usize,
    pub height: usize,
    #[serde(skip_serializing_if = "Option::is_none")] // Don't write "cells": null
    pub cells: Option<Vec<u8>>,
}
