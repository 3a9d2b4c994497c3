//! Compute module - Numerical algorithms for IFS genome evolution.

pub mod algebra;
pub mod chaos;
pub mod evolution;
pub mod rng;

pub use algebra::{
    CONTRACTIVITY_THRESHOLD, MAX_CONTRACTIVITY, TransformParams, decompose, determinant,
    enforce_contractivity, is_contractive, reconstruct, spectral_radius,
};
pub use chaos::{AttractorPoint, DEFAULT_SKIP, bounds, fit_unit_cube, sample_attractor};
pub use evolution::{EvolutionEngine, EvolveError, IdGen, SeedForm};
pub use rng::{EntropyRng, Mulberry32, RandomSource};
