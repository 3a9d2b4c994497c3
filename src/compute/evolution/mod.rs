//! Evolutionary breeding of fractal genomes.
//!
//! The pieces compose the way the generation scheduler uses them:
//!
//! - **Fitness** (`fitness`): deterministic scoring from rating and
//!   structure
//! - **Crossover / Mutation** (`crossover`, `mutation`): operators over
//!   transform lists
//! - **Library** (`library`): hand-tuned seed forms and random genome
//!   construction
//! - **Engine** (`engine`): selection and the per-generation schedule
//! - **Ids** (`ids`): injected genome id issuance
//!
//! # Example
//!
//! ```rust
//! use chaos_garden::compute::evolution::EvolutionEngine;
//! use chaos_garden::compute::rng::EntropyRng;
//! use chaos_garden::schema::EvolutionConfig;
//!
//! let engine = EvolutionEngine::new(EvolutionConfig::default()).unwrap();
//! let population = engine.initial_population(42);
//!
//! let mut rng = EntropyRng::new();
//! let next = engine.evolve_generation(&population, &mut rng).unwrap();
//! assert_eq!(next.len(), population.len());
//! ```

mod crossover;
mod engine;
mod fitness;
mod ids;
mod library;
mod mutation;

pub use crossover::crossover;
pub use engine::{EvolutionEngine, EvolveError};
pub use fitness::{mean_spectral_radius, score};
pub use ids::IdGen;
pub use library::{
    SeedForm, finalize_transforms, initial_population, random_transform, random_transforms,
};
pub use mutation::{mutate, structural};
