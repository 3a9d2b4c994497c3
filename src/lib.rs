//! Chaos Garden - Human-guided evolution of 3D IFS fractal attractors.
//!
//! Each genome encodes an iterated function system: a small set of
//! weighted 3D affine transforms whose repeated random application (the
//! chaos game) converges to a self-similar point-cloud attractor. Users
//! rate genomes; the engine breeds new generations biased toward liked
//! genomes through selection, crossover and mutation, and keeps every
//! bred matrix contractive so attractors never diverge.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: configuration and genome data types (serde-serializable,
//!   this is the export surface collaborators persist and share)
//! - `compute`: numerics (transform algebra, random sources, chaos-game
//!   sampling, and the evolution engine)
//!
//! # Example
//!
//! ```rust
//! use chaos_garden::{
//!     compute::{EvolutionEngine, EntropyRng, sample_attractor, DEFAULT_SKIP},
//!     schema::EvolutionConfig,
//! };
//!
//! // Build a deterministic starting population from a shared seed.
//! let engine = EvolutionEngine::new(EvolutionConfig::default()).unwrap();
//! let population = engine.initial_population(42);
//!
//! // Advance one generation with live (non-deterministic) randomness.
//! let mut rng = EntropyRng::new();
//! let next = engine.evolve_generation(&population, &mut rng).unwrap();
//!
//! // Sample any genome's attractor for rendering.
//! let points = sample_attractor(&next[0], 10_000, DEFAULT_SKIP, &mut rng);
//! println!("sampled {} points", points.len());
//! ```
//!
//! Rendering, UI, clipboard export and persistence are collaborators:
//! they call into this crate and own all I/O.

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{AttractorPoint, EntropyRng, EvolutionEngine, IdGen, Mulberry32, SeedForm};
pub use schema::{EvolutionConfig, Genome, Rating, Transform};
