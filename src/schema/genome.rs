//! Genome and transform data types for IFS fractal evolution.

use serde::{Deserialize, Serialize};

/// Minimum number of transforms in a valid genome.
pub const MIN_TRANSFORMS: usize = 2;

/// Maximum number of transforms in a valid genome.
pub const MAX_TRANSFORMS: usize = 8;

/// A single weighted affine map of an iterated function system.
///
/// The linear part is a 3x3 row-major matrix (rotation/scale/shear); the
/// chaos game applies `p' = M * p + translation`. `probability` is an
/// unnormalized selection weight relative to the other transforms of the
/// owning genome, not a true probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Row-major 3x3 linear part.
    pub matrix: [f64; 9],
    /// Translation applied after the linear part.
    pub translation: [f64; 3],
    /// Relative selection weight, always positive.
    pub probability: f64,
    /// RGB color attributed to points produced by this transform.
    pub color: [u8; 3],
}

impl Transform {
    /// Identity linear part with no translation.
    pub fn identity() -> Self {
        Self {
            matrix: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            translation: [0.0; 3],
            probability: 1.0,
            color: [255, 255, 255],
        }
    }

    /// Whether every numeric field is finite and the weight is positive.
    pub fn is_valid(&self) -> bool {
        self.matrix.iter().all(|v| v.is_finite())
            && self.translation.iter().all(|v| v.is_finite())
            && self.probability.is_finite()
            && self.probability > 0.0
    }
}

/// User rating attached to a genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Rating {
    /// Liked; breeding is biased toward this genome.
    Up,
    /// Disliked; strongly selected against.
    Down,
    /// No opinion recorded.
    #[default]
    Unset,
}

/// The evolvable unit: an ordered list of weighted affine transforms plus
/// lineage metadata.
///
/// Genomes are immutable once constructed; every breeding operator returns
/// new values and never touches its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    /// Unique identifier, issued by an injected [`IdGen`](crate::compute::IdGen).
    pub id: u64,
    /// Ordered transform list, always within [`MIN_TRANSFORMS`]..=[`MAX_TRANSFORMS`].
    pub transforms: Vec<Transform>,
    /// Generation index: 0 for parentless genomes, otherwise
    /// `max(parent generations) + 1`.
    pub generation: u32,
    /// Parent ids: empty for seed/random genomes, one for mutation-only
    /// offspring, two for crossover offspring.
    #[serde(default)]
    pub parents: Vec<u64>,
    /// Optional user rating.
    #[serde(default)]
    pub rating: Rating,
}

impl Genome {
    /// Wrap an already-clamped transform list into a genome.
    ///
    /// Callers are responsible for keeping `transforms` within the
    /// [`MIN_TRANSFORMS`]..=[`MAX_TRANSFORMS`] band; the breeding operators
    /// all do this before wrapping.
    pub fn new(id: u64, transforms: Vec<Transform>, generation: u32, parents: Vec<u64>) -> Self {
        debug_assert!(
            (MIN_TRANSFORMS..=MAX_TRANSFORMS).contains(&transforms.len()),
            "genome transform count out of bounds: {}",
            transforms.len()
        );
        debug_assert!(parents.len() <= 2);

        Self {
            id,
            transforms,
            generation,
            parents,
            rating: Rating::Unset,
        }
    }

    /// Wrap offspring transforms, deriving generation and lineage from the
    /// parent genomes.
    pub fn offspring(id: u64, transforms: Vec<Transform>, parents: &[&Genome]) -> Self {
        let generation = parents
            .iter()
            .map(|p| p.generation)
            .max()
            .map_or(0, |g| g + 1);
        let parent_ids = parents.iter().map(|p| p.id).collect();
        Self::new(id, transforms, generation, parent_ids)
    }

    /// Copy of this genome with a different rating.
    pub fn with_rating(&self, rating: Rating) -> Self {
        Self {
            rating,
            ..self.clone()
        }
    }

    /// Whether the transform count and every transform satisfy the
    /// structural invariants.
    pub fn is_valid(&self) -> bool {
        (MIN_TRANSFORMS..=MAX_TRANSFORMS).contains(&self.transforms.len())
            && self.parents.len() <= 2
            && self.transforms.iter().all(Transform::is_valid)
    }
}
