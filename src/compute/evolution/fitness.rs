//! Fitness scoring for genomes.

use crate::compute::algebra::spectral_radius;
use crate::schema::{Genome, Rating};

/// Rating multiplier for an up-rated genome.
const RATING_UP_FACTOR: f64 = 3.0;
/// Rating multiplier for a down-rated genome.
const RATING_DOWN_FACTOR: f64 = 0.1;
/// Bonus multiplier for comfortably contractive genomes.
const CONTRACTIVITY_BONUS: f64 = 1.2;
/// Mean spectral radius below which the bonus applies.
const CONTRACTIVITY_BONUS_THRESHOLD: f64 = 0.7;

/// Deterministic fitness of a genome.
///
/// `base * ratingFactor * contractivityBonus * diversityFactor`, a pure
/// function of the genome and its rating. The rating dominates (x3 for
/// liked, x0.1 for disliked); well-contracted genomes get a mild bonus
/// because they render reliably, and larger transform counts are nudged
/// upward to keep structural variety in the population.
pub fn score(genome: &Genome) -> f64 {
    let base = 1.0;

    let rating_factor = match genome.rating {
        Rating::Up => RATING_UP_FACTOR,
        Rating::Down => RATING_DOWN_FACTOR,
        Rating::Unset => 1.0,
    };

    let contractivity_bonus = if mean_spectral_radius(genome) < CONTRACTIVITY_BONUS_THRESHOLD {
        CONTRACTIVITY_BONUS
    } else {
        1.0
    };

    let diversity_factor = 1.0 + (genome.transforms.len() as f64 - 3.0) * 0.1;

    base * rating_factor * contractivity_bonus * diversity_factor
}

/// Mean spectral radius approximation across a genome's transforms.
pub fn mean_spectral_radius(genome: &Genome) -> f64 {
    if genome.transforms.is_empty() {
        return 0.0;
    }
    let sum: f64 = genome
        .transforms
        .iter()
        .map(|t| spectral_radius(&t.matrix))
        .sum();
    sum / genome.transforms.len() as f64
}
