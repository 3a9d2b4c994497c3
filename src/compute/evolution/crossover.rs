//! Crossover operators over transform lists.
//!
//! Operators combine two parent transform lists into a fresh child list;
//! parents are deep-copied, never modified. Every output is clamped back
//! into the valid 2..=8 band before it leaves this module.

use crate::compute::rng::RandomSource;
use crate::schema::{CrossoverKind, Transform};

use super::library::finalize_transforms;

/// Floor for a probability weight faded out by blend crossover, keeping
/// the positive-weight invariant even at alpha extremes.
const FADE_PROBABILITY_FLOOR: f64 = 0.01;

/// Combine two parent transform lists with the chosen strategy.
pub fn crossover(
    kind: CrossoverKind,
    a: &[Transform],
    b: &[Transform],
    rng: &mut dyn RandomSource,
) -> Vec<Transform> {
    let child = match kind {
        CrossoverKind::Uniform => uniform(a, b, rng),
        CrossoverKind::Blend { alpha } => {
            let alpha = alpha.unwrap_or_else(|| rng.next_f64()).clamp(0.0, 1.0);
            blend(a, b, alpha)
        }
        CrossoverKind::Parameter => parameter(a, b, rng),
        CrossoverKind::SinglePoint => single_point(a, b, rng),
    };
    finalize_transforms(child, rng)
}

/// Whole-transform coin flip per index; indices present in only one
/// parent fall back to that parent.
fn uniform(a: &[Transform], b: &[Transform], rng: &mut dyn RandomSource) -> Vec<Transform> {
    let len = a.len().max(b.len());
    let mut child = Vec::with_capacity(len);

    for i in 0..len {
        let take_a = rng.chance(0.5);
        let picked = match (a.get(i), b.get(i)) {
            (Some(ta), Some(tb)) => {
                if take_a {
                    ta
                } else {
                    tb
                }
            }
            (Some(ta), None) => ta,
            (None, Some(tb)) => tb,
            (None, None) => break,
        };
        child.push(picked.clone());
    }

    child
}

/// Linear interpolation of every numeric field, `A * alpha + B * (1 - alpha)`.
///
/// Indices present in only one parent are copied with their weight scaled
/// by that parent's share, so transforms unique to one parent fade in or
/// out with alpha instead of arriving at full strength.
fn blend(a: &[Transform], b: &[Transform], alpha: f64) -> Vec<Transform> {
    let len = a.len().max(b.len());
    let mut child = Vec::with_capacity(len);

    for i in 0..len {
        match (a.get(i), b.get(i)) {
            (Some(ta), Some(tb)) => child.push(lerp_transform(ta, tb, alpha)),
            (Some(ta), None) => {
                let mut t = ta.clone();
                t.probability = (t.probability * alpha).max(FADE_PROBABILITY_FLOOR);
                child.push(t);
            }
            (None, Some(tb)) => {
                let mut t = tb.clone();
                t.probability = (t.probability * (1.0 - alpha)).max(FADE_PROBABILITY_FLOOR);
                child.push(t);
            }
            (None, None) => break,
        }
    }

    child
}

fn lerp_transform(a: &Transform, b: &Transform, alpha: f64) -> Transform {
    let lerp = |x: f64, y: f64| x * alpha + y * (1.0 - alpha);

    let mut matrix = [0.0; 9];
    for (k, cell) in matrix.iter_mut().enumerate() {
        *cell = lerp(a.matrix[k], b.matrix[k]);
    }

    let mut translation = [0.0; 3];
    for (k, component) in translation.iter_mut().enumerate() {
        *component = lerp(a.translation[k], b.translation[k]);
    }

    let mut color = [0u8; 3];
    for (k, channel) in color.iter_mut().enumerate() {
        *channel = lerp(f64::from(a.color[k]), f64::from(b.color[k]))
            .round()
            .clamp(0.0, 255.0) as u8;
    }

    Transform {
        matrix,
        translation,
        probability: lerp(a.probability, b.probability),
        color,
    }
}

/// Like uniform crossover but the coin is flipped independently per
/// numeric field rather than per whole transform.
fn parameter(a: &[Transform], b: &[Transform], rng: &mut dyn RandomSource) -> Vec<Transform> {
    let len = a.len().max(b.len());
    let mut child = Vec::with_capacity(len);

    for i in 0..len {
        match (a.get(i), b.get(i)) {
            (Some(ta), Some(tb)) => {
                let mut pick = |x: f64, y: f64| if rng.chance(0.5) { x } else { y };

                let mut matrix = [0.0; 9];
                for (k, cell) in matrix.iter_mut().enumerate() {
                    *cell = pick(ta.matrix[k], tb.matrix[k]);
                }
                let mut translation = [0.0; 3];
                for (k, component) in translation.iter_mut().enumerate() {
                    *component = pick(ta.translation[k], tb.translation[k]);
                }
                let probability = pick(ta.probability, tb.probability);
                let mut color = [0u8; 3];
                for (k, channel) in color.iter_mut().enumerate() {
                    *channel = if rng.chance(0.5) {
                        ta.color[k]
                    } else {
                        tb.color[k]
                    };
                }

                child.push(Transform {
                    matrix,
                    translation,
                    probability,
                    color,
                });
            }
            (Some(t), None) | (None, Some(t)) => child.push(t.clone()),
            (None, None) => break,
        }
    }

    child
}

/// Prefix of A up to a uniformly drawn cut, then the rest of B. The
/// offspring length is B's length, which may differ from either parent's.
fn single_point(a: &[Transform], b: &[Transform], rng: &mut dyn RandomSource) -> Vec<Transform> {
    let shorter = a.len().min(b.len());
    if shorter == 0 {
        return a.iter().chain(b.iter()).cloned().collect();
    }

    let cut = rng.index(shorter);
    let mut child: Vec<Transform> = a[..cut].to_vec();
    child.extend(b[cut..].iter().cloned());
    child
}
