//! Chaos-game sampling of a genome's attractor.
//!
//! Repeated random application of a genome's weighted affine maps drives a
//! running point onto the IFS attractor. The first iterations are a
//! transient while the point settles, so they are skipped; non-finite
//! excursions are recovered locally by reseeding the point and never
//! surface as errors.

use crate::compute::rng::RandomSource;
use crate::schema::{Genome, Transform};

/// Default number of settle iterations discarded before sampling.
pub const DEFAULT_SKIP: usize = 20;

/// One emitted attractor sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractorPoint {
    pub position: [f64; 3],
    /// Color of the transform that produced this point.
    pub color: [u8; 3],
}

/// Sample `iterations` chaos-game steps of `genome`, discarding the first
/// `skip` settled points.
///
/// An empty result means the attractor could not be sampled (every
/// iteration diverged or fell inside the skip window); callers should
/// treat that as "failed to render", not as an error.
pub fn sample_attractor(
    genome: &Genome,
    iterations: usize,
    skip: usize,
    rng: &mut dyn RandomSource,
) -> Vec<AttractorPoint> {
    let transforms = &genome.transforms;
    if transforms.is_empty() {
        return Vec::new();
    }

    let total_weight: f64 = transforms.iter().map(|t| t.probability).sum();
    let mut points = Vec::with_capacity(iterations.saturating_sub(skip));

    let mut x = rng.range(-1.0, 1.0);
    let mut y = rng.range(-1.0, 1.0);
    let mut z = rng.range(-1.0, 1.0);

    // Count of successful (finite) applications; diverged iterations do
    // not advance it, so the skip window always covers real settling.
    let mut settled = 0usize;

    for _ in 0..iterations {
        let transform = pick_weighted(transforms, total_weight, rng);
        let (nx, ny, nz) = apply(transform, x, y, z);

        if !(nx.is_finite() && ny.is_finite() && nz.is_finite()) {
            // Divergence: drop the point and restart from a fresh seed.
            x = rng.range(-1.0, 1.0);
            y = rng.range(-1.0, 1.0);
            z = rng.range(-1.0, 1.0);
            continue;
        }

        x = nx;
        y = ny;
        z = nz;
        settled += 1;

        if settled > skip {
            points.push(AttractorPoint {
                position: [x, y, z],
                color: transform.color,
            });
        }
    }

    points
}

/// Weighted transform pick: walk the weights subtracting from a uniform
/// draw over their sum. The last transform is the fallback for the
/// floating-rounding case where no weight triggers at the boundary.
fn pick_weighted<'a>(
    transforms: &'a [Transform],
    total_weight: f64,
    rng: &mut dyn RandomSource,
) -> &'a Transform {
    let mut r = rng.next_f64() * total_weight;
    for transform in transforms {
        r -= transform.probability;
        if r <= 0.0 {
            return transform;
        }
    }
    &transforms[transforms.len() - 1]
}

#[inline]
fn apply(t: &Transform, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let m = &t.matrix;
    let tr = &t.translation;
    (
        m[0] * x + m[1] * y + m[2] * z + tr[0],
        m[3] * x + m[4] * y + m[5] * z + tr[1],
        m[6] * x + m[7] * y + m[8] * z + tr[2],
    )
}

/// Axis-aligned bounds of a point set: `(min, max)` per axis, or `None`
/// for an empty set.
pub fn bounds(points: &[AttractorPoint]) -> Option<([f64; 3], [f64; 3])> {
    let first = points.first()?;
    let mut min = first.position;
    let mut max = first.position;
    for p in points {
        for axis in 0..3 {
            min[axis] = min[axis].min(p.position[axis]);
            max[axis] = max[axis].max(p.position[axis]);
        }
    }
    Some((min, max))
}

/// Recenter and rescale points into the unit cube `[-1, 1]^3`, preserving
/// aspect ratio. A zero range on an axis is treated as a range of 1 so a
/// flat attractor still normalizes. Every consumer of normalized points
/// must use this exact fit so results line up.
pub fn fit_unit_cube(points: &mut [AttractorPoint]) {
    let Some((min, max)) = bounds(points) else {
        return;
    };

    let range = |axis: usize| {
        let r = max[axis] - min[axis];
        if r == 0.0 { 1.0 } else { r }
    };
    let largest = range(0).max(range(1)).max(range(2));
    let scale = 2.0 / largest;
    let center = [
        (min[0] + max[0]) / 2.0,
        (min[1] + max[1]) / 2.0,
        (min[2] + max[2]) / 2.0,
    ];

    for p in points.iter_mut() {
        for axis in 0..3 {
            p.position[axis] = (p.position[axis] - center[axis]) * scale;
        }
    }
}
