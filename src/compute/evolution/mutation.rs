//! Mutation operators over transform lists.
//!
//! Every operator copies its input and returns a new list; parents are
//! never modified. Matrix-touching strategies finish with contractivity
//! enforcement so mutation can never push a genome into divergence.

use crate::compute::algebra::{MAX_CONTRACTIVITY, decompose, enforce_contractivity, reconstruct};
use crate::compute::rng::RandomSource;
use crate::schema::{MAX_TRANSFORMS, MIN_TRANSFORMS, MutationKind, Transform};

use super::library::random_transform;

/// Scale-axis clamp band shared by the structured and scale strategies.
const SCALE_BAND: (f64, f64) = (0.1, 0.85);
/// Shear clamp band for the structured strategy.
const SHEAR_BAND: (f64, f64) = (-0.3, 0.3);
/// Lower bound for a mutated probability weight.
const PROBABILITY_FLOOR: f64 = 0.1;

/// Apply the chosen mutation strategy to every transform of the list.
pub fn mutate(
    transforms: &[Transform],
    kind: MutationKind,
    strength: f64,
    rng: &mut dyn RandomSource,
) -> Vec<Transform> {
    transforms
        .iter()
        .map(|t| match kind {
            MutationKind::Random => mutate_random(t, strength, rng),
            MutationKind::Structured => mutate_structured(t, strength, rng),
            MutationKind::Rotation => mutate_rotation(t, strength, rng),
            MutationKind::Scale => mutate_scale(t, strength, rng),
            MutationKind::Translation => mutate_translation(t, strength, rng),
            MutationKind::Color => mutate_color(t, strength, rng),
        })
        .collect()
}

/// Structural mutation: optionally drop one transform and optionally
/// append a fresh random one. The two checks are independent; both,
/// either, or neither may fire. The 2..=8 band is preserved by gating
/// each check on the current count.
pub fn structural(
    mut transforms: Vec<Transform>,
    rate: f64,
    rng: &mut dyn RandomSource,
) -> Vec<Transform> {
    if transforms.len() > MIN_TRANSFORMS && rng.chance(rate) {
        let index = rng.index(transforms.len());
        transforms.remove(index);
    }
    if transforms.len() < MAX_TRANSFORMS && rng.chance(rate) {
        transforms.push(random_transform(rng));
    }
    transforms
}

/// Independent perturbation of raw fields.
fn mutate_random(t: &Transform, strength: f64, rng: &mut dyn RandomSource) -> Transform {
    let mut matrix = t.matrix;
    for cell in &mut matrix {
        if rng.chance(0.5) {
            *cell += rng.range(-strength, strength);
        }
    }

    Transform {
        matrix: enforce_contractivity(matrix, MAX_CONTRACTIVITY),
        translation: perturb_translation(t.translation, strength, rng),
        probability: perturb_probability(t.probability, rng),
        color: perturb_color_gated(t.color, rng),
    }
}

/// Perturbation in decomposed parameter space.
fn mutate_structured(t: &Transform, strength: f64, rng: &mut dyn RandomSource) -> Transform {
    let mut params = decompose(&t.matrix);

    if rng.chance(0.4) {
        for scale in &mut params.scale {
            *scale = (*scale + rng.range(-strength, strength)).clamp(SCALE_BAND.0, SCALE_BAND.1);
        }
    }
    if rng.chance(0.5) {
        for angle in &mut params.rotation {
            *angle += rng.range(-strength, strength) * std::f64::consts::PI;
        }
    }
    if rng.chance(0.3) {
        for shear in &mut params.shear {
            *shear = (*shear + rng.range(-strength, strength) * 0.5)
                .clamp(SHEAR_BAND.0, SHEAR_BAND.1);
        }
    }

    Transform {
        matrix: enforce_contractivity(reconstruct(&params), MAX_CONTRACTIVITY),
        translation: perturb_translation(t.translation, strength, rng),
        probability: perturb_probability(t.probability, rng),
        color: perturb_color_gated(t.color, rng),
    }
}

/// Rotation angles only, always applied.
fn mutate_rotation(t: &Transform, strength: f64, rng: &mut dyn RandomSource) -> Transform {
    let mut params = decompose(&t.matrix);
    for angle in &mut params.rotation {
        *angle += rng.range(-strength, strength) * std::f64::consts::PI;
    }

    Transform {
        matrix: enforce_contractivity(reconstruct(&params), MAX_CONTRACTIVITY),
        ..t.clone()
    }
}

/// Scale axes only: one shared factor half the time, independent
/// per-axis perturbation otherwise.
fn mutate_scale(t: &Transform, strength: f64, rng: &mut dyn RandomSource) -> Transform {
    let mut params = decompose(&t.matrix);

    if rng.chance(0.5) {
        let factor = 1.0 + rng.range(-strength, strength);
        for scale in &mut params.scale {
            *scale = (*scale * factor).clamp(SCALE_BAND.0, SCALE_BAND.1);
        }
    } else {
        for scale in &mut params.scale {
            *scale = (*scale + rng.range(-strength, strength)).clamp(SCALE_BAND.0, SCALE_BAND.1);
        }
    }

    Transform {
        matrix: enforce_contractivity(reconstruct(&params), MAX_CONTRACTIVITY),
        ..t.clone()
    }
}

/// Translation components only.
fn mutate_translation(t: &Transform, strength: f64, rng: &mut dyn RandomSource) -> Transform {
    let mut translation = t.translation;
    for component in &mut translation {
        *component += rng.range(-strength, strength);
    }

    Transform {
        translation,
        ..t.clone()
    }
}

/// Color channels only.
fn mutate_color(t: &Transform, strength: f64, rng: &mut dyn RandomSource) -> Transform {
    let mut color = t.color;
    let span = strength * 400.0;
    for channel in &mut color {
        *channel = clamp_channel(f64::from(*channel) + rng.range(-span, span));
    }

    Transform {
        color,
        ..t.clone()
    }
}

fn perturb_translation(
    mut translation: [f64; 3],
    strength: f64,
    rng: &mut dyn RandomSource,
) -> [f64; 3] {
    for component in &mut translation {
        if rng.chance(0.4) {
            *component += rng.range(-2.0 * strength, 2.0 * strength);
        }
    }
    translation
}

fn perturb_probability(probability: f64, rng: &mut dyn RandomSource) -> f64 {
    if rng.chance(0.3) {
        (probability + rng.range(-0.2, 0.2)).max(PROBABILITY_FLOOR)
    } else {
        probability
    }
}

fn perturb_color_gated(mut color: [u8; 3], rng: &mut dyn RandomSource) -> [u8; 3] {
    if rng.chance(0.2) {
        for channel in &mut color {
            *channel = clamp_channel(f64::from(*channel) + rng.range(-40.0, 40.0));
        }
    }
    color
}

fn clamp_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::algebra::spectral_radius;
    use crate::compute::rng::Mulberry32;

    fn sample_transforms() -> Vec<Transform> {
        vec![
            Transform {
                matrix: [0.6, 0.1, 0.0, -0.1, 0.6, 0.0, 0.0, 0.0, 0.6],
                translation: [0.3, -0.2, 0.1],
                probability: 0.8,
                color: [200, 100, 50],
            },
            Transform {
                matrix: [0.4, 0.0, 0.2, 0.0, 0.5, 0.0, -0.2, 0.0, 0.4],
                translation: [-0.4, 0.1, 0.0],
                probability: 0.5,
                color: [30, 160, 220],
            },
        ]
    }

    #[test]
    fn test_inputs_never_mutated() {
        let original = sample_transforms();
        let snapshot = original.clone();
        let mut rng = Mulberry32::new(42);

        for kind in [
            MutationKind::Random,
            MutationKind::Structured,
            MutationKind::Rotation,
            MutationKind::Scale,
            MutationKind::Translation,
            MutationKind::Color,
        ] {
            let _ = mutate(&original, kind, 0.5, &mut rng);
        }

        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_matrix_strategies_stay_contractive() {
        let mut rng = Mulberry32::new(7);
        for kind in [
            MutationKind::Random,
            MutationKind::Structured,
            MutationKind::Rotation,
            MutationKind::Scale,
        ] {
            for _ in 0..50 {
                let out = mutate(&sample_transforms(), kind, 1.0, &mut rng);
                for t in out {
                    assert!(spectral_radius(&t.matrix) <= MAX_CONTRACTIVITY + 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_rotation_leaves_other_fields_untouched() {
        let original = sample_transforms();
        let mut rng = Mulberry32::new(3);
        let out = mutate(&original, MutationKind::Rotation, 0.5, &mut rng);

        for (before, after) in original.iter().zip(out.iter()) {
            assert_eq!(before.translation, after.translation);
            assert_eq!(before.probability, after.probability);
            assert_eq!(before.color, after.color);
            assert_ne!(before.matrix, after.matrix);
        }
    }

    #[test]
    fn test_translation_only_touches_translation() {
        let original = sample_transforms();
        let mut rng = Mulberry32::new(3);
        let out = mutate(&original, MutationKind::Translation, 0.5, &mut rng);

        for (before, after) in original.iter().zip(out.iter()) {
            assert_eq!(before.matrix, after.matrix);
            assert_eq!(before.probability, after.probability);
            assert_eq!(before.color, after.color);
            assert_ne!(before.translation, after.translation);
        }
    }

    #[test]
    fn test_color_only_touches_color() {
        let original = sample_transforms();
        let mut rng = Mulberry32::new(3);
        let out = mutate(&original, MutationKind::Color, 0.9, &mut rng);

        for (before, after) in original.iter().zip(out.iter()) {
            assert_eq!(before.matrix, after.matrix);
            assert_eq!(before.translation, after.translation);
            assert_eq!(before.probability, after.probability);
        }
    }

    #[test]
    fn test_probability_floor_holds() {
        let mut low = sample_transforms();
        low[0].probability = 0.11;
        let mut rng = Mulberry32::new(5);

        for _ in 0..200 {
            let out = mutate(&low, MutationKind::Random, 1.0, &mut rng);
            assert!(out[0].probability >= PROBABILITY_FLOOR);
        }
    }

    #[test]
    fn test_structural_respects_bounds() {
        let mut rng = Mulberry32::new(13);

        // Rate 1 on a minimum-size list: remove cannot fire, append must.
        let min_list = sample_transforms();
        let grown = structural(min_list, 1.0, &mut rng);
        assert_eq!(grown.len(), MIN_TRANSFORMS + 1);

        // Rate 1 on a maximum-size list: remove fires, then append refills.
        let max_list = vec![sample_transforms()[0].clone(); MAX_TRANSFORMS];
        let out = structural(max_list, 1.0, &mut rng);
        assert_eq!(out.len(), MAX_TRANSFORMS);

        // Rate 0 never changes anything.
        let unchanged = structural(sample_transforms(), 0.0, &mut rng);
        assert_eq!(unchanged.len(), 2);
    }

    #[test]
    fn test_structural_never_leaves_band() {
        let mut rng = Mulberry32::new(21);
        for _ in 0..200 {
            let out = structural(sample_transforms(), 0.5, &mut rng);
            assert!((MIN_TRANSFORMS..=MAX_TRANSFORMS).contains(&out.len()));
        }
    }
}
