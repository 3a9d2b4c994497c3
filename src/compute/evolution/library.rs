//! Genome construction: the hand-tuned seed library, random genomes, and
//! deterministic initial-population assembly.

use crate::compute::algebra::{MAX_CONTRACTIVITY, enforce_contractivity};
use crate::compute::rng::{Mulberry32, RandomSource};
use crate::schema::{Genome, MAX_TRANSFORMS, MIN_TRANSFORMS, Transform};

use super::ids::IdGen;

/// Generate one random transform.
///
/// Matrix cells are drawn in [-1, 1) and immediately pulled into the
/// contractive band, so random genomes can never diverge. The draw order
/// (matrix, translation, probability, color) is fixed; seeded population
/// construction depends on it.
pub fn random_transform(rng: &mut dyn RandomSource) -> Transform {
    let mut matrix = [0.0; 9];
    for cell in &mut matrix {
        *cell = rng.range(-1.0, 1.0);
    }
    let matrix = enforce_contractivity(matrix, MAX_CONTRACTIVITY);

    let mut translation = [0.0; 3];
    for component in &mut translation {
        *component = rng.range(-1.0, 1.0);
    }

    let probability = rng.range(0.1, 1.0);
    let color = rng.color();

    Transform {
        matrix,
        translation,
        probability,
        color,
    }
}

/// Generate a random transform list with 3..=6 transforms.
pub fn random_transforms(rng: &mut dyn RandomSource) -> Vec<Transform> {
    let count = 3 + rng.index(4);
    (0..count).map(|_| random_transform(rng)).collect()
}

/// Clamp a bred transform list into the valid band: pad short lists with
/// random transforms, truncate long ones.
pub fn finalize_transforms(
    mut transforms: Vec<Transform>,
    rng: &mut dyn RandomSource,
) -> Vec<Transform> {
    while transforms.len() < MIN_TRANSFORMS {
        transforms.push(random_transform(rng));
    }
    transforms.truncate(MAX_TRANSFORMS);
    transforms
}

/// Hand-tuned starting forms, all contractive by construction.
///
/// Each form is a pure constructor of an "interesting" transform list;
/// [`SeedForm::ALL`] enumerates the catalog so a caller can build a
/// maximally diverse initial population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedForm {
    /// Four half-scale maps toward tetrahedron vertices.
    SierpinskiTetra,
    /// Six maps toward octahedron vertices.
    Octahedron,
    /// Eight corner maps, a 3D Cantor dust.
    CubeNest,
    /// Barnsley-style fern lifted into 3D.
    Fern,
    /// Logarithmic spiral with a feed point.
    Spiral,
    /// Rising twisted column.
    Helix,
    /// Sheared branching cluster.
    Coral,
}

impl SeedForm {
    /// Every form in the catalog.
    pub const ALL: [SeedForm; 7] = [
        SeedForm::SierpinskiTetra,
        SeedForm::Octahedron,
        SeedForm::CubeNest,
        SeedForm::Fern,
        SeedForm::Spiral,
        SeedForm::Helix,
        SeedForm::Coral,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            SeedForm::SierpinskiTetra => "sierpinski-tetra",
            SeedForm::Octahedron => "octahedron",
            SeedForm::CubeNest => "cube-nest",
            SeedForm::Fern => "fern",
            SeedForm::Spiral => "spiral",
            SeedForm::Helix => "helix",
            SeedForm::Coral => "coral",
        }
    }

    /// Build this form's transform list.
    pub fn transforms(&self) -> Vec<Transform> {
        match self {
            SeedForm::SierpinskiTetra => corner_maps(
                0.5,
                &[
                    ([0.5, 0.5, 0.5], [230, 80, 80]),
                    ([0.5, -0.5, -0.5], [80, 200, 120]),
                    ([-0.5, 0.5, -0.5], [90, 130, 240]),
                    ([-0.5, -0.5, 0.5], [240, 200, 90]),
                ],
            ),
            SeedForm::Octahedron => corner_maps(
                0.45,
                &[
                    ([0.55, 0.0, 0.0], [240, 100, 100]),
                    ([-0.55, 0.0, 0.0], [200, 140, 80]),
                    ([0.0, 0.55, 0.0], [120, 220, 120]),
                    ([0.0, -0.55, 0.0], [90, 190, 170]),
                    ([0.0, 0.0, 0.55], [100, 130, 240]),
                    ([0.0, 0.0, -0.55], [180, 110, 230]),
                ],
            ),
            SeedForm::CubeNest => {
                let mut maps = Vec::with_capacity(8);
                let shades: [[u8; 3]; 8] = [
                    [235, 90, 90],
                    [235, 160, 80],
                    [220, 210, 90],
                    [120, 220, 110],
                    [90, 200, 200],
                    [100, 140, 235],
                    [160, 110, 230],
                    [225, 120, 200],
                ];
                for (i, shade) in shades.iter().enumerate() {
                    let sign = |bit: usize| if i >> bit & 1 == 1 { 0.67 } else { -0.67 };
                    maps.push(Transform {
                        matrix: uniform_scale(0.33),
                        translation: [sign(0), sign(1), sign(2)],
                        probability: 1.0,
                        color: *shade,
                    });
                }
                maps
            }
            SeedForm::Fern => vec![
                // Stem.
                Transform {
                    matrix: [0.05, 0.0, 0.0, 0.0, 0.16, 0.0, 0.0, 0.0, 0.05],
                    translation: [0.0, 0.0, 0.0],
                    probability: 0.01,
                    color: [110, 80, 50],
                },
                // Main frond, slight roll around the stem axis.
                Transform {
                    matrix: [0.85, 0.04, 0.0, -0.04, 0.85, 0.0, 0.0, 0.0, 0.85],
                    translation: [0.0, 1.6, 0.0],
                    probability: 0.85,
                    color: [70, 180, 80],
                },
                // Left leaflet.
                Transform {
                    matrix: [0.2, -0.26, 0.0, 0.23, 0.22, 0.0, 0.0, 0.0, 0.3],
                    translation: [0.0, 1.6, 0.1],
                    probability: 0.07,
                    color: [110, 210, 90],
                },
                // Right leaflet.
                Transform {
                    matrix: [-0.15, 0.28, 0.0, 0.26, 0.24, 0.0, 0.0, 0.0, 0.3],
                    translation: [0.0, 0.44, -0.1],
                    probability: 0.07,
                    color: [150, 230, 110],
                },
            ],
            SeedForm::Spiral => vec![
                // Rotate 20 degrees about z, contract slightly, drift up.
                Transform {
                    matrix: [0.864, -0.315, 0.0, 0.315, 0.864, 0.0, 0.0, 0.0, 0.92],
                    translation: [0.0, 0.0, 0.05],
                    probability: 0.9,
                    color: [240, 160, 70],
                },
                // Feed point away from the axis.
                Transform {
                    matrix: uniform_scale(0.15),
                    translation: [1.0, 0.0, 0.0],
                    probability: 0.1,
                    color: [250, 220, 120],
                },
            ],
            SeedForm::Helix => vec![
                // Rotate 30 degrees about z while climbing.
                Transform {
                    matrix: [0.736, -0.425, 0.0, 0.425, 0.736, 0.0, 0.0, 0.0, 0.85],
                    translation: [0.0, 0.0, 0.3],
                    probability: 0.85,
                    color: [110, 170, 240],
                },
                // Anchor at the base.
                Transform {
                    matrix: uniform_scale(0.2),
                    translation: [1.0, 0.0, -1.0],
                    probability: 0.15,
                    color: [190, 220, 250],
                },
            ],
            SeedForm::Coral => vec![
                Transform {
                    matrix: [0.6, 0.1, 0.0, -0.1, 0.6, 0.12, 0.0, -0.12, 0.6],
                    translation: [0.2, 0.5, 0.0],
                    probability: 0.4,
                    color: [240, 120, 110],
                },
                Transform {
                    matrix: [0.55, -0.15, 0.0, 0.15, 0.55, -0.1, 0.0, 0.1, 0.55],
                    translation: [-0.25, 0.5, 0.05],
                    probability: 0.4,
                    color: [250, 150, 130],
                },
                Transform {
                    matrix: uniform_scale(0.35),
                    translation: [0.0, -0.3, 0.15],
                    probability: 0.2,
                    color: [255, 190, 160],
                },
            ],
        }
    }

    /// Wrap this form into a parentless, generation-zero genome.
    pub fn genome(&self, ids: &IdGen) -> Genome {
        Genome::new(ids.next_id(), self.transforms(), 0, vec![])
    }
}

fn uniform_scale(factor: f64) -> [f64; 9] {
    [factor, 0.0, 0.0, 0.0, factor, 0.0, 0.0, 0.0, factor]
}

fn corner_maps(factor: f64, corners: &[([f64; 3], [u8; 3])]) -> Vec<Transform> {
    corners
        .iter()
        .map(|(translation, color)| Transform {
            matrix: uniform_scale(factor),
            translation: *translation,
            probability: 1.0,
            color: *color,
        })
        .collect()
}

/// Build a deterministic initial population of `size` genomes.
///
/// The library forms come first for maximal diversity; remaining slots are
/// filled with random genomes drawn from a single mulberry32 stream seeded
/// with `seed`. For a given seed the stream is consumed in a fixed order
/// with nothing interleaved, so two independent calls produce identical
/// genome sequences.
pub fn initial_population(seed: u32, size: usize, ids: &IdGen) -> Vec<Genome> {
    let mut rng = Mulberry32::new(seed);
    let mut population = Vec::with_capacity(size);

    for form in SeedForm::ALL.iter().take(size) {
        population.push(form.genome(ids));
    }
    while population.len() < size {
        population.push(Genome::new(ids.next_id(), random_transforms(&mut rng), 0, vec![]));
    }

    population
}
