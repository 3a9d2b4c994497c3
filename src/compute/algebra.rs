//! Numeric algebra on 3x3 row-major transform matrices.
//!
//! The spectral radius used throughout is a Frobenius-norm proxy, not a
//! true eigenvalue bound. Exact eigenvalues of a general 3x3 matrix need a
//! cubic solve; the proxy is a conservative gate against divergence and the
//! mutation operators are tuned to it, so it must not be replaced with an
//! exact computation.

use serde::{Deserialize, Serialize};

/// Contractivity threshold used by [`is_contractive`].
pub const CONTRACTIVITY_THRESHOLD: f64 = 0.95;

/// Target ceiling used by [`enforce_contractivity`].
pub const MAX_CONTRACTIVITY: f64 = 0.85;

/// Frobenius-based spectral radius approximation: `sqrt(sum(m[i]^2) / 3)`.
pub fn spectral_radius(m: &[f64; 9]) -> f64 {
    (m.iter().map(|v| v * v).sum::<f64>() / 3.0).sqrt()
}

/// 3x3 determinant by cofactor expansion along the first row.
pub fn determinant(m: &[f64; 9]) -> f64 {
    m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
        + m[2] * (m[3] * m[7] - m[4] * m[6])
}

/// Whether a matrix is contractive under the approximate spectral radius
/// and the determinant, both gated at `threshold`.
pub fn is_contractive(m: &[f64; 9], threshold: f64) -> bool {
    spectral_radius(m) < threshold && determinant(m).abs() < threshold
}

/// Uniformly rescale `m` so its spectral radius approximation does not
/// exceed `max_contractivity`. Matrices already inside the band are
/// returned bit-identical, which keeps the chaos game convergent without
/// disturbing transforms that were fine.
pub fn enforce_contractivity(m: [f64; 9], max_contractivity: f64) -> [f64; 9] {
    let radius = spectral_radius(&m);
    if radius <= max_contractivity {
        return m;
    }
    let factor = max_contractivity / radius;
    let mut out = m;
    for v in &mut out {
        *v *= factor;
    }
    out
}

/// Decomposed matrix parameters: per-axis scale, Euler angles, and shear
/// residuals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    /// Column norms (x, y, z).
    pub scale: [f64; 3],
    /// Euler angles (x, y, z) assuming Rz * Ry * Rx composition.
    pub rotation: [f64; 3],
    /// Shear residuals (xy, xz, yz) on the upper off-diagonal entries.
    pub shear: [f64; 3],
}

/// Decompose a matrix into scale, rotation and shear estimates.
///
/// This is not a full SVD: the rotation angles are read off the normalized
/// columns, so shear leaks into the rotation estimate. The shear terms are
/// whatever residual is left on the upper off-diagonal entries after the
/// estimated rotation is removed. Round-tripping through [`reconstruct`]
/// is therefore only approximately faithful.
pub fn decompose(m: &[f64; 9]) -> TransformParams {
    // Column norms, guarding degenerate columns with a unit denominator.
    let norm = |a: f64, b: f64, c: f64| (a * a + b * b + c * c).sqrt();
    let sx = norm(m[0], m[3], m[6]);
    let sy = norm(m[1], m[4], m[7]);
    let sz = norm(m[2], m[5], m[8]);
    let dx = if sx == 0.0 { 1.0 } else { sx };
    let dy = if sy == 0.0 { 1.0 } else { sy };
    let dz = if sz == 0.0 { 1.0 } else { sz };

    let rotation_y = (-(m[6] / dx)).clamp(-1.0, 1.0).asin();
    let rotation_x = (m[7] / dy).atan2(m[8] / dz);
    let rotation_z = (m[3] / dx).atan2(m[0] / dx);
    let rotation = [rotation_x, rotation_y, rotation_z];

    let r = rotation_matrix(&rotation);
    let shear = [
        m[1] - r[1] * sy,
        m[2] - r[2] * sz,
        m[5] - r[5] * sz,
    ];

    TransformParams {
        scale: [sx, sy, sz],
        rotation,
        shear,
    }
}

/// Rebuild a matrix from decomposed parameters: Rz * Ry * Rx rotation,
/// columns scaled, shear added back onto the upper off-diagonal entries.
pub fn reconstruct(params: &TransformParams) -> [f64; 9] {
    let r = rotation_matrix(&params.rotation);
    let [sx, sy, sz] = params.scale;
    let [shear_xy, shear_xz, shear_yz] = params.shear;

    [
        r[0] * sx,
        r[1] * sy + shear_xy,
        r[2] * sz + shear_xz,
        r[3] * sx,
        r[4] * sy,
        r[5] * sz + shear_yz,
        r[6] * sx,
        r[7] * sy,
        r[8] * sz,
    ]
}

/// Combined rotation matrix Rz * Ry * Rx from Euler angles (x, y, z).
fn rotation_matrix(angles: &[f64; 3]) -> [f64; 9] {
    let (sin_x, cos_x) = angles[0].sin_cos();
    let (sin_y, cos_y) = angles[1].sin_cos();
    let (sin_z, cos_z) = angles[2].sin_cos();

    [
        cos_z * cos_y,
        cos_z * sin_y * sin_x - sin_z * cos_x,
        cos_z * sin_y * cos_x + sin_z * sin_x,
        sin_z * cos_y,
        sin_z * sin_y * sin_x + cos_z * cos_x,
        sin_z * sin_y * cos_x - cos_z * sin_x,
        -sin_y,
        cos_y * sin_x,
        cos_y * cos_x,
    ]
}
