//! Perspective (homography) transforms for raster cell warping.
//!
//! A homography maps an axis-aligned rectangle to an arbitrary
//! quadrilateral. It is derived per mesh cell by solving the 8x8 linear
//! system formed by the four corner correspondences (two equations each)
//! with Gaussian elimination and partial pivoting.

use glam::DVec2;
use thiserror::Error;

/// Pivot magnitude below which the corner system counts as singular.
const PIVOT_EPSILON: f64 = 1e-9;

/// Error for a quad correspondence with no stable perspective solution,
/// e.g. a fully collapsed cell with collinear corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("singular quad correspondence: corners are collinear or collapsed")]
pub struct SingularQuadError;

/// A 2D projective transform with eight coefficients (the ninth is fixed
/// at 1):
///
/// ```text
/// x' = (a*x + b*y + c) / (g*x + h*y + 1)
/// y' = (d*x + e*y + f) / (g*x + h*y + 1)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    /// Coefficients `[a, b, c, d, e, f, g, h]`.
    pub coeffs: [f64; 8],
}

impl Homography {
    /// Solves the homography mapping the `src` corners onto the `dst`
    /// corners. Both quads are given in the same winding order.
    pub fn from_quad(src: &[DVec2; 4], dst: &[DVec2; 4]) -> Result<Self, SingularQuadError> {
        // Two rows per correspondence, unknowns [a b c d e f g h].
        let mut system = [[0.0_f64; 9]; 8];
        for (i, (s, d)) in src.iter().zip(dst).enumerate() {
            system[i * 2] = [
                s.x,
                s.y,
                1.0,
                0.0,
                0.0,
                0.0,
                -s.x * d.x,
                -s.y * d.x,
                d.x,
            ];
            system[i * 2 + 1] = [
                0.0,
                0.0,
                0.0,
                s.x,
                s.y,
                1.0,
                -s.x * d.y,
                -s.y * d.y,
                d.y,
            ];
        }
        let coeffs = solve(&mut system)?;
        Ok(Self { coeffs })
    }

    /// Applies the transform to a point.
    ///
    /// Points on the transform's vanishing line (denominator near zero) are
    /// returned unchanged rather than blowing up.
    pub fn apply(&self, p: DVec2) -> DVec2 {
        let [a, b, c, d, e, f, g, h] = self.coeffs;
        let w = g * p.x + h * p.y + 1.0;
        if w.abs() < PIVOT_EPSILON {
            return p;
        }
        DVec2::new((a * p.x + b * p.y + c) / w, (d * p.x + e * p.y + f) / w)
    }

    /// The affine part `(m11, m12, m21, m22, dx, dy)` in canvas
    /// `transform()` argument order.
    ///
    /// Canvas contexts only take affine transforms, so per-cell drawing uses
    /// this approximation; the perspective terms stay in the clip quad,
    /// which is computed from the exact corner positions.
    pub fn affine_coeffs(&self) -> [f64; 6] {
        let [a, b, c, d, e, f, ..] = self.coeffs;
        [a, d, b, e, c, f]
    }
}

/// Solves an 8-unknown augmented system in place via Gaussian elimination
/// with partial pivoting.
fn solve(system: &mut [[f64; 9]; 8]) -> Result<[f64; 8], SingularQuadError> {
    for col in 0..8 {
        let mut pivot = col;
        for row in col + 1..8 {
            if system[row][col].abs() > system[pivot][col].abs() {
                pivot = row;
            }
        }
        if system[pivot][col].abs() < PIVOT_EPSILON {
            return Err(SingularQuadError);
        }
        system.swap(col, pivot);

        for row in col + 1..8 {
            let factor = system[row][col] / system[col][col];
            for k in col..9 {
                system[row][k] -= factor * system[col][k];
            }
        }
    }

    let mut x = [0.0_f64; 8];
    for row in (0..8).rev() {
        let mut acc = system[row][8];
        for k in row + 1..8 {
            acc -= system[row][k] * x[k];
        }
        x[row] = acc / system[row][row];
    }

    if x.iter().all(|v| v.is_finite()) {
        Ok(x)
    } else {
        Err(SingularQuadError)
    }
}
