//! Bilinear deformation field over a control mesh.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::ControlMesh;

/// Easing applied to the bilinear cell weights.
///
/// One field instance uses one easing for every sample, so warped geometry
/// is consistent across a whole draw. [`Easing::Linear`] is the default;
/// [`Easing::Smooth`] visibly rounds the deformation near cell boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Plain linear interpolation.
    #[default]
    Linear,
    /// Smoothstep ease `t * t * (3 - 2t)` on both cell weights.
    Smooth,
}

impl Easing {
    fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::Smooth => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Maps points of the mesh's original rectangle to their deformed positions.
///
/// The field is a pure function of the mesh snapshot it borrows: it holds no
/// state of its own and is safe to share across concurrent draw passes
/// (`&self` only). Points outside the mesh bounds are clamped to the
/// boundary, never extrapolated.
///
/// # Example
///
/// ```
/// use glam::DVec2;
/// use putty_warp::{BilinearWarpField, ControlMesh, Rect};
///
/// let mut mesh = ControlMesh::new(3, 2, Rect::new(0.0, 0.0, 100.0, 50.0)).unwrap();
/// mesh.set(0, 2, DVec2::new(130.0, -20.0));
///
/// let field = BilinearWarpField::new(&mesh);
/// // Control points are interpolation anchors: they map to themselves.
/// assert_eq!(field.map(DVec2::new(100.0, 0.0)), DVec2::new(130.0, -20.0));
/// assert_eq!(field.map(DVec2::ZERO), DVec2::ZERO);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BilinearWarpField<'m> {
    mesh: &'m ControlMesh,
    easing: Easing,
    intensity: f64,
}

impl<'m> BilinearWarpField<'m> {
    /// Creates a field over a mesh snapshot with linear easing and full
    /// intensity.
    pub fn new(mesh: &'m ControlMesh) -> Self {
        Self {
            mesh,
            easing: Easing::default(),
            intensity: 1.0,
        }
    }

    /// Builder: set the weight easing.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Builder: set deformation intensity.
    ///
    /// `0.0` leaves input unchanged, `1.0` applies the full mesh
    /// deformation; intermediate values blend. Non-finite values fall back
    /// to `1.0`.
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = if intensity.is_finite() { intensity } else { 1.0 };
        self
    }

    /// The mesh snapshot this field samples.
    pub fn mesh(&self) -> &'m ControlMesh {
        self.mesh
    }

    /// Maps a point through the deformation.
    ///
    /// Falls back to the identity mapping (returns `point` unchanged) for
    /// non-finite input or a mesh with degenerate bounds; the result is
    /// always finite for finite input.
    pub fn map(&self, point: DVec2) -> DVec2 {
        if !point.is_finite() {
            return point;
        }
        let bounds = self.mesh.bounds();
        if bounds.is_degenerate() {
            return point;
        }

        let columns = self.mesh.columns();
        let rows = self.mesh.rows();

        // Normalize into the unit square, clamped so out-of-bounds points
        // stick to the boundary instead of extrapolating.
        let t = ((point - bounds.min()) / bounds.size()).clamp(DVec2::ZERO, DVec2::ONE);

        // Fractional cell coordinates; the cell index is clamped to the last
        // valid cell so t == 1.0 reads the final point pair, not past it.
        let fx = t.x * (columns - 1) as f64;
        let fy = t.y * (rows - 1) as f64;
        let ix = (fx as usize).min(columns - 2);
        let iy = (fy as usize).min(rows - 2);
        let u = self.easing.apply(fx - ix as f64);
        let v = self.easing.apply(fy - iy as f64);

        let (Some(p00), Some(p10), Some(p01), Some(p11)) = (
            self.mesh.get(iy, ix),
            self.mesh.get(iy, ix + 1),
            self.mesh.get(iy + 1, ix),
            self.mesh.get(iy + 1, ix + 1),
        ) else {
            return point;
        };

        let top = p00.lerp(p10, u);
        let bottom = p01.lerp(p11, u);
        let warped = top.lerp(bottom, v);

        let result = point + (warped - point) * self.intensity;
        if result.is_finite() {
            result
        } else {
            point
        }
    }

    /// [`map`](Self::map) on a raw coordinate pair.
    pub fn map_xy(&self, x: f64, y: f64) -> (f64, f64) {
        let mapped = self.map(DVec2::new(x, y));
        (mapped.x, mapped.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    const TOLERANCE: f64 = 1e-9;

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < TOLERANCE
    }

    #[test]
    fn identity_mesh_maps_points_to_themselves() {
        for (columns, rows) in [(2, 2), (3, 2), (4, 5), (8, 8)] {
            let mesh =
                ControlMesh::new(columns, rows, Rect::new(-10.0, 5.0, 200.0, 80.0)).unwrap();
            let field = BilinearWarpField::new(&mesh);
            for point in [
                DVec2::new(-10.0, 5.0),
                DVec2::new(40.0, 30.0),
                DVec2::new(190.0, 85.0),
                DVec2::new(17.3, 61.02),
            ] {
                assert!(
                    close(field.map(point), point),
                    "{columns}x{rows} grid moved {point}"
                );
            }
        }
    }

    #[test]
    fn control_points_are_anchors() {
        let mut mesh = ControlMesh::new(4, 3, Rect::new(0.0, 0.0, 90.0, 60.0)).unwrap();
        mesh.set(1, 2, DVec2::new(70.0, 25.0));
        mesh.set(2, 0, DVec2::new(-15.0, 80.0));
        let field = BilinearWarpField::new(&mesh);

        for row in 0..3 {
            for col in 0..4 {
                let anchor = mesh.get_original(row, col).unwrap();
                assert!(
                    close(field.map(anchor), mesh.get(row, col).unwrap()),
                    "anchor ({row},{col}) did not map to its control point"
                );
            }
        }
    }

    #[test]
    fn smooth_easing_keeps_anchors_fixed() {
        let mut mesh = ControlMesh::new(3, 3, Rect::new(0.0, 0.0, 60.0, 60.0)).unwrap();
        mesh.set(1, 1, DVec2::new(45.0, 45.0));
        let field = BilinearWarpField::new(&mesh).with_easing(Easing::Smooth);

        // Smoothstep fixes 0 and 1, so grid anchors still map to themselves.
        assert!(close(field.map(DVec2::new(30.0, 30.0)), DVec2::new(45.0, 45.0)));
        assert!(close(field.map(DVec2::new(0.0, 0.0)), DVec2::ZERO));
        assert!(close(field.map(DVec2::new(60.0, 60.0)), DVec2::new(60.0, 60.0)));
    }

    #[test]
    fn out_of_bounds_points_clamp_to_the_boundary() {
        let mut mesh = ControlMesh::new(3, 2, Rect::new(0.0, 0.0, 100.0, 50.0)).unwrap();
        mesh.set(0, 2, DVec2::new(130.0, -20.0));
        let field = BilinearWarpField::new(&mesh);

        let far = field.map(DVec2::new(1e6, -1e6));
        let edge = field.map(DVec2::new(100.0, 0.0));
        assert!(close(far, edge));

        let left = field.map(DVec2::new(-500.0, 25.0));
        let clamped = field.map(DVec2::new(0.0, 25.0));
        assert!(close(left, clamped));
    }

    #[test]
    fn degenerate_bounds_fall_back_to_identity() {
        let mesh = ControlMesh::new(2, 2, Rect::new(0.0, 0.0, 0.0, 50.0)).unwrap();
        let field = BilinearWarpField::new(&mesh);
        let p = DVec2::new(3.0, 4.0);
        assert_eq!(field.map(p), p);

        let mesh = ControlMesh::new(2, 2, Rect::new(0.0, 0.0, 50.0, 0.0)).unwrap();
        let field = BilinearWarpField::new(&mesh);
        assert_eq!(field.map(p), p);
    }

    #[test]
    fn never_produces_non_finite_output() {
        let mut mesh = ControlMesh::new(2, 2, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        mesh.set(0, 0, DVec2::new(f64::MAX / 2.0, 0.0));
        let field = BilinearWarpField::new(&mesh);
        for point in [
            DVec2::new(0.0, 0.0),
            DVec2::new(5.0, 5.0),
            DVec2::new(f64::MAX, f64::MIN),
            DVec2::new(-1e308, 1e308),
        ] {
            assert!(field.map(point).is_finite(), "non-finite output for {point}");
        }

        // Non-finite input passes through untouched rather than poisoning math.
        let nan = DVec2::new(f64::NAN, 1.0);
        assert!(field.map(nan).x.is_nan());
    }

    #[test]
    fn intensity_scales_displacement() {
        let mut mesh = ControlMesh::new(2, 2, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        mesh.set(0, 0, DVec2::new(-40.0, 0.0));
        let p = DVec2::ZERO;

        let full = BilinearWarpField::new(&mesh).map(p);
        let none = BilinearWarpField::new(&mesh).with_intensity(0.0).map(p);
        let half = BilinearWarpField::new(&mesh).with_intensity(0.5).map(p);

        assert!(close(full, DVec2::new(-40.0, 0.0)));
        assert!(close(none, p));
        assert!(close(half, DVec2::new(-20.0, 0.0)));
    }
}
