//! Perspective cell rendering for raster (bitmap) mesh warp.
//!
//! Vector warping bends path geometry; raster warping instead cuts a
//! pre-rendered source bitmap into mesh cells and redraws each cell through
//! the perspective transform taking its original rectangle to its warped
//! quadrilateral.

use glam::DVec2;
use putty_warp::{ControlMesh, Rect};

use crate::Homography;

/// The rendering boundary: a host-owned 2D drawing context.
///
/// The renderer never touches pixels itself; it drives this trait, which a
/// host canvas (HTML canvas binding, software rasterizer, test recorder)
/// implements. Context state is scoped per cell: every `save` the renderer
/// issues is matched by a `restore` on all paths, so sibling draws never see
/// a leftover transform or clip.
pub trait RasterSurface {
    /// Pushes the current context state.
    fn save(&mut self);

    /// Pops to the most recently saved context state.
    fn restore(&mut self);

    /// Clips subsequent drawing to a quadrilateral, given in destination
    /// coordinates in winding order.
    fn clip_quad(&mut self, quad: &[DVec2; 4]);

    /// Multiplies the current transform by `(m11, m12, m21, m22, dx, dy)`,
    /// canvas `transform()` argument order.
    fn transform(&mut self, matrix: [f64; 6]);

    /// Draws the `src` region of the bound source bitmap at the same
    /// coordinates, under the current transform.
    fn draw_source_rect(&mut self, src: Rect);
}

/// Redraws a source bitmap through a control mesh, one perspective quad per
/// mesh cell.
///
/// Cells whose corner correspondence is singular (collapsed or collinear,
/// e.g. mid-drag) are skipped; the rest of the image still draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerspectiveCellRenderer;

impl PerspectiveCellRenderer {
    /// Creates a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Draws every mesh cell onto `surface`. Returns the number of cells
    /// actually drawn.
    pub fn draw(&self, mesh: &ControlMesh, surface: &mut impl RasterSurface) -> usize {
        let mut drawn = 0;
        for row in 0..mesh.rows() - 1 {
            for col in 0..mesh.columns() - 1 {
                if self.draw_cell(mesh, row, col, surface) {
                    drawn += 1;
                }
            }
        }
        drawn
    }

    fn draw_cell(
        &self,
        mesh: &ControlMesh,
        row: usize,
        col: usize,
        surface: &mut impl RasterSurface,
    ) -> bool {
        let (Some(src), Some(dst)) = (cell_original(mesh, row, col), cell_current(mesh, row, col))
        else {
            return false;
        };

        let homography = match Homography::from_quad(&src, &dst) {
            Ok(h) => h,
            Err(_) => {
                log::debug!("skipping degenerate mesh cell ({row},{col})");
                return false;
            }
        };

        // The original grid is regular, so the source quad is an
        // axis-aligned rectangle.
        let src_rect = Rect::new(
            src[0].x,
            src[0].y,
            src[1].x - src[0].x,
            src[3].y - src[0].y,
        );

        surface.save();
        surface.clip_quad(&dst);
        surface.transform(homography.affine_coeffs());
        surface.draw_source_rect(src_rect);
        surface.restore();
        true
    }
}

/// A cell's corners in the original layout: tl, tr, br, bl.
fn cell_original(mesh: &ControlMesh, row: usize, col: usize) -> Option<[DVec2; 4]> {
    Some([
        mesh.get_original(row, col)?,
        mesh.get_original(row, col + 1)?,
        mesh.get_original(row + 1, col + 1)?,
        mesh.get_original(row + 1, col)?,
    ])
}

/// A cell's corners in the current (warped) layout: tl, tr, br, bl.
fn cell_current(mesh: &ControlMesh, row: usize, col: usize) -> Option<[DVec2; 4]> {
    Some([
        mesh.get(row, col)?,
        mesh.get(row, col + 1)?,
        mesh.get(row + 1, col + 1)?,
        mesh.get(row + 1, col)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use putty_warp::ControlMesh;

    /// Records surface calls for verification.
    #[derive(Debug, Default)]
    struct Recorder {
        ops: Vec<String>,
        depth: i32,
        max_depth: i32,
        transforms: Vec<[f64; 6]>,
    }

    impl RasterSurface for Recorder {
        fn save(&mut self) {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
            self.ops.push("save".into());
        }

        fn restore(&mut self) {
            self.depth -= 1;
            self.ops.push("restore".into());
        }

        fn clip_quad(&mut self, _quad: &[DVec2; 4]) {
            self.ops.push("clip".into());
        }

        fn transform(&mut self, matrix: [f64; 6]) {
            self.transforms.push(matrix);
            self.ops.push("transform".into());
        }

        fn draw_source_rect(&mut self, _src: Rect) {
            self.ops.push("draw".into());
        }
    }

    fn mesh_3x3() -> ControlMesh {
        ControlMesh::new(3, 3, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap()
    }

    #[test]
    fn draws_every_cell_of_an_intact_mesh() {
        let mesh = mesh_3x3();
        let mut surface = Recorder::default();
        let drawn = PerspectiveCellRenderer::new().draw(&mesh, &mut surface);
        assert_eq!(drawn, 4);
        assert_eq!(surface.ops.iter().filter(|op| *op == "draw").count(), 4);
    }

    #[test]
    fn save_restore_stays_balanced_and_scoped() {
        let mesh = mesh_3x3();
        let mut surface = Recorder::default();
        PerspectiveCellRenderer::new().draw(&mesh, &mut surface);
        assert_eq!(surface.depth, 0, "unbalanced save/restore");
        assert_eq!(surface.max_depth, 1, "cell state must not nest");
    }

    #[test]
    fn identity_mesh_uses_identity_transforms() {
        let mesh = mesh_3x3();
        let mut surface = Recorder::default();
        PerspectiveCellRenderer::new().draw(&mesh, &mut surface);
        for t in &surface.transforms {
            let expected = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
            for (a, e) in t.iter().zip(&expected) {
                assert!((a - e).abs() < 1e-9, "expected identity, got {t:?}");
            }
        }
    }

    #[test]
    fn collapsed_cell_is_skipped_without_touching_the_surface() {
        let mut mesh = mesh_3x3();
        // Collapse the top-left cell onto a line.
        mesh.set(0, 0, DVec2::ZERO);
        mesh.set(0, 1, DVec2::new(25.0, 25.0));
        mesh.set(1, 0, DVec2::new(10.0, 10.0));
        mesh.set(1, 1, DVec2::new(50.0, 50.0));

        let mut surface = Recorder::default();
        let drawn = PerspectiveCellRenderer::new().draw(&mesh, &mut surface);
        assert_eq!(drawn, 3);
        assert_eq!(surface.depth, 0);
        // Skipped cell never saved or clipped.
        assert_eq!(surface.ops.iter().filter(|op| *op == "save").count(), 3);
    }

    #[test]
    fn warped_cell_transform_moves_cell_origin_onto_warped_corner() {
        let mut mesh = mesh_3x3();
        mesh.set(0, 0, DVec2::new(-20.0, -10.0));

        let mut surface = Recorder::default();
        PerspectiveCellRenderer::new().draw(&mesh, &mut surface);

        // First drawn cell covers source (0,0); its transform must take the
        // origin to the dragged corner.
        let [_, _, _, _, dx, dy] = surface.transforms[0];
        assert!((dx + 20.0).abs() < 1e-9);
        assert!((dy + 10.0).abs() < 1e-9);
    }
}
