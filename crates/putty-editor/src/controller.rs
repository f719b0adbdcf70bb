//! Interactive control-point editing.

use glam::DVec2;
use putty_warp::{BilinearWarpField, ControlMesh, Easing, MeshError, Rect, WarpedGeometryCache};
use serde::{Deserialize, Serialize};

use crate::{EffectGeometry, Placement, TextEffect};

/// Pointer hit radius around a control point, in screen pixels.
const HIT_RADIUS: f64 = 12.0;

/// Tunable warp parameters the host UI exposes as sliders and toggles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarpSettings {
    /// Mesh columns (minimum 2; the UI clamps before calling in).
    pub columns: usize,
    /// Mesh rows (minimum 2).
    pub rows: usize,
    /// Mesh padding around the text bounds, as a fraction of their size.
    pub padding: f64,
    /// Deformation intensity: 0 is identity, 1 is the full mesh warp.
    pub intensity: f64,
    /// Weight easing for the warp field.
    pub easing: Easing,
    /// Whether the host should draw the grid overlay.
    pub show_grid: bool,
}

impl Default for WarpSettings {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 3,
            padding: 0.1,
            intensity: 1.0,
            easing: Easing::Linear,
            show_grid: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging { point: usize },
}

/// Owns one text object's control mesh and reacts to pointer input.
///
/// All methods run synchronously inside the host's event handlers: a
/// [`pointer_move`](MeshEditor::pointer_move) mutates the mesh, invalidates
/// cached geometry (through the mesh version token), and reports the need to
/// redraw in the same call, so a redraw always sees the mesh state of the
/// event that triggered it.
///
/// Each editor owns its mesh outright; nothing is shared between objects, so
/// multiple text objects can carry live warps side by side.
#[derive(Debug, Clone)]
pub struct MeshEditor {
    mesh: ControlMesh,
    cache: WarpedGeometryCache,
    settings: WarpSettings,
    content_bounds: Rect,
    drag: DragState,
}

impl MeshEditor {
    /// Creates an editor for a text object.
    ///
    /// `content_bounds` is the object's measured geometry; the mesh spans it
    /// expanded by the settings' padding factor.
    pub fn new(
        source_path: &str,
        content_bounds: Rect,
        settings: WarpSettings,
    ) -> Result<Self, MeshError> {
        let mesh = ControlMesh::new(
            settings.columns,
            settings.rows,
            content_bounds.expanded_by(settings.padding),
        )?;
        Ok(Self {
            mesh,
            cache: WarpedGeometryCache::new(source_path),
            settings,
            content_bounds,
            drag: DragState::Idle,
        })
    }

    /// Rebuilds an editor from persisted state.
    ///
    /// The mesh keeps its saved control-point positions; only runtime state
    /// (drag, cache) starts fresh.
    pub fn from_saved(
        source_path: &str,
        content_bounds: Rect,
        settings: WarpSettings,
        mesh: ControlMesh,
    ) -> Self {
        Self {
            mesh,
            cache: WarpedGeometryCache::new(source_path),
            settings,
            content_bounds,
            drag: DragState::Idle,
        }
    }

    /// The control mesh (persist this alongside the effect tag).
    pub fn mesh(&self) -> &ControlMesh {
        &self.mesh
    }

    /// Current settings.
    pub fn settings(&self) -> WarpSettings {
        self.settings
    }

    /// The point index being dragged, if any.
    pub fn dragging(&self) -> Option<usize> {
        match self.drag {
            DragState::Idle => None,
            DragState::Dragging { point } => Some(point),
        }
    }

    /// Pointer pressed. Starts a drag when the pointer lands within the hit
    /// radius of a control point; returns whether a drag started.
    ///
    /// Hit-testing happens in object-local space: the screen position is run
    /// through the inverse placement transform (pan, zoom, rotation), and
    /// the radius shrinks with zoom so it stays constant on screen.
    pub fn pointer_down(&mut self, screen: DVec2, placement: &Placement) -> bool {
        if self.drag != DragState::Idle {
            return false;
        }
        let local = placement.to_local(screen);
        let radius = HIT_RADIUS / placement.effective_zoom().abs();

        let mut best: Option<(usize, f64)> = None;
        for (index, point) in self.mesh.points().iter().enumerate() {
            let distance = (*point - local).length();
            if distance <= radius && best.map_or(true, |(_, d)| distance < d) {
                best = Some((index, distance));
            }
        }

        match best {
            Some((point, _)) => {
                self.drag = DragState::Dragging { point };
                true
            }
            None => false,
        }
    }

    /// Pointer moved. While dragging, moves the grabbed control point to the
    /// pointer's local position; returns whether a redraw is needed.
    pub fn pointer_move(&mut self, screen: DVec2, placement: &Placement) -> bool {
        let DragState::Dragging { point } = self.drag else {
            return false;
        };
        self.mesh.set_point(point, placement.to_local(screen));
        true
    }

    /// Pointer released. Returns whether a drag was in progress.
    pub fn pointer_up(&mut self) -> bool {
        let was_dragging = self.drag != DragState::Idle;
        self.drag = DragState::Idle;
        was_dragging
    }

    /// Restores every control point to its original position.
    pub fn reset(&mut self) {
        self.mesh.reset();
    }

    /// Sets the column count, rebuilding the grid. Prior edits are
    /// discarded; hosts should confirm with the user first.
    pub fn set_columns(&mut self, columns: usize) -> Result<(), MeshError> {
        self.settings.columns = columns;
        self.rebuild_mesh()
    }

    /// Sets the row count, rebuilding the grid (edits are discarded).
    pub fn set_rows(&mut self, rows: usize) -> Result<(), MeshError> {
        self.settings.rows = rows;
        self.rebuild_mesh()
    }

    /// Sets the padding factor, rebuilding the grid (edits are discarded).
    pub fn set_padding(&mut self, padding: f64) -> Result<(), MeshError> {
        self.settings.padding = padding;
        self.rebuild_mesh()
    }

    /// Sets the deformation intensity.
    pub fn set_intensity(&mut self, intensity: f64) {
        self.settings.intensity = intensity;
        self.cache.invalidate();
    }

    /// Sets the weight easing.
    pub fn set_easing(&mut self, easing: Easing) {
        self.settings.easing = easing;
        self.cache.invalidate();
    }

    /// Toggles the host-drawn grid overlay.
    pub fn set_show_grid(&mut self, show: bool) {
        self.settings.show_grid = show;
    }

    /// Whether the host should draw the grid overlay.
    pub fn show_grid(&self) -> bool {
        self.settings.show_grid
    }

    /// Replaces the source geometry (text or font changed), rebuilding the
    /// mesh over the new bounds.
    pub fn set_source(
        &mut self,
        source_path: &str,
        content_bounds: Rect,
    ) -> Result<(), MeshError> {
        self.cache.set_source(source_path);
        self.content_bounds = content_bounds;
        self.rebuild_mesh()
    }

    /// The warped source path under the current mesh and settings, cached
    /// between mesh edits.
    pub fn warped_path(&mut self) -> &str {
        let field = BilinearWarpField::new(&self.mesh)
            .with_easing(self.settings.easing)
            .with_intensity(self.settings.intensity);
        self.cache.warped_path(&field)
    }

    /// Produces the drawable geometry for an effect variant.
    pub fn geometry(&mut self, effect: TextEffect) -> EffectGeometry {
        match effect {
            TextEffect::GridWarp => EffectGeometry::WarpedPath(self.warped_path().to_string()),
            TextEffect::MeshWarp => EffectGeometry::RasterCells,
            TextEffect::Normal
            | TextEffect::Skewed
            | TextEffect::CircularText
            | TextEffect::CurvedText => {
                EffectGeometry::SourcePath(self.cache.source().to_string())
            }
        }
    }

    fn rebuild_mesh(&mut self) -> Result<(), MeshError> {
        self.mesh.resize(
            self.settings.columns,
            self.settings.rows,
            self.content_bounds.expanded_by(self.settings.padding),
        )
    }
}
