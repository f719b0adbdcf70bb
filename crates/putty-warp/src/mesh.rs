//! Control mesh for bilinear warping.
//!
//! A [`ControlMesh`] is a regular grid of draggable control points spanning a
//! bounding rectangle, plus an immutable snapshot of the grid's original
//! layout. Deformation is defined by how far points have been dragged from
//! that snapshot; see [`BilinearWarpField`](crate::BilinearWarpField).

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis-aligned rectangle in f64 canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (may be zero for degenerate geometry).
    pub width: f64,
    /// Height (may be zero for degenerate geometry).
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn min(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Bottom-right corner.
    pub fn max(&self) -> DVec2 {
        DVec2::new(self.x + self.width, self.y + self.height)
    }

    /// Width and height as a vector.
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// True when the rectangle cannot support interpolation.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Returns the rectangle grown by `factor` of its own size on every side.
    ///
    /// Used to pad a text object's measured bounds so the mesh extends past
    /// the glyph edges.
    pub fn expanded_by(&self, factor: f64) -> Rect {
        let dx = self.width * factor;
        let dy = self.height * factor;
        Rect::new(
            self.x - dx,
            self.y - dy,
            self.width + dx * 2.0,
            self.height + dy * 2.0,
        )
    }
}

/// Error for invalid mesh construction parameters.
///
/// Raised only at the construction boundary; a mesh that exists is always
/// structurally valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MeshError {
    /// Fewer than 2 columns or rows.
    #[error("invalid mesh dimensions {columns}x{rows}: need at least 2x2")]
    InvalidDimensions {
        /// Requested column count.
        columns: usize,
        /// Requested row count.
        rows: usize,
    },

    /// A point buffer whose length does not match `columns * rows`.
    ///
    /// Only reachable through deserialization of corrupt saved state;
    /// construction always lays out the full grid.
    #[error("invalid mesh point count: expected {expected}, got {found}")]
    InvalidPointCount {
        /// `columns * rows`.
        expected: usize,
        /// Length of the offending buffer.
        found: usize,
    },
}

/// A regular grid of control points with its original layout snapshot.
///
/// Points are stored row-major: `index = row * columns + col`. The original
/// snapshot is taken at construction (and [`resize`](ControlMesh::resize))
/// time and never mutated afterwards, so [`reset`](ControlMesh::reset) can
/// restore the undeformed grid exactly.
///
/// Every mutation bumps an internal version counter; cached warped geometry
/// compares against [`version`](ControlMesh::version) instead of recomputing
/// each frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MeshData")]
pub struct ControlMesh {
    columns: usize,
    rows: usize,
    bounds: Rect,
    points: Vec<DVec2>,
    original: Vec<DVec2>,
    #[serde(skip)]
    version: u64,
}

/// Wire form of a mesh; re-validated before becoming a [`ControlMesh`] so a
/// corrupt or hand-edited save file is rejected at the load boundary instead
/// of violating grid invariants downstream.
#[derive(Debug, Clone, Deserialize)]
struct MeshData {
    columns: usize,
    rows: usize,
    bounds: Rect,
    points: Vec<DVec2>,
    original: Vec<DVec2>,
}

impl TryFrom<MeshData> for ControlMesh {
    type Error = MeshError;

    fn try_from(data: MeshData) -> Result<Self, MeshError> {
        if data.columns < 2 || data.rows < 2 {
            return Err(MeshError::InvalidDimensions {
                columns: data.columns,
                rows: data.rows,
            });
        }
        let expected = data.columns * data.rows;
        for buffer in [&data.points, &data.original] {
            if buffer.len() != expected {
                return Err(MeshError::InvalidPointCount {
                    expected,
                    found: buffer.len(),
                });
            }
        }
        Ok(Self {
            columns: data.columns,
            rows: data.rows,
            bounds: data.bounds,
            points: data.points,
            original: data.original,
            version: 0,
        })
    }
}

impl ControlMesh {
    /// Creates a mesh of `columns * rows` points laid out on a regular grid
    /// spanning `bounds`.
    ///
    /// Returns [`MeshError::InvalidDimensions`] when either dimension is
    /// below 2; callers (the UI layer) are expected to clamp user input
    /// before reaching this boundary.
    pub fn new(columns: usize, rows: usize, bounds: Rect) -> Result<Self, MeshError> {
        if columns < 2 || rows < 2 {
            return Err(MeshError::InvalidDimensions { columns, rows });
        }

        let mut points = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for col in 0..columns {
                let t = DVec2::new(
                    col as f64 / (columns - 1) as f64,
                    row as f64 / (rows - 1) as f64,
                );
                points.push(bounds.min() + bounds.size() * t);
            }
        }

        Ok(Self {
            columns,
            rows,
            bounds,
            original: points.clone(),
            points,
            version: 0,
        })
    }

    /// Column count.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The original (undeformed) bounding rectangle.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Current control points, row-major.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Original control points, row-major.
    pub fn original_points(&self) -> &[DVec2] {
        &self.original
    }

    /// Monotonic revision token; bumped by every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when no point has moved from its original position.
    pub fn is_identity(&self) -> bool {
        self.points == self.original
    }

    /// Linear index for a grid position.
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }

    /// Current position of the point at `(row, col)`, if in range.
    pub fn get(&self, row: usize, col: usize) -> Option<DVec2> {
        if row < self.rows && col < self.columns {
            Some(self.points[self.index(row, col)])
        } else {
            None
        }
    }

    /// Original position of the point at `(row, col)`, if in range.
    pub fn get_original(&self, row: usize, col: usize) -> Option<DVec2> {
        if row < self.rows && col < self.columns {
            Some(self.original[self.index(row, col)])
        } else {
            None
        }
    }

    /// Moves the point at `(row, col)`.
    ///
    /// Out-of-range positions are a no-op: the UI can hold stale indices
    /// briefly during a resize transition, and those must not panic.
    pub fn set(&mut self, row: usize, col: usize, position: DVec2) {
        if row < self.rows && col < self.columns {
            let index = self.index(row, col);
            self.points[index] = position;
            self.version += 1;
        }
    }

    /// Moves the point at a linear index. Out-of-range indices are a no-op.
    pub fn set_point(&mut self, index: usize, position: DVec2) {
        if index < self.points.len() {
            self.points[index] = position;
            self.version += 1;
        }
    }

    /// Restores every point to its original position.
    ///
    /// Copies point values element-wise; the underlying buffer is kept, not
    /// swapped. Points are plain values, so callers that cached positions
    /// should re-fetch by index afterwards.
    pub fn reset(&mut self) {
        self.points.copy_from_slice(&self.original);
        self.version += 1;
    }

    /// Rebuilds the grid with new dimensions and bounds.
    ///
    /// Equivalent to constructing a fresh mesh: prior drag edits are
    /// discarded. This is a deliberate design choice, not data loss to guard
    /// against.
    pub fn resize(&mut self, columns: usize, rows: usize, bounds: Rect) -> Result<(), MeshError> {
        let rebuilt = ControlMesh::new(columns, rows, bounds)?;
        self.columns = rebuilt.columns;
        self.rows = rebuilt.rows;
        self.bounds = rebuilt.bounds;
        self.points = rebuilt.points;
        self.original = rebuilt.original;
        self.version += 1;
        Ok(())
    }
}
