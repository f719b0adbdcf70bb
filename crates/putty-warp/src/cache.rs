//! Dirty-checked cache of warped path geometry.

use putty_path::{parse, serialize, PathSegment};

use crate::{warp_segments, BilinearWarpField};

/// Caches one text object's warped path between mesh edits.
///
/// The warped string stays valid while the mesh [`version`] it was computed
/// against matches the mesh's current version; any control-point mutation
/// bumps the version and forces a re-warp on the next fetch. This replaces
/// recompute-every-frame drawing with a cheap dirty check.
///
/// [`version`]: crate::ControlMesh::version
#[derive(Debug, Clone)]
pub struct WarpedGeometryCache {
    source: String,
    source_segments: Vec<PathSegment>,
    warped: Option<String>,
    mesh_version: u64,
}

impl WarpedGeometryCache {
    /// Creates a cache for a source path, parsing it once.
    pub fn new(source_path: &str) -> Self {
        Self {
            source: source_path.to_string(),
            source_segments: parse(source_path),
            warped: None,
            mesh_version: 0,
        }
    }

    /// The unwarped source path data.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed source segments.
    pub fn source_segments(&self) -> &[PathSegment] {
        &self.source_segments
    }

    /// Replaces the source geometry and drops any cached warp.
    pub fn set_source(&mut self, source_path: &str) {
        self.source = source_path.to_string();
        self.source_segments = parse(source_path);
        self.warped = None;
    }

    /// Drops the cached warped path unconditionally.
    pub fn invalidate(&mut self) {
        self.warped = None;
    }

    /// Returns the warped path for the field's mesh, recomputing only when
    /// the mesh version moved since the last call.
    pub fn warped_path(&mut self, field: &BilinearWarpField<'_>) -> &str {
        let version = field.mesh().version();
        if self.warped.is_none() || self.mesh_version != version {
            let warped = warp_segments(&self.source_segments, field);
            self.warped = Some(serialize(&warped));
            self.mesh_version = version;
        }
        self.warped.get_or_insert_with(String::new)
    }
}
