//! The closed set of text effect variants.
//!
//! Drawing code dispatches on this enum instead of a free-form string tag,
//! so an unhandled variant is a compile error, not a silent fallthrough.

use serde::{Deserialize, Serialize};

/// Which effect is active on a text object.
///
/// Serialized as part of the owning object's state so a reload restores the
/// active effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEffect {
    /// Plain text, no deformation.
    #[default]
    Normal,
    /// Skewed/slanted text (caller-side affine draw).
    Skewed,
    /// Text on a full circle (caller-side per-glyph draw).
    CircularText,
    /// Text on an arc (caller-side per-glyph draw).
    CurvedText,
    /// Vector warp: path geometry bent through the control mesh.
    GridWarp,
    /// Raster warp: a rendered bitmap redrawn through mesh cells.
    MeshWarp,
}

impl TextEffect {
    /// True when the effect bends vector path geometry through the mesh.
    pub const fn warps_path(self) -> bool {
        matches!(self, TextEffect::GridWarp)
    }

    /// True when the effect redraws a rasterized source through mesh cells.
    pub const fn warps_raster(self) -> bool {
        matches!(self, TextEffect::MeshWarp)
    }

    /// True when the effect needs a control mesh at all. Switching to an
    /// effect where this is false is the point where the owning object drops
    /// its mesh.
    pub const fn uses_mesh(self) -> bool {
        self.warps_path() || self.warps_raster()
    }
}

/// Drawable geometry produced for one text object under its active effect.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectGeometry {
    /// Fill the object's source path as-is; any slant/arc layout is the
    /// caller's imperative draw.
    SourcePath(String),
    /// Fill this warped path.
    WarpedPath(String),
    /// Run the [`PerspectiveCellRenderer`](crate::PerspectiveCellRenderer)
    /// over the object's rasterized source.
    RasterCells,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_warp_variants_use_the_mesh() {
        for effect in [
            TextEffect::Normal,
            TextEffect::Skewed,
            TextEffect::CircularText,
            TextEffect::CurvedText,
        ] {
            assert!(!effect.uses_mesh(), "{effect:?} should not hold a mesh");
        }
        assert!(TextEffect::GridWarp.warps_path());
        assert!(!TextEffect::GridWarp.warps_raster());
        assert!(TextEffect::MeshWarp.warps_raster());
        assert!(!TextEffect::MeshWarp.warps_path());
    }

    #[test]
    fn serializes_as_a_plain_tag() {
        let json = serde_json::to_string(&TextEffect::GridWarp).unwrap();
        assert_eq!(json, "\"GridWarp\"");
        let back: TextEffect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TextEffect::GridWarp);
    }
}
