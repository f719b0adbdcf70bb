//! Bilinear control-mesh warping for putty.
//!
//! The pipeline: a caller supplies path data (usually font outlines) and a
//! grid spec, a [`ControlMesh`] holds the draggable control points, a
//! [`BilinearWarpField`] maps any point of the original rectangle to its
//! deformed position, and [`warp_segments`] pushes a whole parsed path
//! through the field. [`WarpedGeometryCache`] keeps the result until the
//! mesh changes.
//!
//! # Example
//!
//! ```
//! use glam::DVec2;
//! use putty_warp::{warp_path_data, BilinearWarpField, ControlMesh, Rect};
//!
//! let mut mesh = ControlMesh::new(3, 2, Rect::new(0.0, 0.0, 100.0, 50.0)).unwrap();
//! mesh.set(0, 2, DVec2::new(130.0, -20.0));
//!
//! let field = BilinearWarpField::new(&mesh);
//! let warped = warp_path_data("M0 0 L100 0 L100 50 L0 50 Z", &field);
//! assert!(warped.contains("130.000000 -20.000000"));
//! ```

mod cache;
mod engine;
mod field;
mod mesh;

pub use cache::WarpedGeometryCache;
pub use engine::{warp_path_data, warp_segments};
pub use field::{BilinearWarpField, Easing};
pub use mesh::{ControlMesh, MeshError, Rect};
