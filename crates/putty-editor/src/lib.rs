//! Interactive mesh editing and perspective cell rendering for putty.
//!
//! Sits above `putty-warp`: a [`MeshEditor`] owns one text object's control
//! mesh, turns pointer events into control-point drags (in object-local,
//! rotation-compensated space via [`Placement`]), and hands back warped
//! geometry through the [`TextEffect`] dispatch. For raster warping,
//! [`PerspectiveCellRenderer`] redraws bitmap cells through per-quad
//! [`Homography`] transforms on any host [`RasterSurface`].
//!
//! # Example
//!
//! ```
//! use glam::DVec2;
//! use putty_editor::{MeshEditor, Placement, WarpSettings};
//! use putty_warp::Rect;
//!
//! let settings = WarpSettings { columns: 3, rows: 2, padding: 0.0, ..Default::default() };
//! let mut editor = MeshEditor::new(
//!     "M0 0 L100 0 L100 50 L0 50 Z",
//!     Rect::new(0.0, 0.0, 100.0, 50.0),
//!     settings,
//! ).unwrap();
//!
//! let placement = Placement::new();
//! editor.pointer_down(DVec2::new(100.0, 0.0), &placement);
//! editor.pointer_move(DVec2::new(130.0, -20.0), &placement);
//! editor.pointer_up();
//! assert!(editor.warped_path().contains("130.000000 -20.000000"));
//! ```

mod controller;
mod effect;
mod homography;
mod placement;
mod raster;

pub use controller::{MeshEditor, WarpSettings};
pub use effect::{EffectGeometry, TextEffect};
pub use homography::{Homography, SingularQuadError};
pub use placement::Placement;
pub use raster::{PerspectiveCellRenderer, RasterSurface};
