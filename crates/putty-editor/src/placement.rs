//! Object placement on the canvas.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Where a text object sits on the canvas: pan position, rotation, and the
/// current zoom level.
///
/// Pointer events arrive in screen coordinates; hit-testing against control
/// points happens in the object's local space, so the controller runs every
/// pointer position through [`to_local`](Placement::to_local) first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Object origin in screen space.
    pub position: DVec2,
    /// Rotation in radians, counter-clockwise.
    pub rotation: f64,
    /// Screen pixels per local unit.
    pub zoom: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            rotation: 0.0,
            zoom: 1.0,
        }
    }
}

impl Placement {
    /// Identity placement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the screen-space origin.
    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    /// Builder: set rotation in radians.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set the zoom factor.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// The effective zoom, guarded against zero and non-finite values.
    pub fn effective_zoom(&self) -> f64 {
        if self.zoom.is_finite() && self.zoom.abs() > f64::EPSILON {
            self.zoom
        } else {
            1.0
        }
    }

    /// Transforms a screen-space point into object-local space.
    pub fn to_local(&self, screen: DVec2) -> DVec2 {
        let scaled = (screen - self.position) / self.effective_zoom();
        rotate(scaled, -self.rotation)
    }

    /// Transforms an object-local point into screen space.
    pub fn to_screen(&self, local: DVec2) -> DVec2 {
        rotate(local, self.rotation) * self.effective_zoom() + self.position
    }
}

fn rotate(p: DVec2, angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    DVec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn to_local_inverts_to_screen() {
        let placement = Placement::new()
            .with_position(DVec2::new(320.0, 200.0))
            .with_rotation(FRAC_PI_4)
            .with_zoom(2.5);

        for local in [
            DVec2::ZERO,
            DVec2::new(10.0, -30.0),
            DVec2::new(-7.25, 42.0),
        ] {
            let round_trip = placement.to_local(placement.to_screen(local));
            assert!((round_trip - local).length() < 1e-9);
        }
    }

    #[test]
    fn rotation_is_compensated() {
        let placement = Placement::new().with_rotation(std::f64::consts::FRAC_PI_2);
        // A point one unit right on screen is one unit *down* in local space
        // of an object rotated 90 degrees counter-clockwise.
        let local = placement.to_local(DVec2::new(1.0, 0.0));
        assert!((local - DVec2::new(0.0, -1.0)).length() < 1e-9);
    }

    #[test]
    fn zero_zoom_falls_back_to_identity_scale() {
        let placement = Placement::new().with_zoom(0.0);
        let p = DVec2::new(5.0, 5.0);
        assert_eq!(placement.to_local(p), p);
    }
}
