use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
/// Factor applied by one zoom-in / zoom-out step.
pub const ZOOM_STEP: f64 = 1.2;

/// Zoom and pan applied on top of the fit-to-canvas scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub zoom: f64,
    /// Horizontal offset in pixels
    pub pan_x: f64,
    /// Vertical offset in pixels
    pub pan_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan_x,
            pan_y,
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = clamp_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = clamp_zoom(self.zoom / ZOOM_STEP);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        1.0
    } else {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}
