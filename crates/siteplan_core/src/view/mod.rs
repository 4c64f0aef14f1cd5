//! # Visualization Surface
//!
//! Pan/zoom rendering of a [`crate::SitePlan`]. Owns no layout logic.
//!
//! - `transform` - zoom (clamped to 0.5..=3, ×/÷1.2 per step) and pan offsets
//! - `controller` - pointer/zoom interaction state and redraw revisions
//! - `scene` - plan → ordered draw commands, placeholder when no plan
//! - `svg` - scene → SVG document

mod controller;
mod scene;
mod svg;
mod transform;

pub use controller::ViewController;
pub use scene::{
    render, Anchor, Canvas, DrawCommand, Projection, Scene, Style, CANVAS_MARGIN_PX,
    PLACEHOLDER_TEXT, SCALE_BAR_PX,
};
pub use transform::{ViewTransform, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
