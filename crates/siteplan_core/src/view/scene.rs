//! Plan → draw commands.
//!
//! The scene is a flat, ordered list of primitives in screen pixels. The
//! parcel is fitted to the canvas (inside a fixed margin), then the view
//! transform's zoom multiplies that scale and its pan offsets the result.

use super::transform::ViewTransform;
use crate::geometry::Rect;
use crate::plan::SitePlan;
use serde::Serialize;

pub const CANVAS_MARGIN_PX: f64 = 20.0;
/// On-screen length of the scale indicator, independent of zoom.
pub const SCALE_BAR_PX: f64 = 100.0;
pub const PLACEHOLDER_TEXT: &str = "Enter site parameters and generate a plan to see the layout";

/// Drawing surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub stroke_width: f64,
}

const PARCEL: Style = Style {
    fill: "#f8fafc",
    stroke: "#334155",
    stroke_width: 2.0,
};
const STREET: Style = Style {
    fill: "#9ca3af",
    stroke: "#6b7280",
    stroke_width: 1.0,
};
const OPEN_SPACE: Style = Style {
    fill: "#bbf7d0",
    stroke: "#16a34a",
    stroke_width: 1.0,
};
const LOT: Style = Style {
    fill: "#fef3c7",
    stroke: "#d97706",
    stroke_width: 1.0,
};
const FOOTPRINT: Style = Style {
    fill: "#bfdbfe",
    stroke: "#2563eb",
    stroke_width: 1.0,
};

const TEXT_COLOR: &str = "#111827";
const BACKGROUND: &str = "#ffffff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DrawCommand {
    Rect {
        rect: Rect,
        style: Style,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        color: &'static str,
        anchor: Anchor,
    },
    ScaleBar {
        x: f64,
        y: f64,
        length_px: f64,
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub canvas: Canvas,
    pub background: &'static str,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self.commands.as_slice(),
            [DrawCommand::Text { text, .. }] if text == PLACEHOLDER_TEXT
        )
    }

    /// Number of rectangles drawn with the given style.
    pub fn count_rects(&self, style_fill: &str) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Rect { style, .. } if style.fill == style_fill))
            .count()
    }
}

/// Parcel feet → screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Pixels per foot, zoom included
    pub scale: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Projection {
    pub fn fit(plan: &SitePlan, canvas: Canvas, transform: &ViewTransform) -> Self {
        let parcel = plan.parcel();
        let avail_w = canvas.width - 2.0 * CANVAS_MARGIN_PX;
        let avail_h = canvas.height - 2.0 * CANVAS_MARGIN_PX;
        let fit = if parcel.width > 0.0 && parcel.height > 0.0 && avail_w > 0.0 && avail_h > 0.0 {
            (avail_w / parcel.width).min(avail_h / parcel.height)
        } else {
            1.0
        };
        Self {
            scale: fit * transform.zoom,
            origin_x: CANVAS_MARGIN_PX + transform.pan_x,
            origin_y: CANVAS_MARGIN_PX + transform.pan_y,
        }
    }

    pub fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.origin_x + x * self.scale, self.origin_y + y * self.scale)
    }

    pub fn rect(&self, r: &Rect) -> Rect {
        let (x, y) = self.point(r.x, r.y);
        Rect::new(x, y, r.width * self.scale, r.height * self.scale)
    }
}

/// Render a plan, or the placeholder prompt when there is none.
pub fn render(plan: Option<&SitePlan>, transform: &ViewTransform, canvas: Canvas) -> Scene {
    let mut scene = Scene {
        canvas,
        background: BACKGROUND,
        commands: Vec::new(),
    };

    let Some(plan) = plan else {
        scene.commands.push(DrawCommand::Text {
            x: canvas.width / 2.0,
            y: canvas.height / 2.0,
            text: PLACEHOLDER_TEXT.to_string(),
            size: 16.0,
            color: TEXT_COLOR,
            anchor: Anchor::Middle,
        });
        return scene;
    };

    let proj = Projection::fit(plan, canvas, transform);
    let label_size = (10.0 * transform.zoom).clamp(8.0, 18.0);
    let cmds = &mut scene.commands;

    cmds.push(DrawCommand::Rect { rect: proj.rect(&plan.parcel()), style: PARCEL });

    for street in &plan.streets {
        let rect = proj.rect(&street.bounds);
        cmds.push(DrawCommand::Rect { rect, style: STREET });
        cmds.push(centered_label(&rect, street.name.clone(), label_size));
    }

    for space in &plan.open_spaces {
        let rect = proj.rect(&space.bounds);
        cmds.push(DrawCommand::Rect { rect, style: OPEN_SPACE });
        cmds.push(centered_label(&rect, "Open Space".to_string(), label_size));
    }

    for lot in &plan.lots {
        let rect = proj.rect(&lot.bounds);
        cmds.push(DrawCommand::Rect { rect, style: LOT });
        if let Some(footprint) = &lot.footprint {
            cmds.push(DrawCommand::Rect { rect: proj.rect(footprint), style: FOOTPRINT });
        }
        cmds.push(centered_label(&rect, format!("Lot {}", lot.id + 1), label_size));
    }

    cmds.push(DrawCommand::ScaleBar {
        x: CANVAS_MARGIN_PX,
        y: canvas.height - CANVAS_MARGIN_PX,
        length_px: SCALE_BAR_PX,
        label: format!("{:.0} ft", SCALE_BAR_PX / proj.scale),
    });

    scene
}

fn centered_label(rect: &Rect, text: String, size: f64) -> DrawCommand {
    DrawCommand::Text {
        x: rect.x + rect.width / 2.0,
        y: rect.y + rect.height / 2.0 + size / 3.0,
        text,
        size,
        color: TEXT_COLOR,
        anchor: Anchor::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::plan::SiteParameters;
    use crate::rules::{DevelopmentType, StreetType};

    fn plan() -> SitePlan {
        generate(&SiteParameters {
            area: 1.0,
            width: 200.0,
            depth: 200.0,
            is_urban: false,
            street_type: StreetType::Local,
            development_type: DevelopmentType::SingleFamily,
            target_lot_size: 5_000.0,
        })
    }

    #[test]
    fn test_no_plan_renders_placeholder() {
        let scene = render(None, &ViewTransform::default(), Canvas::default());
        assert!(scene.is_placeholder());
    }

    #[test]
    fn test_scene_contains_every_element() {
        let plan = plan();
        let scene = render(Some(&plan), &ViewTransform::default(), Canvas::default());
        assert!(!scene.is_placeholder());
        assert_eq!(scene.count_rects(LOT.fill), 4);
        assert_eq!(scene.count_rects(FOOTPRINT.fill), 4);
        assert_eq!(scene.count_rects(STREET.fill), 1);
        assert_eq!(scene.count_rects(OPEN_SPACE.fill), 1);

        let labels: Vec<&str> = scene
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(labels.contains(&"Main Access"));
        assert!(labels.contains(&"Lot 4"));
    }

    #[test]
    fn test_fit_scale_and_pan() {
        let plan = plan();
        // 800x600 canvas, 20 px margins: min(760/200, 560/200) = 2.8 px/ft
        let proj = Projection::fit(&plan, Canvas::default(), &ViewTransform::default());
        assert!((proj.scale - 2.8).abs() < 1e-12);

        let panned = ViewTransform::new(2.0, 15.0, -5.0);
        let proj = Projection::fit(&plan, Canvas::default(), &panned);
        assert!((proj.scale - 5.6).abs() < 1e-12);
        assert_eq!(proj.point(0.0, 0.0), (35.0, 15.0));
    }

    #[test]
    fn test_scale_bar_stays_fixed_while_label_tracks_zoom() {
        let plan = plan();
        let bar = |zoom: f64| {
            let scene = render(Some(&plan), &ViewTransform::new(zoom, 0.0, 0.0), Canvas::default());
            scene
                .commands
                .iter()
                .find_map(|cmd| match cmd {
                    DrawCommand::ScaleBar { length_px, label, .. } => Some((*length_px, label.clone())),
                    _ => None,
                })
                .unwrap()
        };
        let (len_1, label_1) = bar(1.0);
        let (len_2, label_2) = bar(2.0);
        assert_eq!(len_1, SCALE_BAR_PX);
        assert_eq!(len_2, SCALE_BAR_PX);
        assert_eq!(label_1, "36 ft");
        assert_eq!(label_2, "18 ft");
    }
}
