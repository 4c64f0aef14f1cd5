//! Interaction state for the plan viewer.
//!
//! Owns the displayed plan and the view transform. Every zoom, pan step or
//! plan change bumps `revision`; the host redraws the whole scene whenever it
//! sees a new revision.

use super::scene::{render, Canvas, Scene};
use super::transform::ViewTransform;
use crate::plan::SitePlan;

#[derive(Debug, Clone, Default)]
pub struct ViewController {
    plan: Option<SitePlan>,
    transform: ViewTransform,
    canvas: Canvas,
    panning: bool,
    last_pointer: (f64, f64),
    revision: u64,
}

impl ViewController {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    pub fn plan(&self) -> Option<&SitePlan> {
        self.plan.as_ref()
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the displayed plan; returns the one it replaced.
    pub fn set_plan(&mut self, plan: Option<SitePlan>) -> Option<SitePlan> {
        self.bump();
        std::mem::replace(&mut self.plan, plan)
    }

    pub fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
        self.bump();
    }

    pub fn zoom_in(&mut self) {
        self.transform.zoom_in();
        self.bump();
    }

    pub fn zoom_out(&mut self) {
        self.transform.zoom_out();
        self.bump();
    }

    pub fn reset_view(&mut self) {
        self.transform = ViewTransform::default();
        self.panning = false;
        self.bump();
    }

    pub fn begin_pan(&mut self, x: f64, y: f64) {
        self.panning = true;
        self.last_pointer = (x, y);
    }

    /// Pointer moved. Pans 1:1 while a pan is active; returns whether the view changed.
    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        if !self.panning {
            return false;
        }
        let (last_x, last_y) = self.last_pointer;
        self.transform.pan_by(x - last_x, y - last_y);
        self.last_pointer = (x, y);
        self.bump();
        true
    }

    pub fn end_pan(&mut self) {
        self.panning = false;
    }

    pub fn pointer_leave(&mut self) {
        self.end_pan();
    }

    pub fn render(&self) -> Scene {
        render(self.plan.as_ref(), &self.transform, self.canvas)
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::plan::SiteParameters;
    use crate::rules::{DevelopmentType, StreetType};

    fn plan(area: f64) -> SitePlan {
        generate(&SiteParameters {
            area,
            width: 200.0,
            depth: 200.0,
            is_urban: false,
            street_type: StreetType::Local,
            development_type: DevelopmentType::SingleFamily,
            target_lot_size: 5_000.0,
        })
    }

    #[test]
    fn test_drag_pans_one_to_one_only_while_panning() {
        let mut view = ViewController::default();
        assert!(!view.drag_to(50.0, 50.0));
        assert_eq!(view.transform().pan_x, 0.0);

        view.begin_pan(10.0, 10.0);
        assert!(view.drag_to(25.0, 4.0));
        assert!(view.drag_to(30.0, 4.0));
        assert_eq!(view.transform().pan_x, 20.0);
        assert_eq!(view.transform().pan_y, -6.0);

        view.end_pan();
        assert!(!view.drag_to(100.0, 100.0));
        assert_eq!(view.transform().pan_x, 20.0);
    }

    #[test]
    fn test_pointer_leave_ends_panning() {
        let mut view = ViewController::default();
        view.begin_pan(0.0, 0.0);
        view.pointer_leave();
        assert!(!view.is_panning());
    }

    #[test]
    fn test_every_change_bumps_revision() {
        let mut view = ViewController::default();
        let start = view.revision();
        view.zoom_in();
        view.zoom_out();
        view.set_plan(Some(plan(1.0)));
        view.begin_pan(0.0, 0.0);
        view.drag_to(1.0, 1.0);
        assert_eq!(view.revision(), start + 4);
    }

    #[test]
    fn test_set_plan_replaces_wholesale() {
        let mut view = ViewController::default();
        assert!(view.render().is_placeholder());

        assert!(view.set_plan(Some(plan(1.0))).is_none());
        let previous = view.set_plan(Some(plan(6.0))).unwrap();
        assert_eq!(previous.parameters.area, 1.0);
        assert!(view.plan().unwrap().has_internal_street());

        view.set_plan(None);
        assert!(view.render().is_placeholder());
    }

    #[test]
    fn test_resize_refits_the_plan() {
        let mut view = ViewController::new(Canvas::default());
        view.set_plan(Some(plan(1.0)));
        let before = view.revision();

        // 440x440 canvas, 20 px margins: 400 px for a 200 ft parcel
        view.resize(Canvas { width: 440.0, height: 440.0 });
        assert_eq!(view.revision(), before + 1);

        let scene = view.render();
        assert_eq!(scene.canvas.width, 440.0);
        let parcel = scene.commands.iter().find_map(|cmd| match cmd {
            crate::view::DrawCommand::Rect { rect, .. } => Some(*rect),
            _ => None,
        });
        assert_eq!(parcel.unwrap().width, 400.0);
    }

    #[test]
    fn test_reset_view_restores_defaults() {
        let mut view = ViewController::default();
        view.zoom_in();
        view.begin_pan(0.0, 0.0);
        view.drag_to(40.0, 40.0);
        view.reset_view();
        assert_eq!(view.transform(), ViewTransform::default());
        assert!(!view.is_panning());
    }
}
