// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interaction state machine.
//!
//! Consumes raw pointer events plus the active tool selection and drives
//! the annotation store and view transform. This is the only stateful,
//! event-ordered component: every transition runs synchronously to
//! completion inside one event, so a move can never arrive after the up
//! that ended its gesture.
//!
//! There is deliberately no cancel transition. A draw gesture is either
//! committed or discarded purely by point count at pointer-up; an
//! operator who wants to abandon a stroke releases and deletes.

use crate::engine::store::AnnotationStore;
use crate::engine::view::ViewTransform;
use crate::models::annotation::{Point, RoiAnnotation, RoiId, RoiKind};
use crate::util::geometry;

/// Active tool. External configuration, not a state: the machine reads it
/// at pointer-down to pick a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Pencil,
    Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Drawing tools that can own an in-progress gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawTool {
    Pencil,
    Rect,
}

impl DrawTool {
    fn kind(self) -> RoiKind {
        match self {
            DrawTool::Pencil => RoiKind::Freehand,
            DrawTool::Rect => RoiKind::Rect,
        }
    }
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Drawing { tool: DrawTool, points: Vec<Point> },
    DraggingVertex { id: RoiId, index: usize },
    Panning { anchor: egui::Vec2 },
}

pub struct InteractionStateMachine {
    state: State,
    tool: Tool,
    /// Counter for default labels on committed regions.
    label_counter: usize,
    label_prefix: String,
}

impl InteractionStateMachine {
    pub fn new(label_prefix: String) -> Self {
        Self {
            state: State::Idle,
            tool: Tool::Select,
            label_counter: 0,
            label_prefix,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// True while a gesture (draw, drag or pan) is in flight.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    /// Points of the in-progress draw gesture, for preview rendering.
    pub fn in_progress_points(&self) -> Option<&[Point]> {
        match &self.state {
            State::Drawing { points, .. } => Some(points),
            _ => None,
        }
    }

    pub fn pointer_down(
        &mut self,
        pos: egui::Pos2,
        button: PointerButton,
        pan_modifier: bool,
        store: &mut AnnotationStore,
        view: &mut ViewTransform,
    ) {
        if self.is_active() {
            // A second button press mid-gesture changes nothing.
            return;
        }

        // Explicit pan: secondary button anywhere, or the modifier key
        // while the select tool is active. Anchor-relative so later moves
        // don't jump.
        if button == PointerButton::Secondary || (pan_modifier && self.tool == Tool::Select) {
            self.state = State::Panning {
                anchor: pos.to_vec2() - view.pan(),
            };
            return;
        }

        let cursor = view.to_annotation_space(pos);
        match self.tool {
            Tool::Select => {
                // Document order: ROI insertion order, then point index.
                // Handles are point-sized so the first hit wins; no
                // z-order resolution needed.
                let threshold = view.hit_threshold();
                for roi in store.list() {
                    for (index, point) in roi.points.iter().enumerate() {
                        if point.distance_to(&cursor) <= threshold {
                            log::debug!("grabbed vertex {index} of ROI {}", roi.id);
                            self.state = State::DraggingVertex { id: roi.id, index };
                            return;
                        }
                    }
                }
                // No hit: the select tool never draws.
            }
            Tool::Pencil => {
                self.state = State::Drawing {
                    tool: DrawTool::Pencil,
                    points: vec![cursor],
                };
            }
            Tool::Rect => {
                self.state = State::Drawing {
                    tool: DrawTool::Rect,
                    points: vec![cursor],
                };
            }
        }
    }

    pub fn pointer_moved(
        &mut self,
        pos: egui::Pos2,
        store: &mut AnnotationStore,
        view: &mut ViewTransform,
    ) {
        match &mut self.state {
            State::Idle => {}
            State::Drawing { tool, points } => {
                let cursor = view.to_annotation_space(pos);
                match tool {
                    // Freehand polyline growth.
                    DrawTool::Pencil => points.push(cursor),
                    // A rect gesture only ever remembers its two defining
                    // corners while in progress.
                    DrawTool::Rect => {
                        points.truncate(1);
                        points.push(cursor);
                    }
                }
            }
            State::DraggingVertex { id, index } => {
                let cursor = view.to_annotation_space(pos);
                // Incremental mutation; the store recomputes measurements
                // and promotes the confirmation flag. A vanished ROI makes
                // this a no-op.
                store.update_point(*id, *index, cursor);
            }
            State::Panning { anchor } => {
                view.set_pan(pos.to_vec2() - *anchor);
            }
        }
    }

    /// Finish the current gesture. Returns the id of a newly committed
    /// ROI, if the gesture produced one.
    pub fn pointer_up(&mut self, store: &mut AnnotationStore) -> Option<RoiId> {
        let state = std::mem::replace(&mut self.state, State::Idle);
        match state {
            State::Drawing { tool, points } => self.commit_drawing(tool, points, store),
            // Vertex drags and pans mutated incrementally; nothing left to
            // commit.
            State::DraggingVertex { .. } | State::Panning { .. } | State::Idle => None,
        }
    }

    fn commit_drawing(
        &mut self,
        tool: DrawTool,
        points: Vec<Point>,
        store: &mut AnnotationStore,
    ) -> Option<RoiId> {
        let points = match tool {
            DrawTool::Rect if points.len() == 2 => geometry::rect_to_polygon(points[0], points[1]),
            _ => points,
        };

        if points.len() < 2 {
            // Degenerate gesture (down+up with no drag): silently discard.
            log::debug!("discarded draw gesture with {} point(s)", points.len());
            return None;
        }

        self.label_counter += 1;
        let label = format!("{} {}", self.label_prefix, self.label_counter);
        let id = store.add(RoiAnnotation::draft(tool.kind(), points, label, true))?;
        log::info!("committed ROI {id} with {} points", store.get(id).map_or(0, |r| r.point_count()));

        // Drawing is one-shot: the tool reverts to select after a commit.
        self.tool = Tool::Select;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::RoiKind;

    struct Fixture {
        machine: InteractionStateMachine,
        store: AnnotationStore,
        view: ViewTransform,
    }

    impl Fixture {
        fn new() -> Self {
            let mut view = ViewTransform::default();
            // 1000x1000 viewport at the origin: device px == annotation
            // units * 10, which keeps the test arithmetic readable.
            view.set_viewport(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1000.0, 1000.0),
            ));
            Self {
                machine: InteractionStateMachine::new("lesion".to_string()),
                store: AnnotationStore::new(),
                view,
            }
        }

        fn down(&mut self, x: f32, y: f32) {
            self.machine.pointer_down(
                egui::pos2(x, y),
                PointerButton::Primary,
                false,
                &mut self.store,
                &mut self.view,
            );
        }

        fn moved(&mut self, x: f32, y: f32) {
            self.machine
                .pointer_moved(egui::pos2(x, y), &mut self.store, &mut self.view);
        }

        fn up(&mut self) -> Option<RoiId> {
            self.machine.pointer_up(&mut self.store)
        }
    }

    #[test]
    fn test_pencil_gesture_commits_freehand_roi() {
        let mut fx = Fixture::new();
        fx.machine.set_tool(Tool::Pencil);
        fx.down(100.0, 100.0);
        fx.moved(200.0, 100.0);
        fx.moved(200.0, 200.0);
        let id = fx.up().expect("gesture should commit");

        let roi = fx.store.get(id).unwrap();
        assert_eq!(roi.kind, RoiKind::Freehand);
        assert_eq!(roi.point_count(), 3);
        assert!(roi.confirmed);
        assert!(roi.measurements.length_mm > 0.0);
        assert_eq!(roi.label, "lesion 1");
    }

    #[test]
    fn test_click_without_move_is_discarded() {
        let mut fx = Fixture::new();
        fx.machine.set_tool(Tool::Pencil);
        fx.down(100.0, 100.0);
        assert_eq!(fx.up(), None);
        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_stroke_outside_image_commits_clamped_points() {
        // A stroke that starts or wanders past the image border must not
        // store out-of-range coordinates; it hugs the edge instead.
        let mut fx = Fixture::new();
        fx.machine.set_tool(Tool::Pencil);
        fx.down(-80.0, 500.0);
        fx.moved(200.0, 500.0);
        fx.moved(200.0, 1400.0);
        let id = fx.up().expect("clamped stroke still commits");

        let roi = fx.store.get(id).unwrap();
        assert_eq!(roi.points[0], Point::new(0.0, 50.0));
        assert_eq!(roi.points[2], Point::new(20.0, 100.0));
        for p in &roi.points {
            assert!((0.0..=100.0).contains(&p.x), "x out of range: {}", p.x);
            assert!((0.0..=100.0).contains(&p.y), "y out of range: {}", p.y);
        }
    }

    #[test]
    fn test_rect_gesture_expands_to_four_corners() {
        let mut fx = Fixture::new();
        fx.machine.set_tool(Tool::Rect);
        fx.down(100.0, 100.0);
        fx.moved(300.0, 200.0);
        fx.moved(500.0, 400.0);
        let id = fx.up().unwrap();

        let roi = fx.store.get(id).unwrap();
        assert_eq!(roi.kind, RoiKind::Rect);
        assert_eq!(roi.point_count(), 4);
        // Clockwise, rooted at the down corner.
        assert_eq!(roi.points[0], Point::new(10.0, 10.0));
        assert_eq!(roi.points[1], Point::new(50.0, 10.0));
        assert_eq!(roi.points[2], Point::new(50.0, 40.0));
        assert_eq!(roi.points[3], Point::new(10.0, 40.0));
    }

    #[test]
    fn test_rect_keeps_only_two_corners_while_drawing() {
        let mut fx = Fixture::new();
        fx.machine.set_tool(Tool::Rect);
        fx.down(100.0, 100.0);
        for i in 0..20 {
            fx.moved(100.0 + i as f32 * 10.0, 150.0);
        }
        assert_eq!(fx.machine.in_progress_points().unwrap().len(), 2);
        fx.up();
    }

    #[test]
    fn test_commit_reverts_tool_to_select() {
        let mut fx = Fixture::new();
        fx.machine.set_tool(Tool::Rect);
        fx.down(100.0, 100.0);
        fx.moved(300.0, 300.0);
        fx.up();
        assert_eq!(fx.machine.tool(), Tool::Select);
    }

    #[test]
    fn test_discarded_gesture_keeps_tool() {
        let mut fx = Fixture::new();
        fx.machine.set_tool(Tool::Pencil);
        fx.down(100.0, 100.0);
        fx.up();
        assert_eq!(fx.machine.tool(), Tool::Pencil);
    }

    #[test]
    fn test_select_drags_nearest_vertex_and_promotes() {
        let mut fx = Fixture::new();
        let id = fx.store.add(RoiAnnotation::draft(
            RoiKind::Freehand,
            vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0)],
            "proposal".to_string(),
            false,
        )).unwrap();

        // Grab the second vertex (device 200,100) and drag it.
        fx.down(200.0, 100.0);
        fx.moved(400.0, 300.0);
        assert_eq!(fx.up(), None, "drags commit incrementally, not at up");

        let roi = fx.store.get(id).unwrap();
        assert_eq!(roi.points[1], Point::new(40.0, 30.0));
        assert_eq!(roi.points[0], Point::new(10.0, 10.0));
        assert!(roi.confirmed);
    }

    #[test]
    fn test_select_miss_stays_idle() {
        let mut fx = Fixture::new();
        fx.store.add(RoiAnnotation::draft(
            RoiKind::Freehand,
            vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0)],
            "lesion".to_string(),
            true,
        ));
        fx.down(900.0, 900.0);
        assert!(!fx.machine.is_active());
        fx.moved(910.0, 910.0);
        assert_eq!(fx.up(), None);
        assert_eq!(fx.store.len(), 1);
    }

    #[test]
    fn test_first_match_wins_in_document_order() {
        let mut fx = Fixture::new();
        // Two ROIs sharing a vertex location; the earlier insertion wins.
        let first = fx.store.add(RoiAnnotation::draft(
            RoiKind::Freehand,
            vec![Point::new(30.0, 30.0), Point::new(40.0, 40.0)],
            "a".to_string(),
            false,
        )).unwrap();
        let second = fx.store.add(RoiAnnotation::draft(
            RoiKind::Freehand,
            vec![Point::new(30.0, 30.0), Point::new(50.0, 50.0)],
            "b".to_string(),
            false,
        )).unwrap();

        fx.down(300.0, 300.0);
        fx.moved(310.0, 310.0);
        fx.up();

        assert!(fx.store.get(first).unwrap().confirmed);
        assert!(!fx.store.get(second).unwrap().confirmed);
    }

    #[test]
    fn test_secondary_button_pans() {
        let mut fx = Fixture::new();
        fx.machine.pointer_down(
            egui::pos2(500.0, 500.0),
            PointerButton::Secondary,
            false,
            &mut fx.store,
            &mut fx.view,
        );
        fx.moved(540.0, 470.0);
        fx.up();
        assert_eq!(fx.view.pan(), egui::vec2(40.0, -30.0));
    }

    #[test]
    fn test_pan_modifier_with_select_tool_pans() {
        let mut fx = Fixture::new();
        fx.machine.pointer_down(
            egui::pos2(100.0, 100.0),
            PointerButton::Primary,
            true,
            &mut fx.store,
            &mut fx.view,
        );
        fx.moved(150.0, 150.0);
        fx.up();
        assert_eq!(fx.view.pan(), egui::vec2(50.0, 50.0));
    }

    #[test]
    fn test_drag_of_deleted_roi_is_noop() {
        let mut fx = Fixture::new();
        let id = fx.store.add(RoiAnnotation::draft(
            RoiKind::Freehand,
            vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0)],
            "lesion".to_string(),
            true,
        )).unwrap();
        fx.down(100.0, 100.0);
        // The ROI vanishes mid-drag (deleted by another path).
        fx.store.remove_by_id(id);
        fx.moved(400.0, 400.0);
        assert_eq!(fx.up(), None);
        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_hit_threshold_scales_with_zoom() {
        let mut fx = Fixture::new();
        fx.store.add(RoiAnnotation::draft(
            RoiKind::Freehand,
            vec![Point::new(50.0, 50.0), Point::new(60.0, 50.0)],
            "lesion".to_string(),
            false,
        ));

        // At zoom 1 a click 2 units away still grabs (threshold 2.5).
        fx.down(520.0, 500.0);
        assert!(fx.machine.is_active());
        fx.up();

        // At zoom 4 the same annotation-space offset is out of reach
        // (threshold shrinks to 0.625 units).
        fx.view.zoom_by(3.0);
        let device = fx.view.to_device_space(&Point::new(52.0, 50.0));
        fx.machine.pointer_down(
            device,
            PointerButton::Primary,
            false,
            &mut fx.store,
            &mut fx.view,
        );
        assert!(!fx.machine.is_active());
    }
}
