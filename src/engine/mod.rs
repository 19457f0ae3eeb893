// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The ROI editor engine.
//!
//! GUI-independent core of the editor: view transform, annotation store,
//! measurement engine and interaction state machine, wired behind one
//! facade. The presentation layer feeds it raw pointer events and pulls
//! read-only snapshots; it never reaches into the parts directly. All of
//! it is single-threaded and synchronous: each event runs to completion
//! before the next one is looked at.

pub mod interaction;
pub mod measure;
pub mod store;
pub mod view;

use crate::models::annotation::{Point, RoiAnnotation, RoiId};
use interaction::{InteractionStateMachine, PointerButton, Tool};
use store::AnnotationStore;
use view::{ViewState, ViewTransform};

/// Tool defaults and display strings. Opaque to the core; the label
/// prefix is only ever concatenated with a counter.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub label_prefix: String,
    pub default_tool: Tool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            label_prefix: "lesion".to_string(),
            default_tool: Tool::Select,
        }
    }
}

/// Read-only scene description handed to the render layer after every
/// state change. Enough to redraw without querying engine internals.
#[derive(Debug, Clone)]
pub struct EditorSnapshot {
    pub view: ViewState,
    pub annotations: Vec<RoiAnnotation>,
    pub total_burden: f64,
    /// Points of an in-flight draw gesture, for preview.
    pub in_progress: Vec<Point>,
}

type ConfirmHandler = Box<dyn FnMut(&[RoiAnnotation])>;

pub struct EditorEngine {
    store: AnnotationStore,
    view: ViewTransform,
    machine: InteractionStateMachine,
    on_confirm: Option<ConfirmHandler>,
}

impl EditorEngine {
    pub fn new(config: EditorConfig) -> Self {
        let mut machine = InteractionStateMachine::new(config.label_prefix);
        machine.set_tool(config.default_tool);
        Self {
            store: AnnotationStore::new(),
            view: ViewTransform::default(),
            machine,
            on_confirm: None,
        }
    }

    /// Re-initialize for a new image: the previous annotation set is
    /// discarded wholesale, the view resets to identity, and the supplied
    /// proposals (machine-suggested, unconfirmed) are inserted in order.
    /// Proposals with fewer than 2 points never pass the store; a
    /// malformed study file cannot seed degenerate geometry.
    pub fn begin_session(&mut self, proposals: Vec<RoiAnnotation>) {
        self.store.clear();
        self.view.reset();
        let mut count = 0;
        for roi in proposals {
            if self.store.add(roi).is_some() {
                count += 1;
            }
        }
        if count > 0 {
            log::info!("session started with {count} proposed ROI(s)");
        }
    }

    // --- pointer event contract -----------------------------------------

    pub fn pointer_down(&mut self, pos: egui::Pos2, button: PointerButton, pan_modifier: bool) {
        self.machine
            .pointer_down(pos, button, pan_modifier, &mut self.store, &mut self.view);
    }

    pub fn pointer_moved(&mut self, pos: egui::Pos2) {
        self.machine
            .pointer_moved(pos, &mut self.store, &mut self.view);
    }

    /// Returns the id of a newly committed ROI, if the ended gesture
    /// produced one.
    pub fn pointer_up(&mut self) -> Option<RoiId> {
        self.machine.pointer_up(&mut self.store)
    }

    pub fn gesture_active(&self) -> bool {
        self.machine.is_active()
    }

    // --- tool and view pass-throughs ------------------------------------

    pub fn tool(&self) -> Tool {
        self.machine.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.machine.set_tool(tool);
    }

    /// Untransformed on-screen bounding box of the image, from layout.
    pub fn set_viewport(&mut self, viewport: egui::Rect) {
        self.view.set_viewport(viewport);
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.view.zoom_by(delta);
    }

    pub fn pan_by(&mut self, delta: egui::Vec2) {
        self.view.pan_by(delta);
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.view.set_brightness(brightness);
    }

    pub fn set_contrast(&mut self, contrast: f32) {
        self.view.set_contrast(contrast);
    }

    pub fn set_invert(&mut self, invert: bool) {
        self.view.set_invert(invert);
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    // --- annotation access ----------------------------------------------

    pub fn annotations(&self) -> &[RoiAnnotation] {
        self.store.list()
    }

    /// Idempotent: removing an id twice, or one never present, is a no-op.
    pub fn remove_roi(&mut self, id: RoiId) {
        self.store.remove_by_id(id);
    }

    pub fn total_burden(&self) -> f64 {
        self.store.total_burden()
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            view: *self.view.state(),
            annotations: self.store.list().to_vec(),
            total_burden: self.store.total_burden(),
            in_progress: self
                .machine
                .in_progress_points()
                .map(<[Point]>::to_vec)
                .unwrap_or_default(),
        }
    }

    // --- confirm --------------------------------------------------------

    pub fn set_confirm_handler(&mut self, handler: ConfirmHandler) {
        self.on_confirm = Some(handler);
    }

    /// Hand the full current annotation list to the confirm handler,
    /// confirmed and unconfirmed ROIs alike; the consumer filters.
    /// Invoked exactly once per explicit confirm action.
    pub fn confirm(&mut self) {
        log::info!(
            "confirmed {} ROI(s), total burden {:.1} mm",
            self.store.len(),
            self.store.total_burden()
        );
        if let Some(handler) = self.on_confirm.as_mut() {
            handler(self.store.list());
        }
    }
}
