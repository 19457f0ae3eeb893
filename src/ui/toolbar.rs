// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and view controls.
//!
//! Tool selection plus the per-session view controls (zoom, brightness,
//! contrast, invert). Display controls go through the engine's view
//! pass-throughs; they never touch stored geometry.

use crate::engine::interaction::Tool;
use crate::engine::view::{MAX_ZOOM, MIN_ZOOM};
use crate::engine::EditorEngine;

/// Display the toolbar. Returns true when the confirm button was pressed.
pub fn show(ui: &mut egui::Ui, engine: &mut EditorEngine) -> bool {
    let mut confirmed = false;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");
        ui.separator();

        for (tool, icon, name) in [
            (Tool::Select, "⬆", "Select"),
            (Tool::Pencil, "✏", "Pencil"),
            (Tool::Rect, "▭", "Rect"),
        ] {
            let label = format!("{icon} {name}");
            if ui.selectable_label(engine.tool() == tool, label).clicked() {
                engine.set_tool(tool);
            }
        }

        ui.separator();

        let tool_text = match engine.tool() {
            Tool::Select => "Drag vertices to adjust, right-drag or Cmd-drag to pan",
            Tool::Pencil => "Drag to trace a region outline",
            Tool::Rect => "Drag to stretch a rectangle over the region",
        };
        ui.label(egui::RichText::new(tool_text).italics().weak());
    });

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("View:");
        ui.separator();

        let mut zoom = engine.view().zoom();
        if ui
            .add(egui::Slider::new(&mut zoom, MIN_ZOOM..=MAX_ZOOM).text("zoom"))
            .changed()
        {
            let current = engine.view().zoom();
            engine.zoom_by(zoom - current);
        }

        let state = *engine.view().state();

        let mut brightness = state.brightness;
        if ui
            .add(egui::Slider::new(&mut brightness, -1.0..=1.0).text("brightness"))
            .changed()
        {
            engine.set_brightness(brightness);
        }

        let mut contrast = state.contrast;
        if ui
            .add(egui::Slider::new(&mut contrast, 0.0..=2.0).text("contrast"))
            .changed()
        {
            engine.set_contrast(contrast);
        }

        let mut invert = state.invert;
        if ui.checkbox(&mut invert, "invert").changed() {
            engine.set_invert(invert);
        }

        if ui.button("Reset view").clicked() {
            engine.reset_view();
        }

        ui.separator();
        if ui.button("✔ Confirm regions").clicked() {
            confirmed = true;
        }
    });

    confirmed
}
