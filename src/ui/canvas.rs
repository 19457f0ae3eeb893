// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and ROI annotation.
//!
//! Renders the image inside the session's zoom/pan transform, draws ROI
//! outlines and vertex handles from an engine snapshot, and translates
//! egui pointer state into the engine's down/move/up event contract.

use crate::engine::interaction::{PointerButton, Tool};
use crate::engine::EditorEngine;
use crate::models::annotation::{Point, RoiId};
use crate::util::geometry;

/// On-screen vertex handle radius in device pixels. Drawn in device
/// space, so it stays the same visual size at every zoom (the engine's
/// hit threshold shrinks in annotation units to match).
const HANDLE_RADIUS: f32 = 4.0;

const CONFIRMED_COLOR: egui::Color32 = egui::Color32::YELLOW;
const PROPOSAL_COLOR: egui::Color32 = egui::Color32::LIGHT_BLUE;
const SELECTED_COLOR: egui::Color32 = egui::Color32::LIGHT_RED;
const IN_PROGRESS_COLOR: egui::Color32 = egui::Color32::LIGHT_GREEN;

/// Display the canvas and feed pointer events to the engine. Returns the
/// id of an ROI committed by a gesture that ended this frame.
pub fn show(
    ui: &mut egui::Ui,
    engine: &mut EditorEngine,
    image_texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
    selected: Option<RoiId>,
) -> Option<RoiId> {
    let mut committed = None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(texture), Some((img_width, img_height))) = (image_texture, image_size) else {
            show_welcome(ui);
            return;
        };

        // Fit the image into the available space, preserving aspect. This
        // fitted rect is the untransformed container the engine's
        // annotation space is anchored to.
        let available = ui.available_size();
        let img_aspect = img_width as f32 / img_height as f32;
        let available_aspect = available.x / available.y;

        let (display_width, display_height) = if img_aspect > available_aspect {
            (available.x, available.x / img_aspect)
        } else {
            (available.y * img_aspect, available.y)
        };

        let x_offset = (available.x - display_width) / 2.0;
        let y_offset = (available.y - display_height) / 2.0;

        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );
        engine.set_viewport(image_rect);

        // The whole scene is scaled and translated as one unit: pan the
        // origin, scale the extent.
        let view = *engine.view().state();
        let displayed_rect = egui::Rect::from_min_size(
            image_rect.min + view.pan,
            image_rect.size() * view.zoom,
        );

        let response = ui.allocate_rect(ui.min_rect(), egui::Sense::click_and_drag());

        ui.painter().image(
            texture.id(),
            displayed_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        committed = handle_pointer(ui, &response, engine);

        // Wheel zoom while hovering the canvas.
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                engine.zoom_by(scroll * 0.01);
            }
        }

        draw_scene(ui.painter(), engine, selected);
    });

    // Status line under the canvas.
    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!("Tool: {:?}", engine.tool()));
        ui.separator();
        ui.label(format!("Zoom: {:.1}x", engine.view().zoom()));
        ui.separator();
        ui.label(format!("Total burden: {:.1} mm", engine.total_burden()));
    });

    committed
}

/// Translate egui pointer state into the engine's event contract.
fn handle_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    engine: &mut EditorEngine,
) -> Option<RoiId> {
    let (pos, primary_down, secondary_down, any_up, pan_modifier) = ui.input(|i| {
        (
            i.pointer.interact_pos(),
            i.pointer.primary_pressed(),
            i.pointer.secondary_pressed(),
            i.pointer.primary_released() || i.pointer.secondary_released(),
            i.modifiers.command,
        )
    });

    // Gestures only start on the displayed (zoomed/panned) image; the
    // letterbox margins are inert. Moves may leave the image mid-gesture;
    // the view transform clamps them to the border.
    let image_area = {
        let view = engine.view();
        egui::Rect::from_min_size(
            view.viewport().min + view.pan(),
            view.viewport().size() * view.zoom(),
        )
        .intersect(response.rect)
    };

    if let Some(pos) = pos {
        if primary_down && image_area.contains(pos) {
            engine.pointer_down(pos, PointerButton::Primary, pan_modifier);
        } else if secondary_down && image_area.contains(pos) {
            engine.pointer_down(pos, PointerButton::Secondary, false);
        } else if engine.gesture_active() {
            engine.pointer_moved(pos);
        }
    }

    if any_up && engine.gesture_active() {
        return engine.pointer_up();
    }
    None
}

/// Draw all ROIs and any in-progress gesture from a snapshot.
fn draw_scene(painter: &egui::Painter, engine: &EditorEngine, selected: Option<RoiId>) {
    let snapshot = engine.snapshot();

    for roi in &snapshot.annotations {
        let color = if Some(roi.id) == selected {
            SELECTED_COLOR
        } else if roi.confirmed {
            CONFIRMED_COLOR
        } else {
            PROPOSAL_COLOR
        };
        draw_outline(painter, engine, &roi.points, color, true);
    }

    if !snapshot.in_progress.is_empty() {
        // A rect gesture previews as its expanded outline; freehand as an
        // open polyline.
        if engine.tool() == Tool::Rect && snapshot.in_progress.len() == 2 {
            let corners = geometry::rect_to_polygon(snapshot.in_progress[0], snapshot.in_progress[1]);
            draw_outline(painter, engine, &corners, IN_PROGRESS_COLOR, true);
        } else {
            draw_outline(painter, engine, &snapshot.in_progress, IN_PROGRESS_COLOR, false);
        }
    }
}

fn draw_outline(
    painter: &egui::Painter,
    engine: &EditorEngine,
    points: &[Point],
    color: egui::Color32,
    closed: bool,
) {
    if points.is_empty() {
        return;
    }

    let screen_points: Vec<egui::Pos2> = points
        .iter()
        .map(|p| engine.view().to_device_space(p))
        .collect();

    let edges = if closed && screen_points.len() > 2 {
        screen_points.len()
    } else {
        screen_points.len().saturating_sub(1)
    };
    for i in 0..edges {
        let next = (i + 1) % screen_points.len();
        painter.line_segment(
            [screen_points[i], screen_points[next]],
            egui::Stroke::new(2.0, color),
        );
    }

    for point in &screen_points {
        painter.circle_filled(*point, HANDLE_RADIUS, color);
        painter.circle_stroke(*point, HANDLE_RADIUS, egui::Stroke::new(1.0, egui::Color32::BLACK));
    }
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("LESIONMARK")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Lesion ROI annotation and measurement")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open an image or study to begin annotating")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Image...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}
