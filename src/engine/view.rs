// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! View transform.
//!
//! Owns the per-session view state (zoom, pan, display adjustments) and
//! maps device-space pointer positions into normalized annotation space
//! and back. The mapping divides by the *untransformed* viewport extent,
//! never the zoomed one, so stored coordinates are zoom-invariant: the
//! same physical spot on the image yields the same stored point at any
//! zoom or pan. That is the one correctness-critical invariant of the
//! whole editor.

use crate::models::annotation::Point;

pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 4.0;

/// Vertex grab radius in annotation units at zoom 1. Divided by the
/// current zoom so the grab target keeps a constant visual size.
const BASE_HIT_RADIUS: f64 = 2.5;

/// Display parameters for the current editing session.
///
/// Brightness, contrast and invert affect pixels on screen only; they
/// never touch stored geometry. Re-created per session, not persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Zoom factor, clamped to [`MIN_ZOOM`, `MAX_ZOOM`].
    pub zoom: f32,
    /// Pan offset in device pixels, applied before the zoom scale.
    pub pan: egui::Vec2,
    /// Additive brightness, -1.0 to 1.0, 0.0 neutral.
    pub brightness: f32,
    /// Multiplicative contrast, 0.0 to 2.0, 1.0 neutral.
    pub contrast: f32,
    pub invert: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
            brightness: 0.0,
            contrast: 1.0,
            invert: false,
        }
    }
}

/// Maps between device space and annotation space for one viewport.
#[derive(Debug, Clone)]
pub struct ViewTransform {
    state: ViewState,
    /// On-screen bounding box of the *untransformed* image container, set
    /// by the presentation layer after layout each frame.
    viewport: egui::Rect,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            state: ViewState::default(),
            viewport: egui::Rect::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom
    }

    pub fn pan(&self) -> egui::Vec2 {
        self.state.pan
    }

    pub fn set_viewport(&mut self, viewport: egui::Rect) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> egui::Rect {
        self.viewport
    }

    /// Map a device-space position into annotation space.
    ///
    /// Pure. Positions outside the image clamp to the nearest edge, so
    /// pointer input can never produce out-of-range geometry; a stroke
    /// dragged past the border hugs it instead. The only other edge case
    /// is a zero-extent viewport during transient layout states, which
    /// degrades to the origin so the caller's click becomes a harmless
    /// no-op.
    pub fn to_annotation_space(&self, pos: egui::Pos2) -> Point {
        if self.viewport.width() <= 0.0 || self.viewport.height() <= 0.0 {
            return Point::new(0.0, 0.0);
        }
        let rel = (pos - self.viewport.min - self.state.pan) / self.state.zoom;
        Point::new(
            (f64::from(rel.x) / f64::from(self.viewport.width()) * 100.0).clamp(0.0, 100.0),
            (f64::from(rel.y) / f64::from(self.viewport.height()) * 100.0).clamp(0.0, 100.0),
        )
    }

    /// Map an annotation-space point back to device space.
    pub fn to_device_space(&self, point: &Point) -> egui::Pos2 {
        let offset = egui::vec2(
            (point.x / 100.0) as f32 * self.viewport.width(),
            (point.y / 100.0) as f32 * self.viewport.height(),
        );
        self.viewport.min + self.state.pan + offset * self.state.zoom
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.state.zoom = (self.state.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn pan_by(&mut self, delta: egui::Vec2) {
        self.state.pan += delta;
    }

    pub fn set_pan(&mut self, pan: egui::Vec2) {
        self.state.pan = pan;
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.state.brightness = brightness.clamp(-1.0, 1.0);
    }

    pub fn set_contrast(&mut self, contrast: f32) {
        self.state.contrast = contrast.clamp(0.0, 2.0);
    }

    pub fn set_invert(&mut self, invert: bool) {
        self.state.invert = invert;
    }

    /// Restore identity zoom/pan and neutral display adjustments.
    pub fn reset(&mut self) {
        self.state = ViewState::default();
    }

    /// Vertex hit-test threshold in annotation units, scaled by 1/zoom so
    /// grabbing a handle feels the same at every zoom level.
    pub fn hit_threshold(&self) -> f64 {
        BASE_HIT_RADIUS / self.state.zoom as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(zoom: f32, pan: egui::Vec2) -> ViewTransform {
        let mut vt = ViewTransform::default();
        vt.set_viewport(egui::Rect::from_min_size(
            egui::pos2(50.0, 30.0),
            egui::vec2(800.0, 600.0),
        ));
        vt.zoom_by(zoom - 1.0);
        vt.set_pan(pan);
        vt
    }

    #[test]
    fn test_round_trip_identity_view() {
        let vt = transform(1.0, egui::Vec2::ZERO);
        let p = Point::new(25.0, 75.0);
        let back = vt.to_annotation_space(vt.to_device_space(&p));
        assert!((back.x - p.x).abs() < 1e-4);
        assert!((back.y - p.y).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_invariance() {
        // The same image-relative screen location maps to the same stored
        // point before and after zoom/pan changes.
        let p = Point::new(40.0, 60.0);
        for (zoom, pan) in [
            (1.0, egui::Vec2::ZERO),
            (2.0, egui::vec2(-120.0, 45.0)),
            (3.5, egui::vec2(300.0, -200.0)),
            (4.0, egui::vec2(-640.0, -480.0)),
        ] {
            let vt = transform(zoom, pan);
            let device = vt.to_device_space(&p);
            let back = vt.to_annotation_space(device);
            assert!((back.x - p.x).abs() < 1e-3, "x drifted at zoom {zoom}");
            assert!((back.y - p.y).abs() < 1e-3, "y drifted at zoom {zoom}");
        }
    }

    #[test]
    fn test_out_of_viewport_input_clamps_to_bounds() {
        let vt = transform(1.0, egui::Vec2::ZERO);
        // Left of the image: x pins to 0, y still maps normally.
        let p = vt.to_annotation_space(egui::pos2(-80.0, 330.0));
        assert_eq!(p, Point::new(0.0, 50.0));
        // Past the bottom-right corner: both axes pin to 100.
        let p = vt.to_annotation_space(egui::pos2(2000.0, 2000.0));
        assert_eq!(p, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_zero_extent_viewport_degrades_to_origin() {
        let vt = ViewTransform::default();
        let p = vt.to_annotation_space(egui::pos2(123.0, 456.0));
        assert_eq!(p, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vt = transform(1.0, egui::Vec2::ZERO);
        vt.zoom_by(100.0);
        assert_eq!(vt.zoom(), MAX_ZOOM);
        vt.zoom_by(-100.0);
        assert_eq!(vt.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_hit_threshold_shrinks_with_zoom() {
        let near = transform(1.0, egui::Vec2::ZERO);
        let far = transform(4.0, egui::Vec2::ZERO);
        assert!((near.hit_threshold() - 4.0 * far.hit_threshold()).abs() < 1e-9);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut vt = transform(3.0, egui::vec2(10.0, 10.0));
        vt.set_brightness(0.4);
        vt.set_invert(true);
        vt.reset();
        assert_eq!(*vt.state(), ViewState::default());
    }
}
