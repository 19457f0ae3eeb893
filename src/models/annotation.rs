// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ROI annotation data structures.
//!
//! This module defines the core data structures for representing
//! polygonal regions of interest and their derived measurements.

use serde::{Deserialize, Serialize};

/// A 2D point in normalized annotation space.
///
/// Both axes run 0.0 to 100.0 relative to the image's own bounding box,
/// independent of the current zoom and pan. Geometry is a property of the
/// image, not of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point, in annotation units.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// How an ROI's point list was produced.
///
/// This records the gesture only; rectangles and circles are stored as
/// ordered polygons like everything else, so downstream logic never
/// branches on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiKind {
    Freehand,
    Rect,
    Circle,
}

/// Opaque ROI identifier, assigned by the annotation store at insertion
/// and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoiId(pub u64);

impl std::fmt::Display for RoiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Derived per-ROI measurements. Recomputed whenever the point list
/// changes; never hand-edited.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    /// Longest diameter in millimeter equivalents (fixed linear scale).
    pub length_mm: f64,
    /// Intensity proxy for the region (placeholder until pixel sampling
    /// is available; see `engine::measure`).
    pub mean_intensity: f64,
}

/// A user-created or machine-proposed region of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiAnnotation {
    pub id: RoiId,
    pub kind: RoiKind,
    /// Ordered vertices in annotation space. At least 2 once committed;
    /// shorter gestures are discarded before they ever reach the store.
    pub points: Vec<Point>,
    pub label: String,
    pub measurements: Measurements,
    /// Provenance flag: true for human-drawn or human-adjusted regions,
    /// false for machine proposals not yet touched by a human. Any vertex
    /// drag promotes this to true.
    pub confirmed: bool,
}

impl RoiAnnotation {
    /// Create a draft annotation. The store assigns the real id when the
    /// draft is added; the placeholder here is never observable.
    pub fn draft(kind: RoiKind, points: Vec<Point>, label: String, confirmed: bool) -> Self {
        Self {
            id: RoiId(0),
            kind,
            points,
            label,
            measurements: Measurements::default(),
            confirmed,
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}
