// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation store.
//!
//! The authoritative, insertion-ordered collection of ROIs for the image
//! being edited. Every mutating method runs the measurement hook before
//! returning, so derived values and the cached aggregate burden are never
//! stale. Other components only ever see clones, never live references
//! they could mutate.

use crate::engine::measure;
use crate::models::annotation::{Point, RoiAnnotation, RoiId};

#[derive(Debug, Default)]
pub struct AnnotationStore {
    rois: Vec<RoiAnnotation>,
    next_id: u64,
    burden: f64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a draft ROI, assigning it the next id. Ids are never reused
    /// within a session, even after deletions.
    ///
    /// Drafts with fewer than 2 points are rejected: the gesture path
    /// discards them before commit, so the only way one reaches here is a
    /// malformed study file. Points are clamped to annotation-space
    /// bounds for the same reason.
    pub fn add(&mut self, mut roi: RoiAnnotation) -> Option<RoiId> {
        if roi.points.len() < 2 {
            log::warn!(
                "store: rejected ROI draft {:?} with {} point(s)",
                roi.label,
                roi.points.len()
            );
            return None;
        }
        for p in &mut roi.points {
            p.x = p.x.clamp(0.0, 100.0);
            p.y = p.y.clamp(0.0, 100.0);
        }
        self.next_id += 1;
        roi.id = RoiId(self.next_id);
        measure::recompute(&mut roi);
        let id = roi.id;
        self.rois.push(roi);
        self.refresh_burden();
        log::debug!("store: added ROI {id}, total {}", self.rois.len());
        Some(id)
    }

    /// Remove an ROI by id. Idempotent: a missing id is a no-op.
    pub fn remove_by_id(&mut self, id: RoiId) {
        let before = self.rois.len();
        self.rois.retain(|r| r.id != id);
        if self.rois.len() != before {
            self.refresh_burden();
            log::debug!("store: removed ROI {id}, total {}", self.rois.len());
        }
    }

    /// Replace one vertex of an ROI and recompute its measurements.
    ///
    /// Touching a vertex promotes the ROI to confirmed, so dragging a
    /// machine proposal counts as reviewing it. A vanished id or an
    /// out-of-range index is a no-op (the drag may outlive the ROI).
    pub fn update_point(&mut self, id: RoiId, index: usize, point: Point) {
        let Some(roi) = self.rois.iter_mut().find(|r| r.id == id) else {
            return;
        };
        let Some(slot) = roi.points.get_mut(index) else {
            return;
        };
        *slot = Point::new(point.x.clamp(0.0, 100.0), point.y.clamp(0.0, 100.0));
        roi.confirmed = true;
        measure::recompute(roi);
        self.refresh_burden();
    }

    /// All ROIs in stable insertion order.
    pub fn list(&self) -> &[RoiAnnotation] {
        &self.rois
    }

    pub fn get(&self, id: RoiId) -> Option<&RoiAnnotation> {
        self.rois.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rois.is_empty()
    }

    /// Cached aggregate burden: sum of longest diameters across all ROIs.
    pub fn total_burden(&self) -> f64 {
        self.burden
    }

    /// Discard everything for a new image. The id counter keeps running
    /// so ids stay unique across the whole process lifetime.
    pub fn clear(&mut self) {
        self.rois.clear();
        self.refresh_burden();
    }

    fn refresh_burden(&mut self) {
        self.burden = measure::total_burden(&self.rois);
    }
}
