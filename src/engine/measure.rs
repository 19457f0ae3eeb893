// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Measurement engine.
//!
//! Derives per-ROI scalar measurements from geometry and the aggregate
//! burden across all regions. Pure functions of the current point lists,
//! called synchronously by the annotation store after every mutation.

use crate::models::annotation::{Measurements, RoiAnnotation};
use crate::util::geometry;

/// Fixed linear scale from annotation units to millimeter equivalents.
///
/// Placeholder calibration: real pixel spacing comes from DICOM metadata,
/// which is outside this tool. One annotation unit (1% of the image's
/// bounding box) stands in for 0.8 mm.
pub const MM_PER_UNIT: f64 = 0.8;

/// Recompute all derived measurements for one ROI in place.
pub fn recompute(roi: &mut RoiAnnotation) {
    roi.measurements = Measurements {
        length_mm: geometry::longest_pairwise_distance(&roi.points) * MM_PER_UNIT,
        mean_intensity: intensity_proxy(roi),
    };
}

/// Aggregate burden: sum of longest diameters over all current ROIs.
pub fn total_burden(rois: &[RoiAnnotation]) -> f64 {
    rois.iter().map(|r| r.measurements.length_mm).sum()
}

/// Deterministic stand-in for a mean image-intensity sample at the region.
///
/// A faithful sample needs pixel data, which the render layer owns, so
/// this derives a stable value from the centroid instead. Same geometry,
/// same number.
fn intensity_proxy(roi: &RoiAnnotation) -> f64 {
    let c = geometry::centroid(&roi.points);
    30.0 + (c.x * 0.7 + c.y * 0.3)
}
