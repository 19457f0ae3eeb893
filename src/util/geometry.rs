// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Pure functions over annotation-space points: pairwise diameters,
//! rectangle normalization, and centroids. No state.

use crate::models::annotation::Point;

/// Longest Euclidean distance between any two points in the set.
///
/// This is the reportable "longest diameter" of a region: the tumor
/// measurement convention wants the single longest axis across the whole
/// region, not a bounding-box diagonal or a centroid radius. The O(n²)
/// scan is fine because freehand strokes stay in the tens of points.
///
/// Returns 0.0 for fewer than 2 points.
pub fn longest_pairwise_distance(points: &[Point]) -> f64 {
    let mut max_sq = 0.0f64;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let dx = points[i].x - points[j].x;
            let dy = points[i].y - points[j].y;
            let sq = dx * dx + dy * dy;
            if sq > max_sq {
                max_sq = sq;
            }
        }
    }
    max_sq.sqrt()
}

/// Expand two rectangle corners into an ordered 4-point polygon.
///
/// The winding is always clockwise and rooted at `anchor` (the original
/// pointer-down corner), regardless of drag direction. Dragging up-left
/// and down-right over the same region therefore yield geometrically
/// equivalent polygons that differ only in their starting corner, which
/// nothing downstream compares.
pub fn rect_to_polygon(anchor: Point, opposite: Point) -> Vec<Point> {
    vec![
        Point::new(anchor.x, anchor.y),
        Point::new(opposite.x, anchor.y),
        Point::new(opposite.x, opposite.y),
        Point::new(anchor.x, opposite.y),
    ]
}

/// Arithmetic centroid of a point set, or the origin for an empty set.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_pairwise_345_triangle() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(4.0, 0.0),
        ];
        assert!((longest_pairwise_distance(&points) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_longest_pairwise_degenerate() {
        assert_eq!(longest_pairwise_distance(&[]), 0.0);
        assert_eq!(longest_pairwise_distance(&[Point::new(7.0, 7.0)]), 0.0);
    }

    #[test]
    fn test_rect_polygon_down_right() {
        let poly = rect_to_polygon(Point::new(10.0, 10.0), Point::new(50.0, 40.0));
        assert_eq!(poly.len(), 4);
        assert_eq!(poly[0], Point::new(10.0, 10.0));
        assert_eq!(poly[1], Point::new(50.0, 10.0));
        assert_eq!(poly[2], Point::new(50.0, 40.0));
        assert_eq!(poly[3], Point::new(10.0, 40.0));
    }

    #[test]
    fn test_rect_polygon_covers_same_region_both_directions() {
        let a = rect_to_polygon(Point::new(10.0, 10.0), Point::new(50.0, 40.0));
        let b = rect_to_polygon(Point::new(50.0, 40.0), Point::new(10.0, 10.0));
        assert_eq!(a.len(), 4);
        assert_eq!(b.len(), 4);

        let bounds = |poly: &[Point]| {
            let xs: Vec<f64> = poly.iter().map(|p| p.x).collect();
            let ys: Vec<f64> = poly.iter().map(|p| p.y).collect();
            (
                xs.iter().cloned().fold(f64::INFINITY, f64::min),
                xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                ys.iter().cloned().fold(f64::INFINITY, f64::min),
                ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            )
        };
        assert_eq!(bounds(&a), (10.0, 50.0, 10.0, 40.0));
        assert_eq!(bounds(&b), (10.0, 50.0, 10.0, 40.0));
    }

    #[test]
    fn test_centroid() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert_eq!(centroid(&points), Point::new(5.0, 5.0));
        assert_eq!(centroid(&[]), Point::new(0.0, 0.0));
    }
}
