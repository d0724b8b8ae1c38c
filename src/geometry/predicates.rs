// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tolerance-based 2D predicates
//!
//! These use plain `f32` arithmetic with epsilon guards. Knife editing is
//! tuned against these tolerances, so no exact-arithmetic fallback is used.

use super::Vec2;
use crate::utils::math::{cross, lerp};

/// Epsilon below which a segment or denominator is treated as degenerate
const EPS: f32 = f32::EPSILON;

/// Intersect segment `a0-a1` with segment `b0-b1`
///
/// Returns the intersection point when both segment parameters fall inside
/// `[0, 1]`. Parallel and degenerate segments never intersect.
pub fn overlap_line(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<Vec2> {
    let da = a1 - a0;
    let db = b1 - b0;

    let denom = cross(da, db);
    if denom.abs() < EPS {
        return None;
    }

    let diff = b0 - a0;
    let t = cross(diff, db) / denom;
    let u = cross(diff, da) / denom;

    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(lerp(a0, a1, t))
}

/// Point-in-polygon test using ray casting
///
/// Works for concave loops. Points exactly on the boundary may land on
/// either side.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = polygon[i];
        let vj = polygon[j];

        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Shoelace signed area. Positive for counter-clockwise loops.
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    let n = polygon.len();
    let mut area = 0.0;
    for i in 0..n {
        let p0 = polygon[i];
        let p1 = polygon[(i + 1) % n];
        area += cross(p0, p1);
    }
    area * 0.5
}

/// Orthogonal projection of a point onto a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Projected point on the infinite line through the segment
    pub point: Vec2,
    /// Signed distance from the segment start along its direction
    pub along: f32,
    /// Length of the segment
    pub length: f32,
    /// Distance from the input point to `point`
    pub distance: f32,
}

impl SegmentProjection {
    /// Parameter of the projection along the segment (0 at start, 1 at end)
    pub fn t(&self) -> f32 {
        self.along / self.length
    }

    /// True when the projection lies within the closed segment
    pub fn within(&self) -> bool {
        self.along >= 0.0 && self.along <= self.length
    }

    /// True when the projection lies strictly inside the segment
    pub fn strictly_within(&self) -> bool {
        self.along > 0.0 && self.along < self.length
    }
}

/// Project `point` onto segment `a-b`. `None` for zero-length segments.
pub fn project_onto_segment(point: Vec2, a: Vec2, b: Vec2) -> Option<SegmentProjection> {
    let dir = b - a;
    let length = dir.norm();
    if length < EPS {
        return None;
    }

    let unit = dir / length;
    let along = (point - a).dot(&unit);
    let projected = a + unit * along;

    Some(SegmentProjection {
        point: projected,
        along,
        length,
        distance: (point - projected).norm(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_overlap_line_crossing() {
        let hit = overlap_line(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 0.0),
        )
        .expect("segments cross");
        assert_relative_eq!(hit.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(hit.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_overlap_line_misses() {
        // Parallel
        assert!(overlap_line(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        )
        .is_none());

        // Lines cross but outside the second segment
        assert!(overlap_line(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 3.0),
        )
        .is_none());
    }

    #[test]
    fn test_point_in_polygon() {
        let poly = square();
        assert!(point_in_polygon(Vec2::new(0.5, 0.5), &poly));
        assert!(!point_in_polygon(Vec2::new(1.5, 0.5), &poly));
        assert!(!point_in_polygon(Vec2::new(0.5, 0.5), &poly[..2]));
    }

    #[test]
    fn test_signed_area_winding() {
        let mut poly = square();
        assert_relative_eq!(signed_area(&poly), 1.0);
        poly.reverse();
        assert_relative_eq!(signed_area(&poly), -1.0);
    }

    #[test]
    fn test_project_onto_segment() {
        let p = project_onto_segment(Vec2::new(0.25, 0.5), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0))
            .unwrap();
        assert_relative_eq!(p.t(), 0.25);
        assert_relative_eq!(p.distance, 0.5);
        assert!(p.within());
        assert!(p.strictly_within());

        let outside =
            project_onto_segment(Vec2::new(-1.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0))
                .unwrap();
        assert!(!outside.within());

        assert!(project_onto_segment(Vec2::zeros(), Vec2::zeros(), Vec2::zeros()).is_none());
    }
}
