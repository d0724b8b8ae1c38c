// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use crate::geometry::Vec2;

/// Z component of the 3D cross product of two planar vectors
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Linear interpolation between two points
#[inline]
pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Unit right-hand perpendicular, zero for a degenerate direction
pub fn right_normal(dir: Vec2) -> Vec2 {
    let normal = Vec2::new(dir.y, -dir.x);
    if normal.norm() > f32::EPSILON {
        normal.normalize()
    } else {
        Vec2::zeros()
    }
}

/// Check if two floats are approximately equal
pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_sign() {
        assert_eq!(cross(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)), 1.0);
        assert_eq!(cross(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)), -1.0);
    }

    #[test]
    fn test_lerp() {
        let p = lerp(Vec2::new(0.0, 0.0), Vec2::new(2.0, 4.0), 0.25);
        assert_eq!(p, Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_right_normal() {
        assert_eq!(right_normal(Vec2::new(2.0, 0.0)), Vec2::new(0.0, -1.0));
        assert_eq!(right_normal(Vec2::zeros()), Vec2::zeros());
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0001, 0.001));
        assert!(!approx_eq(1.0, 1.1, 0.001));
    }
}
