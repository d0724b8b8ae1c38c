// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - 2D predicates, bounds and primitive meshes

mod bbox;
mod predicates;
mod primitives;

pub use bbox::Bounds2;
pub use predicates::{
    overlap_line, point_in_polygon, project_onto_segment, signed_area, SegmentProjection,
};
pub use primitives::Primitive;

/// 2D vector used for every position in mesh-local and world space
pub type Vec2 = nalgebra::Vector2<f32>;
