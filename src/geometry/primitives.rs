// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Primitive mesh builders
//!
//! Every builder emits counter-clockwise face loops and runs
//! [`MeshData::update_edges`] before returning.

use super::Vec2;
use crate::error::Result;
use crate::mesh::MeshData;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Parametric 2D primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    /// Single quad face
    Rect { size: Vec2, center: Vec2 },
    /// `cols x rows` quads sharing vertices, origin at the lower-left corner
    Grid { cols: usize, rows: usize, cell: f32 },
    /// Regular polygon with one face
    Polygon { radius: f32, sides: usize },
    /// Two unit squares that share no vertex, `gap` apart on x
    DisjointPair { gap: f32 },
}

impl Primitive {
    pub fn unit_square() -> Self {
        Primitive::Rect {
            size: Vec2::new(1.0, 1.0),
            center: Vec2::new(0.5, 0.5),
        }
    }

    /// Build the primitive as a fresh mesh
    pub fn to_mesh(&self) -> Result<MeshData> {
        match *self {
            Primitive::Rect { size, center } => {
                let h = size * 0.5;
                MeshData::from_loops(
                    &[
                        Vec2::new(center.x - h.x, center.y - h.y),
                        Vec2::new(center.x + h.x, center.y - h.y),
                        Vec2::new(center.x + h.x, center.y + h.y),
                        Vec2::new(center.x - h.x, center.y + h.y),
                    ],
                    &[vec![0, 1, 2, 3]],
                )
            }
            Primitive::Grid { cols, rows, cell } => {
                let stride = cols + 1;
                let mut positions = Vec::with_capacity(stride * (rows + 1));
                for y in 0..=rows {
                    for x in 0..=cols {
                        positions.push(Vec2::new(x as f32 * cell, y as f32 * cell));
                    }
                }
                let mut loops = Vec::with_capacity(cols * rows);
                for y in 0..rows {
                    for x in 0..cols {
                        let v = y * stride + x;
                        loops.push(vec![v, v + 1, v + stride + 1, v + stride]);
                    }
                }
                MeshData::from_loops(&positions, &loops)
            }
            Primitive::Polygon { radius, sides } => {
                let sides = sides.max(3);
                let positions: Vec<Vec2> = (0..sides)
                    .map(|i| {
                        let angle = TAU * i as f32 / sides as f32;
                        Vec2::new(angle.cos(), angle.sin()) * radius
                    })
                    .collect();
                MeshData::from_loops(&positions, &[(0..sides).collect()])
            }
            Primitive::DisjointPair { gap } => {
                let x1 = 1.0 + gap;
                MeshData::from_loops(
                    &[
                        Vec2::new(0.0, 0.0),
                        Vec2::new(1.0, 0.0),
                        Vec2::new(1.0, 1.0),
                        Vec2::new(0.0, 1.0),
                        Vec2::new(x1, 0.0),
                        Vec2::new(x1 + 1.0, 0.0),
                        Vec2::new(x1 + 1.0, 1.0),
                        Vec2::new(x1, 1.0),
                    ],
                    &[vec![0, 1, 2, 3], vec![4, 5, 6, 7]],
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_topology() {
        let mesh = Primitive::Grid { cols: 2, rows: 2, cell: 1.0 }.to_mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.edge_count(), 12);
        for face in 0..mesh.face_count() {
            assert_relative_eq!(mesh.face_signed_area(face), 1.0);
        }
    }

    #[test]
    fn test_polygon_is_ccw() {
        let mesh = Primitive::Polygon { radius: 2.0, sides: 6 }.to_mesh().unwrap();
        assert_eq!(mesh.faces[0].vertex_count(), 6);
        assert!(mesh.face_signed_area(0) > 0.0);
    }

    #[test]
    fn test_disjoint_pair_has_two_islands() {
        let mesh = Primitive::DisjointPair { gap: 1.0 }.to_mesh().unwrap();
        assert!(!mesh.faces_share_vertex(0, 1));
        assert_ne!(mesh.faces[0].island, mesh.faces[1].island);
    }

    #[test]
    fn test_unit_square() {
        let mesh = Primitive::unit_square().to_mesh().unwrap();
        assert_eq!(mesh.vertex_point(2), Some(Vec2::new(1.0, 1.0)));
    }
}
