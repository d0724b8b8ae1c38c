// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Point hit tests against vertices, edges and faces
//!
//! All queries take mesh-local points. Callers convert world positions with
//! [`MeshData::to_local`].

use super::MeshData;
use crate::geometry::{point_in_polygon, project_onto_segment, Vec2};

/// Result of an edge hit test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    pub edge: usize,
    /// Parameter along the edge from `v0` to `v1`
    pub t: f32,
    pub distance: f32,
}

impl MeshData {
    /// Closest vertex within `radius` (inclusive)
    pub fn hit_test_vertex(&self, point: Vec2, radius: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, vertex) in self.vertices.iter().enumerate() {
            let dist = (point - vertex.position).norm();
            if dist <= radius && best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Closest edge whose perpendicular foot lies on the edge and whose
    /// distance is strictly below `radius`
    pub fn hit_test_edge(&self, point: Vec2, radius: f32) -> Option<EdgeHit> {
        let mut best: Option<EdgeHit> = None;
        for (i, edge) in self.edges.iter().enumerate() {
            let (Some(p0), Some(p1)) = (self.vertex_point(edge.v0), self.vertex_point(edge.v1))
            else {
                continue;
            };
            let Some(proj) = project_onto_segment(point, p0, p1) else {
                continue;
            };
            if !proj.within() || proj.distance >= radius {
                continue;
            }
            if best.map_or(true, |b| proj.distance < b.distance) {
                best = Some(EdgeHit {
                    edge: i,
                    t: proj.t(),
                    distance: proj.distance,
                });
            }
        }
        best
    }

    /// Topmost face containing `point`
    ///
    /// Faces are scanned from last to first so later faces win on overlap.
    pub fn hit_test_face(&self, point: Vec2) -> Option<usize> {
        (0..self.faces.len())
            .rev()
            .find(|&fi| self.face_contains_point(fi, point))
    }

    /// Ray cast against one face loop, shared with the path builder
    pub fn face_contains_point(&self, face: usize, point: Vec2) -> bool {
        point_in_polygon(point, &self.face_positions(face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> MeshData {
        MeshData::from_loops(
            &[
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            &[vec![0, 1, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_vertex_hit_picks_closest() {
        let mesh = square();
        assert_eq!(mesh.hit_test_vertex(Vec2::new(0.9, 0.05), 0.25), Some(1));
        assert_eq!(mesh.hit_test_vertex(Vec2::new(0.25, 0.0), 0.25), Some(0));
        assert_eq!(mesh.hit_test_vertex(Vec2::new(0.5, 0.5), 0.25), None);
    }

    #[test]
    fn test_edge_hit_reports_parameter() {
        let mesh = square();
        let hit = mesh.hit_test_edge(Vec2::new(0.3, 0.05), 0.1875).expect("bottom edge");
        assert_eq!(hit.edge, mesh.find_edge(0, 1).unwrap());
        assert_relative_eq!(hit.t, 0.3, epsilon = 1e-6);
        assert!(mesh.hit_test_edge(Vec2::new(0.5, 0.5), 0.1875).is_none());
        assert!(mesh.hit_test_edge(Vec2::new(-0.3, 0.0), 0.1875).is_none());
    }

    #[test]
    fn test_face_hit_prefers_later_faces() {
        let mut mesh = square();
        let a = mesh.add_vertex(Vec2::new(0.25, 0.25)).unwrap();
        let b = mesh.add_vertex(Vec2::new(0.75, 0.25)).unwrap();
        let c = mesh.add_vertex(Vec2::new(0.5, 0.75)).unwrap();
        mesh.add_face(vec![a, b, c]).unwrap();
        mesh.update_edges();

        assert_eq!(mesh.hit_test_face(Vec2::new(0.5, 0.4)), Some(1));
        assert_eq!(mesh.hit_test_face(Vec2::new(0.1, 0.9)), Some(0));
        assert_eq!(mesh.hit_test_face(Vec2::new(2.0, 0.5)), None);
    }

    #[test]
    fn test_face_hit_matches_polygon_test() {
        // Concave "L" loop with points on its sides and reflex corner
        let mesh = MeshData::from_loops(
            &[
                Vec2::new(0.0, 0.0),
                Vec2::new(2.0, 0.0),
                Vec2::new(2.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(1.0, 2.0),
                Vec2::new(0.0, 2.0),
            ],
            &[vec![0, 1, 2, 3, 4, 5]],
        )
        .unwrap();
        let positions = mesh.face_positions(0);

        for ix in -1..=9 {
            for iy in -1..=9 {
                let point = Vec2::new(ix as f32 * 0.25, iy as f32 * 0.25);
                assert_eq!(
                    mesh.hit_test_face(point).is_some(),
                    point_in_polygon(point, &positions),
                    "disagreement at {point:?}"
                );
            }
        }
        assert_eq!(mesh.hit_test_face(Vec2::new(0.5, 1.5)), Some(0));
        assert_eq!(mesh.hit_test_face(Vec2::new(1.5, 1.5)), None);
    }
}
