// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Derived edge table, vertex normals, face centroids and islands

use super::{Edge, MeshData};
use crate::geometry::Vec2;
use crate::utils::math::{cross, right_normal};
use ahash::AHashMap;
use tracing::{trace, warn};

/// Area below which a centroid falls back to the vertex average
const CENTROID_AREA_EPS: f32 = f32::EPSILON;

impl MeshData {
    /// Rebuild every derived structure from the face loops
    ///
    /// Edges are keyed by their sorted vertex pair; each keeps the ascending
    /// list of faces that reference it. A slit bridge contributes the same
    /// face twice.
    pub fn update_edges(&mut self) {
        self.edges.clear();
        for vertex in &mut self.vertices {
            vertex.ref_count = 0;
            vertex.edge_normal = Vec2::zeros();
        }

        let mut lookup: AHashMap<(usize, usize), usize> = AHashMap::new();
        for face_index in 0..self.faces.len() {
            let center = face_centroid(&self.loop_positions(&self.faces[face_index].vertices));
            self.faces[face_index].center = center;

            let n = self.faces[face_index].vertices.len();
            for i in 0..n {
                let v0 = self.faces[face_index].vertices[i];
                let v1 = self.faces[face_index].vertices[(i + 1) % n];
                self.get_or_add_edge(&mut lookup, v0, v1, face_index);
            }
        }

        for edge in &self.edges {
            let boundary = edge.faces.len() == 1;
            for v in [edge.v0, edge.v1] {
                if let Some(vertex) = self.vertices.get_mut(v) {
                    vertex.ref_count += 1;
                    if boundary {
                        vertex.edge_normal += edge.normal;
                    }
                }
            }
        }
        for vertex in &mut self.vertices {
            if vertex.edge_normal.norm() > f32::EPSILON {
                vertex.edge_normal = vertex.edge_normal.normalize();
            }
        }

        self.assign_islands();
        self.revision = self.revision.wrapping_add(1);

        trace!(
            vertices = self.vertices.len(),
            faces = self.faces.len(),
            edges = self.edges.len(),
            "rebuilt edges"
        );
    }

    fn get_or_add_edge(
        &mut self,
        lookup: &mut AHashMap<(usize, usize), usize>,
        v0: usize,
        v1: usize,
        face: usize,
    ) -> Option<usize> {
        let key = (v0.min(v1), v0.max(v1));
        if let Some(&index) = lookup.get(&key) {
            let faces = &mut self.edges[index].faces;
            let at = faces.partition_point(|&f| f <= face);
            faces.insert(at, face);
            return Some(index);
        }

        if self.edges.len() >= self.limits.max_edges {
            warn!(limit = self.limits.max_edges, "edge capacity reached, edge dropped");
            return None;
        }

        let p0 = self.vertex_point(v0)?;
        let p1 = self.vertex_point(v1)?;
        let dir = p1 - p0;
        // Right-hand perpendicular of the directed side: outward for CCW loops
        let normal = right_normal(dir);

        let index = self.edges.len();
        self.edges.push(Edge {
            v0: key.0,
            v1: key.1,
            faces: vec![face],
            normal,
        });
        lookup.insert(key, index);
        Some(index)
    }

    /// Union-find over faces sharing at least one vertex
    fn assign_islands(&mut self) {
        let mut parent: Vec<usize> = (0..self.faces.len()).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        let mut first_face: Vec<Option<usize>> = vec![None; self.vertices.len()];
        for (fi, face) in self.faces.iter().enumerate() {
            for &v in &face.vertices {
                let Some(slot) = first_face.get_mut(v) else {
                    continue;
                };
                let current = *slot;
                match current {
                    None => *slot = Some(fi),
                    Some(first) if first != fi => {
                        let ra = find(&mut parent, first);
                        let rb = find(&mut parent, fi);
                        if ra != rb {
                            parent[ra] = rb;
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        for fi in 0..self.faces.len() {
            self.faces[fi].island = find(&mut parent, fi);
        }
    }
}

/// Area-weighted centroid of a loop, or the vertex average when degenerate
pub(crate) fn face_centroid(points: &[Vec2]) -> Vec2 {
    let n = points.len();
    if n < 3 {
        return Vec2::zeros();
    }

    let mut area = 0.0;
    let mut centroid = Vec2::zeros();
    for i in 0..n {
        let p0 = points[i];
        let p1 = points[(i + 1) % n];
        let c = cross(p0, p1);
        area += c;
        centroid += (p0 + p1) * c;
    }
    area *= 0.5;

    if area.abs() < CENTROID_AREA_EPS {
        return points.iter().fold(Vec2::zeros(), |acc, p| acc + p) / n as f32;
    }

    centroid / (6.0 * area)
}
