// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Editable 2D polygon mesh
//!
//! Faces are the authoritative topology: each one is a cyclic loop of vertex
//! indices. Edges are derived from the loops by [`MeshData::update_edges`]
//! and must be rebuilt after any face mutation.

mod edges;
mod hit_test;

pub use hit_test::EdgeHit;

use crate::error::{Error, Result};
use crate::geometry::{signed_area, Bounds2, Vec2};
use crate::utils::math::lerp;
use serde::{Deserialize, Serialize};

/// Per-mesh capacity limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshLimits {
    pub max_vertices: usize,
    pub max_faces: usize,
    pub max_face_vertices: usize,
    pub max_edges: usize,
}

impl Default for MeshLimits {
    fn default() -> Self {
        Self {
            max_vertices: 1024,
            max_faces: 256,
            max_face_vertices: 128,
            max_edges: 2048,
        }
    }
}

/// Mesh vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec2,
    pub selected: bool,
    /// Number of edges touching this vertex, rebuilt by `update_edges`
    pub ref_count: u32,
    /// Averaged outward normal of adjacent boundary edges
    pub edge_normal: Vec2,
}

impl Vertex {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            selected: false,
            ref_count: 0,
            edge_normal: Vec2::zeros(),
        }
    }
}

/// Polygon face: an ordered, cyclic vertex loop
///
/// A loop may list a vertex twice. That only happens for slit faces built by
/// the knife, where a zero-width bridge connects the outer boundary to an
/// embedded hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<usize>,
    pub color: u8,
    pub opacity: f32,
    pub normal: Vec2,
    pub selected: bool,
    /// Area centroid, rebuilt by `update_edges`
    pub center: Vec2,
    /// Connected-component id, rebuilt by `update_edges`
    pub island: usize,
}

impl Face {
    pub fn new(vertices: Vec<usize>) -> Self {
        Self {
            vertices,
            color: 0,
            opacity: 1.0,
            normal: Vec2::zeros(),
            selected: false,
            center: Vec2::zeros(),
            island: 0,
        }
    }

    /// Copy display attributes into a fresh, unselected face
    pub fn derive(&self, vertices: Vec<usize>) -> Self {
        Self {
            vertices,
            color: self.color,
            opacity: self.opacity,
            normal: self.normal,
            selected: false,
            center: Vec2::zeros(),
            island: self.island,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// First loop position holding `vertex`
    pub fn position_of(&self, vertex: usize) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// Every loop position holding `vertex`
    pub fn positions_of(&self, vertex: usize) -> Vec<usize> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == vertex)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn contains_vertex(&self, vertex: usize) -> bool {
        self.vertices.contains(&vertex)
    }

    /// True when any vertex index repeats in the loop
    pub fn has_slit(&self) -> bool {
        self.vertices
            .iter()
            .enumerate()
            .any(|(i, v)| self.vertices[i + 1..].contains(v))
    }

    /// Consecutive `(from, to)` vertex pairs including the wrap-around pair
    pub fn loop_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// True when `v0-v1` is a side of the loop, in either direction
    pub fn has_edge(&self, v0: usize, v1: usize) -> bool {
        self.loop_edges()
            .any(|(a, b)| (a == v0 && b == v1) || (a == v1 && b == v0))
    }
}

/// Derived edge between two vertices, `v0 < v1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub v0: usize,
    pub v1: usize,
    /// Adjacent faces in ascending order
    pub faces: Vec<usize>,
    /// Outward normal relative to the first face that produced the edge
    pub normal: Vec2,
}

/// 2D polygon mesh document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// World-space origin; vertex positions are local to it
    pub position: Vec2,
    pub depth: f32,
    pub palette: u32,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub edges: Vec<Edge>,
    pub limits: MeshLimits,
    /// Render cache must be rebuilt
    #[serde(skip)]
    pub dirty: bool,
    /// Bumped on every edge rebuild and dirty mark
    #[serde(skip)]
    pub revision: u64,
}

impl MeshData {
    pub fn new() -> Self {
        Self::with_limits(MeshLimits::default())
    }

    pub fn with_limits(limits: MeshLimits) -> Self {
        Self {
            position: Vec2::zeros(),
            depth: 0.0,
            palette: 0,
            vertices: Vec::new(),
            faces: Vec::new(),
            edges: Vec::new(),
            limits,
            dirty: false,
            revision: 0,
        }
    }

    /// Build a mesh from positions and face loops, then derive its edges
    pub fn from_loops(positions: &[Vec2], loops: &[Vec<usize>]) -> Result<Self> {
        let mut mesh = Self::new();
        for &position in positions {
            mesh.add_vertex(position)?;
        }
        for face_loop in loops {
            mesh.add_face(face_loop.clone())?;
        }
        mesh.update_edges();
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, position: Vec2) -> Result<usize> {
        if self.vertices.len() >= self.limits.max_vertices {
            return Err(Error::capacity("vertex", self.limits.max_vertices));
        }
        let index = self.vertices.len();
        self.vertices.push(Vertex::new(position));
        Ok(index)
    }

    /// Append a face loop after validating its vertex indices
    pub fn add_face(&mut self, vertices: Vec<usize>) -> Result<usize> {
        if vertices.len() < 3 {
            return Err(Error::DegenerateLoop(vertices.len()));
        }
        if let Some(&bad) = vertices.iter().find(|&&v| v >= self.vertices.len()) {
            return Err(Error::InvalidVertex(bad));
        }
        self.push_face(Face::new(vertices))
    }

    /// Append an already-built face, enforcing face and loop capacity
    pub fn push_face(&mut self, face: Face) -> Result<usize> {
        if self.faces.len() >= self.limits.max_faces {
            return Err(Error::capacity("face", self.limits.max_faces));
        }
        if face.vertices.len() > self.limits.max_face_vertices {
            return Err(Error::capacity("face vertex", self.limits.max_face_vertices));
        }
        let index = self.faces.len();
        self.faces.push(face);
        Ok(index)
    }

    pub fn face(&self, face: usize) -> Result<&Face> {
        self.faces.get(face).ok_or(Error::InvalidFace(face))
    }

    pub fn face_mut(&mut self, face: usize) -> Result<&mut Face> {
        self.faces.get_mut(face).ok_or(Error::InvalidFace(face))
    }

    /// Position of a vertex
    pub fn vertex_point(&self, vertex: usize) -> Option<Vec2> {
        self.vertices.get(vertex).map(|v| v.position)
    }

    /// Point at parameter `t` along an edge
    pub fn edge_point(&self, edge: usize, t: f32) -> Option<Vec2> {
        let e = self.edges.get(edge)?;
        let p0 = self.vertex_point(e.v0)?;
        let p1 = self.vertex_point(e.v1)?;
        Some(lerp(p0, p1, t))
    }

    /// Endpoint positions of an edge
    pub fn edge_segment(&self, edge: usize) -> Option<(Vec2, Vec2)> {
        let e = self.edges.get(edge)?;
        Some((self.vertex_point(e.v0)?, self.vertex_point(e.v1)?))
    }

    /// Positions of a face loop, in loop order
    pub fn face_positions(&self, face: usize) -> Vec<Vec2> {
        self.faces
            .get(face)
            .map(|f| self.loop_positions(&f.vertices))
            .unwrap_or_default()
    }

    /// Positions for an arbitrary vertex loop, skipping invalid indices
    pub fn loop_positions(&self, vertices: &[usize]) -> Vec<Vec2> {
        vertices
            .iter()
            .filter_map(|&v| self.vertex_point(v))
            .collect()
    }

    /// Signed area of a face loop (positive for counter-clockwise)
    pub fn face_signed_area(&self, face: usize) -> f32 {
        signed_area(&self.face_positions(face))
    }

    /// First vertex within `tolerance` of `position`
    pub fn find_vertex_at(&self, position: Vec2, tolerance: f32) -> Option<usize> {
        self.vertices
            .iter()
            .position(|v| (v.position - position).norm() < tolerance)
    }

    /// Index of the edge joining two vertices, in either order
    pub fn find_edge(&self, v0: usize, v1: usize) -> Option<usize> {
        let (a, b) = (v0.min(v1), v0.max(v1));
        self.edges.iter().position(|e| e.v0 == a && e.v1 == b)
    }

    /// True when the edge at `edge` is a side of `face`
    pub fn is_edge_in_face(&self, edge: usize, face: usize) -> bool {
        match (self.edges.get(edge), self.faces.get(face)) {
            (Some(e), Some(f)) => f.has_edge(e.v0, e.v1),
            _ => false,
        }
    }

    /// True when two faces share at least one vertex
    pub fn faces_share_vertex(&self, face_a: usize, face_b: usize) -> bool {
        match (self.faces.get(face_a), self.faces.get(face_b)) {
            (Some(a), Some(b)) => a.vertices.iter().any(|v| b.vertices.contains(v)),
            _ => false,
        }
    }

    /// First face whose loop contains both vertices
    pub fn find_face_with_vertices(&self, v0: usize, v1: usize) -> Option<usize> {
        self.faces
            .iter()
            .position(|f| f.contains_vertex(v0) && f.contains_vertex(v1))
    }

    /// Insert `vertex` into a face loop before loop position `at`
    ///
    /// Returns `Ok(false)` without mutating when the vertex is already in the
    /// loop and duplicates are not allowed.
    pub fn insert_vertex_in_face(
        &mut self,
        face: usize,
        at: usize,
        vertex: usize,
        allow_duplicates: bool,
    ) -> Result<bool> {
        let limit = self.limits.max_face_vertices;
        let f = self.face_mut(face)?;

        if !allow_duplicates && f.contains_vertex(vertex) {
            return Ok(false);
        }
        if f.vertices.len() >= limit {
            return Err(Error::capacity("face vertex", limit));
        }

        let at = at.min(f.vertices.len());
        f.vertices.insert(at, vertex);
        Ok(true)
    }

    /// Bounds of every vertex position in local space
    pub fn bounds(&self) -> Bounds2 {
        Bounds2::from_points(self.vertices.iter().map(|v| &v.position))
    }

    /// Number of faces currently selected
    pub fn selected_face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.selected).count()
    }

    /// Convert a world-space point into mesh-local space
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        world - self.position
    }

    /// Invalidate the render cache
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for MeshData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> MeshData {
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
    fn test_from_loops_builds_edges() {
        let mesh = unit_square();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 4);
        assert!(mesh.face_signed_area(0) > 0.0);
    }

    #[test]
    fn test_add_face_rejects_bad_indices() {
        let mut mesh = unit_square();
        assert_eq!(mesh.add_face(vec![0, 1, 9]), Err(Error::InvalidVertex(9)));
        assert_eq!(mesh.add_face(vec![0, 1]), Err(Error::DegenerateLoop(2)));
    }

    #[test]
    fn test_vertex_capacity() {
        let mut mesh = MeshData::with_limits(MeshLimits {
            max_vertices: 1,
            ..MeshLimits::default()
        });
        assert!(mesh.add_vertex(Vec2::zeros()).is_ok());
        assert!(matches!(
            mesh.add_vertex(Vec2::zeros()),
            Err(Error::CapacityExceeded { what: "vertex", limit: 1 })
        ));
    }

    #[test]
    fn test_insert_vertex_in_face() {
        let mut mesh = unit_square();
        let v = mesh.add_vertex(Vec2::new(0.5, 0.0)).unwrap();
        assert_eq!(mesh.insert_vertex_in_face(0, 1, v, false), Ok(true));
        assert_eq!(mesh.faces[0].vertices, vec![0, v, 1, 2, 3]);
        assert_eq!(mesh.insert_vertex_in_face(0, 1, v, false), Ok(false));
        assert_eq!(mesh.faces[0].vertex_count(), 5);
    }

    #[test]
    fn test_face_queries() {
        let face = Face::new(vec![0, 1, 2, 0, 3, 4]);
        assert!(face.has_slit());
        assert_eq!(face.positions_of(0), vec![0, 3]);
        assert!(face.has_edge(4, 0));
        assert!(!face.has_edge(1, 3));
        assert!(!Face::new(vec![0, 1, 2]).has_slit());
    }

    #[test]
    fn test_edge_point_and_lookup() {
        let mesh = unit_square();
        let e = mesh.find_edge(1, 0).expect("edge 0-1");
        let p = mesh.edge_point(e, 0.25).unwrap();
        assert_eq!(p, Vec2::new(0.25, 0.0));
        assert!(mesh.is_edge_in_face(e, 0));
        assert!(mesh.find_edge(0, 2).is_none());
    }
}
