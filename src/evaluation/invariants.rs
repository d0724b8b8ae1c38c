// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Structural checks run after every fuzzed commit

use crate::mesh::MeshData;
use crate::utils::math::approx_eq;
use serde::{Deserialize, Serialize};

/// Signed area below which a face loop counts as collapsed
const ZERO_AREA: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Broken mesh or broken session rule
    Hard,
    /// Degenerate but well-formed output
    Soft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub severity: Severity,
    pub rule: String,
    pub message: String,
}

impl Violation {
    pub fn hard(rule: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Hard,
            rule: rule.to_string(),
            message: message.into(),
        }
    }

    pub fn soft(rule: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Soft,
            rule: rule.to_string(),
            message: message.into(),
        }
    }

    pub fn is_hard(&self) -> bool {
        self.severity == Severity::Hard
    }
}

/// Face loops reference existing vertices and respect the mesh limits
pub fn check_mesh(mesh: &MeshData) -> Vec<Violation> {
    let mut violations = Vec::new();
    let vertex_count = mesh.vertex_count();

    if mesh.face_count() > mesh.limits.max_faces {
        violations.push(Violation::hard(
            "face_capacity",
            format!("{} faces exceeds limit {}", mesh.face_count(), mesh.limits.max_faces),
        ));
    }

    for (i, face) in mesh.faces.iter().enumerate() {
        if let Some(&bad) = face.vertices.iter().find(|&&v| v >= vertex_count) {
            violations.push(Violation::hard(
                "index_range",
                format!("face {} references vertex {} of {}", i, bad, vertex_count),
            ));
            continue;
        }
        if face.vertex_count() > mesh.limits.max_face_vertices {
            violations.push(Violation::hard(
                "face_vertex_capacity",
                format!("face {} has {} vertices", i, face.vertex_count()),
            ));
        }
        if face.vertex_count() < 3 {
            violations.push(Violation::soft(
                "short_loop",
                format!("face {} has {} vertices", i, face.vertex_count()),
            ));
        } else if approx_eq(mesh.face_signed_area(i), 0.0, ZERO_AREA) {
            violations.push(Violation::soft("zero_area", format!("face {} has zero area", i)));
        }
    }

    violations
}

/// A commit only ever adds vertices and faces
pub fn check_growth(before: &MeshData, after: &MeshData) -> Vec<Violation> {
    let mut violations = Vec::new();
    if after.vertex_count() < before.vertex_count() {
        violations.push(Violation::hard(
            "vertex_count",
            format!("{} -> {}", before.vertex_count(), after.vertex_count()),
        ));
    }
    if after.face_count() < before.face_count() {
        violations.push(Violation::hard(
            "face_count",
            format!("{} -> {}", before.face_count(), after.face_count()),
        ));
    }
    violations
}

/// Every cut face after the first shares a vertex with an earlier one
pub fn check_cut_connectivity(mesh: &MeshData, cut_faces: &[usize]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (i, &face) in cut_faces.iter().enumerate().skip(1) {
        let connected = cut_faces[..i]
            .iter()
            .any(|&earlier| mesh.faces_share_vertex(face, earlier));
        if !connected {
            violations.push(Violation::hard(
                "cut_connectivity",
                format!("cut face {} is disconnected from {:?}", face, &cut_faces[..i]),
            ));
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Primitive, Vec2};

    #[test]
    fn test_clean_grid() {
        let mesh = Primitive::Grid { cols: 2, rows: 2, cell: 1.0 }.to_mesh().unwrap();
        assert!(check_mesh(&mesh).is_empty());
        assert!(check_cut_connectivity(&mesh, &[0, 1, 3]).is_empty());
    }

    #[test]
    fn test_bad_index_is_hard() {
        let mut mesh = Primitive::unit_square().to_mesh().unwrap();
        mesh.faces[0].vertices.push(9);
        let violations = check_mesh(&mesh);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].is_hard());
        assert_eq!(violations[0].rule, "index_range");
    }

    #[test]
    fn test_collapsed_face_is_soft() {
        let mesh = MeshData::from_loops(
            &[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)],
            &[vec![0, 1, 2]],
        )
        .unwrap();
        let violations = check_mesh(&mesh);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Soft);
    }

    #[test]
    fn test_disconnected_cut_faces() {
        let mesh = Primitive::DisjointPair { gap: 1.0 }.to_mesh().unwrap();
        let violations = check_cut_connectivity(&mesh, &[0, 1]);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].is_hard());
    }

    #[test]
    fn test_shrinking_mesh() {
        let big = Primitive::Grid { cols: 2, rows: 1, cell: 1.0 }.to_mesh().unwrap();
        let small = Primitive::unit_square().to_mesh().unwrap();
        assert_eq!(check_growth(&big, &small).len(), 2);
        assert!(check_growth(&small, &big).is_empty());
    }
}
