// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Text mesh writer

use crate::mesh::MeshData;
use std::fmt::Write;

/// Render a mesh in the `.mesh` text format
pub fn write_mesh(mesh: &MeshData) -> String {
    let mut out = String::with_capacity(32 + mesh.vertex_count() * 16 + mesh.face_count() * 24);

    let _ = writeln!(out, "d {}", mesh.depth);
    let _ = writeln!(out, "p {}", mesh.palette);
    out.push('\n');

    for vertex in &mesh.vertices {
        let _ = writeln!(out, "v {} {}", vertex.position.x, vertex.position.y);
    }
    out.push('\n');

    for face in &mesh.faces {
        out.push('f');
        for index in &face.vertices {
            let _ = write!(out, " {}", index);
        }
        let _ = write!(out, " c {}", face.color);
        if face.opacity < 1.0 {
            // Always carries a decimal point so it cannot be read back as the legacy field
            let _ = write!(out, " {:.6}", face.opacity);
        }
        if face.normal != crate::geometry::Vec2::zeros() {
            let _ = write!(out, " n {} {}", face.normal.x, face.normal.y);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Primitive, Vec2};

    #[test]
    fn test_write_square() {
        let mut mesh = Primitive::unit_square().to_mesh().unwrap();
        mesh.palette = 3;
        mesh.faces[0].color = 7;
        let text = write_mesh(&mesh);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "d 0");
        assert_eq!(lines[1], "p 3");
        assert_eq!(lines[2], "");
        assert_eq!(lines.iter().filter(|l| l.starts_with("v ")).count(), 4);
        assert!(text.contains("\nf 0 1 2 3 c 7\n"));
    }

    #[test]
    fn test_opacity_and_normal_written_when_set() {
        let mut mesh = Primitive::unit_square().to_mesh().unwrap();
        mesh.faces[0].opacity = 0.5;
        mesh.faces[0].normal = Vec2::new(0.0, -1.0);
        let text = write_mesh(&mesh);
        assert!(text.contains("c 0 0.500000 n 0 -1"));
    }
}
