// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - `.mesh` text files and JSON documents

mod parser;
mod writer;

pub use parser::parse_mesh;
pub use writer::write_mesh;

use crate::mesh::MeshData;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Load a mesh from a `.mesh` or `.json` file
pub fn load_mesh(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read mesh file: {}", path.display()))?;

    if is_json(path) {
        from_json(&source).with_context(|| format!("Failed to parse mesh JSON: {}", path.display()))
    } else {
        parse_mesh(&source).with_context(|| format!("Failed to parse mesh file: {}", path.display()))
    }
}

/// Save a mesh, choosing the format from the file extension
pub fn save_mesh(mesh: &MeshData, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let contents = if is_json(path) {
        to_json(mesh)?
    } else {
        write_mesh(mesh)
    };
    fs::write(path, contents).with_context(|| format!("Failed to write mesh file: {}", path.display()))
}

pub fn to_json(mesh: &MeshData) -> Result<String> {
    serde_json::to_string_pretty(mesh).context("Failed to serialize mesh")
}

/// Deserialize a mesh and rebuild its derived data
pub fn from_json(source: &str) -> Result<MeshData> {
    let mut mesh: MeshData = serde_json::from_str(source).context("Invalid mesh JSON")?;
    mesh.update_edges();
    Ok(mesh)
}
