// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Two-pass action executor
//!
//! Pass 1 creates every cut vertex and threads edge points into all face
//! loops sharing their edge. Pass 2 splits faces and embeds holes. Faces are
//! re-resolved by vertex membership in pass 2 because earlier splits append
//! faces and move vertices between loops.

use super::{ActionKind, KnifeAction, PathPoint, PointKind};
use crate::config::KnifeConfig;
use crate::error::{Error, Result};
use crate::geometry::{project_onto_segment, signed_area};
use crate::mesh::MeshData;
use serde::Serialize;
use tracing::{debug, warn};

/// Per-commit execution counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecuteReport {
    /// Actions that changed face topology in pass 2
    pub applied: usize,
    /// Actions with nothing to do (edge splits, degenerate or unresolved ranges)
    pub skipped: usize,
    /// Pass-1 vertex adds and pass-2 actions abandoned on an error, typically capacity
    pub failed: usize,
}

/// Outcome of one pass-2 action
enum Step {
    Applied,
    Skipped(&'static str),
}

/// Execute actions against the mesh. Edges are not rebuilt here.
pub fn execute_actions(
    mesh: &mut MeshData,
    path: &mut [PathPoint],
    actions: &mut [KnifeAction],
    config: &KnifeConfig,
) -> ExecuteReport {
    let mut report = ExecuteReport::default();

    for action in actions.iter() {
        if matches!(
            action.kind,
            ActionKind::EdgeSplit | ActionKind::FaceSplit | ActionKind::InnerSlit
        ) {
            report.failed += prepare_action_vertices(mesh, path, action, config);
        }
    }

    for (index, action) in actions.iter_mut().enumerate() {
        if action.kind == ActionKind::FaceSplit {
            if let (Some(v0), Some(v1)) = (path[action.start].vertex, path[action.end].vertex) {
                if v0 != v1 {
                    if let Some(face) = mesh.find_face_with_vertices(v0, v1) {
                        action.face = Some(face);
                    }
                }
            }
        }

        let step = match action.kind {
            ActionKind::EdgeSplit => Ok(Step::Skipped("edge split completed in pass 1")),
            ActionKind::FaceSplit => face_split(mesh, path, action),
            ActionKind::InnerFace => inner_face(mesh, path, action, config),
            ActionKind::InnerSlit => inner_slit(mesh, path, action),
        };

        match step {
            Ok(Step::Applied) => report.applied += 1,
            Ok(Step::Skipped(reason)) => {
                debug!(index, kind = ?action.kind, reason, "knife action skipped");
                report.skipped += 1;
            }
            Err(err) => {
                warn!(index, kind = ?action.kind, error = %err, "knife action failed");
                report.failed += 1;
            }
        }
    }

    report
}

/// Vertex for a path point, creating (or welding to) one when needed
fn get_or_create_vertex(mesh: &mut MeshData, point: &mut PathPoint, config: &KnifeConfig) -> Result<Option<usize>> {
    match point.kind {
        PointKind::None => return Ok(None),
        PointKind::Vertex(vertex) => return Ok(Some(vertex)),
        _ => {}
    }
    if let Some(vertex) = point.vertex {
        return Ok(Some(vertex));
    }

    let vertex = match mesh.find_vertex_at(point.position, config.vertex_weld_distance) {
        Some(existing) => existing,
        None => mesh.add_vertex(point.position)?,
    };
    point.vertex = Some(vertex);
    Ok(Some(vertex))
}

/// Create the vertices an action needs; returns the number of failed adds
fn prepare_action_vertices(
    mesh: &mut MeshData,
    path: &mut [PathPoint],
    action: &KnifeAction,
    config: &KnifeConfig,
) -> usize {
    let mut failures = 0;
    for (index, point) in path[action.start..=action.end].iter_mut().enumerate() {
        if !point.is_edge_point() && !point.is_face_point() {
            continue;
        }
        if let Err(err) = get_or_create_vertex(mesh, point, config) {
            warn!(point = action.start + index, kind = ?action.kind, error = %err, "knife vertex creation failed");
            failures += 1;
            continue;
        }
        if point.is_edge_point() {
            failures += ensure_edge_vertex_in_all_faces(mesh, point, config);
        }
    }
    failures
}

/// Thread an edge point's vertex into every face on its edge
///
/// A face that cannot take the vertex is logged and skipped; the remaining
/// faces still receive it.
fn ensure_edge_vertex_in_all_faces(mesh: &mut MeshData, point: &PathPoint, config: &KnifeConfig) -> usize {
    if point.vertex.is_none() || !point.is_edge_point() {
        return 0;
    }
    let mut failures = 0;
    for face in 0..mesh.face_count() {
        if let Err(err) = ensure_edge_vertex_in_face(mesh, face, point, config) {
            warn!(face, vertex = ?point.vertex, error = %err, "edge vertex insertion failed");
            failures += 1;
        }
    }
    failures
}

/// Insert an edge point's vertex into one face loop
///
/// Matches the original edge, or a piece of it left by an earlier insertion
/// that shares one endpoint and passes within `sub_edge_distance` of the point.
fn ensure_edge_vertex_in_face(
    mesh: &mut MeshData,
    face: usize,
    point: &PathPoint,
    config: &KnifeConfig,
) -> Result<()> {
    let (Some(edge), Some(vertex)) = (point.edge(), point.vertex) else {
        return Ok(());
    };

    let f = mesh.face(face)?;
    if f.contains_vertex(vertex) {
        return Ok(());
    }

    let n = f.vertex_count();
    let mut insert_at = None;
    for vi in 0..n {
        let a = f.vertices[vi];
        let b = f.vertices[(vi + 1) % n];

        if edge.is_side(a, b) {
            insert_at = Some(vi + 1);
            break;
        }

        if edge.has(a) || edge.has(b) {
            let (Some(p0), Some(p1)) = (mesh.vertex_point(a), mesh.vertex_point(b)) else {
                continue;
            };
            let Some(proj) = project_onto_segment(point.position, p0, p1) else {
                continue;
            };
            if proj.strictly_within() && proj.distance < config.sub_edge_distance {
                insert_at = Some(vi + 1);
                break;
            }
        }
    }

    if let Some(at) = insert_at {
        mesh.insert_vertex_in_face(face, at, vertex, false)?;
    }
    Ok(())
}

/// Resolved vertices of the face points strictly inside `start..end`
fn cut_vertices(path: &[PathPoint], start: usize, end: usize) -> Vec<usize> {
    path[start + 1..end]
        .iter()
        .filter(|p| p.is_face_point())
        .filter_map(|p| p.vertex)
        .collect()
}

fn face_split(mesh: &mut MeshData, path: &[PathPoint], action: &KnifeAction) -> Result<Step> {
    let Some(face) = action.face else {
        return Ok(Step::Skipped("no face"));
    };
    if action.start == action.end {
        return Ok(Step::Skipped("single point"));
    }
    let (Some(v0), Some(v1)) = (path[action.start].vertex, path[action.end].vertex) else {
        return Ok(Step::Skipped("unresolved endpoint"));
    };
    if v0 == v1 {
        return Ok(Step::Skipped("same vertex"));
    }

    let cut = cut_vertices(path, action.start, action.end);

    let f = mesh.face(face)?;
    let n = f.vertex_count();
    let p0s = f.positions_of(v0);
    let p1s = f.positions_of(v1);
    let (Some(&first0), Some(&first1)) = (p0s.first(), p1s.first()) else {
        return Ok(Step::Skipped("endpoint not in face"));
    };

    // Slit faces keep the outer boundary together by minimizing the backward arc
    let slit = f.has_slit();
    let distance = |p0: usize, p1: usize| {
        if slit {
            (p0 + n - p1) % n
        } else {
            (p1 + n - p0) % n
        }
    };

    let mut best = (first0, first1);
    let mut best_dist = distance(first0, first1);
    for &p0 in &p0s {
        for &p1 in &p1s {
            let d = distance(p0, p1);
            if d > 0 && d < best_dist {
                best = (p0, p1);
                best_dist = d;
            }
        }
    }

    split_face_at_positions(mesh, face, best.0, best.1, &cut)?;
    Ok(Step::Applied)
}

fn inner_face(
    mesh: &mut MeshData,
    path: &mut [PathPoint],
    action: &KnifeAction,
    config: &KnifeConfig,
) -> Result<Step> {
    let Some(face) = action.face else {
        return Ok(Step::Skipped("no face"));
    };
    mesh.face(face)?;

    let mut ring = Vec::new();
    for i in action.start..=action.end {
        if i == action.end && path[i].is_close() {
            continue;
        }
        if let Some(v) = get_or_create_vertex(mesh, &mut path[i], config)? {
            ring.push(v);
        }
    }
    if ring.len() < 3 {
        return Ok(Step::Skipped("loop has fewer than 3 vertices"));
    }

    let limits = mesh.limits;
    let boundary = mesh.face(face)?.vertices.clone();
    let boundary_area = signed_area(&mesh.loop_positions(&boundary));
    let ring_area = signed_area(&mesh.loop_positions(&ring));

    // Same winding as the boundary: the ring is used as-is for the inner
    // face and reversed for the embedded hole
    let reverse = (boundary_area > 0.0) == (ring_area > 0.0);

    let mut closest: Option<(usize, usize, f32)> = None;
    for &bv in &boundary {
        let Some(bp) = mesh.vertex_point(bv) else {
            continue;
        };
        for (li, &lv) in ring.iter().enumerate() {
            let Some(lp) = mesh.vertex_point(lv) else {
                continue;
            };
            let d = (lp - bp).norm();
            if closest.map_or(true, |(_, _, best)| d < best) {
                closest = Some((bv, li, d));
            }
        }
    }
    let Some((bridge, start, _)) = closest else {
        return Ok(Step::Skipped("no bridge vertex"));
    };
    let Some(bridge_pos) = boundary.iter().position(|&v| v == bridge) else {
        return Ok(Step::Skipped("bridge vertex not in face"));
    };

    if mesh.face_count() >= limits.max_faces {
        return Err(Error::capacity("face", limits.max_faces));
    }
    let outer_len = boundary.len() + ring.len() + 2;
    if outer_len > limits.max_face_vertices || ring.len() > limits.max_face_vertices {
        return Err(Error::capacity("face vertex", limits.max_face_vertices));
    }

    let len = ring.len();
    let forward = |i: usize| ring[(start + i) % len];
    let backward = |i: usize| ring[(start + len - i % len) % len];

    let inner: Vec<usize> = (0..len)
        .map(|i| if reverse { forward(i) } else { backward(i) })
        .collect();

    let mut outer = Vec::with_capacity(outer_len);
    outer.extend_from_slice(&boundary[..=bridge_pos]);
    outer.extend((0..=len).map(|i| if reverse { backward(i) } else { forward(i) }));
    outer.push(bridge);
    outer.extend_from_slice(&boundary[bridge_pos + 1..]);

    let inner_face = mesh.face(face)?.derive(inner);
    mesh.push_face(inner_face)?;
    mesh.face_mut(face)?.vertices = outer;
    Ok(Step::Applied)
}

fn inner_slit(mesh: &mut MeshData, path: &[PathPoint], action: &KnifeAction) -> Result<Step> {
    let Some(face) = action.face else {
        return Ok(Step::Skipped("no face"));
    };
    let (start, end) = (&path[action.start], &path[action.end]);
    if !start.is_edge_point() || !end.is_edge_point() {
        return Ok(Step::Skipped("slit endpoints not on edges"));
    }
    let (Some(v0), Some(v1)) = (start.vertex, end.vertex) else {
        return Ok(Step::Skipped("unresolved endpoint"));
    };

    let cut = cut_vertices(path, action.start, action.end);

    let f = mesh.face(face)?;
    let n = f.vertex_count();
    let mut positions = None;
    for i in 0..n {
        let next = (i + 1) % n;
        if f.vertices[i] == v0 && f.vertices[next] == v1 {
            positions = Some((i, next));
            break;
        }
        if f.vertices[i] == v1 && f.vertices[next] == v0 {
            positions = Some((next, i));
            break;
        }
    }
    let Some((pos0, pos1)) = positions else {
        return Ok(Step::Skipped("endpoints not adjacent in face"));
    };

    split_face_at_positions(mesh, face, pos0, pos1, &cut)?;
    Ok(Step::Applied)
}

/// Split a face along a chord between two loop positions
///
/// The new face takes the forward arc `pos0..=pos1` followed by `cut`
/// reversed; the original face keeps the arc `pos1..=pos0` followed by `cut`
/// in order. Returns the new face index. Fails without mutating when a
/// position is out of range or a capacity would be exceeded.
pub fn split_face_at_positions(
    mesh: &mut MeshData,
    face: usize,
    pos0: usize,
    pos1: usize,
    cut: &[usize],
) -> Result<usize> {
    let limits = mesh.limits;
    if mesh.face_count() >= limits.max_faces {
        return Err(Error::capacity("face", limits.max_faces));
    }

    let old = mesh.face(face)?;
    let n = old.vertex_count();
    if pos0 >= n || pos1 >= n {
        return Err(Error::PositionOutOfRange { face, pos0, pos1 });
    }

    let forward = (pos1 + n - pos0) % n;
    let backward = (pos0 + n - pos1) % n;

    let mut new_loop: Vec<usize> = (0..=forward).map(|i| old.vertices[(pos0 + i) % n]).collect();
    new_loop.extend(cut.iter().rev());

    let mut old_loop: Vec<usize> = (0..=backward).map(|i| old.vertices[(pos1 + i) % n]).collect();
    old_loop.extend_from_slice(cut);

    if new_loop.len() > limits.max_face_vertices || old_loop.len() > limits.max_face_vertices {
        return Err(Error::capacity("face vertex", limits.max_face_vertices));
    }

    let new_face = old.derive(new_loop);
    let index = mesh.push_face(new_face)?;
    mesh.face_mut(face)?.vertices = old_loop;
    Ok(index)
}
