// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Path builder: clicks plus the edge crossings between them

use super::{CutSnap, EdgeRef, KnifeSession, PathPoint, PointKind};
use crate::config::KnifeConfig;
use crate::geometry::{overlap_line, point_in_polygon, Vec2};
use crate::mesh::MeshData;
use tracing::warn;

/// Crossing of a click segment with a mesh edge
#[derive(Debug, Clone, Copy)]
struct SegmentHit {
    position: Vec2,
    edge: EdgeRef,
    t: f32,
}

/// Densify the session's cuts into an ordered, classified path
///
/// Between consecutive cuts, crossings with edges of the cut faces are
/// inserted in segment order. Crossings near either click or near either
/// edge endpoint are left out; those are already represented by the clicks.
pub fn build_path(mesh: &MeshData, session: &KnifeSession, config: &KnifeConfig) -> Vec<PathPoint> {
    let limits = &config.limits;
    let cuts = session.cuts();
    let cut_faces = session.cut_faces();

    let cut_edges: Vec<usize> = (0..mesh.edge_count())
        .filter(|&e| cut_faces.iter().any(|&f| mesh.is_edge_in_face(e, f)))
        .collect();

    let mut path: Vec<PathPoint> = Vec::new();
    let mut truncated = false;
    let mut push = |path: &mut Vec<PathPoint>, point: PathPoint| {
        if path.len() < limits.max_path_points {
            path.push(point);
        } else {
            truncated = true;
        }
    };

    for (i, cut) in cuts.iter().enumerate() {
        if i > 0 {
            let hits = segment_hits(mesh, &cut_edges, cuts[i - 1].position, cut.position, config);
            for hit in hits {
                let mut point = PathPoint::new(hit.position, PointKind::Edge(hit.edge));
                point.path_t = hit.t;
                push(&mut path, point);
            }
        }

        let edge_ref = |edge: usize| mesh.edges.get(edge).map(|e| EdgeRef::new(e.v0, e.v1));
        let kind = match cut.snap {
            CutSnap::Close { edge } => PointKind::Close {
                face: cut.face,
                edge: edge.and_then(edge_ref),
            },
            CutSnap::Vertex(vertex) => PointKind::Vertex(vertex),
            CutSnap::Edge { edge, .. } => match edge_ref(edge) {
                Some(edge) => PointKind::Edge(edge),
                None => PointKind::None,
            },
            CutSnap::None => match cut.face {
                Some(face) => PointKind::Face(face),
                None => cut_faces
                    .iter()
                    .copied()
                    .find(|&f| point_in_polygon(cut.position, &mesh.face_positions(f)))
                    .map_or(PointKind::None, PointKind::Face),
            },
        };
        push(&mut path, PathPoint::new(cut.position, kind));
    }

    if truncated {
        warn!(limit = limits.max_path_points, "knife path truncated");
    }
    path
}

/// Crossings of segment `from-to` with the given edges, sorted along the segment
fn segment_hits(
    mesh: &MeshData,
    edges: &[usize],
    from: Vec2,
    to: Vec2,
    config: &KnifeConfig,
) -> Vec<SegmentHit> {
    let seg_len = (to - from).norm();
    if seg_len < f32::EPSILON {
        return Vec::new();
    }

    let seg_cut = config.segment_endpoint_cutoff;
    let edge_cut = config.edge_endpoint_cutoff;
    let mut hits = Vec::new();

    for &edge in edges {
        let e = &mesh.edges[edge];
        let Some((ev0, ev1)) = mesh.edge_segment(edge) else {
            continue;
        };
        let Some(position) = overlap_line(from, to, ev0, ev1) else {
            continue;
        };

        let t = (position - from).norm() / seg_len;
        if t < seg_cut || t > 1.0 - seg_cut {
            continue;
        }

        let edge_len = (ev1 - ev0).norm();
        let edge_t = if edge_len > f32::EPSILON {
            (position - ev0).norm() / edge_len
        } else {
            0.0
        };
        if edge_t < edge_cut || edge_t > 1.0 - edge_cut {
            continue;
        }

        if hits.len() >= config.limits.max_segment_hits {
            warn!(limit = config.limits.max_segment_hits, "segment crossing capacity reached");
            break;
        }
        hits.push(SegmentHit {
            position,
            edge: EdgeRef::new(e.v0, e.v1),
            t,
        });
    }

    hits.sort_by(|a, b| a.t.total_cmp(&b.t));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::knife::KnifeSession;
    use approx::assert_relative_eq;

    fn click_all(mesh: &MeshData, clicks: &[(f32, f32)]) -> KnifeSession {
        let config = KnifeConfig::default();
        let mut session = KnifeSession::new(false, &config);
        for &(x, y) in clicks {
            session.click(mesh, Vec2::new(x, y), &config);
        }
        session
    }

    #[test]
    fn test_crossings_are_inserted_in_order() {
        let mesh = Primitive::Grid { cols: 3, rows: 1, cell: 1.0 }.to_mesh().unwrap();
        let session = click_all(&mesh, &[(0.5, 0.5), (1.5, 0.5), (2.5, 0.5)]);
        let path = build_path(&mesh, &session, &KnifeConfig::default());

        let kinds: Vec<bool> = path.iter().map(|p| p.is_edge_point()).collect();
        assert_eq!(kinds, vec![false, true, false, true, false]);
        assert_relative_eq!(path[1].position.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(path[1].path_t, 0.5, epsilon = 1e-6);
        assert_eq!(path[1].edge(), Some(EdgeRef::new(1, 5)));
        assert_eq!(path[3].edge(), Some(EdgeRef::new(2, 6)));
    }

    #[test]
    fn test_crossings_sorted_by_segment_parameter() {
        let mesh = Primitive::Grid { cols: 3, rows: 1, cell: 1.0 }.to_mesh().unwrap();
        let session = click_all(&mesh, &[(2.5, 0.5), (1.5, 0.5), (0.5, 0.5)]);
        let path = build_path(&mesh, &session, &KnifeConfig::default());
        assert_eq!(path[1].edge(), Some(EdgeRef::new(2, 6)));
        assert_eq!(path[3].edge(), Some(EdgeRef::new(1, 5)));
    }

    #[test]
    fn test_endpoint_crossings_skipped() {
        let mesh = Primitive::unit_square().to_mesh().unwrap();
        let session = click_all(&mesh, &[(0.5, 0.0), (0.5, 1.0)]);
        let path = build_path(&mesh, &session, &KnifeConfig::default());
        assert_eq!(path.len(), 2);
        assert!(path.iter().all(|p| p.is_edge_point()));
    }

    #[test]
    fn test_close_carries_first_edge() {
        let mesh = Primitive::unit_square().to_mesh().unwrap();
        let session = click_all(&mesh, &[(0.5, 0.0), (0.5, 0.5), (0.75, 0.6), (0.5, 0.0)]);
        let path = build_path(&mesh, &session, &KnifeConfig::default());
        let last = path.last().unwrap();
        assert!(last.is_close());
        assert_eq!(last.edge(), Some(EdgeRef::new(0, 1)));
        assert_eq!(last.face(), Some(0));
    }
}
