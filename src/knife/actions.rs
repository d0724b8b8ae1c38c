// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Action segmenter
//!
//! Boundary points (vertex hits, edge points and edge-closing points) split
//! the path into ranges. Each consecutive pair of boundary points becomes a
//! face split, an inner slit or up to two edge splits.

use super::{ActionKind, KnifeAction, PathPoint};
use crate::config::KnifeConfig;
use tracing::{trace, warn};

/// Partition a path into ordered edit actions
pub fn build_actions(path: &[PathPoint], cut_faces: &[usize], config: &KnifeConfig) -> Vec<KnifeAction> {
    let boundary: Vec<usize> = path
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_boundary())
        .map(|(i, _)| i)
        .collect();

    trace!(boundary = ?boundary, "boundary points");

    let mut actions = match boundary.len() {
        0 => no_boundary(path, cut_faces),
        1 => single_boundary(path, boundary[0]),
        _ => multiple_boundary(path, &boundary, cut_faces, config),
    };

    if actions.len() > config.limits.max_actions {
        warn!(
            count = actions.len(),
            limit = config.limits.max_actions,
            "knife actions truncated"
        );
        actions.truncate(config.limits.max_actions);
    }
    actions
}

/// Whole path inside one face: a hole when closed, otherwise a slit
fn no_boundary(path: &[PathPoint], cut_faces: &[usize]) -> Vec<KnifeAction> {
    let Some(&face) = cut_faces.first() else {
        return Vec::new();
    };
    let Some(last) = path.last() else {
        return Vec::new();
    };

    let closed = path.len() >= 3 && last.is_close();
    vec![KnifeAction {
        kind: if closed {
            ActionKind::InnerFace
        } else {
            ActionKind::InnerSlit
        },
        start: 0,
        end: path.len() - 1,
        face: Some(face),
    }]
}

/// A lone edge point splits that edge; anything else does nothing
fn single_boundary(path: &[PathPoint], index: usize) -> Vec<KnifeAction> {
    if path[index].is_close() || !path[index].is_edge_point() {
        return Vec::new();
    }
    vec![KnifeAction {
        kind: ActionKind::EdgeSplit,
        start: index,
        end: index,
        face: None,
    }]
}

/// Face recorded on either endpoint, falling back to the first cut face
fn common_face(path: &[PathPoint], start: usize, end: usize, cut_faces: &[usize]) -> Option<usize> {
    path[start]
        .face()
        .or(path[end].face())
        .or(cut_faces.first().copied())
}

/// Operation for the boundary pair `start..=end`, `None` for no action
fn classify(path: &[PathPoint], start: usize, end: usize, config: &KnifeConfig) -> Option<ActionKind> {
    let (start_pt, end_pt) = (&path[start], &path[end]);

    if end_pt.is_close() && (start_pt.position - end_pt.position).norm() < config.same_point_distance {
        return start_pt.is_edge_point().then_some(ActionKind::EdgeSplit);
    }

    if !start_pt.same_edge(end_pt) {
        return Some(ActionKind::FaceSplit);
    }

    if path[start + 1..end].iter().any(PathPoint::is_face_point) {
        Some(ActionKind::InnerSlit)
    } else {
        Some(ActionKind::EdgeSplit)
    }
}

fn multiple_boundary(
    path: &[PathPoint],
    boundary: &[usize],
    cut_faces: &[usize],
    config: &KnifeConfig,
) -> Vec<KnifeAction> {
    let mut actions = Vec::new();
    let pairs = boundary.len() - 1;

    for i in 0..pairs {
        let (start, end) = (boundary[i], boundary[i + 1]);
        let face = common_face(path, start, end, cut_faces);

        match classify(path, start, end, config) {
            Some(ActionKind::EdgeSplit) => {
                let same_point =
                    (path[start].position - path[end].position).norm() < config.same_point_distance;

                // A point that bounds a neighbouring non-edge-split action is handled there
                let start_used = i > 0
                    && classify(path, boundary[i - 1], start, config) != Some(ActionKind::EdgeSplit);
                let end_used = i + 1 < pairs
                    && classify(path, end, boundary[i + 2], config) != Some(ActionKind::EdgeSplit);

                if !start_used {
                    actions.push(KnifeAction {
                        kind: ActionKind::EdgeSplit,
                        start,
                        end: start,
                        face,
                    });
                }
                if !same_point && !end_used {
                    actions.push(KnifeAction {
                        kind: ActionKind::EdgeSplit,
                        start: end,
                        end,
                        face,
                    });
                }
            }
            Some(kind) => actions.push(KnifeAction {
                kind,
                start,
                end,
                face,
            }),
            None => {}
        }
    }

    // Face points trailing the last boundary point form an open slit
    let last = boundary[boundary.len() - 1];
    if let Some(trailing) = path[last + 1..].iter().find(|p| p.is_face_point()) {
        actions.push(KnifeAction {
            kind: ActionKind::InnerSlit,
            start: last,
            end: path.len() - 1,
            face: trailing.face(),
        });
    }

    actions
}
