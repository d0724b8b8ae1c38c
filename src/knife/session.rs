// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Click intake for one knife session

use super::{CutSnap, KnifeCut};
use crate::config::{KnifeConfig, KnifeLimits};
use crate::geometry::{overlap_line, Vec2};
use crate::mesh::MeshData;
use serde::Serialize;
use tracing::{debug, warn};

/// Why a click was not recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    /// Landed on an already recorded cut
    Duplicate,
    /// No face could be resolved for the hit
    NoFace,
    /// Face fails the selected-faces restriction
    NotSelectable,
    /// Face shares no vertex with the faces already cut
    Disconnected,
    /// Cut list is full
    CutCapacity,
}

/// Result of [`KnifeSession::click`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ClickOutcome {
    /// Recorded as the cut at this index
    Accepted(usize),
    /// Loop closed on the first cut; the session should be committed
    Closed,
    Ignored(RejectReason),
}

/// Accumulated clicks and the faces they touch
///
/// Every face in the cut set shares at least one vertex with a face added
/// before it, so a session never spans disconnected faces.
#[derive(Debug, Clone)]
pub struct KnifeSession {
    cuts: Vec<KnifeCut>,
    cut_faces: Vec<usize>,
    restrict_to_selected: bool,
    /// Snapped positions and live edge crossings, for display only
    preview: Vec<Vec2>,
    limits: KnifeLimits,
}

impl KnifeSession {
    pub fn new(restrict_to_selected: bool, config: &KnifeConfig) -> Self {
        Self {
            cuts: Vec::new(),
            cut_faces: Vec::new(),
            restrict_to_selected,
            preview: Vec::new(),
            limits: config.limits,
        }
    }

    pub fn cuts(&self) -> &[KnifeCut] {
        &self.cuts
    }

    pub fn cut_faces(&self) -> &[usize] {
        &self.cut_faces
    }

    pub fn preview_points(&self) -> &[Vec2] {
        &self.preview
    }

    pub fn restrict_to_selected(&self) -> bool {
        self.restrict_to_selected
    }

    pub fn is_face_in_cut(&self, face: usize) -> bool {
        self.cut_faces.contains(&face)
    }

    /// Idempotent append to the cut-face set; drops faces beyond capacity
    pub fn add_face_to_cut(&mut self, face: usize) -> bool {
        if self.is_face_in_cut(face) {
            return true;
        }
        if self.cut_faces.len() >= self.limits.max_cut_faces {
            warn!(face, limit = self.limits.max_cut_faces, "cut face capacity reached");
            return false;
        }
        self.cut_faces.push(face);
        true
    }

    /// Selection policy: any face, or only selected faces when restricted
    pub fn is_face_valid_for_cut(&self, mesh: &MeshData, face: usize) -> bool {
        match mesh.faces.get(face) {
            Some(f) => !self.restrict_to_selected || f.selected,
            None => false,
        }
    }

    /// True when the cut is empty or `face` shares a vertex with a cut face
    pub fn is_face_connected_to_cut(&self, mesh: &MeshData, face: usize) -> bool {
        self.cut_faces.is_empty()
            || self
                .cut_faces
                .iter()
                .any(|&cut_face| mesh.faces_share_vertex(face, cut_face))
    }

    pub fn can_add_face_to_cut(&self, mesh: &MeshData, face: usize) -> bool {
        self.is_face_valid_for_cut(mesh, face)
            && (self.is_face_in_cut(face) || self.is_face_connected_to_cut(mesh, face))
    }

    /// Face for a vertex-snapped click: a cut face holding the vertex, else
    /// the first addable face holding it
    pub fn valid_face_for_vertex(&self, mesh: &MeshData, vertex: usize) -> Option<usize> {
        self.cut_faces
            .iter()
            .copied()
            .find(|&fi| mesh.faces.get(fi).is_some_and(|f| f.contains_vertex(vertex)))
            .or_else(|| {
                (0..mesh.face_count()).find(|&fi| {
                    mesh.faces[fi].contains_vertex(vertex) && self.can_add_face_to_cut(mesh, fi)
                })
            })
    }

    /// Face for an edge-snapped click, resolved like [`Self::valid_face_for_vertex`]
    pub fn valid_face_for_edge(&self, mesh: &MeshData, edge: usize) -> Option<usize> {
        self.cut_faces
            .iter()
            .copied()
            .find(|&fi| mesh.is_edge_in_face(edge, fi))
            .or_else(|| {
                (0..mesh.face_count())
                    .find(|&fi| mesh.is_edge_in_face(edge, fi) && self.can_add_face_to_cut(mesh, fi))
            })
    }

    /// Index of the recorded cut within `radius` of `local`, if any
    fn cut_at(&self, local: Vec2, radius: f32) -> Option<usize> {
        self.cuts
            .iter()
            .position(|cut| (cut.position - local).norm() <= radius)
    }

    /// Process one left-click at a world-space position
    pub fn click(&mut self, mesh: &MeshData, world: Vec2, config: &KnifeConfig) -> ClickOutcome {
        let local = mesh.to_local(world);
        let vertex_radius = config.vertex_radius();

        let vertex_hit = mesh.hit_test_vertex(local, vertex_radius);
        let edge_hit = match vertex_hit {
            Some(_) => None,
            None => mesh.hit_test_edge(local, config.edge_radius()),
        };
        let face_hit = match (vertex_hit, edge_hit) {
            (None, None) => mesh.hit_test_face(local),
            _ => None,
        };

        if let Some(index) = self.cut_at(local, vertex_radius) {
            // Closing needs a segment to close; re-clicking a lone first cut is a duplicate
            if index == 0 && self.cuts.len() >= 2 {
                return self.close();
            }
            debug!(index, "knife click ignored: duplicate cut");
            return ClickOutcome::Ignored(RejectReason::Duplicate);
        }

        let click_face = if face_hit.is_some() {
            face_hit
        } else if let Some(hit) = edge_hit {
            self.valid_face_for_edge(mesh, hit.edge)
        } else if let Some(vertex) = vertex_hit {
            self.valid_face_for_vertex(mesh, vertex)
        } else {
            None
        };

        let Some(face) = click_face else {
            debug!(x = local.x, y = local.y, "knife click ignored: no face");
            return ClickOutcome::Ignored(RejectReason::NoFace);
        };
        if !self.is_face_valid_for_cut(mesh, face) {
            debug!(face, "knife click ignored: face not selectable");
            return ClickOutcome::Ignored(RejectReason::NotSelectable);
        }
        if !self.can_add_face_to_cut(mesh, face) {
            debug!(face, "knife click ignored: face not connected to cut");
            return ClickOutcome::Ignored(RejectReason::Disconnected);
        }
        if self.cuts.len() >= self.limits.max_cuts {
            warn!(limit = self.limits.max_cuts, "cut capacity reached");
            return ClickOutcome::Ignored(RejectReason::CutCapacity);
        }

        self.add_face_to_cut(face);

        let (position, snap) = match (vertex_hit, edge_hit) {
            (Some(vertex), _) => (mesh.vertex_point(vertex).unwrap_or(local), CutSnap::Vertex(vertex)),
            (None, Some(hit)) => (
                mesh.edge_point(hit.edge, hit.t).unwrap_or(local),
                CutSnap::Edge { edge: hit.edge, t: hit.t },
            ),
            (None, None) => (local, CutSnap::None),
        };

        self.cuts.push(KnifeCut {
            position,
            face: Some(face),
            snap,
        });
        let index = self.cuts.len() - 1;

        if snap != CutSnap::None {
            self.push_preview(position);
        }
        if index > 0 {
            self.preview_crossings(mesh, self.cuts[index - 1].position, position);
        }

        debug!(index, face, snap = ?snap, x = position.x, y = position.y, "knife click accepted");
        ClickOutcome::Accepted(index)
    }

    /// Append the loop-closing marker that copies the first cut
    fn close(&mut self) -> ClickOutcome {
        let Some(first) = self.cuts.first().copied() else {
            return ClickOutcome::Ignored(RejectReason::NoFace);
        };
        let edge = match first.snap {
            CutSnap::Edge { edge, .. } => Some(edge),
            _ => None,
        };
        if self.cuts.len() < self.limits.max_cuts {
            self.cuts.push(KnifeCut {
                position: first.position,
                face: first.face,
                snap: CutSnap::Close { edge },
            });
        } else {
            warn!(limit = self.limits.max_cuts, "cut capacity reached, closing without marker");
        }
        debug!(cuts = self.cuts.len(), "knife loop closed");
        ClickOutcome::Closed
    }

    fn push_preview(&mut self, point: Vec2) {
        if self.preview.len() < self.limits.max_path_points {
            self.preview.push(point);
        }
    }

    /// Record crossings of the new segment with edges of the cut faces
    fn preview_crossings(&mut self, mesh: &MeshData, from: Vec2, to: Vec2) {
        for edge in 0..mesh.edge_count() {
            if !self.cut_faces.iter().any(|&f| mesh.is_edge_in_face(edge, f)) {
                continue;
            }
            let Some((p0, p1)) = mesh.edge_segment(edge) else {
                continue;
            };
            if let Some(hit) = overlap_line(from, to, p0, p1) {
                self.push_preview(hit);
            }
        }
    }
}
