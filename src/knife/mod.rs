// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Knife: turns a sequence of clicks on a polygon mesh into topology edits
//!
//! The pipeline runs in four stages:
//! 1. [`KnifeSession`] validates and records clicks
//! 2. [`build_path`] densifies the clicks with edge crossings
//! 3. [`build_actions`] partitions the path into typed edit actions
//! 4. [`execute_actions`] mutates the mesh in two passes
//!
//! [`commit`] runs stages 2-4 and rebuilds the mesh edges once.

mod actions;
mod execute;
mod path;
mod session;

pub use actions::build_actions;
pub use execute::{execute_actions, split_face_at_positions, ExecuteReport};
pub use path::build_path;
pub use session::{ClickOutcome, KnifeSession, RejectReason};

use crate::config::KnifeConfig;
use crate::geometry::Vec2;
use crate::mesh::MeshData;
use serde::Serialize;
use tracing::{debug, trace};

/// What a click snapped to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CutSnap {
    /// Free point, classified later against the cut faces
    None,
    Vertex(usize),
    Edge { edge: usize, t: f32 },
    /// Loop-closing marker reusing the first cut's edge
    Close { edge: Option<usize> },
}

/// One accepted click, in mesh-local space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KnifeCut {
    pub position: Vec2,
    pub face: Option<usize>,
    pub snap: CutSnap,
}

/// Unordered pair of edge endpoints
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EdgeRef {
    pub v0: usize,
    pub v1: usize,
}

impl EdgeRef {
    pub fn new(v0: usize, v1: usize) -> Self {
        Self { v0, v1 }
    }

    pub fn has(&self, vertex: usize) -> bool {
        self.v0 == vertex || self.v1 == vertex
    }

    /// True when the directed side `a -> b` is this edge in either direction
    pub fn is_side(&self, a: usize, b: usize) -> bool {
        (a == self.v0 && b == self.v1) || (a == self.v1 && b == self.v0)
    }
}

impl PartialEq for EdgeRef {
    fn eq(&self, other: &Self) -> bool {
        self.is_side(other.v0, other.v1)
    }
}

impl Eq for EdgeRef {}

/// Classification of a path point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PointKind {
    /// Outside every cut face, never receives a vertex
    None,
    Vertex(usize),
    Edge(EdgeRef),
    Face(usize),
    Close {
        face: Option<usize>,
        edge: Option<EdgeRef>,
    },
}

/// Densified, classified point of the cut path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathPoint {
    pub position: Vec2,
    pub kind: PointKind,
    /// Resolved vertex, filled during execution for non-vertex points
    pub vertex: Option<usize>,
    /// Parameter along the originating click segment
    pub path_t: f32,
}

impl PathPoint {
    pub fn new(position: Vec2, kind: PointKind) -> Self {
        let vertex = match kind {
            PointKind::Vertex(v) => Some(v),
            _ => None,
        };
        Self {
            position,
            kind,
            vertex,
            path_t: 0.0,
        }
    }

    /// Edge carried by an edge point or an edge-closing point
    pub fn edge(&self) -> Option<EdgeRef> {
        match self.kind {
            PointKind::Edge(edge) => Some(edge),
            PointKind::Close { edge, .. } => edge,
            _ => None,
        }
    }

    pub fn is_edge_point(&self) -> bool {
        self.edge().is_some()
    }

    /// Lies on an existing vertex or edge
    pub fn is_boundary(&self) -> bool {
        matches!(self.kind, PointKind::Vertex(_)) || self.is_edge_point()
    }

    pub fn is_face_point(&self) -> bool {
        matches!(self.kind, PointKind::Face(_))
    }

    pub fn is_close(&self) -> bool {
        matches!(self.kind, PointKind::Close { .. })
    }

    /// Face recorded on the point, if any
    pub fn face(&self) -> Option<usize> {
        match self.kind {
            PointKind::Face(face) => Some(face),
            PointKind::Close { face, .. } => face,
            _ => None,
        }
    }

    /// True when both points lie on the same original edge
    pub fn same_edge(&self, other: &PathPoint) -> bool {
        matches!((self.edge(), other.edge()), (Some(a), Some(b)) if a == b)
    }
}

/// Topological operation performed by an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionKind {
    /// Insert a vertex into every loop sharing an edge
    EdgeSplit,
    /// Cut a face from one boundary point to another
    FaceSplit,
    /// Closed interior loop, embedded as a hole plus a new inner face
    InnerFace,
    /// Open cut that enters and leaves through the same edge
    InnerSlit,
}

/// Path range tagged with an operation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KnifeAction {
    pub kind: ActionKind,
    /// First path index (inclusive)
    pub start: usize,
    /// Last path index (inclusive)
    pub end: usize,
    pub face: Option<usize>,
}

/// What a commit did to the mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommitSummary {
    pub path_points: usize,
    pub actions: Vec<ActionKind>,
    pub report: ExecuteReport,
    pub vertices_added: usize,
    pub faces_added: usize,
}

/// Run the path builder, segmenter and executor over the session's cuts
///
/// Rebuilds edges and marks the mesh dirty exactly once. A session without
/// cuts leaves the mesh untouched. Failed actions are logged and skipped;
/// actions applied before a failure are kept.
pub fn commit(mesh: &mut MeshData, session: &KnifeSession, config: &KnifeConfig) -> CommitSummary {
    if session.cuts().is_empty() {
        return CommitSummary::default();
    }

    let vertices_before = mesh.vertex_count();
    let faces_before = mesh.face_count();

    let mut path = build_path(mesh, session, config);
    for (i, point) in path.iter().enumerate() {
        trace!(index = i, kind = ?point.kind, x = point.position.x, y = point.position.y, "path point");
    }

    let mut actions = build_actions(&path, session.cut_faces(), config);
    for (i, action) in actions.iter().enumerate() {
        trace!(index = i, kind = ?action.kind, start = action.start, end = action.end, face = ?action.face, "action");
    }
    trace!(faces = ?mesh.faces.iter().map(|f| &f.vertices).collect::<Vec<_>>(), "mesh before");

    let report = execute_actions(mesh, &mut path, &mut actions, config);

    mesh.update_edges();
    mesh.mark_dirty();

    trace!(faces = ?mesh.faces.iter().map(|f| &f.vertices).collect::<Vec<_>>(), "mesh after");

    let summary = CommitSummary {
        path_points: path.len(),
        actions: actions.iter().map(|a| a.kind).collect(),
        report,
        vertices_added: mesh.vertex_count() - vertices_before,
        faces_added: mesh.face_count() - faces_before,
    };
    debug!(
        cuts = session.cuts().len(),
        path = summary.path_points,
        actions = summary.actions.len(),
        vertices_added = summary.vertices_added,
        faces_added = summary.faces_added,
        "knife commit"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;

    #[test]
    fn test_edge_ref_is_unordered() {
        assert_eq!(EdgeRef::new(1, 2), EdgeRef::new(2, 1));
        assert_ne!(EdgeRef::new(1, 2), EdgeRef::new(1, 3));
        assert!(EdgeRef::new(4, 7).is_side(7, 4));
    }

    #[test]
    fn test_point_classification() {
        let edge = PathPoint::new(Vec2::zeros(), PointKind::Edge(EdgeRef::new(0, 1)));
        assert!(edge.is_boundary());
        assert!(edge.is_edge_point());

        let open_close = PathPoint::new(Vec2::zeros(), PointKind::Close { face: Some(0), edge: None });
        assert!(!open_close.is_boundary());
        assert_eq!(open_close.face(), Some(0));

        let edge_close = PathPoint::new(
            Vec2::zeros(),
            PointKind::Close { face: Some(0), edge: Some(EdgeRef::new(1, 0)) },
        );
        assert!(edge_close.is_boundary());
        assert!(edge_close.same_edge(&edge));

        let vertex = PathPoint::new(Vec2::zeros(), PointKind::Vertex(3));
        assert_eq!(vertex.vertex, Some(3));
        assert!(vertex.is_boundary());
        assert!(!vertex.is_edge_point());
    }

    #[test]
    fn test_commit_without_cuts_is_noop() {
        let mut mesh = Primitive::unit_square().to_mesh().unwrap();
        let before = mesh.clone();
        let session = KnifeSession::new(false, &KnifeConfig::default());
        let summary = commit(&mut mesh, &session, &KnifeConfig::default());
        assert_eq!(summary, CommitSummary::default());
        assert_eq!(mesh, before);
        assert!(!mesh.dirty);
    }
}
