// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Meshknife
//!
//! Knife tool engine for 2D polygon meshes. Clicks are validated against the
//! mesh, densified into a classified cut path, partitioned into edit actions
//! and applied as edge splits, face splits, slits and embedded hole faces.

pub mod config;
pub mod editor;
pub mod error;
pub mod evaluation;
pub mod geometry;
pub mod io;
pub mod knife;
pub mod mesh;
pub mod tool;
pub mod undo;
pub mod utils;

pub use config::{KnifeConfig, KnifeLimits};
pub use editor::Editor;
pub use error::{Error, Result};
pub use geometry::{Primitive, Vec2};
pub use io::{load_mesh, parse_mesh, save_mesh, write_mesh};
pub use knife::{commit, ActionKind, ClickOutcome, CommitSummary, KnifeSession, RejectReason};
pub use mesh::{MeshData, MeshLimits};
pub use tool::{Button, FrameInput, KnifeTool, ToolStatus};
pub use undo::UndoHistory;

/// Cut a mesh with a scripted sequence of mesh-local clicks, then commit
///
/// A click on the first cut closes the loop and commits early; remaining
/// clicks are ignored.
pub fn cut(mesh: &mut MeshData, clicks: &[Vec2], config: &KnifeConfig) -> CommitSummary {
    let mut session = KnifeSession::new(false, config);
    for &click in clicks {
        if session.click(mesh, mesh.position + click, config) == ClickOutcome::Closed {
            break;
        }
    }
    commit(mesh, &session, config)
}
