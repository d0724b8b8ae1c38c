// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Interactive knife tool shell
//!
//! The tool is fed one [`FrameInput`] per frame and reports whether it is
//! still active. Committing records undo through the [`EditorHost`] before
//! the mesh is touched; cancelling makes no host calls at all.

use crate::config::KnifeConfig;
use crate::geometry::Vec2;
use crate::knife::{self, ClickOutcome, CommitSummary, KnifeSession};
use crate::mesh::MeshData;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Input buttons the tool reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Escape,
    Enter,
    MouseLeft,
}

/// Input sampled for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Buttons pressed this frame
    pub pressed: Vec<Button>,
    /// Mouse position in world space
    pub mouse_world: Vec2,
}

impl FrameInput {
    pub fn click(x: f32, y: f32) -> Self {
        Self {
            pressed: vec![Button::MouseLeft],
            mouse_world: Vec2::new(x, y),
        }
    }

    pub fn key(button: Button) -> Self {
        Self {
            pressed: vec![button],
            mouse_world: Vec2::zeros(),
        }
    }

    pub fn was_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }
}

/// Tool state after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToolStatus {
    Active,
    Committed,
    Cancelled,
}

/// Services the editor provides to tools
pub trait EditorHost {
    /// Snapshot the mesh before a mutation
    fn record_undo(&mut self, mesh: &MeshData);
    /// Flag the document as needing to be saved
    fn mark_modified(&mut self);
}

/// Preview colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawColor {
    /// Cut segments and cut markers
    Selected,
    /// Snapped points and live crossings
    Green,
}

/// World-space preview primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DrawCommand {
    DashedLine { from: Vec2, to: Vec2, color: DrawColor },
    Vertex { position: Vec2, color: DrawColor },
}

/// Knife tool bound to one mesh for its lifetime
#[derive(Debug, Clone)]
pub struct KnifeTool {
    session: KnifeSession,
    config: KnifeConfig,
    last_commit: Option<CommitSummary>,
}

impl KnifeTool {
    /// Start a fresh session
    pub fn begin(restrict_to_selected: bool, config: KnifeConfig) -> Self {
        debug!(restrict_to_selected, "knife tool started");
        Self {
            session: KnifeSession::new(restrict_to_selected, &config),
            config,
            last_commit: None,
        }
    }

    pub fn session(&self) -> &KnifeSession {
        &self.session
    }

    pub fn config(&self) -> &KnifeConfig {
        &self.config
    }

    /// Summary of the commit that ended this tool, if any
    pub fn last_commit(&self) -> Option<&CommitSummary> {
        self.last_commit.as_ref()
    }

    /// Handle one frame: Escape, then Enter, then left click
    pub fn update(&mut self, mesh: &mut MeshData, host: &mut dyn EditorHost, input: &FrameInput) -> ToolStatus {
        if input.was_pressed(Button::Escape) {
            debug!(cuts = self.session.cuts().len(), "knife tool cancelled");
            return ToolStatus::Cancelled;
        }

        if input.was_pressed(Button::Enter) {
            self.commit(mesh, host);
            return ToolStatus::Committed;
        }

        if input.was_pressed(Button::MouseLeft) {
            if let ClickOutcome::Closed = self.session.click(mesh, input.mouse_world, &self.config) {
                self.commit(mesh, host);
                return ToolStatus::Committed;
            }
        }

        ToolStatus::Active
    }

    fn commit(&mut self, mesh: &mut MeshData, host: &mut dyn EditorHost) {
        host.record_undo(mesh);
        self.last_commit = Some(knife::commit(mesh, &self.session, &self.config));
        host.mark_modified();
    }

    /// Preview of the pending cut in world space
    pub fn draw(&self, mesh_position: Vec2) -> Vec<DrawCommand> {
        let cuts = self.session.cuts();
        let mut commands = Vec::with_capacity(cuts.len() * 2 + self.session.preview_points().len());

        commands.extend(cuts.windows(2).map(|pair| DrawCommand::DashedLine {
            from: pair[0].position + mesh_position,
            to: pair[1].position + mesh_position,
            color: DrawColor::Selected,
        }));
        commands.extend(cuts.iter().map(|cut| DrawCommand::Vertex {
            position: cut.position + mesh_position,
            color: DrawColor::Selected,
        }));
        commands.extend(self.session.preview_points().iter().map(|&p| DrawCommand::Vertex {
            position: p + mesh_position,
            color: DrawColor::Green,
        }));
        commands
    }
}
