// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Editor facade owning one mesh document

use crate::config::KnifeConfig;
use crate::error::{Error, Result};
use crate::knife::CommitSummary;
use crate::mesh::MeshData;
use crate::tool::{EditorHost, FrameInput, KnifeTool, ToolStatus};
use crate::undo::{UndoHistory, DEFAULT_UNDO_DEPTH};

/// Host services backed by the editor's history and modified flag
struct DocumentHost<'a> {
    history: &'a mut UndoHistory<MeshData>,
    modified: &'a mut bool,
}

impl EditorHost for DocumentHost<'_> {
    fn record_undo(&mut self, mesh: &MeshData) {
        self.history.record(mesh);
    }

    fn mark_modified(&mut self) {
        *self.modified = true;
    }
}

/// Mesh document with undo history and at most one active tool
pub struct Editor {
    mesh: MeshData,
    history: UndoHistory<MeshData>,
    modified: bool,
    tool: Option<KnifeTool>,
    last_commit: Option<CommitSummary>,
    config: KnifeConfig,
}

impl Editor {
    /// Create an editor for a mesh
    pub fn new(mesh: MeshData) -> Self {
        Self::with_config(mesh, KnifeConfig::default())
    }

    pub fn with_config(mesh: MeshData, config: KnifeConfig) -> Self {
        Self {
            mesh,
            history: UndoHistory::new(DEFAULT_UNDO_DEPTH),
            modified: false,
            tool: None,
            last_commit: None,
            config,
        }
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Take the document out of the editor
    pub fn into_mesh(self) -> MeshData {
        self.mesh
    }

    pub fn config(&self) -> &KnifeConfig {
        &self.config
    }

    pub fn history(&self) -> &UndoHistory<MeshData> {
        &self.history
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Call after the document has been saved
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    pub fn active_tool(&self) -> Option<&KnifeTool> {
        self.tool.as_ref()
    }

    pub fn is_tool_active(&self) -> bool {
        self.tool.is_some()
    }

    /// Summary of the most recent knife commit
    pub fn last_commit(&self) -> Option<&CommitSummary> {
        self.last_commit.as_ref()
    }

    /// Change face selection, recorded for undo
    pub fn set_face_selected(&mut self, face: usize, selected: bool) -> Result<()> {
        if face >= self.mesh.face_count() {
            return Err(Error::InvalidFace(face));
        }
        self.history.record(&self.mesh);
        self.mesh.face_mut(face)?.selected = selected;
        self.modified = true;
        Ok(())
    }

    /// Start the knife, replacing any active tool
    ///
    /// The selected-faces restriction only applies while at least one face
    /// is selected.
    pub fn begin_knife_tool(&mut self, restrict_to_selected: bool) {
        let restrict = restrict_to_selected && self.mesh.selected_face_count() > 0;
        self.tool = Some(KnifeTool::begin(restrict, self.config));
    }

    /// Dispatch one frame to the active tool
    ///
    /// Returns `None` when no tool is active. The tool is ended once it
    /// reports anything other than [`ToolStatus::Active`].
    pub fn update(&mut self, input: &FrameInput) -> Option<ToolStatus> {
        let tool = self.tool.as_mut()?;
        let mut host = DocumentHost {
            history: &mut self.history,
            modified: &mut self.modified,
        };
        let status = tool.update(&mut self.mesh, &mut host, input);

        if status != ToolStatus::Active {
            if let Some(tool) = self.tool.take() {
                self.last_commit = tool.last_commit().cloned();
            }
        }
        Some(status)
    }

    /// Undo the last change; ends any active tool
    pub fn undo(&mut self) -> bool {
        self.tool = None;
        let changed = self.history.undo(&mut self.mesh);
        self.after_history_change(changed)
    }

    /// Redo the last undone change; ends any active tool
    pub fn redo(&mut self) -> bool {
        self.tool = None;
        let changed = self.history.redo(&mut self.mesh);
        self.after_history_change(changed)
    }

    /// Revert the last record without making it redoable
    pub fn cancel_undo(&mut self) {
        let had = self.history.can_undo();
        self.history.cancel(&mut self.mesh);
        self.after_history_change(had);
    }

    fn after_history_change(&mut self, changed: bool) -> bool {
        if changed {
            self.mesh.mark_dirty();
            self.modified = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::tool::Button;

    #[test]
    fn test_update_without_tool() {
        let mut editor = Editor::new(Primitive::unit_square().to_mesh().unwrap());
        assert_eq!(editor.update(&FrameInput::click(0.5, 0.5)), None);
    }

    #[test]
    fn test_restriction_needs_selection() {
        let mesh = Primitive::DisjointPair { gap: 1.0 }.to_mesh().unwrap();
        let mut editor = Editor::new(mesh);
        editor.begin_knife_tool(true);
        assert!(!editor.active_tool().unwrap().session().restrict_to_selected());

        editor.set_face_selected(1, true).unwrap();
        editor.begin_knife_tool(true);
        assert!(editor.active_tool().unwrap().session().restrict_to_selected());
    }

    #[test]
    fn test_cancel_ends_tool() {
        let mut editor = Editor::new(Primitive::unit_square().to_mesh().unwrap());
        editor.begin_knife_tool(false);
        editor.update(&FrameInput::click(0.5, 0.0));
        assert_eq!(editor.update(&FrameInput::key(Button::Escape)), Some(ToolStatus::Cancelled));
        assert!(!editor.is_tool_active());
        assert!(!editor.is_modified());
        assert!(!editor.history().can_undo());
    }
}
