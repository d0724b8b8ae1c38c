// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Snapshot undo/redo history
//!
//! Each record stores a full copy of the document taken before a mutation.
//! Undo and redo swap the live document with the stored snapshot, so the
//! displaced state moves to the opposite stack. Records made between
//! [`UndoHistory::begin_group`] and [`UndoHistory::end_group`] are undone
//! and redone together.

use std::collections::VecDeque;

/// Default number of snapshots kept on each stack
pub const DEFAULT_UNDO_DEPTH: usize = 32;

#[derive(Debug, Clone)]
struct UndoItem<T> {
    snapshot: T,
    group: Option<u32>,
}

/// Bounded undo/redo stacks over document snapshots
#[derive(Debug, Clone)]
pub struct UndoHistory<T> {
    undo: VecDeque<UndoItem<T>>,
    redo: VecDeque<UndoItem<T>>,
    capacity: usize,
    next_group: u32,
    current_group: Option<u32>,
}

impl<T: Clone> UndoHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(capacity),
            redo: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_group: 1,
            current_group: None,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Snapshot `doc` before it is mutated; clears the redo stack
    pub fn record(&mut self, doc: &T) {
        push_bounded(
            &mut self.undo,
            self.capacity,
            UndoItem {
                snapshot: doc.clone(),
                group: self.current_group,
            },
        );
        self.redo.clear();
    }

    pub fn begin_group(&mut self) {
        self.current_group = Some(self.next_group);
        self.next_group = self.next_group.wrapping_add(1);
    }

    pub fn end_group(&mut self) {
        self.current_group = None;
    }

    /// Restore the latest snapshot (or group); returns false when empty
    pub fn undo(&mut self, doc: &mut T) -> bool {
        swap_back(&mut self.undo, &mut self.redo, self.capacity, doc)
    }

    /// Reapply the latest undone snapshot (or group)
    pub fn redo(&mut self, doc: &mut T) -> bool {
        swap_back(&mut self.redo, &mut self.undo, self.capacity, doc)
    }

    /// Drop the latest record (or group), restoring it without keeping redo
    pub fn cancel(&mut self, doc: &mut T) {
        let Some(group) = self.undo.back().map(|item| item.group) else {
            return;
        };
        while let Some(item) = self.undo.back() {
            if group.is_some() && item.group != group {
                break;
            }
            let Some(item) = self.undo.pop_back() else {
                break;
            };
            *doc = item.snapshot;
            if group.is_none() {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<T: Clone> Default for UndoHistory<T> {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_DEPTH)
    }
}

fn push_bounded<T>(stack: &mut VecDeque<UndoItem<T>>, capacity: usize, item: UndoItem<T>) {
    if stack.len() >= capacity {
        stack.pop_front();
    }
    stack.push_back(item);
}

fn swap_back<T>(
    from: &mut VecDeque<UndoItem<T>>,
    to: &mut VecDeque<UndoItem<T>>,
    capacity: usize,
    doc: &mut T,
) -> bool {
    let Some(group) = from.back().map(|item| item.group) else {
        return false;
    };

    while let Some(item) = from.back() {
        if group.is_some() && item.group != group {
            break;
        }
        let Some(item) = from.pop_back() else {
            break;
        };
        let current = std::mem::replace(doc, item.snapshot);
        push_bounded(
            to,
            capacity,
            UndoItem {
                snapshot: current,
                group: item.group,
            },
        );
        if group.is_none() {
            break;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_swaps_state() {
        let mut history = UndoHistory::new(8);
        let mut doc = 1;

        history.record(&doc);
        doc = 2;
        history.record(&doc);
        doc = 3;

        assert!(history.undo(&mut doc));
        assert_eq!(doc, 2);
        assert!(history.undo(&mut doc));
        assert_eq!(doc, 1);
        assert!(!history.undo(&mut doc));

        assert!(history.redo(&mut doc));
        assert_eq!(doc, 2);
        assert!(history.redo(&mut doc));
        assert_eq!(doc, 3);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = UndoHistory::new(8);
        let mut doc = 1;
        history.record(&doc);
        doc = 2;
        history.undo(&mut doc);
        assert!(history.can_redo());
        history.record(&doc);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = UndoHistory::new(2);
        let mut doc = 0;
        for value in 1..=3 {
            history.record(&doc);
            doc = value;
        }
        assert_eq!(history.undo_len(), 2);
        history.undo(&mut doc);
        history.undo(&mut doc);
        assert_eq!(doc, 1);
    }

    #[test]
    fn test_group_undone_together() {
        let mut history = UndoHistory::new(8);
        let mut doc = 0;
        history.record(&doc);
        doc = 1;

        history.begin_group();
        history.record(&doc);
        doc = 2;
        history.record(&doc);
        doc = 3;
        history.end_group();

        assert!(history.undo(&mut doc));
        assert_eq!(doc, 1);
        assert!(history.redo(&mut doc));
        assert_eq!(doc, 3);
    }

    #[test]
    fn test_cancel_restores_without_redo() {
        let mut history = UndoHistory::new(8);
        let mut doc = 10;
        history.record(&doc);
        doc = 11;
        history.cancel(&mut doc);
        assert_eq!(doc, 10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
