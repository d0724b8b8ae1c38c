// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for mesh storage and knife editing

use thiserror::Error;

/// Errors raised by mesh mutation primitives and the knife pipeline
///
/// The knife commit absorbs these per action; they surface only through
/// the lower-level APIs and the file loaders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A fixed-capacity buffer is full
    #[error("{what} capacity of {limit} exceeded")]
    CapacityExceeded { what: &'static str, limit: usize },

    #[error("face index {0} out of range")]
    InvalidFace(usize),

    #[error("vertex index {0} out of range")]
    InvalidVertex(usize),

    /// Split positions do not address the face loop
    #[error("positions {pos0}/{pos1} out of range for face {face}")]
    PositionOutOfRange { face: usize, pos0: usize, pos1: usize },

    /// A loop or face has fewer than three distinct vertices
    #[error("loop has {0} vertices, at least 3 required")]
    DegenerateLoop(usize),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl Error {
    pub(crate) fn capacity(what: &'static str, limit: usize) -> Self {
        Self::CapacityExceeded { what, limit }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
