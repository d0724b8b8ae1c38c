// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Utility functions and helpers

pub mod logger;
pub mod math;

pub use logger::init_logging;
