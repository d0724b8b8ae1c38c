// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Knife configuration system
//!
//! Tolerances are tuned for the editor's default world scale. They are kept
//! configurable because they do not generalize to arbitrary mesh scales.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up by [`KnifeConfig::load`]
pub const CONFIG_FILE: &str = "meshknife.toml";

/// Fixed capacities of the knife working buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnifeLimits {
    /// Recorded clicks per session
    pub max_cuts: usize,
    /// Distinct faces touched per session
    pub max_cut_faces: usize,
    /// Densified path points per commit
    pub max_path_points: usize,
    /// Actions per commit
    pub max_actions: usize,
    /// Edge crossings collected between two consecutive clicks
    pub max_segment_hits: usize,
}

impl Default for KnifeLimits {
    fn default() -> Self {
        Self {
            max_cuts: 256,
            max_cut_faces: 32,
            max_path_points: 512,
            max_actions: 128,
            max_segment_hits: 64,
        }
    }
}

/// Knife tool configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnifeConfig {
    /// Editor selection radius in world units
    pub select_size: f32,
    /// Multiplier applied to `select_size` for knife hit tests
    pub hit_tolerance: f32,
    /// Segment-parameter margin excluding crossings near a click
    pub segment_endpoint_cutoff: f32,
    /// Edge-parameter margin excluding crossings near an edge endpoint
    pub edge_endpoint_cutoff: f32,
    /// Distance under which two boundary points count as the same point
    pub same_point_distance: f32,
    /// Distance under which a point lies on an already-subdivided edge
    pub sub_edge_distance: f32,
    /// Distance under which a new knife vertex reuses an existing one
    pub vertex_weld_distance: f32,
    pub limits: KnifeLimits,
}

impl Default for KnifeConfig {
    fn default() -> Self {
        Self {
            select_size: 1.0,
            hit_tolerance: 0.25,
            segment_endpoint_cutoff: 0.01,
            edge_endpoint_cutoff: 0.01,
            same_point_distance: 0.01,
            sub_edge_distance: 0.01,
            vertex_weld_distance: 0.001,
            limits: KnifeLimits::default(),
        }
    }
}

impl KnifeConfig {
    /// Snap radius for vertices and for re-clicking an existing cut
    pub fn vertex_radius(&self) -> f32 {
        self.select_size * self.hit_tolerance
    }

    /// Snap radius for edges
    pub fn edge_radius(&self) -> f32 {
        self.select_size * 0.75 * self.hit_tolerance
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: KnifeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Apply `MESHKNIFE_*` overrides; unparsable values are ignored
    pub fn apply_env(&mut self) {
        if let Some(size) = env_f32("MESHKNIFE_SELECT_SIZE") {
            self.select_size = size;
        }

        if let Some(tolerance) = env_f32("MESHKNIFE_HIT_TOLERANCE") {
            self.hit_tolerance = tolerance;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

fn env_f32(key: &str) -> Option<f32> {
    std::env::var(key).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_radii() {
        let config = KnifeConfig::default();
        assert_relative_eq!(config.vertex_radius(), 0.25);
        assert_relative_eq!(config.edge_radius(), 0.1875);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("knife.toml");

        let mut config = KnifeConfig::default();
        config.select_size = 2.0;
        config.limits.max_cuts = 16;
        config.save(&path).unwrap();

        let loaded = KnifeConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("knife.toml");
        std::fs::write(&path, "hit_tolerance = 0.5\n[limits]\nmax_actions = 4\n").unwrap();

        let loaded = KnifeConfig::from_file(&path).unwrap();
        assert_relative_eq!(loaded.hit_tolerance, 0.5);
        assert_relative_eq!(loaded.select_size, 1.0);
        assert_eq!(loaded.limits.max_actions, 4);
        assert_eq!(loaded.limits.max_cuts, 256);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(KnifeConfig::from_file("/nonexistent/meshknife.toml").is_err());
    }
}
