// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Seeded random knife sessions on grid meshes
//!
//! Clicks are biased towards grid vertices and grid lines so that vertex
//! snaps, edge snaps and loop closes all show up regularly.

use crate::geometry::{Primitive, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Fuzzer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuzzerConfig {
    pub count: usize,
    pub seed: u64,
    pub max_cols: usize,
    pub max_rows: usize,
    pub max_clicks: usize,
    pub cell: f32,
    /// Chance that a session ends by clicking its first cut again
    pub close_probability: f64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        Self {
            count: 500,
            seed: 0x6b6e_6966,
            max_cols: 4,
            max_rows: 4,
            max_clicks: 8,
            cell: 1.0,
            close_probability: 0.3,
        }
    }
}

/// One generated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzCase {
    pub id: usize,
    pub grid: Primitive,
    pub clicks: Vec<Vec2>,
}

/// Generator for random click sessions
pub struct Fuzzer {
    config: FuzzerConfig,
    rng: StdRng,
    next_id: usize,
}

impl Fuzzer {
    pub fn new(config: FuzzerConfig) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(config.seed),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &FuzzerConfig {
        &self.config
    }

    /// Generate `config.count` cases
    pub fn generate_all(&mut self) -> Vec<FuzzCase> {
        (0..self.config.count).map(|_| self.generate()).collect()
    }

    /// Generate one case
    pub fn generate(&mut self) -> FuzzCase {
        let cols = self.rng.gen_range(1..=self.config.max_cols.max(1));
        let rows = self.rng.gen_range(1..=self.config.max_rows.max(1));
        let cell = self.config.cell;

        let count = self.rng.gen_range(1..=self.config.max_clicks.max(1));
        let mut clicks: Vec<Vec2> = (0..count).map(|_| self.generate_click(cols, rows, cell)).collect();

        if clicks.len() >= 2 && self.rng.gen_bool(self.config.close_probability) {
            clicks.push(clicks[0]);
        }

        let id = self.next_id;
        self.next_id += 1;
        FuzzCase {
            id,
            grid: Primitive::Grid { cols, rows, cell },
            clicks,
        }
    }

    fn generate_click(&mut self, cols: usize, rows: usize, cell: f32) -> Vec2 {
        let width = cols as f32 * cell;
        let height = rows as f32 * cell;
        match self.rng.gen_range(0..4) {
            // Grid vertex
            0 => Vec2::new(
                self.rng.gen_range(0..=cols) as f32 * cell,
                self.rng.gen_range(0..=rows) as f32 * cell,
            ),
            // Point on a vertical grid line
            1 => Vec2::new(
                self.rng.gen_range(0..=cols) as f32 * cell,
                self.rng.gen_range(0.0..=height),
            ),
            // Point on a horizontal grid line
            2 => Vec2::new(
                self.rng.gen_range(0.0..=width),
                self.rng.gen_range(0..=rows) as f32 * cell,
            ),
            // Anywhere, slightly outside the grid included
            _ => {
                let margin = cell * 0.25;
                Vec2::new(
                    self.rng.gen_range(-margin..=width + margin),
                    self.rng.gen_range(-margin..=height + margin),
                )
            }
        }
    }
}
