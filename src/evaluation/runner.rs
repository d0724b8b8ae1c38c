// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Replays fuzz cases through a knife session and checks the result

use super::fuzzer::FuzzCase;
use super::invariants::{check_cut_connectivity, check_growth, check_mesh, Violation};
use crate::config::KnifeConfig;
use crate::knife::{self, ClickOutcome, CommitSummary, KnifeSession};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::warn;

/// Outcome of one replayed case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub case: FuzzCase,
    pub accepted_clicks: usize,
    pub closed: bool,
    pub faces_before: usize,
    pub faces_after: usize,
    pub vertices_after: usize,
    pub applied: usize,
    pub failed: usize,
    pub panicked: bool,
    pub violations: Vec<Violation>,
    pub time_ms: f64,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        !self.panicked && !self.violations.iter().any(Violation::is_hard)
    }
}

struct Replay {
    accepted: usize,
    closed: bool,
    faces_before: usize,
    faces_after: usize,
    vertices_after: usize,
    summary: CommitSummary,
    violations: Vec<Violation>,
}

fn replay(case: &FuzzCase, config: &KnifeConfig) -> crate::Result<Replay> {
    let mut mesh = case.grid.to_mesh()?;
    let before = mesh.clone();
    let mut session = KnifeSession::new(false, config);

    let mut accepted = 0;
    let mut closed = false;
    for &click in &case.clicks {
        match session.click(&mesh, click, config) {
            ClickOutcome::Accepted(_) => accepted += 1,
            ClickOutcome::Closed => {
                closed = true;
                break;
            }
            ClickOutcome::Ignored(_) => {}
        }
    }

    let mut violations = check_cut_connectivity(&before, session.cut_faces());
    let summary = knife::commit(&mut mesh, &session, config);
    violations.extend(check_growth(&before, &mesh));
    violations.extend(check_mesh(&mesh));

    Ok(Replay {
        accepted,
        closed,
        faces_before: before.face_count(),
        faces_after: mesh.face_count(),
        vertices_after: mesh.vertex_count(),
        summary,
        violations,
    })
}

/// Replay one case, converting a panic into a failed result
pub fn run_case(case: &FuzzCase, config: &KnifeConfig) -> CaseResult {
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| replay(case, config)));
    let time_ms = start.elapsed().as_secs_f64() * 1000.0;

    let mut result = CaseResult {
        case: case.clone(),
        accepted_clicks: 0,
        closed: false,
        faces_before: 0,
        faces_after: 0,
        vertices_after: 0,
        applied: 0,
        failed: 0,
        panicked: false,
        violations: Vec::new(),
        time_ms,
    };

    match outcome {
        Ok(Ok(replay)) => {
            result.accepted_clicks = replay.accepted;
            result.closed = replay.closed;
            result.faces_before = replay.faces_before;
            result.faces_after = replay.faces_after;
            result.vertices_after = replay.vertices_after;
            result.applied = replay.summary.report.applied;
            result.failed = replay.summary.report.failed;
            result.violations = replay.violations;
        }
        Ok(Err(e)) => {
            result.violations.push(Violation::hard("setup", e.to_string()));
        }
        Err(_) => {
            warn!(case = case.id, "knife commit panicked");
            result.panicked = true;
        }
    }
    result
}

/// Replay every case in parallel, preserving case order
pub fn run_cases(cases: &[FuzzCase], config: &KnifeConfig) -> Vec<CaseResult> {
    cases.par_iter().map(|case| run_case(case, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Primitive, Vec2};

    #[test]
    fn test_bisection_case() {
        let case = FuzzCase {
            id: 0,
            grid: Primitive::Grid { cols: 1, rows: 1, cell: 1.0 },
            clicks: vec![Vec2::new(0.5, 0.0), Vec2::new(0.5, 1.0)],
        };
        let result = run_case(&case, &KnifeConfig::default());
        assert!(result.passed());
        assert_eq!(result.accepted_clicks, 2);
        assert_eq!(result.faces_before, 1);
        assert_eq!(result.faces_after, 2);
        assert_eq!(result.vertices_after, 6);
    }

    #[test]
    fn test_results_keep_case_order() {
        let cases: Vec<FuzzCase> = (0..4)
            .map(|id| FuzzCase {
                id,
                grid: Primitive::Grid { cols: 2, rows: 1, cell: 1.0 },
                clicks: vec![Vec2::new(0.5, 0.5)],
            })
            .collect();
        let results = run_cases(&cases, &KnifeConfig::default());
        let ids: Vec<usize> = results.iter().map(|r| r.case.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
