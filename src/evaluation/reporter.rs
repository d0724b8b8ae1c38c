// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Report generation (JSON and Markdown)

use super::invariants::Severity;
use super::runner::CaseResult;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Failures listed in full in the Markdown report
const MAX_LISTED_FAILURES: usize = 20;

/// Aggregate of a fuzz run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzReport {
    pub timestamp: String,
    pub seed: u64,
    pub total_cases: usize,
    pub passed: usize,
    pub failed: usize,
    pub panics: usize,
    pub closed_sessions: usize,
    pub faces_added: usize,
    pub failed_actions: usize,
    /// Violation counts keyed by rule name
    pub hard_violations: BTreeMap<String, usize>,
    pub soft_violations: BTreeMap<String, usize>,
    pub avg_time_ms: f64,
    pub results: Vec<CaseResult>,
}

impl FuzzReport {
    pub fn new(seed: u64) -> Self {
        Self {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            seed,
            total_cases: 0,
            passed: 0,
            failed: 0,
            panics: 0,
            closed_sessions: 0,
            faces_added: 0,
            failed_actions: 0,
            hard_violations: BTreeMap::new(),
            soft_violations: BTreeMap::new(),
            avg_time_ms: 0.0,
            results: Vec::new(),
        }
    }

    pub fn add_result(&mut self, result: CaseResult) {
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        if result.panicked {
            self.panics += 1;
        }
        if result.closed {
            self.closed_sessions += 1;
        }
        self.faces_added += result.faces_after.saturating_sub(result.faces_before);
        self.failed_actions += result.failed;

        for violation in &result.violations {
            let counts = match violation.severity {
                Severity::Hard => &mut self.hard_violations,
                Severity::Soft => &mut self.soft_violations,
            };
            *counts.entry(violation.rule.clone()).or_insert(0) += 1;
        }

        self.total_cases += 1;
        self.avg_time_ms += (result.time_ms - self.avg_time_ms) / self.total_cases as f64;
        self.results.push(result);
    }

    pub fn pass_rate(&self) -> f32 {
        if self.total_cases == 0 {
            0.0
        } else {
            (self.passed as f32 / self.total_cases as f32) * 100.0
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl FromIterator<CaseResult> for FuzzReport {
    fn from_iter<I: IntoIterator<Item = CaseResult>>(iter: I) -> Self {
        let mut report = FuzzReport::new(0);
        for result in iter {
            report.add_result(result);
        }
        report
    }
}

/// Report writer
pub struct Reporter;

impl Reporter {
    /// Write JSON report
    pub fn write_json(report: &FuzzReport, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))
    }

    /// Write Markdown report
    pub fn write_markdown(report: &FuzzReport, path: &Path) -> Result<()> {
        fs::write(path, Self::markdown(report))
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }

    pub fn markdown(report: &FuzzReport) -> String {
        let mut md = String::new();

        let _ = writeln!(md, "# Knife Fuzz Report ({})\n", report.timestamp);

        md.push_str("## Summary\n\n");
        let _ = writeln!(md, "- **Seed**: {}", report.seed);
        let _ = writeln!(md, "- **Cases**: {}", report.total_cases);
        let _ = writeln!(md, "- **Passed**: {} ({:.1}%)", report.passed, report.pass_rate());
        let _ = writeln!(md, "- **Failed**: {}", report.failed);
        let _ = writeln!(md, "- **Panics**: {}", report.panics);
        let _ = writeln!(md, "- **Closed sessions**: {}", report.closed_sessions);
        let _ = writeln!(md, "- **Faces added**: {}", report.faces_added);
        let _ = writeln!(md, "- **Failed actions**: {}", report.failed_actions);
        let _ = writeln!(md, "- **Average time**: {:.3} ms\n", report.avg_time_ms);

        for (title, counts) in [
            ("Hard Violations", &report.hard_violations),
            ("Soft Violations", &report.soft_violations),
        ] {
            if counts.is_empty() {
                continue;
            }
            let _ = writeln!(md, "## {}\n", title);
            md.push_str("| Rule | Count |\n|------|-------|\n");
            for (rule, count) in counts {
                let _ = writeln!(md, "| {} | {} |", rule, count);
            }
            md.push('\n');
        }

        let failures: Vec<&CaseResult> = report.results.iter().filter(|r| !r.passed()).collect();
        if !failures.is_empty() {
            md.push_str("## Failing Cases\n\n");
            md.push_str("| Case | Grid | Clicks | Problem |\n|------|------|--------|---------|\n");
            for result in failures.iter().take(MAX_LISTED_FAILURES) {
                let problem = if result.panicked {
                    "panic".to_string()
                } else {
                    result
                        .violations
                        .iter()
                        .filter(|v| v.is_hard())
                        .map(|v| format!("{}: {}", v.rule, v.message))
                        .collect::<Vec<_>>()
                        .join("; ")
                };
                let clicks = result
                    .case
                    .clicks
                    .iter()
                    .map(|c| format!("({:.2}, {:.2})", c.x, c.y))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = writeln!(
                    md,
                    "| {} | {:?} | {} | {} |",
                    result.case.id, result.case.grid, clicks, problem
                );
            }
            if failures.len() > MAX_LISTED_FAILURES {
                let _ = writeln!(md, "\n_{} more not listed_", failures.len() - MAX_LISTED_FAILURES);
            }
        }

        md
    }
}
