// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Randomized knife sessions with structural invariant checks

pub mod fuzzer;
pub mod invariants;
pub mod reporter;
pub mod runner;

pub use fuzzer::{FuzzCase, Fuzzer, FuzzerConfig};
pub use invariants::{check_cut_connectivity, check_growth, check_mesh, Severity, Violation};
pub use reporter::{FuzzReport, Reporter};
pub use runner::{run_case, run_cases, CaseResult};

use crate::config::KnifeConfig;

/// Generate and replay a full fuzz run
pub fn fuzz(fuzz_config: FuzzerConfig, knife_config: &KnifeConfig) -> FuzzReport {
    let cases = Fuzzer::new(fuzz_config).generate_all();
    let mut report = FuzzReport::new(fuzz_config.seed);
    for result in run_cases(&cases, knife_config) {
        report.add_result(result);
    }
    report
}
