// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Knife session fuzzer
//! Replays random and saved click sessions and checks mesh invariants

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use meshknife::evaluation::{run_case, FuzzCase, FuzzReport, Fuzzer, FuzzerConfig, Reporter};
use meshknife::utils::init_logging;
use meshknife::KnifeConfig;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "meshknife-fuzz")]
#[command(about = "Randomized knife sessions with invariant checks", long_about = None)]
struct Cli {
    /// Number of generated sessions
    #[arg(short = 'n', long, default_value = "500")]
    count: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "4")]
    max_cols: usize,

    #[arg(long, default_value = "4")]
    max_rows: usize,

    #[arg(long, default_value = "8")]
    max_clicks: usize,

    /// Directory of saved `FuzzCase` JSON files to replay as well
    #[arg(long, value_name = "DIR")]
    corpus: Option<PathBuf>,

    /// Write every failing case as JSON into this directory
    #[arg(long, value_name = "DIR")]
    save_failures: Option<PathBuf>,

    /// Output directory for report.json and report.md
    #[arg(short, long, default_value = "fuzz-results")]
    out: PathBuf,

    /// Config file for knife tolerances
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_corpus(dir: &Path) -> Result<Vec<FuzzCase>> {
    let mut cases = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk corpus: {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read case: {}", path.display()))?;
        let case: FuzzCase = serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse case: {}", path.display()))?;
        cases.push(case);
    }
    Ok(cases)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let knife_config = match &cli.config {
        Some(path) => KnifeConfig::from_file(path)?,
        None => KnifeConfig::load()?,
    };

    let defaults = FuzzerConfig::default();
    let fuzz_config = FuzzerConfig {
        count: cli.count,
        seed: cli.seed.unwrap_or(defaults.seed),
        max_cols: cli.max_cols,
        max_rows: cli.max_rows,
        max_clicks: cli.max_clicks,
        ..defaults
    };

    println!("{}", "Starting knife fuzzer...".bold());
    let mut cases = Fuzzer::new(fuzz_config).generate_all();
    if let Some(dir) = &cli.corpus {
        let corpus = load_corpus(dir)?;
        println!("Loaded {} saved cases from {}", corpus.len(), dir.display());
        cases.extend(corpus);
    }
    println!("Replaying {} sessions (seed {})", cases.len(), fuzz_config.seed);

    let pb = ProgressBar::new(cases.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let results: Vec<_> = cases
        .par_iter()
        .map(|case| {
            let result = run_case(case, &knife_config);
            pb.inc(1);
            result
        })
        .collect();
    pb.finish_with_message("Fuzzing complete");

    let mut report = FuzzReport::new(fuzz_config.seed);
    for result in results {
        report.add_result(result);
    }

    if let Some(dir) = &cli.save_failures {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        for result in report.results.iter().filter(|r| !r.passed()) {
            let path = dir.join(format!("case-{}-{}.json", fuzz_config.seed, result.case.id));
            fs::write(&path, serde_json::to_string_pretty(&result.case)?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    fs::create_dir_all(&cli.out).with_context(|| format!("Failed to create {}", cli.out.display()))?;
    Reporter::write_json(&report, &cli.out.join("report.json"))?;
    Reporter::write_markdown(&report, &cli.out.join("report.md"))?;

    println!("\n{}", "═".repeat(60).bright_black());
    println!("{}", "Fuzz Summary".bold());
    println!("{}", "═".repeat(60).bright_black());
    println!("Cases:    {}", report.total_cases);
    println!("{} {} ({:.1}%)", "Passed:".green(), report.passed, report.pass_rate());
    if report.failed > 0 {
        println!("{} {}", "Failed:".red(), report.failed.to_string().red());
    } else {
        println!("{} {}", "Failed:".red(), report.failed.to_string().green());
    }
    println!("{} {}", "Panics:".yellow(), report.panics);
    for (rule, count) in &report.soft_violations {
        println!("  soft {}: {}", rule, count);
    }
    println!("Report:   {}", cli.out.display());

    if !report.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}
