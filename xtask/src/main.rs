use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use distcolor::graph::generate;
use distcolor::{run_suite, Algorithm, ReductionConfig, RunReport};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "distcolor workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every reduction on random graphs and compare the results
    Compare {
        /// Nodes per graph
        #[arg(long, default_value_t = 200)]
        nodes: usize,

        /// Degree bound of the generated graphs
        #[arg(long, default_value_t = 6)]
        max_degree: usize,

        /// Number of graphs to generate
        #[arg(long, default_value_t = 3)]
        graphs: u64,

        /// Base seed; graph `i` uses `seed + i`
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Algorithm ids to run (all when omitted)
        #[arg(long, value_delimiter = ',')]
        algorithms: Vec<i64>,

        /// Worker count for pooled reductions (0 = default)
        #[arg(long, default_value_t = 0)]
        pool_size: i64,

        /// Also write the reports as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Run the criterion suite and summarize mean times
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

#[derive(Serialize)]
struct Comparison<'a> {
    nodes: usize,
    max_degree: usize,
    seed: u64,
    reports: &'a [RunReport],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            nodes,
            max_degree,
            graphs,
            seed,
            algorithms,
            pool_size,
            json,
        } => {
            let algorithms = algorithms
                .into_iter()
                .map(Algorithm::from_id)
                .collect::<Result<Vec<_>, _>>()?;
            let reports = compare(nodes, max_degree, graphs, seed, &algorithms, pool_size)?;
            print_table(&reports);
            if let Some(path) = json {
                write_json(&path, &Comparison { nodes, max_degree, seed, reports: &reports })?;
            }
        }
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn compare(
    nodes: usize,
    max_degree: usize,
    graphs: u64,
    seed: u64,
    algorithms: &[Algorithm],
    pool_size: i64,
) -> Result<Vec<RunReport>> {
    let mut reports = Vec::new();
    for i in 0..graphs {
        let graph = generate::random_bounded(nodes, max_degree, seed + i)
            .with_context(|| format!("generating graph {i}"))?;
        let config = ReductionConfig::default()
            .with_seed(seed + i)
            .with_pool_size(pool_size);
        let start = Instant::now();
        let runs = run_suite(&graph, algorithms, &config)
            .with_context(|| format!("reducing {}", graph.name()))?;
        println!("{} ({} edges): {} runs in {:.2?}", graph.name(), graph.edge_count(), runs.len(), start.elapsed());
        reports.extend(runs);
    }
    Ok(reports)
}

fn print_table(reports: &[RunReport]) {
    println!();
    println!("| Algorithm | Runs | Mean ms | Max colors | Δ+1 | All safe |");
    println!("|---|---|---|---|---|---|");

    let mut by_algorithm: BTreeMap<i64, Vec<&RunReport>> = BTreeMap::new();
    for report in reports {
        by_algorithm.entry(report.algorithm.id()).or_default().push(report);
    }
    for runs in by_algorithm.values() {
        let algorithm = runs[0].algorithm;
        let mean_ms = runs.iter().map(|r| r.elapsed.as_secs_f64() * 1000.0).sum::<f64>() / runs.len() as f64;
        let max_colors = runs.iter().map(|r| r.colors).max().unwrap_or(0);
        let bound = runs[0].max_degree + 1;
        let safe = runs.iter().all(|r| r.is_safe);
        println!("| {algorithm} | {} | {mean_ms:.3} | {max_colors} | {bound} | {safe} |", runs.len());
    }
}

fn write_json(path: &Path, comparison: &Comparison<'_>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(comparison)?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    println!("Comparison written to {}", path.display());
    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Running reduction benchmarks...");
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0");
    cmd.args(["bench", "--bench", "suite", "--"]);
    if quick {
        cmd.args(["--measurement-time", "0.1", "--noplot", "--sample-size", "10"]);
    }

    let status = cmd.status().context("Failed to run the benchmark suite")?;
    if !status.success() {
        anyhow::bail!("Benchmark suite failed");
    }
    println!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = BTreeMap::new();
    collect_results(criterion_dir, criterion_dir, &mut results);

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut body = String::from("# Reduction Benchmark Report\n\n| Benchmark | Mean |\n|---|---|\n");
    for (name, time_ns) in &results {
        body.push_str(&format!("| {name} | {} |\n", format_time(*time_ns)));
    }
    fs::write(report_path, body)?;

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_time(ns: f64) -> String {
    if ns > 1e9 {
        format!("{:.2} s", ns / 1e9)
    } else if ns > 1e6 {
        format!("{:.2} ms", ns / 1e6)
    } else if ns > 1e3 {
        format!("{:.2} µs", ns / 1e3)
    } else {
        format!("{ns:.0} ns")
    }
}

/// Collects `new/estimates.json` mean estimates keyed by benchmark path.
fn collect_results(root: &Path, dir: &Path, results: &mut BTreeMap<String, f64>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if path.file_name().and_then(|s| s.to_str()) != Some("report") {
                collect_results(root, &path, results);
            }
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }
        let Some(estimate_dir) = path.parent() else { continue };
        if estimate_dir.file_name().and_then(|s| s.to_str()) != Some("new") {
            continue;
        }
        let Some(bench_dir) = estimate_dir.parent() else { continue };
        let Ok(name) = bench_dir.strip_prefix(root) else { continue };

        let mean = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
            .and_then(|json| json.get("mean")?.get("point_estimate")?.as_f64());
        if let Some(time_ns) = mean {
            results.insert(name.display().to_string(), time_ns);
        }
    }
}
