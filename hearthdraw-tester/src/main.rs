mod logic;
mod scenarios;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use logic::{LogicTester, ScenarioResult, reports, resolve_seed_inputs};
use scenarios::{get_scenario, list_scenarios, scenario_keys};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "hearthdraw-tester", version)]
#[command(about = "Seeded session simulator and invariant checker for the Hearthdraw economy")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated; decimal, 0x-hex or a..b ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;

    let results = run_scenarios(&args, &scenarios, &seeds);
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut out = open_output(args.output.as_deref())?;
    writeln!(out, "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(out, "  {key:20} - {description}")?;
    }
    out.flush()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🔥 Hearthdraw Session Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for key in scenario_keys() {
            if !scenarios.contains(&key) {
                scenarios.push(key);
            }
        }
    }
    scenarios
}

fn run_scenarios(args: &Args, scenarios: &[String], seeds: &[u64]) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Session Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(args.verbose);
    let mut results = Vec::new();
    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut out = open_output(args.output.as_deref())?;

    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut *out, results)?,
        ReportFormat::Markdown if results.is_empty() => writeln!(
            out,
            "# Hearthdraw Session Test Results\n\n_No scenarios executed._"
        )?,
        ReportFormat::Markdown => reports::generate_markdown_report(&mut *out, results)?,
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(out, "No scenarios executed.")?;
            } else {
                reports::generate_console_report(&mut *out, results, start_time.elapsed())?;
            }
            writeln!(out)?;
            writeln!(out, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Buffered report sink: the file at `path`, or stdout.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(stdout())),
    })
}
