use colored::Colorize;
use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use blame_metric::config::{self, MetricConfig};
use blame_metric::simulation::{self, SimulationConfig, DEFAULT_GROUP_SIZE, DEFAULT_TRIALS};
use blame_metric::types::*;
use blame_metric::{ingest, metrics, reporters};

#[derive(Parser, Debug)]
#[command(
    name = "blame-metric",
    about = "📊 Score each group member's share of the work as a z-score",
    version,
    long_about = "Scores how far each member's share of a group's attributed lines sits from\n\
                  the group mean, in sample standard deviations.\n\n\
                  `score` reads `name,lines` rows (e.g. summarized git blame output).\n\
                  `simulate` characterizes the score over randomly generated groups."
)]
struct Args {
    /// YAML config file. Defaults to ./.blame-metric.yml if present.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print an annotated config template (or write it to FILE) and exit.
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "-")]
    generate_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a group from `name,lines` CSV rows.
    Score {
        /// CSV file to read. Reads stdin when omitted.
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Output format: csv, terminal, json
        #[arg(long)]
        format: Option<String>,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Run the Monte Carlo characterization of the blame metric.
    Simulate {
        /// Number of simulated groups. Invalid values fall back to the default.
        #[arg(value_name = "TRIALS", allow_hyphen_values = true)]
        trials: Option<String>,

        /// Members per group. Invalid values fall back to the default.
        #[arg(value_name = "GROUP_SIZE", allow_hyphen_values = true)]
        group_size: Option<String>,

        /// Seed for reproducible runs. A fresh seed is drawn (and reported) otherwise.
        #[arg(long)]
        seed: Option<u64>,

        /// Run trials on all cores. Results match a sequential run.
        #[arg(long)]
        parallel: bool,

        /// Output format: terminal, plain, json
        #[arg(long)]
        format: Option<String>,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    if let Some(target) = &args.generate_config {
        let path = (target.as_os_str() != "-").then_some(target.as_path());
        return config::print_template(path);
    }

    let Some(command) = args.command else {
        Args::command().print_help().map_err(|e| e.to_string())?;
        println!();
        return Ok(());
    };

    let cfg = resolve_config(args.config.as_deref())?;

    match command {
        Command::Score { input, format, output } => {
            let format = format.or(cfg.score_format.clone()).unwrap_or_else(|| "csv".to_string());
            check_format(&format, config::SCORE_FORMATS)?;
            run_score(input.as_deref(), &format, output.as_deref())
        }
        Command::Simulate { trials, group_size, seed, parallel, format, output } => {
            let format = format.or(cfg.simulate_format.clone()).unwrap_or_else(|| "terminal".to_string());
            check_format(&format, config::SIMULATE_FORMATS)?;
            let sim = SimulationConfig {
                trials:     count_or_default(trials.as_deref(), "simulations", cfg.trials.unwrap_or(DEFAULT_TRIALS)),
                group_size: count_or_default(group_size.as_deref(), "students per group", cfg.group_size.unwrap_or(DEFAULT_GROUP_SIZE)),
                seed:       seed.or(cfg.seed).unwrap_or_else(simulation::entropy_seed),
                parallel:   parallel || cfg.parallel.unwrap_or(false),
            };
            run_simulate(&sim, &format, output.as_deref())
        }
    }
}

fn resolve_config(explicit: Option<&Path>) -> Result<MetricConfig, String> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| format!("Failed to get current directory: {e}"))?;
            config::discover_config(&cwd)
        }
    };
    match path {
        Some(p) => {
            debug!(path = %p.display(), "loading config");
            config::load_config(&p)
        }
        None => Ok(MetricConfig::default()),
    }
}

fn check_format(format: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&format) {
        Ok(())
    } else {
        Err(format!("Unknown format \"{format}\". Expected one of: {}", allowed.join(", ")))
    }
}

/// Parses a positive count. Bad input falls back to `default` and comes back
/// with the warning to show the user.
fn resolve_count(raw: Option<&str>, field: &str, default: usize) -> (usize, Option<String>) {
    let Some(raw) = raw else { return (default, None) };
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => (n, None),
        _ => (default, Some(format!("Invalid number of {field}. Using default of {default}."))),
    }
}

/// [`resolve_count`], printing any fallback warning to stderr regardless of log level.
fn count_or_default(raw: Option<&str>, field: &str, default: usize) -> usize {
    let (n, warning) = resolve_count(raw, field, default);
    if let Some(msg) = warning {
        eprintln!("{} {msg}", "WARNING:".yellow().bold());
        debug!(field, raw = raw.unwrap_or_default(), "count fell back to default");
    }
    n
}

// ── Score pipeline ─────────────────────────────────────────────────────────────

fn run_score(input: Option<&Path>, format: &str, output: Option<&Path>) -> Result<(), String> {
    let (text, source) = match input {
        Some(path) => (
            std::fs::read_to_string(path)
                .map_err(|e| format!("Unable to read {}: {e}", path.display()))?,
            path.display().to_string(),
        ),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)
                .map_err(|e| format!("Unable to parse input: {e}"))?;
            (buf, "stdin".to_string())
        }
    };

    let group = ingest::csv_parser::parse_group(&text)
        .map_err(|e| format!("Unable to parse CSV data: {e}"))?;
    let members = metrics::score_group(&group);
    info!(members = members.len(), source = %source, "scored group");

    let report = ScoreReport {
        meta: ScoreMeta {
            source,
            member_count: members.len(),
            analyzed_at:  chrono::Utc::now().to_rfc3339(),
        },
        members,
    };

    match format {
        "json"     => reporters::json::report_json(&report, output),
        "terminal" => {
            reporters::terminal::report_terminal(&report);
            Ok(())
        }
        _ => reporters::plain::emit(&reporters::plain::format_scores(&report.members), output),
    }
}

// ── Simulation pipeline ────────────────────────────────────────────────────────

fn run_simulate(sim: &SimulationConfig, format: &str, output: Option<&Path>) -> Result<(), String> {
    let pb = if format == "terminal" {
        let pb = ProgressBar::new(sim.trials as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} trials")
                .map_err(|e| e.to_string())?
                .progress_chars("█▌ "),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let start = Instant::now();
    let summary = simulation::run_simulation(sim, &|| pb.inc(1))?;
    pb.finish_and_clear();
    info!(trials = sim.trials, elapsed = %fmt_dur(start.elapsed()), "simulation finished");

    let report = SimulationReport {
        meta: SimulationMeta {
            trials:       sim.trials,
            group_size:   sim.group_size,
            seed:         sim.seed,
            parallel:     sim.parallel,
            generated_at: chrono::Utc::now().to_rfc3339(),
        },
        summary: summary.stats(),
    };

    match format {
        "json"  => reporters::json::report_json(&report, output),
        "plain" => reporters::plain::emit(&reporters::plain::format_summary(&report.summary), output),
        _ => {
            eprintln!("✔ {} trials — ⏱ {}", sim.trials, fmt_dur(start.elapsed()));
            reporters::terminal::report_simulation_terminal(&report);
            Ok(())
        }
    }
}

// ── Duration formatting ────────────────────────────────────────────────────────

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_millis();
    if ms >= 1000 { format!("{:.1}s", d.as_secs_f64()) } else { format!("{ms}ms") }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
