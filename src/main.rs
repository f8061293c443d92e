// Entry point: one batch run over the confirmed-cases table.
//
// - Loads the optional TOML config given with `--config`.
// - Runs the pipeline (load, clean, normalize, aggregate, reshape, deltas,
//   rankings) and prints diagnostics.
// - Writes the long series, global trend, leaderboards, heatmap matrix and
//   a JSON summary for the charting side to pick up.
mod aggregate;
mod config;
mod delta;
mod error;
mod loader;
mod normalize;
mod output;
mod pipeline;
mod ranking;
mod reports;
mod reshape;
mod types;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use log::debug;
use pipeline::PipelineOutput;
use std::path::{Path, PathBuf};

const DEFAULT_LOGGING_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(version, about = "Country-level trends and monthly leaderboards from cumulative case counts")]
struct Cli {
    /// TOML file overriding the built-in configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn read_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Config::from_path(p).with_context(|| format!("reading config {}", p.display())),
        None => Ok(Config::default()),
    }
}

/// Print what the loader/cleaner found. None of it is an error.
fn report_load(out: &PipelineOutput) {
    let clean = &out.clean_report;
    println!(
        "Processing dataset... ({} rows loaded, {} countries, {} dates)",
        util::format_int(clean.total_rows),
        util::format_int(out.summary.total_countries),
        util::format_int(out.summary.total_dates)
    );
    if clean.duplicates_removed > 0 {
        println!(
            "Found {} duplicate rows. Removed.",
            util::format_int(clean.duplicates_removed)
        );
    } else {
        println!("No duplicate rows found.");
    }
    if !clean.degenerate.is_empty() {
        println!("Rows with zero coordinates:");
        for r in &clean.degenerate {
            println!("  {}", r.label());
        }
    }
    if !out.decreases.is_empty() {
        println!(
            "Note: {} decreases in cumulative counts.",
            util::format_int(out.decreases.len())
        );
    }
    println!();
}

fn write_reports(out: &PipelineOutput, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let file = dir.join("country_series.csv");
    output::write_csv(&file, &out.series).with_context(|| format!("writing {}", file.display()))?;

    let file = dir.join("global_trend.csv");
    output::write_csv(&file, &out.global).with_context(|| format!("writing {}", file.display()))?;
    let tail = &out.global[out.global.len().saturating_sub(3)..];
    output::preview_table("Global Cumulative and Daily New Confirmed", Some("latest dates"), tail, 3);

    let file = dir.join("period_leaderboards.csv");
    let rows = reports::leaderboard_rows(&out.leaderboards);
    output::write_csv(&file, &rows).with_context(|| format!("writing {}", file.display()))?;
    println!("Monthly Top Countries by Cumulative Confirmed Cases (End-of-Month Values):\n");
    for board in &out.leaderboards {
        println!("{}:", board.label);
        if board.entries.is_empty() {
            println!("  (no observations)");
        }
        for e in &board.entries {
            println!("  {:>2}. {:<24} {:>14}", e.rank, e.country, util::format_int(e.confirmed));
        }
        println!();
    }

    let file = dir.join("heatmap.csv");
    output::write_csv(&file, &out.heatmap).with_context(|| format!("writing {}", file.display()))?;
    output::preview_table(
        "Heatmap Countries",
        Some("top countries on the heatmap date"),
        &out.heatmap_countries,
        out.heatmap_countries.len(),
    );

    let file = dir.join("summary.json");
    output::write_json(&file, &out.summary).with_context(|| format!("writing {}", file.display()))?;
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"latest_global_confirmed\": {}, \"cumulative_decreases\": {}}}\n",
        util::format_int(out.summary.latest_global_confirmed),
        util::format_int(out.summary.cumulative_decreases)
    );
    println!("(Full tables exported to {})", dir.display());
    Ok(())
}

fn main() -> Result<()> {
    // Set RUST_LOG to `DEFAULT_LOGGING_LEVEL` if not set
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", DEFAULT_LOGGING_LEVEL);
    }
    pretty_env_logger::init_timed();
    let args = Cli::parse();
    debug!("args: {args:?}");
    let config = read_config(args.config.as_deref())?;
    debug!("config: {config:?}");

    let out = pipeline::run(&config)
        .with_context(|| format!("processing {}", config.input_path))?;
    report_load(&out);
    write_reports(&out, Path::new(&config.output_dir))?;
    Ok(())
}
