// Explicit pipeline driver. Each stage takes its predecessor's output and
// returns a new value; nothing is shared or mutated between stages.
use crate::aggregate::aggregate;
use crate::config::Config;
use crate::delta::{compute_deltas, global_rollup};
use crate::error::PipelineResult;
use crate::loader::{self, CleanReport};
use crate::normalize::AliasTable;
use crate::ranking::{rank_periods, top_at_date};
use crate::reports;
use crate::reshape::melt;
use crate::types::{
    CumulativeDecrease, GlobalPoint, HeatmapCell, LeaderboardEntry, PeriodLeaderboard, RawTable,
    RunSummary, SeriesPoint,
};
use log::{debug, info};

#[derive(Debug)]
pub struct PipelineOutput {
    pub clean_report: CleanReport,
    pub series: Vec<SeriesPoint>,
    pub global: Vec<GlobalPoint>,
    pub decreases: Vec<CumulativeDecrease>,
    pub leaderboards: Vec<PeriodLeaderboard>,
    pub heatmap_countries: Vec<LeaderboardEntry>,
    pub heatmap: Vec<HeatmapCell>,
    pub summary: RunSummary,
}

pub fn run(config: &Config) -> PipelineResult<PipelineOutput> {
    config.validate()?;
    let raw = loader::load_raw(&config.input_path)?;
    transform(&raw, config)
}

/// Everything after loading; split out so it can run on in-memory tables.
pub fn transform(raw: &RawTable, config: &Config) -> PipelineResult<PipelineOutput> {
    let (cleaned, clean_report) = loader::clean(raw, config.drop_degenerate);
    info!(
        "{} rows loaded, {} duplicates removed, {} with zero coordinates",
        clean_report.total_rows,
        clean_report.duplicates_removed,
        clean_report.degenerate.len()
    );

    let normalized = AliasTable::from(&config.aliases).normalize(&cleaned);
    let wide = aggregate(&normalized)?;
    let long = melt(&wide)?;

    let outcome = compute_deltas(&long, config.negative_delta_policy);
    let global = global_rollup(&outcome.series)?;
    debug!(
        "{} series points, {} global dates",
        outcome.series.len(),
        global.len()
    );

    let leaderboards = rank_periods(&outcome.series, &config.periods, config.top_n);
    let heatmap_countries = top_at_date(&outcome.series, config.heatmap_date, config.heatmap_top_n)?;
    let heatmap = reports::generate_heatmap(&outcome.series, &config.periods, &heatmap_countries);
    let summary = reports::generate_summary(&clean_report, &outcome.series, &global, &outcome.decreases);

    Ok(PipelineOutput {
        clean_report,
        series: outcome.series,
        global,
        decreases: outcome.decreases,
        leaderboards,
        heatmap_countries,
        heatmap,
        summary,
    })
}
