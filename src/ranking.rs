use crate::config::PeriodWindow;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{LeaderboardEntry, PeriodLeaderboard, SeriesPoint};
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

/// Order by value descending, ties by country key ascending, keep the first `n`.
fn top_n(values: BTreeMap<&str, i64>, n: usize, period: &str) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<(&str, i64)> = values.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, (country, confirmed))| LeaderboardEntry {
            period: period.to_string(),
            rank: idx + 1,
            country: country.to_string(),
            confirmed,
        })
        .collect()
}

/// The last cumulative value per country among points inside `window`.
/// `series` must be sorted by (country, date), as produced by the delta engine.
pub fn window_values<'a>(series: &'a [SeriesPoint], window: &PeriodWindow) -> BTreeMap<&'a str, i64> {
    let mut last: BTreeMap<&str, i64> = BTreeMap::new();
    for p in series.iter().filter(|p| window.contains(p.date)) {
        last.insert(p.country.as_str(), p.confirmed);
    }
    last
}

/// Top `n` countries per window. A window with no observations gets an
/// empty leaderboard.
pub fn rank_periods(series: &[SeriesPoint], windows: &[PeriodWindow], n: usize) -> Vec<PeriodLeaderboard> {
    windows
        .iter()
        .map(|w| {
            let entries = top_n(window_values(series, w), n, &w.label);
            debug!("Period {}: {} entries", w.label, entries.len());
            PeriodLeaderboard {
                label: w.label.clone(),
                entries,
            }
        })
        .collect()
}

/// Top `n` countries by cumulative value on one date across the whole table.
pub fn top_at_date(series: &[SeriesPoint], date: NaiveDate, n: usize) -> PipelineResult<Vec<LeaderboardEntry>> {
    let mut values: BTreeMap<&str, i64> = BTreeMap::new();
    for p in series.iter().filter(|p| p.date == date) {
        *values.entry(p.country.as_str()).or_insert(0) += p.confirmed;
    }
    if values.is_empty() {
        return Err(PipelineError::EmptyResult(format!(
            "no observations on {}",
            date
        )));
    }
    Ok(top_n(values, n, &date.to_string()))
}
