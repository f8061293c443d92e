use crate::config::NegativeDeltaPolicy;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{CumulativeDecrease, GlobalPoint, LongRow, SeriesPoint};
use log::warn;
use std::collections::BTreeMap;

/// Key named in overflow errors raised by the global rollup.
const GLOBAL_KEY: &str = "(global)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaOutcome {
    /// Sorted by (country, date).
    pub series: Vec<SeriesPoint>,
    pub decreases: Vec<CumulativeDecrease>,
}

/// Sort each country's series by date and take first differences. The first
/// point of every country gets a daily-new of 0. Decreases in the cumulative
/// count are always reported; `policy` decides whether the negative
/// difference is kept or clamped to 0.
pub fn compute_deltas(long: &[LongRow], policy: NegativeDeltaPolicy) -> DeltaOutcome {
    let mut sorted: Vec<&LongRow> = long.iter().collect();
    sorted.sort_by(|a, b| a.country.cmp(&b.country).then(a.date.cmp(&b.date)));

    let mut series = Vec::with_capacity(sorted.len());
    let mut decreases = Vec::new();
    let mut prev: Option<&LongRow> = None;

    for row in sorted {
        let daily_new = match prev {
            Some(p) if p.country == row.country => {
                let diff = row.confirmed - p.confirmed;
                if diff < 0 {
                    warn!(
                        "Cumulative count for {} falls from {} to {} on {}",
                        row.country, p.confirmed, row.confirmed, row.date
                    );
                    decreases.push(CumulativeDecrease {
                        country: row.country.clone(),
                        date: row.date,
                        previous: p.confirmed,
                        current: row.confirmed,
                    });
                }
                match policy {
                    NegativeDeltaPolicy::Keep => diff,
                    NegativeDeltaPolicy::Clamp => diff.max(0),
                }
            }
            _ => 0,
        };
        series.push(SeriesPoint {
            country: row.country.clone(),
            date: row.date,
            confirmed: row.confirmed,
            daily_new,
        });
        prev = Some(row);
    }

    DeltaOutcome { series, decreases }
}

/// Sum cumulative and daily-new across all countries per date, ascending.
pub fn global_rollup(series: &[SeriesPoint]) -> PipelineResult<Vec<GlobalPoint>> {
    let mut by_date: BTreeMap<_, (i64, i64)> = BTreeMap::new();
    for p in series {
        let e = by_date.entry(p.date).or_insert((0, 0));
        let overflow = || PipelineError::overflow(GLOBAL_KEY, &p.date.to_string());
        e.0 = e.0.checked_add(p.confirmed).ok_or_else(overflow)?;
        e.1 = e.1.checked_add(p.daily_new).ok_or_else(overflow)?;
    }
    Ok(by_date
        .into_iter()
        .map(|(date, (confirmed, daily_new))| GlobalPoint {
            date,
            confirmed,
            daily_new,
        })
        .collect())
}
