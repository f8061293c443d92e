use crate::config::PeriodWindow;
use crate::loader::CleanReport;
use crate::ranking::window_values;
use crate::types::{
    CumulativeDecrease, GlobalPoint, HeatmapCell, LeaderboardEntry, PeriodLeaderboard, RunSummary,
    SeriesPoint,
};
use std::collections::HashSet;

/// Flatten per-period leaderboards into one table, periods in window order.
pub fn leaderboard_rows(boards: &[PeriodLeaderboard]) -> Vec<LeaderboardEntry> {
    boards.iter().flat_map(|b| b.entries.iter().cloned()).collect()
}

/// One cell per (country, period) for the selected countries. A country with
/// no observation in a window gets 0. Values are also given as log10(v + 1)
/// so large counts do not flatten the colour scale.
pub fn generate_heatmap(
    series: &[SeriesPoint],
    windows: &[PeriodWindow],
    countries: &[LeaderboardEntry],
) -> Vec<HeatmapCell> {
    let mut cells = Vec::with_capacity(windows.len() * countries.len());
    for w in windows {
        let values = window_values(series, w);
        for c in countries {
            let confirmed = values.get(c.country.as_str()).copied().unwrap_or(0);
            cells.push(HeatmapCell {
                country: c.country.clone(),
                period: w.label.clone(),
                confirmed,
                log10_confirmed: (confirmed.max(0) as f64 + 1.0).log10(),
            });
        }
    }
    cells
}

pub fn generate_summary(
    clean: &CleanReport,
    series: &[SeriesPoint],
    global: &[GlobalPoint],
    decreases: &[CumulativeDecrease],
) -> RunSummary {
    let countries: HashSet<&str> = series.iter().map(|p| p.country.as_str()).collect();
    RunSummary {
        rows_loaded: clean.total_rows,
        duplicates_removed: clean.duplicates_removed,
        degenerate_rows: clean.degenerate.len(),
        total_countries: countries.len(),
        total_dates: global.len(),
        first_date: global.first().map(|g| g.date),
        last_date: global.last().map(|g| g.date),
        latest_global_confirmed: global.last().map_or(0, |g| g.confirmed),
        cumulative_decreases: decreases.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, day).unwrap()
    }

    fn point(country: &str, date: NaiveDate, confirmed: i64) -> SeriesPoint {
        SeriesPoint {
            country: country.to_string(),
            date,
            confirmed,
            daily_new: 0,
        }
    }

    fn pick(country: &str) -> LeaderboardEntry {
        LeaderboardEntry {
            period: "2020-03-31".into(),
            rank: 1,
            country: country.into(),
            confirmed: 0,
        }
    }

    #[test]
    fn heatmap_fills_absent_countries_with_zero() {
        let series = vec![
            point("A", d(2, 20), 99),
            point("A", d(3, 20), 999),
            point("B", d(3, 20), 9),
        ];
        let windows = vec![
            PeriodWindow::new("2020-02", d(2, 1), d(2, 29)),
            PeriodWindow::new("2020-03", d(3, 1), d(3, 31)),
        ];
        let cells = generate_heatmap(&series, &windows, &[pick("A"), pick("B")]);
        let got: Vec<(&str, &str, i64)> = cells
            .iter()
            .map(|c| (c.period.as_str(), c.country.as_str(), c.confirmed))
            .collect();
        assert_eq!(
            got,
            vec![
                ("2020-02", "A", 99),
                ("2020-02", "B", 0),
                ("2020-03", "A", 999),
                ("2020-03", "B", 9),
            ]
        );
        assert!((cells[0].log10_confirmed - 2.0).abs() < 1e-12);
        assert_eq!(cells[1].log10_confirmed, 0.0);
    }

    #[test]
    fn leaderboards_flatten_in_period_order() {
        let boards = vec![
            PeriodLeaderboard {
                label: "2020-01".into(),
                entries: vec![pick("A")],
            },
            PeriodLeaderboard {
                label: "2020-02".into(),
                entries: vec![],
            },
            PeriodLeaderboard {
                label: "2020-03".into(),
                entries: vec![pick("B"), pick("C")],
            },
        ];
        let rows = leaderboard_rows(&boards);
        let names: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn summary_counts() {
        let clean = CleanReport {
            total_rows: 10,
            duplicates_removed: 2,
            degenerate: vec![],
        };
        let series = vec![point("A", d(1, 22), 1), point("B", d(1, 22), 2)];
        let global = vec![GlobalPoint {
            date: d(1, 22),
            confirmed: 3,
            daily_new: 0,
        }];
        let s = generate_summary(&clean, &series, &global, &[]);
        assert_eq!(s.rows_loaded, 10);
        assert_eq!(s.duplicates_removed, 2);
        assert_eq!(s.total_countries, 2);
        assert_eq!(s.total_dates, 1);
        assert_eq!(s.latest_global_confirmed, 3);
        assert_eq!(s.first_date, Some(d(1, 22)));
    }
}
