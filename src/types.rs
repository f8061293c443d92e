use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

/// One row of the source file: a (sub-)region with one cumulative count per
/// reporting date, in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub province: Option<String>,
    pub country: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub counts: Vec<i64>,
}

impl RawRecord {
    /// Zero latitude or longitude marks a non-country entity (cruise ships).
    pub fn is_degenerate(&self) -> bool {
        self.lat == Some(0.0) || self.long == Some(0.0)
    }

    pub fn label(&self) -> String {
        match &self.province {
            Some(p) => format!("{} / {}", p, self.country),
            None => self.country.clone(),
        }
    }
}

/// The raw table: date column labels plus every parsed row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub date_labels: Vec<String>,
    pub rows: Vec<RawRecord>,
}

/// One aggregated row per country, one cumulative count per date label.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRow {
    pub country: String,
    pub counts: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub date_labels: Vec<String>,
    pub rows: Vec<CountryRow>,
}

/// A single (country, date, cumulative) observation after reshaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongRow {
    pub country: String,
    pub date: NaiveDate,
    pub confirmed: i64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Confirmed")]
    #[tabled(rename = "Confirmed")]
    pub confirmed: i64,
    #[serde(rename = "DailyNew")]
    #[tabled(rename = "DailyNew")]
    pub daily_new: i64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct GlobalPoint {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Confirmed")]
    #[tabled(rename = "Confirmed")]
    pub confirmed: i64,
    #[serde(rename = "DailyNew")]
    #[tabled(rename = "DailyNew")]
    pub daily_new: i64,
}

/// A fall in a country's cumulative series between two consecutive dates.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CumulativeDecrease {
    pub country: String,
    pub date: NaiveDate,
    pub previous: i64,
    pub current: i64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Confirmed")]
    #[tabled(rename = "Confirmed")]
    pub confirmed: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodLeaderboard {
    pub label: String,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct HeatmapCell {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "Confirmed")]
    #[tabled(rename = "Confirmed")]
    pub confirmed: i64,
    #[serde(rename = "Log10Confirmed")]
    #[tabled(rename = "Log10Confirmed")]
    pub log10_confirmed: f64,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub degenerate_rows: usize,
    pub total_countries: usize,
    pub total_dates: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub latest_global_confirmed: i64,
    pub cumulative_decreases: usize,
}
