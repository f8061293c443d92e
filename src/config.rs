use crate::error::{PipelineError, PipelineResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// What the delta engine does with a cumulative count that goes down.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NegativeDeltaPolicy {
    /// Report the negative daily-new value as is.
    #[default]
    Keep,
    /// Report 0 instead of a negative daily-new value.
    Clamp,
}

/// A labelled, inclusive calendar window used for ranking.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PeriodWindow {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    pub fn new(label: &str, start: NaiveDate, end: NaiveDate) -> Self {
        PeriodWindow {
            label: label.to_string(),
            start,
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub input_path: String,
    pub output_dir: String,
    pub top_n: usize,
    pub heatmap_top_n: usize,
    pub heatmap_date: NaiveDate,
    pub drop_degenerate: bool,
    pub negative_delta_policy: NegativeDeltaPolicy,
    pub aliases: BTreeMap<String, String>,
    pub periods: Vec<PeriodWindow>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: "./data/time_series_covid_19_confirmed.csv".into(),
            output_dir: ".".into(),
            top_n: 10,
            heatmap_top_n: 10,
            heatmap_date: ymd(2021, 5, 29),
            drop_degenerate: true,
            negative_delta_policy: NegativeDeltaPolicy::default(),
            aliases: default_aliases(),
            periods: default_periods(),
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> PipelineResult<Config> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> PipelineResult<Config> {
        let contents = std::fs::read_to_string(path)?;
        Config::from_toml_str(&contents)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.top_n == 0 || self.heatmap_top_n == 0 {
            return Err(PipelineError::Config(
                "top_n and heatmap_top_n must be greater than zero".into(),
            ));
        }
        for w in &self.periods {
            if w.start > w.end {
                return Err(PipelineError::Config(format!(
                    "period {} starts ({}) after it ends ({})",
                    w.label, w.start, w.end
                )));
            }
        }
        Ok(())
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    // Only called with literal calendar dates below.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn default_aliases() -> BTreeMap<String, String> {
    ["Mainland China", "Hong Kong", "Macau", "Taiwan*"]
        .into_iter()
        .map(|alias| (alias.to_string(), "China".to_string()))
        .collect()
}

fn default_periods() -> Vec<PeriodWindow> {
    let months: [(&str, (i32, u32, u32), (i32, u32, u32)); 17] = [
        ("2020-01", (2020, 1, 22), (2020, 1, 31)),
        ("2020-02", (2020, 2, 1), (2020, 2, 29)),
        ("2020-03", (2020, 3, 1), (2020, 3, 31)),
        ("2020-04", (2020, 4, 1), (2020, 4, 30)),
        ("2020-05", (2020, 5, 1), (2020, 5, 31)),
        ("2020-06", (2020, 6, 1), (2020, 6, 30)),
        ("2020-07", (2020, 7, 1), (2020, 7, 31)),
        ("2020-08", (2020, 8, 1), (2020, 8, 31)),
        ("2020-09", (2020, 9, 1), (2020, 9, 30)),
        ("2020-10", (2020, 10, 1), (2020, 10, 31)),
        ("2020-11", (2020, 11, 1), (2020, 11, 30)),
        ("2020-12", (2020, 12, 1), (2020, 12, 31)),
        ("2021-01", (2021, 1, 1), (2021, 1, 31)),
        ("2021-02", (2021, 2, 1), (2021, 2, 28)),
        ("2021-03", (2021, 3, 1), (2021, 3, 31)),
        ("2021-04", (2021, 4, 1), (2021, 4, 30)),
        ("2021-05", (2021, 5, 1), (2021, 5, 29)),
    ];
    months
        .iter()
        .map(|(label, (sy, sm, sd), (ey, em, ed))| {
            PeriodWindow::new(label, ymd(*sy, *sm, *sd), ymd(*ey, *em, *ed))
        })
        .collect()
}
