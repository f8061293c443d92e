use crate::error::{PipelineError, PipelineResult};
use crate::types::{LongRow, WideTable};
use crate::util::{parse_date_label, DATE_LABEL_FORMAT};
use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;

/// Parse every date column label. One bad label, or two labels naming the
/// same date, fails the whole run.
pub fn parse_date_labels(labels: &[String]) -> PipelineResult<Vec<NaiveDate>> {
    let mut seen: HashMap<NaiveDate, &str> = HashMap::with_capacity(labels.len());
    let mut dates = Vec::with_capacity(labels.len());
    for label in labels {
        let date = parse_date_label(label).ok_or_else(|| {
            PipelineError::Schema(format!(
                "date column {:?} does not match {}",
                label, DATE_LABEL_FORMAT
            ))
        })?;
        if let Some(first) = seen.insert(date, label) {
            return Err(PipelineError::Schema(format!(
                "date column {:?} repeats {:?} ({})",
                label, first, date
            )));
        }
        dates.push(date);
    }
    Ok(dates)
}

/// Wide -> long: one row per (country, date). Output order is not part of the
/// contract; the delta engine sorts for itself.
pub fn melt(wide: &WideTable) -> PipelineResult<Vec<LongRow>> {
    let dates = parse_date_labels(&wide.date_labels)?;
    let mut long = Vec::with_capacity(wide.rows.len() * dates.len());
    for row in &wide.rows {
        for (date, confirmed) in dates.iter().zip(&row.counts) {
            long.push(LongRow {
                country: row.country.clone(),
                date: *date,
                confirmed: *confirmed,
            });
        }
    }
    debug!("Reshaped {} countries into {} rows", wide.rows.len(), long.len());
    Ok(long)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::pivot;
    use crate::types::CountryRow;

    fn wide() -> WideTable {
        WideTable {
            date_labels: vec!["1/31/20".into(), "2/1/20".into(), "2/2/20".into()],
            rows: vec![
                CountryRow {
                    country: "Brazil".into(),
                    counts: vec![0, 0, 2],
                },
                CountryRow {
                    country: "China".into(),
                    counts: vec![9802, 11891, 16630],
                },
            ],
        }
    }

    #[test]
    fn melt_yields_one_row_per_country_and_date() {
        let long = melt(&wide()).unwrap();
        assert_eq!(long.len(), 6);
        let feb1 = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        let china_feb1 = long
            .iter()
            .find(|r| r.country == "China" && r.date == feb1)
            .unwrap();
        assert_eq!(china_feb1.confirmed, 11891);
    }

    #[test]
    fn wide_long_wide_round_trip() {
        let original = wide();
        let long = melt(&original).unwrap();
        assert_eq!(pivot(&long), original);
    }

    #[test]
    fn bad_label_fails_the_run() {
        let mut table = wide();
        table.date_labels[1] = "Feb 1".into();
        match melt(&table).unwrap_err() {
            PipelineError::Schema(msg) => assert!(msg.contains("\"Feb 1\"")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn repeated_date_column_fails_the_run() {
        let table = WideTable {
            date_labels: vec!["1/22/20".into(), "1/22/20".into()],
            rows: vec![CountryRow {
                country: "A".into(),
                counts: vec![5, 9],
            }],
        };
        match melt(&table).unwrap_err() {
            PipelineError::Schema(msg) => assert!(msg.contains("repeats")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn differently_written_same_date_is_a_repeat() {
        let labels = vec!["01/22/20".to_string(), "1/22/20".to_string()];
        assert!(matches!(
            parse_date_labels(&labels),
            Err(PipelineError::Schema(_))
        ));
    }
}
