use crate::error::{PipelineError, PipelineResult};
use crate::types::{CountryRow, RawTable, WideTable};
use log::debug;
use std::collections::BTreeMap;

/// Sum every date column per country key. Province and coordinates are not
/// carried over. Rows come out ordered by country key. A sum that does not
/// fit in `i64` fails the run.
pub fn aggregate(table: &RawTable) -> PipelineResult<WideTable> {
    let width = table.date_labels.len();
    let mut map: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for r in &table.rows {
        let sums = map.entry(r.country.as_str()).or_insert_with(|| vec![0; width]);
        for ((acc, v), label) in sums.iter_mut().zip(&r.counts).zip(&table.date_labels) {
            *acc = acc
                .checked_add(*v)
                .ok_or_else(|| PipelineError::overflow(&r.country, label))?;
        }
    }
    let rows: Vec<CountryRow> = map
        .into_iter()
        .map(|(country, counts)| CountryRow {
            country: country.to_string(),
            counts,
        })
        .collect();
    debug!(
        "Aggregated {} rows into {} countries",
        table.rows.len(),
        rows.len()
    );
    Ok(WideTable {
        date_labels: table.date_labels.clone(),
        rows,
    })
}

/// Long -> wide: one row per country, one column per distinct date in
/// ascending order. Missing (country, date) cells are 0.
#[cfg(test)]
pub fn pivot(long: &[crate::types::LongRow]) -> WideTable {
    use crate::util::format_date_label;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    let dates: Vec<NaiveDate> = long
        .iter()
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column: BTreeMap<NaiveDate, usize> = dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

    let mut map: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for r in long {
        let counts = map
            .entry(r.country.as_str())
            .or_insert_with(|| vec![0; dates.len()]);
        counts[column[&r.date]] += r.confirmed;
    }
    WideTable {
        date_labels: dates.into_iter().map(format_date_label).collect(),
        rows: map
            .into_iter()
            .map(|(country, counts)| CountryRow {
                country: country.to_string(),
                counts,
            })
            .collect(),
    }
}
