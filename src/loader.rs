use crate::error::{PipelineError, PipelineResult};
use crate::types::{RawRecord, RawTable};
use crate::util::{parse_coord, parse_count};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Identifier and geo columns that precede the date columns, in order.
pub const LEADING_COLUMNS: [&str; 4] = ["Province/State", "Country/Region", "Lat", "Long"];

#[derive(Debug, Clone)]
pub struct CleanReport {
    pub total_rows: usize,
    pub duplicates_removed: usize,
    pub degenerate: Vec<RawRecord>,
}

pub fn load_raw<P: AsRef<Path>>(path: P) -> PipelineResult<RawTable> {
    info!("Loading CSV: {:?}", path.as_ref());
    let file = File::open(path)?;
    load_raw_from_reader(file)
}

pub fn load_raw_from_reader<R: Read>(reader: R) -> PipelineResult<RawTable> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    check_schema(&headers)?;
    let date_labels: Vec<String> = headers
        .iter()
        .skip(LEADING_COLUMNS.len())
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record.position().map_or(idx + 2, |p| p.line() as usize);
        rows.push(parse_record(&record, &headers, line)?);
    }
    debug!(
        "Read {} rows with {} date columns",
        rows.len(),
        date_labels.len()
    );
    Ok(RawTable { date_labels, rows })
}

fn check_schema(headers: &StringRecord) -> PipelineResult<()> {
    for (pos, expected) in LEADING_COLUMNS.iter().enumerate() {
        match headers.get(pos).map(str::trim) {
            Some(h) if h == *expected => {}
            Some(h) => {
                return Err(PipelineError::Schema(format!(
                    "expected column {:?} at position {}, found {:?}",
                    expected,
                    pos + 1,
                    h
                )))
            }
            None => {
                return Err(PipelineError::Schema(format!(
                    "missing column {:?}",
                    expected
                )))
            }
        }
    }
    if headers.len() == LEADING_COLUMNS.len() {
        return Err(PipelineError::Schema("no date columns found".into()));
    }
    Ok(())
}

fn parse_record(record: &StringRecord, headers: &StringRecord, line: usize) -> PipelineResult<RawRecord> {
    if record.len() != headers.len() {
        return Err(PipelineError::Schema(format!(
            "row {} has {} fields, header has {}",
            line,
            record.len(),
            headers.len()
        )));
    }
    let field = |i: usize| record.get(i).unwrap_or("");

    let province = Some(field(0).trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    let country = field(1).trim().to_string();
    if country.is_empty() {
        return Err(PipelineError::parse(LEADING_COLUMNS[1], field(1), line));
    }
    let lat = parse_coord(field(2)).map_err(|_| PipelineError::parse(LEADING_COLUMNS[2], field(2), line))?;
    let long = parse_coord(field(3)).map_err(|_| PipelineError::parse(LEADING_COLUMNS[3], field(3), line))?;

    let counts = (LEADING_COLUMNS.len()..record.len())
        .map(|i| parse_count(field(i)).ok_or_else(|| PipelineError::parse(&headers[i], field(i), line)))
        .collect::<PipelineResult<Vec<i64>>>()?;

    Ok(RawRecord {
        province,
        country,
        lat,
        long,
        counts,
    })
}

/// Full-field identity of a row. Coordinates compare by bit pattern.
#[derive(Hash, PartialEq, Eq)]
struct RowKey<'a> {
    province: Option<&'a str>,
    country: &'a str,
    lat: Option<u64>,
    long: Option<u64>,
    counts: &'a [i64],
}

impl<'a> From<&'a RawRecord> for RowKey<'a> {
    fn from(r: &'a RawRecord) -> Self {
        RowKey {
            province: r.province.as_deref(),
            country: &r.country,
            lat: r.lat.map(f64::to_bits),
            long: r.long.map(f64::to_bits),
            counts: &r.counts,
        }
    }
}

/// Remove exact duplicate rows (first occurrence wins) and identify rows with
/// zero coordinates. Degenerate rows are dropped only when `drop_degenerate`
/// is set; either way they are listed in the report.
pub fn clean(table: &RawTable, drop_degenerate: bool) -> (RawTable, CleanReport) {
    let mut seen: HashSet<RowKey> = HashSet::new();
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut degenerate = Vec::new();
    let mut duplicates_removed = 0usize;

    for r in &table.rows {
        if !seen.insert(RowKey::from(r)) {
            duplicates_removed += 1;
            continue;
        }
        if r.is_degenerate() {
            degenerate.push(r.clone());
            if drop_degenerate {
                continue;
            }
        }
        rows.push(r.clone());
    }

    if duplicates_removed > 0 {
        info!("Found {} duplicate rows, removed", duplicates_removed);
    } else {
        info!("No duplicate rows found");
    }
    for r in &degenerate {
        warn!("Zero coordinates for {}", r.label());
    }

    let report = CleanReport {
        total_rows: table.rows.len(),
        duplicates_removed,
        degenerate,
    };
    let cleaned = RawTable {
        date_labels: table.date_labels.clone(),
        rows,
    };
    (cleaned, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20
,Afghanistan,33.93911,67.709953,0,0
,Albania,41.1533,20.1683,0,1
,Albania,41.1533,20.1683,0,1
Diamond Princess,Canada,0,0,0,0
Hong Kong,China,22.3,114.2,0,2
";

    #[test]
    fn reads_header_and_rows() {
        let table = load_raw_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.date_labels, vec!["1/22/20", "1/23/20"]);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.rows[0].province, None);
        assert_eq!(table.rows[4].province.as_deref(), Some("Hong Kong"));
        assert_eq!(table.rows[4].counts, vec![0, 2]);
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let table = load_raw(file.path()).unwrap();
        assert_eq!(table.rows.len(), 5);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_raw("/nonexistent/dir/confirmed.csv").is_err());
    }

    #[test]
    fn clean_removes_duplicates_and_degenerate_rows() {
        let table = load_raw_from_reader(SAMPLE.as_bytes()).unwrap();
        let (cleaned, report) = clean(&table, true);
        assert_eq!(report.total_rows, 5);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.degenerate.len(), 1);
        assert_eq!(report.degenerate[0].province.as_deref(), Some("Diamond Princess"));
        let countries: Vec<&str> = cleaned.rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["Afghanistan", "Albania", "China"]);
        // the input table is left as it was
        assert_eq!(table.rows.len(), 5);
    }

    #[test]
    fn degenerate_rows_can_be_kept() {
        let table = load_raw_from_reader(SAMPLE.as_bytes()).unwrap();
        let (cleaned, report) = clean(&table, false);
        assert_eq!(report.degenerate.len(), 1);
        assert_eq!(cleaned.rows.len(), 4);
    }

    #[test]
    fn rows_differing_in_one_count_are_not_duplicates() {
        let csv = "Province/State,Country/Region,Lat,Long,1/22/20\n,A,1,1,3\n,A,1,1,4\n";
        let table = load_raw_from_reader(csv.as_bytes()).unwrap();
        let (cleaned, report) = clean(&table, true);
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(cleaned.rows.len(), 2);
    }

    #[test]
    fn decreasing_counts_pass_through() {
        let csv = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,A,1,1,5,3\n";
        let table = load_raw_from_reader(csv.as_bytes()).unwrap();
        let (cleaned, _) = clean(&table, true);
        assert_eq!(cleaned.rows[0].counts, vec![5, 3]);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let csv = "Province/State,Country/Region,Lat,1/22/20\n,A,1,3\n";
        let err = load_raw_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
        assert!(err.to_string().contains("Long"));
    }

    #[test]
    fn no_date_columns_is_a_schema_error() {
        let csv = "Province/State,Country/Region,Lat,Long\n,A,1,1\n";
        let err = load_raw_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn bad_count_is_a_parse_error() {
        let csv = "Province/State,Country/Region,Lat,Long,1/22/20\n,A,1,1,lots\n";
        match load_raw_from_reader(csv.as_bytes()).unwrap_err() {
            PipelineError::Parse { column, value, row } => {
                assert_eq!(column, "1/22/20");
                assert_eq!(value, "lots");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_row_is_a_schema_error() {
        let csv = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,A,1,1,3\n";
        let err = load_raw_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }
}
