use crate::error::PipelineResult;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> PipelineResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> PipelineResult<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table<T: Tabled>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize) {
    println!("{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    if rows.is_empty() || max_rows == 0 {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(rows.iter().take(max_rows))
        .with(Style::markdown())
        .to_string();
    println!("{}\n", table_str);
}
