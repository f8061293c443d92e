//! Error types.

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("Cannot parse {value:?} in column {column:?} (row {row})")]
    Parse {
        column: String,
        value: String,
        row: usize,
    },
    #[error("Sum of {column:?} for {key:?} overflows")]
    Overflow { key: String, column: String },
    #[error("Empty result: {0}")]
    EmptyResult(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("std IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    pub fn overflow(key: &str, column: &str) -> Self {
        PipelineError::Overflow {
            key: key.to_string(),
            column: column.to_string(),
        }
    }

    pub fn parse(column: &str, value: &str, row: usize) -> Self {
        PipelineError::Parse {
            column: column.to_string(),
            value: value.to_string(),
            row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_column_and_value() {
        let err = PipelineError::parse("1/32/20", "abc", 7);
        let msg = err.to_string();
        assert!(msg.contains("1/32/20"));
        assert!(msg.contains("abc"));
        assert!(msg.contains("row 7"));
    }
}
