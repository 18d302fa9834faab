//! Errors of the calendar pipeline.

use std::path::PathBuf;

/// Everything that can abort a run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A data row does not have the expected shape.
    #[error("{source_name}, row {row}: {message}")]
    Format {
        source_name: String,
        row: usize,
        message: String,
    },
    /// A date argument is not in the compact `YYYYMMDD` form.
    #[error("invalid date {0:?}, expected YYYYMMDD")]
    InvalidDate(String),
    /// The start of a date range lies after its end.
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: String, end: String },
    /// The file name pattern cannot be compiled.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The workbook cannot be opened or read.
    #[error("spreadsheet error in {}: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        source: calamine::Error,
    },
    /// The workbook has no sheet with the requested name.
    #[error("sheet {sheet:?} not found in {}", path.display())]
    SheetNotFound { path: PathBuf, sheet: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
