//! This crate turns per-block garbage collection spreadsheets into a single JSON calendar.
//!
//! Every source workbook lists, per block, the pickup dates of each waste category.
//! The rows of all sources are merged into one [`CalendarAggregate`] keyed by district,
//! the configured date range is completed with empty days and the result is written as JSON.

pub mod aggregate;
pub mod calendar;
pub mod category;
pub mod emit;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod source;

pub use aggregate::CalendarAggregate;
pub use calendar::DateRange;
pub use category::Category;
pub use emit::OutputKeys;
pub use error::{Error, Result};
pub use pipeline::{process, RunSummary, Settings};
