//! One complete run: read every source, fill the date range and write the JSON file.

use std::path::PathBuf;

use crate::{
    aggregate::CalendarAggregate,
    calendar::{fill_gaps, DateRange},
    emit::{write_json, OutputKeys},
    error::Result,
    ingest::ingest,
    source::{discover, read_sheet},
};

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the source workbooks.
    pub source_dir: PathBuf,
    /// Glob pattern for the workbook file names, e.g. `*.xlsx`.
    pub file_pattern: String,
    /// Name of the sheet to read in every workbook.
    pub sheet_name: String,
    /// Every district gets an entry for each date of this range.
    pub range: DateRange,
    /// Path of the JSON file to write.
    pub output: PathBuf,
    pub keys: OutputKeys,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub rows: usize,
    pub districts: usize,
    /// Blank entries added by gap filling.
    pub filled_dates: usize,
}

/// Run the whole conversion.
///
/// Sources are processed in sorted path order. Any error aborts the run before the
/// output file is touched.
pub fn process(settings: &Settings) -> Result<RunSummary> {
    let paths = discover(&settings.source_dir, &settings.file_pattern)?;
    if paths.is_empty() {
        log::warn!(
            "no excel file matches {} in {}",
            settings.file_pattern,
            settings.source_dir.display()
        );
    }

    let mut aggregate = CalendarAggregate::new();
    let mut summary = RunSummary::default();
    for path in &paths {
        log::info!("processing excel file: {}", path.display());
        let rows = read_sheet(path, &settings.sheet_name)?;
        let ingested = ingest(&path.display().to_string(), rows, &mut aggregate)?;
        log::debug!("{}: {ingested:?}", path.display());
        summary.files += 1;
        summary.rows += ingested.rows;
    }
    log::info!("finish processing all excel files");

    summary.filled_dates = fill_gaps(&mut aggregate, settings.range);
    summary.districts = aggregate.districts().count();

    log::info!("output to json file: {}", settings.output.display());
    write_json(&aggregate, &settings.keys, &settings.output)?;
    log::info!("output finished");
    Ok(summary)
}
