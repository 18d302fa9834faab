//! Discovery and reading of the source workbooks.

use std::{
    iter,
    path::{Path, PathBuf},
};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use glob::Pattern;

use crate::{
    calendar::date_key,
    error::{Error, Result},
    ingest::Row,
};

/// Find the files in `dir` whose names match the glob `pattern`, sorted by path.
pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = Path::new(&Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let mut paths: Vec<PathBuf> = glob::glob(&full_pattern.to_string_lossy())?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                log::warn!("skipping unreadable path: {err}");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    Ok(paths)
}

/// Read all rows of a sheet as text cells.
///
/// Rows are positional from the first column of the sheet, even if the leading columns
/// are empty.
pub fn read_sheet(path: &Path, sheet_name: &str) -> Result<Vec<Row>> {
    let mut workbook = open_workbook_auto(path).map_err(|source| Error::Spreadsheet {
        path: path.to_path_buf(),
        source,
    })?;
    if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
        return Err(Error::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet_name.to_string(),
        });
    }
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|source| Error::Spreadsheet {
            path: path.to_path_buf(),
            source,
        })?;
    let offset = range.start().map_or(0, |(_, column)| column as usize);
    let rows: Vec<Row> = range
        .rows()
        .map(|cells| {
            iter::repeat(None)
                .take(offset)
                .chain(cells.iter().map(cell_text))
                .collect::<Row>()
        })
        .collect();
    Ok(rows)
}

/// Convert a cell to text. Date cells use the calendar key format.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(text) | Data::DurationIso(text) => Some(text.clone()),
        Data::Int(number) => Some(number.to_string()),
        Data::Float(number) => Some(number.to_string()),
        Data::Bool(value) => Some(value.to_string()),
        Data::DateTime(date_time) => date_time
            .as_datetime()
            .map(|date_time| date_key(date_time.date())),
        Data::DateTimeIso(text) => Some(
            text.get(..10)
                .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
                .map_or_else(|| text.clone(), date_key),
        ),
        Data::Error(_) | Data::Empty => None,
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use calamine::Data;

    use crate::{
        error::Error,
        source::{cell_text, discover, read_sheet},
    };

    static SHEET: &str = "ごみ出しパターン例外一括編集";

    fn fixtures() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("src/source/tests")
    }

    #[test]
    fn test_discover_sorted_files() {
        let paths = discover(&fixtures(), "*.xlsx").unwrap();
        let names: Vec<&str> = paths
            .iter()
            .map(|path| path.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["2024_04.xlsx", "2024_05.xlsx"]);
    }

    #[test]
    fn test_discover_no_match() {
        assert!(discover(&fixtures(), "*.ods").unwrap().is_empty());
    }

    #[test]
    fn test_discover_invalid_pattern() {
        assert!(matches!(
            discover(&fixtures(), "[.xlsx"),
            Err(Error::Pattern(_))
        ));
    }

    #[test]
    fn test_read_sheet() {
        let rows = read_sheet(&fixtures().join("2024_04.xlsx"), SHEET).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][2].as_deref(), Some("燃やせるごみ"));
        assert_eq!(rows[1][0].as_deref(), Some("赤塚"));
        assert_eq!(rows[1][1].as_deref(), Some("地区エリアA あかつか"));
        assert_eq!(rows[1][2].as_deref(), Some("2024/04/01,2024/04/08"));
        assert_eq!(rows[1][3], None);
        assert_eq!(rows[2][3].as_deref(), Some("2024/04/01"));
    }

    #[test]
    fn test_read_sheet_date_cell() {
        let rows = read_sheet(&fixtures().join("2024_05.xlsx"), SHEET).unwrap();
        assert_eq!(rows[1][2].as_deref(), Some("2024/05/01"));
    }

    #[test]
    fn test_read_sheet_missing_sheet() {
        let err = read_sheet(&fixtures().join("2024_04.xlsx"), "シート1").unwrap_err();
        assert!(matches!(err, Error::SheetNotFound { sheet, .. } if sheet == "シート1"));
    }

    #[test]
    fn test_read_sheet_not_a_workbook() {
        let err = read_sheet(&fixtures().join("readme.txt"), SHEET).unwrap_err();
        assert!(matches!(err, Error::Spreadsheet { .. }));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::Float(3.0)), Some(String::from("3")));
        assert_eq!(cell_text(&Data::Int(20)), Some(String::from("20")));
        assert_eq!(
            cell_text(&Data::DateTimeIso(String::from("2024-04-01T00:00:00"))),
            Some(String::from("2024/04/01"))
        );
    }
}
