//! Folding the rows of one sheet into the aggregate.

use crate::{
    aggregate::CalendarAggregate,
    category::{header_columns, IDENTITY_COLUMNS},
    error::{Error, Result},
};

/// One sheet row. Blank cells are `None`.
pub type Row = Vec<Option<String>>;

/// What a single source contributed to the aggregate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Data rows read, blank rows excluded.
    pub rows: usize,
    /// Blocks that were not known before.
    pub blocks_added: usize,
    /// Category flags that flipped from false to true.
    pub flags_set: usize,
}

/// Ingest the rows of one sheet.
///
/// The first row is the header; its columns after the block and annotation columns name
/// the categories. Every following row reads `[block, "<district> <pronunciation>", dates...]`
/// where each date cell holds comma separated dates.
///
/// `source_name` only appears in error messages.
pub fn ingest<I>(
    source_name: &str,
    rows: I,
    aggregate: &mut CalendarAggregate,
) -> Result<IngestSummary>
where
    I: IntoIterator<Item = Row>,
{
    let mut rows = rows.into_iter();
    let mut summary = IngestSummary::default();
    let Some(header) = rows.next() else {
        log::warn!("{source_name} has no header row, skipping");
        return Ok(summary);
    };
    let columns = header_columns(&header);
    log::debug!("garbage_header_list: {columns:?}");

    // the header is row 1
    for (row_number, row) in (2..).zip(rows) {
        if row.iter().all(is_blank) {
            log::debug!("{source_name}, row {row_number}: blank row, skipping");
            continue;
        }
        let (district, pronunciation) = split_annotation(source_name, row_number, &row)?;
        let Some(block) = row.first().and_then(non_blank) else {
            return Err(format_error(source_name, row_number, "missing block name"));
        };
        log::debug!(
            "subject_area: {district}, subject_block: {block}, subject_block_pronunciation: {pronunciation}"
        );
        if aggregate.register_block(district, block, pronunciation) {
            summary.blocks_added += 1;
        }

        for (category, cell) in columns.iter().zip(row.iter().skip(IDENTITY_COLUMNS)) {
            let Some(category) = category else {
                continue;
            };
            let dates = date_tokens(cell.as_deref().unwrap_or_default());
            log::debug!("garbage_type: {category}, date_item: {dates:?}");
            for date in dates {
                if aggregate.mark(district, date, *category) {
                    summary.flags_set += 1;
                }
            }
        }
        summary.rows += 1;
    }
    Ok(summary)
}

/// Split the `<district> <pronunciation>` annotation of a row.
///
/// Exactly two whitespace separated tokens are accepted.
fn split_annotation<'a>(
    source_name: &str,
    row_number: usize,
    row: &'a Row,
) -> Result<(&'a str, &'a str)> {
    let text = row.get(1).and_then(Option::as_deref).unwrap_or_default();
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [district, pronunciation] => Ok((*district, *pronunciation)),
        [] | [_] => Err(format_error(
            source_name,
            row_number,
            &format!("annotation {text:?} needs a district and a pronunciation"),
        )),
        _ => Err(format_error(
            source_name,
            row_number,
            &format!(
                "annotation {text:?} has {} tokens, expected a district and a pronunciation",
                tokens.len()
            ),
        )),
    }
}

/// The dates listed in a category cell, in order. Empty tokens are dropped.
pub fn date_tokens(cell: &str) -> Vec<&str> {
    cell.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_blank(cell: &Option<String>) -> bool {
    non_blank(cell).is_none()
}

fn non_blank(cell: &Option<String>) -> Option<&str> {
    cell.as_deref().filter(|text| !text.trim().is_empty())
}

fn format_error(source_name: &str, row: usize, message: &str) -> Error {
    Error::Format {
        source_name: source_name.to_string(),
        row,
        message: message.to_string(),
    }
}
