//! The configured date range and gap filling.

use chrono::NaiveDate;

use crate::{
    aggregate::CalendarAggregate,
    error::{Error, Result},
};

static FORMAT: &str = "%Y%m%d";
/// Format of the calendar keys in the output.
pub static KEY_FORMAT: &str = "%Y/%m/%d";

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Build a range from two dates in the compact `YYYYMMDD` form.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_compact(start)?, parse_compact(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every date of the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |date| *date <= end)
    }
}

/// Parse a date in the compact `YYYYMMDD` form.
pub fn parse_compact(text: &str) -> Result<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(Error::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, FORMAT).map_err(|_| Error::InvalidDate(text.to_string()))
}

/// The calendar key of a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format(KEY_FORMAT).to_string()
}

/// Insert a blank entry for every date of the range a district has no entry for.
///
/// Entries that already exist, including those outside of the range, are left untouched.
/// Returns the number of inserted entries.
pub fn fill_gaps(aggregate: &mut CalendarAggregate, range: DateRange) -> usize {
    let mut inserted = 0;
    for (name, district) in aggregate.districts_mut() {
        for date in range.days() {
            let key = date_key(date);
            if district.insert_blank(key.clone()) {
                log::debug!("fill in no pickup date: {name} {key}");
                inserted += 1;
            }
        }
    }
    inserted
}
