use chrono::NaiveDate;
use std::fmt;

/// The closed calendar-date span covered by a dataset, used to parameterize
/// the archive query.
///
/// Both bounds are inclusive. The range is derived from the dataset's `date`
/// column, so for any non-empty dataset `start <= end` holds; the fetcher
/// re-checks the invariant before issuing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Earliest observed calendar date.
    pub start: NaiveDate,
    /// Latest observed calendar date.
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
