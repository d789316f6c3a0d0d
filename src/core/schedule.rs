use chrono::{Datelike, Days, Months, NaiveDate};

/// Default minimum lead time between run date and collection date.
pub const DEFAULT_MIN_DELTA_DAYS: u32 = 10;

/// Due date for the whole batch.
///
/// Normally the first of the month after `today`. If that is fewer than
/// `min_delta` days away, the batch is collected `min_delta` days from today.
pub fn determine_collection_date(today: NaiveDate, min_delta: u32) -> NaiveDate {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let candidate = first_of_month
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    let earliest = today
        .checked_add_days(Days::new(u64::from(min_delta)))
        .unwrap_or(NaiveDate::MAX);

    if candidate < earliest {
        earliest
    } else {
        candidate
    }
}
