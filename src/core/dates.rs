//! Lenient `DD/MM/YYYY` parsing and day arithmetic for contribution periods.

use chrono::{NaiveDate, TimeDelta};

/// Date that unreadable start dates sort as.
pub const SORT_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => date,
    None => panic!("1970-01-01 is a valid date"),
};

/// Parses a `DD/MM/YYYY` string without rejecting odd but numeric input.
///
/// The rules follow how the intake form has always read dates:
///
/// * the text is split on `/` and only the first three pieces are used;
/// * each piece is trimmed and read as an integer, and an empty,
///   non-numeric or zero piece makes the whole date unreadable;
/// * days and months outside their range roll over, so `31/02/2021` is
///   read as 3 March 2021 and month 13 is January of the following year;
/// * years `0..=99` are taken as `1900..=1999`.
///
/// Returns `None` instead of an error so callers can treat a broken date as
/// contributing nothing.
pub fn parse_date_br(text: &str) -> Option<NaiveDate> {
    let mut pieces = text.split('/');
    let day = parse_component(pieces.next()?)?;
    let month = parse_component(pieces.next()?)?;
    let mut year = parse_component(pieces.next()?)?;

    if (0..=99).contains(&year) {
        year += 1900;
    }

    let month_index = year.checked_mul(12)?.checked_add(month.checked_sub(1)?)?;
    let first_of_month = NaiveDate::from_ymd_opt(
        i32::try_from(month_index.div_euclid(12)).ok()?,
        u32::try_from(month_index.rem_euclid(12) + 1).ok()?,
        1,
    )?;

    first_of_month.checked_add_signed(TimeDelta::try_days(day.checked_sub(1)?)?)
}

fn parse_component(piece: &str) -> Option<i64> {
    match piece.trim().parse::<i64>() {
        Ok(0) | Err(_) => None,
        Ok(value) => Some(value),
    }
}

/// Number of calendar days from `start` to `end`, counting both ends.
///
/// A range that starts and ends on the same day is one day long. Reversed
/// ranges give zero or a negative count; the value is not clamped.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Sort key for a period start: readable dates order by value, unreadable
/// ones sit at [`SORT_EPOCH`] just ahead of a real 01/01/1970.
pub(crate) fn start_sort_key(text: &str) -> (NaiveDate, bool) {
    match parse_date_br(text) {
        Some(date) => (date, true),
        None => (SORT_EPOCH, false),
    }
}
