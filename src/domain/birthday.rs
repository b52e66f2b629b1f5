//! "Upcoming birthday" arithmetic.
//!
//! Only the month and day of a birthdate take part in the calculation; the
//! year is informational. Leap-day birthdates are projected onto March 1 in
//! years without February 29.

use chrono::{Datelike, NaiveDate};

/// Returns the birthday anniversary of `birthdate` inside `year`.
///
/// `None` only when `year` lies outside the range representable by
/// [`NaiveDate`].
pub fn anniversary_in(birthdate: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthdate.month(), birthdate.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Returns the next occurrence of the birthday on or after `today`.
///
/// A candidate that already passed is moved one year forward as is, so a
/// leap-day birthdate projected onto March 1 stays on March 1 next year.
pub fn next_birthday(birthdate: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let candidate = anniversary_in(birthdate, today.year())?;
    if candidate >= today {
        return Some(candidate);
    }

    let next_year = today.year().checked_add(1)?;
    candidate
        .with_year(next_year)
        .or_else(|| NaiveDate::from_ymd_opt(next_year, 3, 1))
}

/// Number of whole days from `today` until the next birthday.
///
/// A birthday falling on `today` yields `0`; a birthday that already passed
/// this year wraps into the next one, so the result is never negative.
pub fn days_until_next_birthday(birthdate: NaiveDate, today: NaiveDate) -> Option<i64> {
    next_birthday(birthdate, today).map(|next| (next - today).num_days())
}
