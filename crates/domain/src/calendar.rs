// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar and business-day arithmetic.
//!
//! Every component that counts leave days goes through this module.
//! A business day is Monday through Friday; no holiday calendar is applied.

use crate::error::DomainError;
use time::macros::format_description;
use time::{Date, Month, Weekday};

/// Earliest calendar year accepted by the ledger.
pub const MIN_YEAR: i32 = 1900;

/// Latest calendar year accepted by the ledger.
pub const MAX_YEAR: i32 = 2200;

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the input is not a valid calendar
/// date or its year is outside `MIN_YEAR..=MAX_YEAR`.
pub fn parse_date(input: &str) -> Result<Date, DomainError> {
    let trimmed: &str = input.trim();
    let date: Date = Date::parse(trimmed, format_description!("[year]-[month]-[day]")).map_err(
        |e| DomainError::InvalidDate {
            input: input.to_string(),
            reason: e.to_string(),
        },
    )?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return Err(DomainError::InvalidDate {
            input: input.to_string(),
            reason: format!("year must be between {MIN_YEAR} and {MAX_YEAR}"),
        });
    }

    Ok(date)
}

/// Returns true if the date falls on a Monday.
#[must_use]
pub fn is_monday(date: Date) -> bool {
    date.weekday() == Weekday::Monday
}

/// Returns true if the date falls Monday through Friday.
#[must_use]
pub fn is_business_day(date: Date) -> bool {
    date.weekday().number_days_from_monday() < 5
}

/// Counts the calendar days in `[start, end]`, both ends inclusive.
///
/// # Errors
///
/// Returns `DomainError::InvalidRange` if `end < start`.
pub fn calendar_days(start: Date, end: Date) -> Result<u32, DomainError> {
    ensure_ordered(start, end)?;

    let span: i64 = (end - start).whole_days() + 1;
    u32::try_from(span).map_err(|_| DomainError::DayCountOverflow {
        operation: format!("counting calendar days between {start} and {end}"),
    })
}

/// Counts the business days in `[start, end]`, both ends inclusive.
///
/// Full weeks contribute five days each. The remaining partial week starts
/// on the same weekday as `start`, so it is counted by weekday offset alone
/// without any further date arithmetic.
///
/// # Errors
///
/// Returns `DomainError::InvalidRange` if `end < start`.
pub fn count_business_days(start: Date, end: Date) -> Result<u32, DomainError> {
    let total: u32 = calendar_days(start, end)?;

    let full_weeks: u32 = total / 7;
    let remainder: u32 = total % 7;
    let first_weekday: u32 = u32::from(start.weekday().number_days_from_monday());

    let partial: u32 = (0..remainder)
        .filter(|offset| (first_weekday + offset) % 7 < 5)
        .map(|_| 1)
        .sum();

    Ok(full_weeks * 5 + partial)
}

/// Counts the Saturdays and Sundays in `[start, end]`.
///
/// For every valid range `calendar_days = business_days + weekend_days`.
///
/// # Errors
///
/// Returns `DomainError::InvalidRange` if `end < start`.
pub fn weekend_days(start: Date, end: Date) -> Result<u32, DomainError> {
    Ok(calendar_days(start, end)? - count_business_days(start, end)?)
}

/// Returns January 1 of the given year.
///
/// # Errors
///
/// Returns `DomainError::InvalidYear` if the year is outside the supported window.
pub fn first_day_of_year(year: i32) -> Result<Date, DomainError> {
    ensure_supported_year(year)?;
    calendar_date(year, Month::January, 1)
}

/// Returns December 31 of the given year.
///
/// # Errors
///
/// Returns `DomainError::InvalidYear` if the year is outside the supported window.
pub fn last_day_of_year(year: i32) -> Result<Date, DomainError> {
    ensure_supported_year(year)?;
    calendar_date(year, Month::December, 31)
}

/// Returns the request filing deadline for an entitlement year.
///
/// # Arguments
///
/// * `year` - The entitlement year
/// * `month` - Deadline month, 1-based
/// * `day` - Deadline day of month
///
/// # Errors
///
/// Returns an error if the year is unsupported or the month/day pair does
/// not exist in that year.
pub fn filing_deadline(year: i32, month: u8, day: u8) -> Result<Date, DomainError> {
    ensure_supported_year(year)?;
    let month: Month = Month::try_from(month).map_err(|e| DomainError::InvalidDate {
        input: format!("{year}-{month:02}-{day:02}"),
        reason: e.to_string(),
    })?;
    calendar_date(year, month, day)
}

/// Returns true if the inclusive ranges `[a_start, a_end]` and `[b_start, b_end]` share a day.
#[must_use]
pub fn ranges_overlap(a_start: Date, a_end: Date, b_start: Date, b_end: Date) -> bool {
    a_start <= b_end && b_start <= a_end
}

fn ensure_ordered(start: Date, end: Date) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::InvalidRange { start, end });
    }
    Ok(())
}

fn ensure_supported_year(year: i32) -> Result<(), DomainError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DomainError::InvalidYear(year));
    }
    Ok(())
}

fn calendar_date(year: i32, month: Month, day: u8) -> Result<Date, DomainError> {
    Date::from_calendar_date(year, month, day).map_err(|e| DomainError::InvalidDate {
        input: format!("{year}-{:02}-{day:02}", u8::from(month)),
        reason: e.to_string(),
    })
}
