// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Gregorian calendar ⇄ Julian Date.
//!
//! Both directions use the integer formula of Fliegel & Van Flandern (1968).
//! A Julian day starts at noon, so a calendar date at 0h maps to a `.5` JD.
//!
//! ```rust
//! use horizon_almanac::{calendar_to_julian, julian_to_calendar};
//!
//! let jd = calendar_to_julian(2000, 1, 1, 12.0);
//! assert_eq!(jd, 2_451_545.0);
//!
//! let date = julian_to_calendar(jd).unwrap();
//! assert_eq!((date.year, date.month, date.day, date.hour), (2000, 1, 1, 12));
//! ```

use crate::error::{AlmanacError, AlmanacResult};
use crate::instant::Time;
use crate::scales::JD;
use chrono::{NaiveDate, NaiveDateTime};
use qtty::Days;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// JD of 1582-10-15 12:00, noon of the first day of the Gregorian calendar.
pub const GREGORIAN_START_JD: f64 = 2_299_161.0;

const MS_PER_DAY: i64 = 86_400_000;

/// Largest JD handed to the integer day arithmetic. Its year is already
/// past `i32::MAX`.
const DAY_NUMBER_LIMIT: f64 = 1.0e12;

/// Broken-down calendar instant returned by [`julian_to_calendar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl CalendarDate {
    /// Fractional hour of day.
    pub fn hours(&self) -> f64 {
        self.hour as f64
            + self.minute as f64 / 60.0
            + (self.second as f64 + self.millisecond as f64 / 1000.0) / 3600.0
    }

    /// The same instant as a chrono value.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_milli_opt(
            self.hour,
            self.minute,
            self.second,
            self.millisecond,
        )
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// Julian Date for a Gregorian (proleptic) calendar date and fractional hour.
pub fn calendar_to_julian(year: i32, month: u32, day: u32, hour: f64) -> f64 {
    let (y, m, d) = (year as i64, month as i64, day as i64);
    let a = (m - 14) / 12;
    let jd12h = d - 32_075 + 1_461 * (y + 4_800 + a) / 4 + 367 * (m - 2 - a * 12) / 12
        - 3 * ((y + 4_900 + a) / 100) / 4;
    jd12h as f64 - 0.5 + hour / 24.0
}

/// Calendar fields for a Julian Date, rounded to the nearest millisecond.
///
/// Fails with [`AlmanacError::InvalidArgument`] before the Gregorian reform
/// ([`GREGORIAN_START_JD`]).
pub fn julian_to_calendar(jd: f64) -> AlmanacResult<CalendarDate> {
    if !jd.is_finite() || jd < GREGORIAN_START_JD {
        return Err(AlmanacError::invalid_argument(
            "jd",
            jd,
            "must not precede the Gregorian calendar (JD 2299161.0)",
        ));
    }

    if jd >= DAY_NUMBER_LIMIT {
        return Err(AlmanacError::invalid_argument(
            "jd",
            jd,
            "year does not fit the calendar range",
        ));
    }

    let shifted = jd + 0.5;
    let mut day_number = shifted.floor() as i64;
    let mut ms = ((shifted - day_number as f64) * MS_PER_DAY as f64).round() as i64;
    if ms >= MS_PER_DAY {
        day_number += 1;
        ms -= MS_PER_DAY;
    }

    let mut l = day_number + 68_569;
    let n = 4 * l / 146_097;
    l -= (146_097 * n + 3) / 4;
    let i = 4_000 * (l + 1) / 1_461_001;
    l = l - 1_461 * i / 4 + 31;
    let j = 80 * l / 2_447;
    let day = l - 2_447 * j / 80;
    l = j / 11;
    let month = j + 2 - 12 * l;
    let year = i32::try_from(100 * (n - 49) + i + l).map_err(|_| {
        AlmanacError::invalid_argument("jd", jd, "year does not fit the calendar range")
    })?;

    Ok(CalendarDate {
        year,
        month: month as u32,
        day: day as u32,
        hour: (ms / 3_600_000) as u32,
        minute: (ms / 60_000 % 60) as u32,
        second: (ms / 1_000 % 60) as u32,
        millisecond: (ms % 1_000) as u32,
    })
}

/// Fractional year of a Julian Date, counted in Julian years from J2000.0.
#[inline]
pub fn fractional_year(jd: f64) -> f64 {
    2000.0 + (jd - Time::<JD>::J2000.value()) / Time::<JD>::JULIAN_YEAR.value()
}

/// Whether `year-month-day` names a real Gregorian date.
pub fn is_valid_date(year: i32, month: u32, day: u32) -> bool {
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// Number of days in `month` of `year`, `None` for a month outside 1–12.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

impl Time<JD> {
    /// J2000.0 epoch: 2000-01-01T12:00:00 TT (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    /// One Julian year expressed in days.
    pub const JULIAN_YEAR: Days = Days::new(365.25);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    /// Julian centuries since J2000.0, the argument of the analytic theories.
    #[inline]
    pub fn julian_centuries(&self) -> f64 {
        (self.value() - Self::J2000.value()) / Self::JULIAN_CENTURY.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_from_calendar() {
        assert_eq!(calendar_to_julian(2000, 1, 1, 12.0), 2_451_545.0);
        assert_eq!(calendar_to_julian(2012, 1, 1, 0.0), 2_455_927.5);
    }

    #[test]
    fn gregorian_reform_boundary() {
        assert_eq!(calendar_to_julian(1582, 10, 15, 12.0), GREGORIAN_START_JD);
        let date = julian_to_calendar(GREGORIAN_START_JD).unwrap();
        assert_eq!((date.year, date.month, date.day, date.hour), (1582, 10, 15, 12));
    }

    #[test]
    fn pre_gregorian_jd_is_rejected() {
        let err = julian_to_calendar(2_299_160.999).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(julian_to_calendar(f64::NAN).is_err());
    }

    #[test]
    fn far_future_jd_is_rejected() {
        for jd in [1.0e13, 1.0e18, f64::INFINITY] {
            let err = julian_to_calendar(jd).unwrap_err();
            assert!(err.is_invalid_argument(), "{jd}: {err}");
        }
        // Year 2^31 is past i32.
        let err = julian_to_calendar(7.9e11).unwrap_err();
        assert!(err.is_invalid_argument());

        let date = julian_to_calendar(calendar_to_julian(1_000_000, 3, 1, 0.0)).unwrap();
        assert_eq!((date.year, date.month, date.day), (1_000_000, 3, 1));
    }

    #[test]
    fn half_day_offset_maps_midnight() {
        let date = julian_to_calendar(2_455_927.5).unwrap();
        assert_eq!(date.to_string(), "2012-01-01T00:00:00.000");
    }

    #[test]
    fn fields_of_a_fractional_day() {
        // 1987-06-19 12:00 TT is JD 2446966.0 (Meeus, Example 7.b).
        let jd = 2_446_966.0 + (3.0 * 3600.0 + 25.0 * 60.0 + 7.25) / 86_400.0;
        let date = julian_to_calendar(jd).unwrap();
        assert_eq!((date.year, date.month, date.day), (1987, 6, 19));
        assert_eq!((date.hour, date.minute, date.second), (15, 25, 7));
        assert!((date.millisecond as i32 - 250).abs() <= 1);
    }

    #[test]
    fn end_of_day_rounds_into_next_date() {
        let jd = calendar_to_julian(2023, 12, 31, 0.0) + 1.0 - 1e-10;
        let date = julian_to_calendar(jd).unwrap();
        assert_eq!((date.year, date.month, date.day, date.hour), (2024, 1, 1, 0));
    }

    #[test]
    fn roundtrip_within_a_millisecond() {
        let ms = 1.0 / 86_400_000.0;
        let mut jd = GREGORIAN_START_JD;
        while jd < 2_488_070.0 {
            let date = julian_to_calendar(jd).unwrap();
            let back = calendar_to_julian(date.year, date.month, date.day, date.hours());
            assert!((back - jd).abs() < ms, "jd {jd} -> {date} -> {back}");
            jd += 3_217.123_456_7;
        }
    }

    #[test]
    fn calendar_validation() {
        assert!(!is_valid_date(2023, 4, 31));
        assert!(is_valid_date(2024, 2, 29));
        assert!(!is_valid_date(2023, 2, 29));
        assert!(!is_valid_date(2023, 13, 1));
        assert_eq!(days_in_month(2023, 4), Some(30));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 0), None);
    }

    #[test]
    fn naive_conversion() {
        let date = julian_to_calendar(2_451_545.25).unwrap();
        let naive = date.to_naive().unwrap();
        assert_eq!(naive.to_string(), "2000-01-01 18:00:00");
    }

    #[test]
    fn fractional_year_at_j2000() {
        assert_eq!(fractional_year(2_451_545.0), 2000.0);
        assert!((fractional_year(2_451_545.0 + 365.25 * 12.5) - 2012.5).abs() < 1e-12);
    }

    #[test]
    fn julian_centuries_since_j2000() {
        let jd = Time::<JD>::J2000 + Days::new(36_525.0 * 3.0);
        assert!((jd.julian_centuries() - 3.0).abs() < 1e-12);
    }
}
