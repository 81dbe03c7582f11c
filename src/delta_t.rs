// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T): TT − UT model
//!
//! [`DeltaTModel`] returns **ΔT = TT − UT** in seconds for a Julian Day on
//! the UT axis. The model is a patchwork of empirical fits selected by
//! fractional year `y`:
//!
//! | Range | Model |
//! |-------|-------|
//! | `y ≥ 2025` | leap seconds + 32.184 s (TT − TAI) |
//! | `2011 ≤ y < 2025` | short-term IERS/USNO polynomial bands |
//! | `1620 ≤ y < 2011` | Besselian interpolation in an annual table |
//! | `948 ≤ y < 1620` | Stephenson & Morrison (1984) quadratic |
//! | `y < 948` | Borkowski (1988) quadratic |
//!
//! Before 1955 the historical values are corrected for the difference
//! between the lunar secular acceleration assumed by the tables (−26 ″/cy²)
//! and the one of the ephemeris in use (`ndot`):
//! `−0.000091·(ndot + 26)·(y − 1955)²`.
//!
//! Adjacent bands are not forced to agree at their boundaries; the jumps are
//! those of the published fits.
//!
//! ## Leap seconds
//!
//! From 2025 on, ΔT is taken as `TAI − UTC + 32.184 s`. The `TAI − UTC` count
//! comes from an optional [`LeapSecondSource`] queried at the current UTC
//! date; when there is no source, or it fails, the configured count
//! ([`DEFAULT_LEAP_SECONDS`] unless overridden) is used instead.
//!
//! ```rust
//! use horizon_almanac::{DeltaTModel, JulianDate};
//! use qtty::Seconds;
//!
//! let model = DeltaTModel::default();
//! let dt = model.delta_t(JulianDate::J2000.value());
//! assert!((dt - Seconds::new(63.83)).abs() < Seconds::new(0.01));
//! ```

use crate::calendar::fractional_year;
use crate::error::{AlmanacError, AlmanacResult, LeapSecondError};
use crate::instant::Time;
use crate::scales::{JD, MJD, UT};
use chrono::{DateTime, Utc};
use hifitime::{Duration, Epoch};
use qtty::Seconds;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `TAI − UTC` assumed when no leap-second source answers (value since 2017-01-01).
pub const DEFAULT_LEAP_SECONDS: f64 = 37.0;

/// Lunar secular acceleration of the DE4xx/ELP ephemerides, in ″/cy².
pub const DEFAULT_NDOT: f64 = -25.858;

/// `TT − TAI` in seconds.
const TT_MINUS_TAI: f64 = 32.184;

/// Lunar secular acceleration assumed by the historical tables, in ″/cy².
const TABLE_NDOT: f64 = -26.0;

/// First year of the annual table.
const TABLE_START_YEAR: f64 = 1620.0;

/// Annual entries, 1620.0 through 2011.0.
const ANNUAL_TERMS: usize = 392;

/// ΔT at the start of each year from 1620 to 2011 (seconds).
///
/// USNO historic annual series (Stephenson & Morrison before 1860,
/// McCarthy & Babcock after), then USNO annual values 1993–2011.
#[rustfmt::skip]
const ANNUAL_DELTA_T: [Seconds; ANNUAL_TERMS] = qtty::qtty_vec!(
    Seconds;
    124.00, 119.00, 115.00, 110.00, 106.00, 102.00,  98.00,  95.00,  91.00,  88.00,
     85.00,  82.00,  79.00,  77.00,  74.00,  72.00,  70.00,  67.00,  65.00,  63.00,
     62.00,  60.00,  58.00,  57.00,  55.00,  54.00,  53.00,  51.00,  50.00,  49.00,
     48.00,  47.00,  46.00,  45.00,  44.00,  43.00,  42.00,  41.00,  40.00,  38.00,
     37.00,  36.00,  35.00,  34.00,  33.00,  32.00,  31.00,  30.00,  28.00,  27.00,
     26.00,  25.00,  24.00,  23.00,  22.00,  21.00,  20.00,  19.00,  18.00,  17.00,
     16.00,  15.00,  14.00,  14.00,  13.00,  12.00,  12.00,  11.00,  11.00,  10.00,
     10.00,  10.00,   9.00,   9.00,   9.00,   9.00,   9.00,   9.00,   9.00,   9.00,
      9.00,   9.00,   9.00,   9.00,   9.00,   9.00,   9.00,   9.00,  10.00,  10.00,
     10.00,  10.00,  10.00,  10.00,  10.00,  10.00,  10.00,  11.00,  11.00,  11.00,
     11.00,  11.00,  11.00,  11.00,  11.00,  11.00,  11.00,  11.00,  11.00,  11.00,
     11.00,  11.00,  12.00,  12.00,  12.00,  12.00,  12.00,  12.00,  12.00,  12.00,
     12.00,  12.00,  12.00,  12.00,  13.00,  13.00,  13.00,  13.00,  13.00,  13.00,
     13.00,  14.00,  14.00,  14.00,  14.00,  14.00,  14.00,  14.00,  15.00,  15.00,
     15.00,  15.00,  15.00,  15.00,  15.00,  16.00,  16.00,  16.00,  16.00,  16.00,
     16.00,  16.00,  16.00,  16.00,  16.00,  17.00,  17.00,  17.00,  17.00,  17.00,
     17.00,  17.00,  17.00,  17.00,  17.00,  17.00,  17.00,  17.00,  17.00,  17.00,
     17.00,  17.00,  16.00,  16.00,  16.00,  16.00,  15.00,  15.00,  14.00,  14.00,
     13.70,  13.40,  13.10,  12.90,  12.70,  12.60,  12.50,  12.50,  12.50,  12.50,
     12.50,  12.50,  12.50,  12.50,  12.50,  12.50,  12.50,  12.40,  12.30,  12.20,
     12.00,  11.70,  11.40,  11.10,  10.60,  10.20,   9.60,   9.10,   8.60,   8.00,
      7.50,   7.00,   6.60,   6.30,   6.00,   5.80,   5.70,   5.60,   5.60,   5.60,
      5.70,   5.80,   5.90,   6.10,   6.20,   6.30,   6.50,   6.60,   6.80,   6.90,
      7.10,   7.20,   7.30,   7.40,   7.50,   7.60,   7.70,   7.70,   7.80,   7.80,
      7.88,   7.82,   7.54,   6.97,   6.40,   6.02,   5.41,   4.10,   2.92,   1.82,
      1.61,   0.10,  -1.02,  -1.28,  -2.69,  -3.24,  -3.64,  -4.54,  -4.71,  -5.11,
     -5.40,  -5.42,  -5.20,  -5.46,  -5.46,  -5.79,  -5.63,  -5.64,  -5.80,  -5.66,
     -5.87,  -6.01,  -6.19,  -6.64,  -6.44,  -6.47,  -6.09,  -5.76,  -4.66,  -3.74,
     -2.72,  -1.54,  -0.02,   1.24,   2.64,   3.86,   5.37,   6.14,   7.75,   9.13,
     10.46,  11.53,  13.36,  14.65,  16.01,  17.20,  18.24,  19.06,  20.25,  20.95,
     21.16,  22.25,  22.41,  23.03,  23.49,  23.62,  23.86,  24.49,  24.34,  24.08,
     24.02,  24.00,  23.87,  23.95,  23.86,  23.93,  23.73,  23.92,  23.96,  24.02,
     24.33,  24.83,  25.30,  25.70,  26.24,  26.77,  27.28,  27.78,  28.25,  28.71,
     29.15,  29.57,  29.97,  30.36,  30.72,  31.07,  31.35,  31.68,  32.18,  32.68,
     33.15,  33.59,  34.00,  34.47,  35.03,  35.73,  36.54,  37.43,  38.29,  39.20,
     40.18,  41.17,  42.23,  43.37,  44.49,  45.48,  46.46,  47.52,  48.53,  49.59,
     50.54,  51.38,  52.17,  52.96,  53.79,  54.34,  54.87,  55.32,  55.82,  56.30,
     56.86,  57.57,  58.31,  59.12,  59.98,  60.78,  61.63,  62.29,  62.97,  63.47,
     63.83,  64.09,  64.30,  64.47,  64.57,  64.69,  64.85,  65.15,  65.46,  65.78,
     66.07,  66.32,
);

// ------------------------------------------------------------------------------------
// 2011–2025: short-term fits
// ------------------------------------------------------------------------------------

/// Independent variable of a short-term fit.
#[derive(Debug, Clone, Copy)]
enum FitArgument {
    /// Fractional years since `origin`.
    Year { origin: f64 },
    /// Days since Modified Julian Day `origin`.
    Mjd { origin: f64 },
}

/// One empirically fitted polynomial, valid on `[start, end)` in fractional years.
#[derive(Debug, Clone, Copy)]
struct FitBand {
    start: f64,
    end: f64,
    argument: FitArgument,
    /// Ascending powers.
    coefficients: &'static [f64],
}

impl FitBand {
    #[inline]
    fn contains(&self, y: f64) -> bool {
        self.start <= y && y < self.end
    }

    fn evaluate(&self, jd_ut: f64, y: f64) -> f64 {
        let x = match self.argument {
            FitArgument::Year { origin } => y - origin,
            FitArgument::Mjd { origin } => Time::<JD>::new(jd_ut).to::<MJD>().value() - origin,
        };
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }
}

/// Short-term bands, most recent first. The first band containing `y` wins.
const RECENT_BANDS: [FitBand; 5] = [
    FitBand {
        start: 2022.0,
        end: 2025.0,
        argument: FitArgument::Year { origin: 2022.0 },
        coefficients: &[69.29071, -0.136_269_8, 0.061_904_76, -0.011_111_11],
    },
    FitBand {
        start: 2019.0,
        end: 2022.0,
        argument: FitArgument::Mjd { origin: 58_484.0 },
        coefficients: &[
            69.21987,
            5.907_774e-4,
            -5.257_347e-7,
            -1.452_785e-10,
            1.702_649e-13,
        ],
    },
    FitBand {
        start: 2016.0,
        end: 2019.0,
        argument: FitArgument::Year { origin: 2016.0 },
        coefficients: &[
            68.10004,
            0.574_878_8,
            -0.158_636_4,
            0.120_303,
            -0.053_939_39,
            0.008,
        ],
    },
    FitBand {
        start: 2013.5,
        end: 2016.0,
        argument: FitArgument::Mjd { origin: 56_474.0 },
        coefficients: &[67.03223, 1.436_569e-3, -1.026_563e-6, 8.056_964e-10],
    },
    FitBand {
        start: 2011.0,
        end: 2013.5,
        argument: FitArgument::Year { origin: 2011.0 },
        coefficients: &[66.31679, 0.307_642_9, -0.007_857_143],
    },
];

// ------------------------------------------------------------------------------------
// 1620–2011: annual table
// ------------------------------------------------------------------------------------

/// Bessel's interpolation formula through fourth differences.
///
/// Near either end of the table the higher differences would read past the
/// data; they are dropped, down to plain linear interpolation.
fn delta_t_table(y: f64) -> f64 {
    let n = ANNUAL_TERMS as isize;
    let x = y - TABLE_START_YEAR;
    let i = (x.floor() as isize).clamp(0, n - 2);
    let p = x - i as f64;
    let f = |k: isize| ANNUAL_DELTA_T[(i + k) as usize].value();

    let mut dt = f(0) + p * (f(1) - f(0));

    if i >= 1 && i + 2 < n {
        let second = (f(1) - 2.0 * f(0) + f(-1)) + (f(2) - 2.0 * f(1) + f(0));
        let third = f(2) - 3.0 * f(1) + 3.0 * f(0) - f(-1);
        dt += p * (p - 1.0) / 4.0 * second;
        dt += p * (p - 1.0) * (p - 0.5) / 6.0 * third;
    }

    if i >= 2 && i + 3 < n {
        let fourth = (f(2) - 4.0 * f(1) + 6.0 * f(0) - 4.0 * f(-1) + f(-2))
            + (f(3) - 4.0 * f(2) + 6.0 * f(1) - 4.0 * f(0) + f(-1));
        dt += (p + 1.0) * p * (p - 1.0) * (p - 2.0) / 48.0 * fourth;
    }

    dt
}

// ------------------------------------------------------------------------------------
// Before 1620
// ------------------------------------------------------------------------------------

/// **948 ≤ y < 1620**: Stephenson & Morrison (1984), centuries from 1800.
#[inline]
fn delta_t_medieval(y: f64) -> f64 {
    let t = (y - 1800.0) / 100.0;
    25.5 * t * t
}

/// **y < 948**: Borkowski (1988), centuries from 1625.
#[inline]
fn delta_t_ancient(y: f64) -> f64 {
    let t = (y - 1625.0) / 100.0;
    35.0 + 36.5 * t * t
}

// ------------------------------------------------------------------------------------
// Configuration and leap-second sources
// ------------------------------------------------------------------------------------

/// Tunable constants of the ΔT model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeltaTConfig {
    /// `TAI − UTC` used from 2025 on when no leap-second source answers.
    pub leap_seconds: f64,
    /// Lunar secular acceleration of the ephemeris in use, ″/cy².
    pub ndot: f64,
}

impl Default for DeltaTConfig {
    fn default() -> Self {
        Self {
            leap_seconds: DEFAULT_LEAP_SECONDS,
            ndot: DEFAULT_NDOT,
        }
    }
}

/// Anything that can report `TAI − UTC` at a UTC instant.
pub trait LeapSecondSource {
    fn leap_seconds_at(&self, utc: DateTime<Utc>) -> Result<f64, LeapSecondError>;
}

impl<F> LeapSecondSource for F
where
    F: Fn(DateTime<Utc>) -> Result<f64, LeapSecondError>,
{
    fn leap_seconds_at(&self, utc: DateTime<Utc>) -> Result<f64, LeapSecondError> {
        self(utc)
    }
}

/// A source that always answers the same count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLeapSeconds(pub f64);

impl LeapSecondSource for FixedLeapSeconds {
    fn leap_seconds_at(&self, _utc: DateTime<Utc>) -> Result<f64, LeapSecondError> {
        Ok(self.0)
    }
}

/// IERS `TAI − UTC` as published in the leap-second list bundled with
/// `hifitime`.
///
/// Only IERS integer steps count, so instants before 1972-01-01 have no
/// answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeapSecondTable;

/// UTC instant as a `hifitime` epoch.
fn utc_epoch(utc: &DateTime<Utc>) -> Epoch {
    let nanos = i128::from(utc.timestamp()) * 1_000_000_000
        + i128::from(utc.timestamp_subsec_nanos());
    Epoch::from_unix_duration(Duration::from_total_nanoseconds(nanos))
}

impl LeapSecondSource for LeapSecondTable {
    fn leap_seconds_at(&self, utc: DateTime<Utc>) -> Result<f64, LeapSecondError> {
        utc_epoch(&utc)
            .leap_seconds(true)
            .ok_or_else(|| LeapSecondError::BeforeTable("1972-01-01".to_string()))
    }
}

// ------------------------------------------------------------------------------------
// DeltaTModel
// ------------------------------------------------------------------------------------

/// The ΔT model: configuration plus an optional leap-second source.
///
/// The model holds no global state; two models with different leap-second
/// counts can be used side by side.
#[derive(Clone, Default)]
pub struct DeltaTModel {
    config: DeltaTConfig,
    leap_source: Option<Arc<dyn LeapSecondSource + Send + Sync>>,
}

impl fmt::Debug for DeltaTModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeltaTModel")
            .field("config", &self.config)
            .field("leap_source", &self.leap_source.is_some())
            .finish()
    }
}

impl DeltaTModel {
    /// Build a model from an explicit configuration.
    pub fn new(config: DeltaTConfig) -> AlmanacResult<Self> {
        validate_leap_seconds(config.leap_seconds)?;
        if !config.ndot.is_finite() {
            return Err(AlmanacError::invalid_argument(
                "ndot",
                config.ndot,
                "must be finite",
            ));
        }
        Ok(Self {
            config,
            leap_source: None,
        })
    }

    /// Attach a leap-second source consulted for `y ≥ 2025`.
    pub fn with_leap_source<L>(mut self, source: L) -> Self
    where
        L: LeapSecondSource + Send + Sync + 'static,
    {
        self.leap_source = Some(Arc::new(source));
        self
    }

    /// Override the fallback leap-second count.
    pub fn set_leap_seconds(&mut self, value: f64) -> AlmanacResult<()> {
        validate_leap_seconds(value)?;
        self.config.leap_seconds = value;
        Ok(())
    }

    /// The fallback leap-second count.
    pub fn leap_seconds(&self) -> f64 {
        self.config.leap_seconds
    }

    pub fn config(&self) -> &DeltaTConfig {
        &self.config
    }

    /// ΔT in seconds for a Julian Day on the UT axis.
    pub fn delta_t(&self, jd_ut: f64) -> Seconds {
        let y = fractional_year(jd_ut);

        let dt = if y >= 2025.0 {
            self.current_leap_seconds() + TT_MINUS_TAI
        } else if y >= 2011.0 {
            RECENT_BANDS
                .iter()
                .find(|band| band.contains(y))
                .map(|band| band.evaluate(jd_ut, y))
                // The bands tile [2011, 2025) without gaps.
                .unwrap_or_else(|| delta_t_table(y))
        } else if y >= TABLE_START_YEAR {
            delta_t_table(y)
        } else if y >= 948.0 {
            delta_t_medieval(y)
        } else {
            delta_t_ancient(y)
        };

        Seconds::new(dt + self.secular_acceleration_correction(y))
    }

    /// ΔT for a typed UT instant.
    #[inline]
    pub fn delta_t_at(&self, ut: Time<UT>) -> Seconds {
        self.delta_t(ut.value())
    }

    fn secular_acceleration_correction(&self, y: f64) -> f64 {
        if y < 1955.0 {
            let t = y - 1955.0;
            -0.000_091 * (self.config.ndot - TABLE_NDOT) * t * t
        } else {
            0.0
        }
    }

    fn current_leap_seconds(&self) -> f64 {
        let Some(source) = &self.leap_source else {
            return self.config.leap_seconds;
        };
        match source.leap_seconds_at(Utc::now()) {
            Ok(count) if count.is_finite() && count >= 0.0 => count,
            Ok(count) => {
                log::warn!(
                    "leap-second source returned {count}; using {} s",
                    self.config.leap_seconds
                );
                self.config.leap_seconds
            }
            Err(err) => {
                log::warn!(
                    "leap-second source failed ({err}); using {} s",
                    self.config.leap_seconds
                );
                self.config.leap_seconds
            }
        }
    }
}

fn validate_leap_seconds(value: f64) -> AlmanacResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AlmanacError::invalid_argument(
            "leap_seconds",
            value,
            "must be a non-negative number of seconds",
        ))
    }
}

/// ΔT in seconds for a Julian Day (UT), using the default model.
#[inline]
pub fn delta_t(jd_ut: f64) -> Seconds {
    DeltaTModel::default().delta_t(jd_ut)
}

impl Time<UT> {
    /// Returns **ΔT = TT − UT** for this instant from the default model.
    #[inline]
    pub fn delta_t(&self) -> Seconds {
        delta_t(self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::calendar_to_julian;
    use chrono::TimeZone;

    fn jd_of_year(y: f64) -> f64 {
        2_451_545.0 + (y - 2000.0) * 365.25
    }

    #[test]
    fn table_node_is_returned_exactly() {
        let dt = delta_t(jd_of_year(2000.0));
        assert!((dt - Seconds::new(63.83)).abs() < Seconds::new(1e-9));
    }

    #[test]
    fn odd_year_nodes_are_published_values() {
        for (y, expected) in [
            (1621.0, 119.0),
            (1633.0, 77.0),
            (1659.0, 38.0),
            (1801.0, 13.4),
            (1861.0, 7.82),
            (1899.0, -3.74),
            (1927.0, 24.49),
            (1987.0, 55.32),
        ] {
            assert_eq!(delta_t_table(y), expected, "ΔT({y})");
        }
    }

    #[test]
    fn table_interpolates_between_nodes() {
        let dt = delta_t(jd_of_year(2005.5)).value();
        assert!(dt > 64.69 && dt < 64.85, "ΔT(2005.5) = {dt}");
    }

    #[test]
    fn table_first_interval_degrades_to_linear() {
        // i = 0 has no f(-1): only the first difference is used.
        let dt = delta_t_table(1620.5);
        assert!((dt - (124.0 + 119.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn table_last_interval_degrades_to_linear() {
        let dt = delta_t_table(2010.5);
        assert!((dt - (66.07 + 66.32) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn bessel_matches_cubic_data() {
        // On a node set sampled from a cubic, 3rd-order Bessel is exact; the
        // 4th difference of a cubic vanishes.
        let f = |k: f64| 0.5 * k * k * k - 2.0 * k * k + k + 3.0;
        let p = 0.3;
        let (fm1, f0, f1, f2) = (f(-1.0), f(0.0), f(1.0), f(2.0));
        let second = (f1 - 2.0 * f0 + fm1) + (f2 - 2.0 * f1 + f0);
        let third = f2 - 3.0 * f1 + 3.0 * f0 - fm1;
        let value = f0
            + p * (f1 - f0)
            + p * (p - 1.0) / 4.0 * second
            + p * (p - 1.0) * (p - 0.5) / 6.0 * third;
        assert!((value - f(p)).abs() < 1e-12);
    }

    #[test]
    fn recent_bands_track_observed_values() {
        for (y, expected) in [
            (2012.0, 66.60),
            (2015.0, 67.64),
            (2018.0, 68.97),
            (2020.0, 69.36),
            (2024.0, 69.18),
        ] {
            let dt = delta_t(jd_of_year(y)).value();
            assert!((dt - expected).abs() < 0.05, "ΔT({y}) = {dt}, expected {expected}");
        }
    }

    #[test]
    fn bands_are_ordered_most_recent_first() {
        for pair in RECENT_BANDS.windows(2) {
            assert!(pair[0].start > pair[1].start);
            assert_eq!(pair[0].start, pair[1].end);
        }
    }

    #[test]
    fn bands_tile_the_short_term_span() {
        let mut y = 2011.0;
        while y < 2025.0 {
            assert!(RECENT_BANDS.iter().any(|b| b.contains(y)), "gap at {y}");
            y += 0.01;
        }
    }

    #[test]
    fn future_uses_leap_seconds_plus_tt_tai() {
        let jd = calendar_to_julian(2030, 6, 1, 0.0);
        let dt = DeltaTModel::default().delta_t(jd);
        assert!((dt - Seconds::new(69.184)).abs() < Seconds::new(1e-9));
    }

    #[test]
    fn set_leap_seconds_default_value_changes_nothing() {
        let jd = calendar_to_julian(2026, 1, 1, 0.0);
        let untouched = DeltaTModel::default();
        let mut overridden = DeltaTModel::default();
        overridden.set_leap_seconds(37.0).unwrap();
        let a = overridden.delta_t(jd);
        let b = overridden.delta_t(jd);
        assert_eq!(a, b);
        assert_eq!(a, untouched.delta_t(jd));
    }

    #[test]
    fn set_leap_seconds_rejects_negative() {
        let mut model = DeltaTModel::default();
        let err = model.set_leap_seconds(-1.0).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(model.leap_seconds(), DEFAULT_LEAP_SECONDS);
    }

    #[test]
    fn overridden_leap_seconds_shift_the_future() {
        let jd = calendar_to_julian(2030, 1, 1, 0.0);
        let mut model = DeltaTModel::default();
        model.set_leap_seconds(38.0).unwrap();
        assert!((model.delta_t(jd) - Seconds::new(70.184)).abs() < Seconds::new(1e-9));
    }

    #[test]
    fn failing_source_falls_back_to_configured_count() {
        let failing = |_: DateTime<Utc>| -> Result<f64, LeapSecondError> {
            Err(LeapSecondError::Unavailable("offline".into()))
        };
        let model = DeltaTModel::default().with_leap_source(failing);
        let jd = calendar_to_julian(2027, 3, 1, 0.0);
        assert!((model.delta_t(jd) - Seconds::new(69.184)).abs() < Seconds::new(1e-9));
    }

    #[test]
    fn source_answer_is_used_when_available() {
        let model = DeltaTModel::default().with_leap_source(FixedLeapSeconds(40.0));
        let jd = calendar_to_julian(2027, 3, 1, 0.0);
        assert!((model.delta_t(jd) - Seconds::new(72.184)).abs() < Seconds::new(1e-9));
    }

    #[test]
    fn source_is_ignored_before_2025() {
        let model = DeltaTModel::default().with_leap_source(FixedLeapSeconds(40.0));
        let jd = calendar_to_julian(2020, 1, 1, 0.0);
        assert_eq!(model.delta_t(jd), delta_t(jd));
    }

    #[test]
    fn leap_second_table_steps() {
        let table = LeapSecondTable;
        let at = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        assert_eq!(table.leap_seconds_at(at(2016, 12, 31)), Ok(36.0));
        assert_eq!(table.leap_seconds_at(at(2017, 1, 1)), Ok(37.0));
        assert_eq!(table.leap_seconds_at(at(2012, 6, 30)), Ok(34.0));
        assert_eq!(table.leap_seconds_at(at(2012, 7, 1)), Ok(35.0));
        assert_eq!(table.leap_seconds_at(at(1972, 3, 1)), Ok(10.0));
        assert_eq!(
            table.leap_seconds_at(at(1971, 12, 31)),
            Err(LeapSecondError::BeforeTable("1972-01-01".to_string()))
        );
    }

    #[test]
    fn historical_values_get_secular_correction() {
        let y = 1700.0;
        let raw = delta_t_table(y);
        let dt = delta_t(jd_of_year(y)).value();
        let expected = -0.000_091 * (DEFAULT_NDOT + 26.0) * (y - 1955.0) * (y - 1955.0);
        assert!((dt - raw - expected).abs() < 1e-9);
    }

    #[test]
    fn medieval_and_ancient_branches() {
        let y = 1200.0;
        let dt = delta_t(jd_of_year(y)).value();
        let correction = -0.000_091 * (DEFAULT_NDOT + 26.0) * (y - 1955.0) * (y - 1955.0);
        assert!((dt - (25.5 * 36.0 + correction)).abs() < 1e-6);

        let y = 500.0;
        let dt = delta_t(jd_of_year(y)).value();
        let correction = -0.000_091 * (DEFAULT_NDOT + 26.0) * (y - 1955.0) * (y - 1955.0);
        assert!((dt - (35.0 + 36.5 * 11.25 * 11.25 + correction)).abs() < 1e-6);
    }

    #[test]
    fn finite_everywhere_and_deterministic() {
        for jd in [0.0, 1_000_000.0, 2_299_160.5, 2_415_020.0, 2_460_000.0, 2_500_000.0] {
            let a = delta_t(jd);
            assert!(a.value().is_finite());
            assert_eq!(a, delta_t(jd));
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = DeltaTConfig {
            leap_seconds: f64::NAN,
            ..DeltaTConfig::default()
        };
        assert!(DeltaTModel::new(config).is_err());
    }
}
