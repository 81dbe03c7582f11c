// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Horizon almanac
//!
//! Rise, set and twilight times for the Sun, Moon and planets, and the
//! year-long tables built from them.
//!
//! # Core types
//!
//! - [`RiseSetSolver`]: per-day root finder fitting parabolas over twelve
//!   two-hour altitude windows.
//! - [`AlmanacFormatter`]: drives the solver over a year and renders the
//!   fixed-width table to a [`LineSink`].
//! - [`BodyAltitudeSampler`]: corrected altitude of a body at an instant.
//! - [`DeltaTModel`]: ΔT = TT − UT from antiquity to the present.
//! - [`Ephemeris`]: the position-provider seam; [`LowPrecisionEphemeris`]
//!   covers the Sun and Moon analytically.
//! - [`Time<S>`]: instant on a [`TimeScale`] ([`JD`], [`MJD`], [`TT`], [`UT`]).
//!
//! # Quick start
//!
//! ```rust
//! use horizon_almanac::{event_times, EventKind, calendar_to_julian, julian_to_calendar};
//!
//! let day = event_times(EventKind::SUN, 1, 1, 2012, 38.9, -77.0, -5.0).unwrap();
//! assert_eq!(day.rises().len(), 1);
//!
//! let jd = calendar_to_julian(2012, 1, 1, 0.0);
//! assert_eq!(julian_to_calendar(jd).unwrap().year, 2012);
//! ```
//!
//! # Logging
//!
//! Diagnostics go through the [`log`] facade. Nothing is printed unless the
//! host application installs a logger.

mod analytic;
mod calendar;
mod delta_t;
mod ephemeris;
mod error;
mod event;
mod formatter;
pub(crate) mod instant;
mod sampler;
pub(crate) mod scales;
mod solver;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use analytic::LowPrecisionEphemeris;
pub use calendar::{
    calendar_to_julian, days_in_month, fractional_year, is_valid_date, julian_to_calendar,
    CalendarDate, GREGORIAN_START_JD,
};
pub use delta_t::{
    delta_t, DeltaTConfig, DeltaTModel, FixedLeapSeconds, LeapSecondSource, LeapSecondTable,
    DEFAULT_LEAP_SECONDS, DEFAULT_NDOT,
};
pub use ephemeris::{
    bennett_refraction, Accuracy, Ephemeris, EphemerisInstant, Observer, Place, RefractionOption,
    AU_KM,
};
pub use error::{AlmanacError, AlmanacResult, EphemerisError, LeapSecondError};
pub use event::{
    Body, DayOutcome, EventKind, Location, ParseEventKindError, RiseSetResult, SkipReason,
    TwilightBand, MAX_EVENTS_PER_DAY,
};
pub use formatter::{
    almanac, format_hhmm, AlmanacFormatter, AlmanacTable, BlankReason, DayCell, EventPair,
    LineSink, Sentinel, WriteSink, CELL_WIDTH, ROW_WIDTH,
};
pub use instant::{Time, TimeScale};
pub use sampler::{altitude, BodyAltitudeSampler, BodySample, EARTH_RADIUS_KM};
pub use scales::{JD, MJD, TT, UT};
pub use solver::{event_times, RiseSetSolver, FIRST_YEAR, LAST_YEAR, POLAR_LATITUDE};

// ── Type aliases ──────────────────────────────────────────────────────────

/// Julian Date: continuous count of days since the Julian Period.
pub type JulianDate = Time<JD>;

/// Modified Julian Date: `JD − 2 400 000.5`.
pub type ModifiedJulianDate = Time<MJD>;

/// Universal Time: Earth-rotation civil time scale.
pub type UniversalTime = Time<UT>;
