// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Rise, set and twilight instants for one local day.
//!
//! The day is cut into twelve two-hour windows centred on 1h, 3h, …, 23h local
//! time. In each window the corrected altitude is sampled at the start,
//! centre and end, a parabola is fitted through the three samples, and its
//! roots inside the window are the threshold crossings. The sign of the
//! window-start sample tells rises from sets.
//!
//! # Example
//!
//! ```rust
//! use horizon_almanac::{EventKind, Location, LowPrecisionEphemeris, RiseSetSolver};
//!
//! let ephemeris = LowPrecisionEphemeris::new();
//! let solver = RiseSetSolver::new(&ephemeris);
//! let site = Location::new(0.0, 0.0, 0.0).unwrap();
//!
//! let day = solver.event_times(EventKind::SUN, 21, 6, 2012, &site).unwrap();
//! assert_eq!(day.rises().len(), 1);
//! assert_eq!(day.sets().len(), 1);
//! ```

use crate::analytic::LowPrecisionEphemeris;
use crate::calendar::{calendar_to_julian, is_valid_date};
use crate::delta_t::DeltaTModel;
use crate::ephemeris::{Accuracy, Ephemeris, RefractionOption};
use crate::error::{AlmanacError, AlmanacResult};
use crate::event::{DayOutcome, EventKind, Location, RiseSetResult, SkipReason};
use crate::sampler::BodyAltitudeSampler;

/// Years covered by the ephemeris providers the solver is meant for.
pub const FIRST_YEAR: i32 = 1900;
pub const LAST_YEAR: i32 = 2052;

/// Above this |latitude| a day may hold two rises or two sets, so every
/// window is scanned.
pub const POLAR_LATITUDE: f64 = 60.0;

/// Width of one sampling window, hours.
const WINDOW_HOURS: f64 = 2.0;

/// Per-day root finder bound to an ephemeris provider.
#[derive(Debug, Clone)]
pub struct RiseSetSolver<'e, E: Ephemeris + ?Sized> {
    ephemeris: &'e E,
    delta_t: DeltaTModel,
    accuracy: Accuracy,
    refraction: RefractionOption,
}

impl<'e, E: Ephemeris + ?Sized> RiseSetSolver<'e, E> {
    /// Solver with the default ΔT model, full accuracy and standard refraction.
    pub fn new(ephemeris: &'e E) -> Self {
        Self {
            ephemeris,
            delta_t: DeltaTModel::default(),
            accuracy: Accuracy::Full,
            refraction: RefractionOption::Standard,
        }
    }

    pub fn with_delta_t(mut self, model: DeltaTModel) -> Self {
        self.delta_t = model;
        self
    }

    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_refraction(mut self, refraction: RefractionOption) -> Self {
        self.refraction = refraction;
        self
    }

    pub fn delta_t_model(&self) -> &DeltaTModel {
        &self.delta_t
    }

    pub fn ephemeris(&self) -> &'e E {
        self.ephemeris
    }

    /// Rise and set instants for `day`/`month`/`year` at `location`.
    ///
    /// Times are hours after local midnight. Fails with
    /// [`AlmanacError::InvalidArgument`] for a year outside 1900–2052,
    /// [`AlmanacError::InvalidDate`] for a day that does not exist, and
    /// [`AlmanacError::UpstreamFailure`] when the ephemeris fails.
    pub fn event_times(
        &self,
        kind: EventKind,
        day: u32,
        month: u32,
        year: i32,
        location: &Location,
    ) -> AlmanacResult<RiseSetResult> {
        validate_year(year)?;
        if !is_valid_date(year, month, day) {
            return Err(AlmanacError::InvalidDate { year, month, day });
        }

        let midnight = calendar_to_julian(year, month, day, 0.0) - location.time_zone() / 24.0;
        let sampler = BodyAltitudeSampler::new(
            self.ephemeris,
            &self.delta_t,
            kind,
            location,
            self.accuracy,
            self.refraction,
        );

        let mut start = sampler.corrected_altitude(midnight, 0.0)?;
        let mut result = RiseSetResult::new(start > 0.0);

        for centre in window_centres() {
            let middle = sampler.corrected_altitude(midnight, centre)?;
            let end = sampler.corrected_altitude(midnight, centre + 1.0)?;
            let crossings = WindowFit::new(start, middle, end).crossings();
            log::trace!("{kind} {year}-{month:02}-{day:02} window {centre}h: {crossings:?}");

            let rising_first = start < 0.0;
            match crossings {
                Crossings::None => {}
                Crossings::One(x) if rising_first => result.record_rise(centre + x),
                Crossings::One(x) => result.record_set(centre + x),
                Crossings::Two(x1, x2) if rising_first => {
                    result.record_rise(centre + x1);
                    result.record_set(centre + x2);
                }
                Crossings::Two(x1, x2) => {
                    result.record_set(centre + x1);
                    result.record_rise(centre + x2);
                }
            }
            start = end;

            let both_seen = !result.rises().is_empty() && !result.sets().is_empty();
            if both_seen && location.latitude().abs() < POLAR_LATITUDE {
                break;
            }
        }

        Ok(result)
    }

    /// Like [`event_times`](Self::event_times), but a nonexistent date is an
    /// expected skip instead of an error.
    pub fn day_outcome(
        &self,
        kind: EventKind,
        day: u32,
        month: u32,
        year: i32,
        location: &Location,
    ) -> AlmanacResult<DayOutcome> {
        match self.event_times(kind, day, month, year, location) {
            Ok(result) => Ok(DayOutcome::Events(result)),
            Err(AlmanacError::InvalidDate { year, month, day }) => {
                Ok(DayOutcome::Skipped(SkipReason::NonexistentDate { year, month, day }))
            }
            Err(err) => Err(err),
        }
    }
}

/// 1h, 3h, …, 23h.
fn window_centres() -> impl Iterator<Item = f64> {
    (0..12).map(|i| WINDOW_HOURS * i as f64 + 0.5 * WINDOW_HOURS)
}

pub(crate) fn validate_year(year: i32) -> AlmanacResult<()> {
    if (FIRST_YEAR..=LAST_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(AlmanacError::invalid_argument(
            "year",
            year as f64,
            "must lie in [1900, 2052]",
        ))
    }
}

/// Threshold crossings inside one window, in window coordinates `x ∈ [-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Crossings {
    None,
    One(f64),
    Two(f64, f64),
}

/// `y = a·x² + b·x + c` through the samples at `x = -1, 0, 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowFit {
    a: f64,
    b: f64,
    c: f64,
}

impl WindowFit {
    fn new(start: f64, middle: f64, end: f64) -> Self {
        Self {
            a: 0.5 * (end + start) - middle,
            b: 0.5 * (end - start),
            c: middle,
        }
    }

    fn crossings(&self) -> Crossings {
        let Self { a, b, c } = *self;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant.is_nan() || discriminant <= 0.0 {
            return Crossings::None;
        }

        // Roots xsym ± √disc / 2|a|, in the form that stays exact as a → 0
        // (a straight line yields one finite root and one infinite one).
        let q = -0.5 * (b + b.signum() * discriminant.sqrt());
        let (r1, r2) = (q / a, c / q);
        let (mut lower, upper) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };

        let count = [lower, upper].iter().filter(|x| x.abs() <= 1.0).count();
        // A lower root before the window was already counted by the previous one.
        if lower < -1.0 {
            lower = upper;
        }

        match count {
            0 => Crossings::None,
            1 => Crossings::One(lower),
            _ => Crossings::Two(lower, upper),
        }
    }
}

/// [`RiseSetSolver::event_times`] against the built-in analytic ephemeris.
///
/// Only the Sun, the Moon and twilight are covered; planets report
/// [`AlmanacError::UpstreamFailure`].
pub fn event_times(
    kind: EventKind,
    day: u32,
    month: u32,
    year: i32,
    latitude: f64,
    longitude: f64,
    time_zone: f64,
) -> AlmanacResult<RiseSetResult> {
    let location = Location::new(latitude, longitude, time_zone)?;
    RiseSetSolver::new(&LowPrecisionEphemeris).event_times(kind, day, month, year, &location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{EphemerisInstant, Observer, Place};
    use crate::error::EphemerisError;
    use crate::event::{Body, TwilightBand};

    /// A star at RA 0h that transits Greenwich at noon UT; its hour angle
    /// grows by exactly 15° per hour of UT. With `turns = 2` the sky spins
    /// twice a day and every event happens twice.
    struct FixedStar {
        declination: f64,
        turns: f64,
    }

    impl FixedStar {
        fn daily(declination: f64) -> Self {
            Self {
                declination,
                turns: 1.0,
            }
        }
    }

    impl Ephemeris for FixedStar {
        fn place(
            &self,
            _instant: &EphemerisInstant,
            _body: Body,
            _observer: &Observer,
            _accuracy: Accuracy,
        ) -> Result<Place, EphemerisError> {
            Ok(Place {
                right_ascension: 0.0,
                declination: self.declination,
                distance_au: 1.0,
            })
        }

        fn sidereal_time(
            &self,
            instant: &EphemerisInstant,
            _accuracy: Accuracy,
        ) -> Result<f64, EphemerisError> {
            Ok((instant.ut.value() * self.turns).rem_euclid(1.0) * 24.0)
        }
    }

    struct Broken;

    impl Ephemeris for Broken {
        fn place(
            &self,
            _instant: &EphemerisInstant,
            _body: Body,
            _observer: &Observer,
            _accuracy: Accuracy,
        ) -> Result<Place, EphemerisError> {
            Err(EphemerisError::Provider("disk offline".into()))
        }

        fn sidereal_time(
            &self,
            _instant: &EphemerisInstant,
            _accuracy: Accuracy,
        ) -> Result<f64, EphemerisError> {
            Ok(0.0)
        }
    }

    fn civil() -> EventKind {
        EventKind::Twilight(TwilightBand::Civil)
    }

    fn equator() -> Location {
        Location::new(0.0, 0.0, 0.0).unwrap()
    }

    #[test]
    fn fit_through_samples() {
        let fit = WindowFit::new(2.0, 0.5, 1.0);
        assert_eq!((fit.a, fit.b, fit.c), (1.0, -0.5, 0.5));
        assert_eq!(fit.crossings(), Crossings::None);

        let fit = WindowFit::new(-1.0, 0.0, 1.0);
        assert_eq!(fit.crossings(), Crossings::One(0.0));

        let fit = WindowFit::new(3.0, -1.0, 3.0);
        match fit.crossings() {
            Crossings::Two(x1, x2) => {
                assert!((x1 + 0.5).abs() < 1e-12);
                assert!((x2 - 0.5).abs() < 1e-12);
            }
            other => panic!("expected two roots, got {other:?}"),
        }
    }

    #[test]
    fn lower_root_before_window_is_replaced() {
        // Roots at x = -1.5 and x = 0.5: only the upper one is reported.
        // y = (x + 1.5)(x - 0.5) = x² + x - 0.75
        let fit = WindowFit::new(-0.75, -0.75, 1.25);
        assert_eq!(fit.crossings(), Crossings::One(0.5));
    }

    #[test]
    fn tangent_contact_is_not_a_crossing() {
        let fit = WindowFit::new(1.0, 0.0, 1.0);
        assert_eq!(fit.crossings(), Crossings::None);
    }

    #[test]
    fn fixed_star_on_the_equator() {
        let star = FixedStar::daily(0.0);
        let solver = RiseSetSolver::new(&star).with_refraction(RefractionOption::None);
        let day = solver
            .event_times(civil(), 20, 3, 2012, &equator())
            .unwrap();

        assert!(!day.above_threshold_at_midnight());
        assert_eq!(day.rises().len(), 1);
        assert_eq!(day.sets().len(), 1);
        // cos H = sin(-6°) ⇒ H = 96° = 6.4 h from transit at 12h.
        assert!((day.rises()[0] - 5.6).abs() < 0.01, "rise {}", day.rises()[0]);
        assert!((day.sets()[0] - 18.4).abs() < 0.01, "set {}", day.sets()[0]);
        assert!(!day.has_excess_events());
    }

    #[test]
    fn scan_stops_after_first_rise_and_set_below_polar_latitude() {
        let star = FixedStar {
            declination: 0.0,
            turns: 2.0,
        };
        let solver = RiseSetSolver::new(&star);

        let temperate = Location::new(59.9, 0.0, 0.0).unwrap();
        let day = solver.event_times(EventKind::SUN, 1, 1, 2012, &temperate).unwrap();
        assert_eq!(day.sets().len(), 1);
        assert_eq!(day.rises().len(), 1);
        assert!((day.sets()[0] - 3.06).abs() < 0.1, "set {}", day.sets()[0]);
        assert!((day.rises()[0] - 8.94).abs() < 0.1, "rise {}", day.rises()[0]);

        let polar = Location::new(POLAR_LATITUDE, 0.0, 0.0).unwrap();
        let day = solver.event_times(EventKind::SUN, 1, 1, 2012, &polar).unwrap();
        assert_eq!(day.sets().len(), 2);
        assert_eq!(day.rises().len(), 2);
        assert!((day.sets()[1] - 15.06).abs() < 0.1, "set {}", day.sets()[1]);
        assert!((day.rises()[1] - 20.94).abs() < 0.1, "rise {}", day.rises()[1]);
        assert!(!day.has_excess_events());
    }

    #[test]
    fn time_zone_shifts_local_hours() {
        let star = FixedStar::daily(0.0);
        let solver = RiseSetSolver::new(&star);
        let site = Location::new(0.0, 0.0, 2.0).unwrap();
        let day = solver.event_times(civil(), 20, 3, 2012, &site).unwrap();
        assert!((day.rises()[0] - 7.6).abs() < 0.01);
        assert!((day.sets()[0] - 20.4).abs() < 0.01);
    }

    #[test]
    fn circumpolar_and_never_rising_stars() {
        let north = FixedStar::daily(80.0);
        let site = Location::new(70.0, 0.0, 0.0).unwrap();
        let day = RiseSetSolver::new(&north)
            .event_times(EventKind::SUN, 1, 6, 2020, &site)
            .unwrap();
        assert!(day.is_circumpolar());

        let south = FixedStar::daily(-80.0);
        let day = RiseSetSolver::new(&south)
            .event_times(EventKind::SUN, 1, 6, 2020, &site)
            .unwrap();
        assert!(day.is_always_below());
    }

    #[test]
    fn nonexistent_day_is_invalid_date() {
        let star = FixedStar::daily(0.0);
        let solver = RiseSetSolver::new(&star);
        let err = solver
            .event_times(EventKind::SUN, 31, 4, 2023, &equator())
            .unwrap_err();
        assert!(err.is_invalid_date());

        let outcome = solver
            .day_outcome(EventKind::SUN, 31, 4, 2023, &equator())
            .unwrap();
        assert_eq!(
            outcome,
            DayOutcome::Skipped(SkipReason::NonexistentDate {
                year: 2023,
                month: 4,
                day: 31
            })
        );
    }

    #[test]
    fn year_outside_coverage_is_invalid_argument() {
        let star = FixedStar::daily(0.0);
        let solver = RiseSetSolver::new(&star);
        for year in [1899, 2053] {
            let err = solver
                .event_times(EventKind::SUN, 1, 1, year, &equator())
                .unwrap_err();
            assert!(err.is_invalid_argument(), "{year}: {err}");
        }
        // Year is checked before the date.
        let err = solver
            .day_outcome(EventKind::SUN, 31, 4, 1800, &equator())
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn provider_failure_is_upstream() {
        let err = RiseSetSolver::new(&Broken)
            .event_times(EventKind::MOON, 1, 1, 2012, &equator())
            .unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("disk offline"));
    }

    #[test]
    fn free_function_validates_location() {
        let err = event_times(EventKind::SUN, 1, 1, 2012, 91.0, 0.0, 0.0).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
