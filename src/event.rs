// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Event vocabulary: bodies, event kinds, observing site and per-day results.

use crate::error::{AlmanacError, AlmanacResult};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bodies whose rise and set the almanac can tabulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Equatorial radius in kilometres.
    pub const fn radius_km(self) -> f64 {
        match self {
            Body::Sun => 696_000.0,
            Body::Moon => 1_737.4,
            Body::Mercury => 2_439.7,
            Body::Venus => 6_051.8,
            Body::Mars => 3_396.2,
            Body::Jupiter => 71_492.0,
            Body::Saturn => 60_268.0,
            Body::Uranus => 25_559.0,
            Body::Neptune => 24_764.0,
            Body::Pluto => 1_188.3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }

    pub const fn is_planet(self) -> bool {
        !matches!(self, Body::Sun | Body::Moon)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Twilight depths, each a fixed Sun altitude below the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TwilightBand {
    Civil,
    Nautical,
    AmateurAstronomical,
    Astronomical,
}

impl TwilightBand {
    /// Threshold altitude of the Sun's centre, degrees.
    pub const fn threshold_degrees(self) -> f64 {
        match self {
            TwilightBand::Civil => -6.0,
            TwilightBand::Nautical => -12.0,
            TwilightBand::AmateurAstronomical => -15.0,
            TwilightBand::Astronomical => -18.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TwilightBand::Civil => "Civil Twilight",
            TwilightBand::Nautical => "Nautical Twilight",
            TwilightBand::AmateurAstronomical => "Amateur Astronomical Twilight",
            TwilightBand::Astronomical => "Astronomical Twilight",
        }
    }
}

/// What crossing is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventKind {
    /// Upper limb of the body on the apparent horizon.
    RiseSet(Body),
    /// Sun centre at the band's depression below the horizon.
    Twilight(TwilightBand),
}

impl EventKind {
    pub const SUN: EventKind = EventKind::RiseSet(Body::Sun);
    pub const MOON: EventKind = EventKind::RiseSet(Body::Moon);

    /// The body whose altitude is sampled.
    pub const fn body(self) -> Body {
        match self {
            EventKind::RiseSet(body) => body,
            EventKind::Twilight(_) => Body::Sun,
        }
    }

    pub const fn is_twilight(self) -> bool {
        matches!(self, EventKind::Twilight(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::RiseSet(body) => write!(f, "Rise and Set for the {body}"),
            EventKind::Twilight(band) => f.write_str(band.name()),
        }
    }
}

/// Unknown event name passed to [`EventKind::from_str`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown event kind `{0}`")]
pub struct ParseEventKindError(String);

impl FromStr for EventKind {
    type Err = ParseEventKindError;

    /// Accepts a body name (`"moon"`) or a twilight band (`"civil"`,
    /// `"nautical"`, `"amateur"`, `"astronomical"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let band = match key.trim_end_matches(" twilight") {
            "civil" => Some(TwilightBand::Civil),
            "nautical" => Some(TwilightBand::Nautical),
            "amateur" | "amateur astronomical" => Some(TwilightBand::AmateurAstronomical),
            "astronomical" => Some(TwilightBand::Astronomical),
            _ => None,
        };
        if let Some(band) = band {
            return Ok(EventKind::Twilight(band));
        }
        Body::ALL
            .iter()
            .find(|body| body.name().eq_ignore_ascii_case(&key))
            .map(|&body| EventKind::RiseSet(body))
            .ok_or_else(|| ParseEventKindError(s.to_string()))
    }
}

/// Observing site: geodetic latitude, east longitude, and civil time zone.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "LocationFields"))]
pub struct Location {
    latitude: f64,
    longitude: f64,
    time_zone: f64,
}

impl Location {
    /// Validate and build a site.
    ///
    /// `latitude ∈ [-90, 90]`, `longitude ∈ [-180, 180]` (east positive),
    /// `time_zone ∈ [-12, 14]` hours east of Greenwich.
    pub fn new(latitude: f64, longitude: f64, time_zone: f64) -> AlmanacResult<Self> {
        check_range("latitude", latitude, -90.0, 90.0, "must lie in [-90, 90] degrees")?;
        check_range("longitude", longitude, -180.0, 180.0, "must lie in [-180, 180] degrees")?;
        check_range("time_zone", time_zone, -12.0, 14.0, "must lie in [-12, 14] hours")?;
        Ok(Self {
            latitude,
            longitude,
            time_zone,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn time_zone(&self) -> f64 {
        self.time_zone
    }
}

pub(crate) fn check_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
    reason: &'static str,
) -> AlmanacResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AlmanacError::invalid_argument(name, value, reason))
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct LocationFields {
    latitude: f64,
    longitude: f64,
    time_zone: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<LocationFields> for Location {
    type Error = AlmanacError;

    fn try_from(fields: LocationFields) -> Result<Self, Self::Error> {
        Location::new(fields.latitude, fields.longitude, fields.time_zone)
    }
}

/// Rise and set instants for one local day.
///
/// Times are hours after local midnight, in time order. Each list holds at
/// most two entries; a third crossing of the same direction sets
/// [`has_excess_events`](Self::has_excess_events).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RiseSetResult {
    above_threshold_at_midnight: bool,
    rises: Vec<f64>,
    sets: Vec<f64>,
    excess_events: bool,
}

/// Events of one direction kept per day.
pub const MAX_EVENTS_PER_DAY: usize = 2;

impl RiseSetResult {
    pub(crate) fn new(above_threshold_at_midnight: bool) -> Self {
        Self {
            above_threshold_at_midnight,
            ..Self::default()
        }
    }

    pub(crate) fn record_rise(&mut self, hour: f64) {
        if self.rises.len() < MAX_EVENTS_PER_DAY {
            self.rises.push(hour);
        } else {
            log::warn!("third rise of the day at {hour:.4} h not tabulated");
            self.excess_events = true;
        }
    }

    pub(crate) fn record_set(&mut self, hour: f64) {
        if self.sets.len() < MAX_EVENTS_PER_DAY {
            self.sets.push(hour);
        } else {
            log::warn!("third set of the day at {hour:.4} h not tabulated");
            self.excess_events = true;
        }
    }

    pub fn above_threshold_at_midnight(&self) -> bool {
        self.above_threshold_at_midnight
    }

    pub fn rises(&self) -> &[f64] {
        &self.rises
    }

    pub fn sets(&self) -> &[f64] {
        &self.sets
    }

    pub fn has_excess_events(&self) -> bool {
        self.excess_events
    }

    fn has_no_events(&self) -> bool {
        self.rises.is_empty() && self.sets.is_empty()
    }

    /// Above the threshold all day.
    pub fn is_circumpolar(&self) -> bool {
        self.has_no_events() && self.above_threshold_at_midnight
    }

    /// Below the threshold all day.
    pub fn is_always_below(&self) -> bool {
        self.has_no_events() && !self.above_threshold_at_midnight
    }
}

/// Why a day produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The day number does not exist in that month (e.g. April 31st).
    NonexistentDate { year: i32, month: u32, day: u32 },
}

/// Outcome of one almanac cell: either a result or an expected skip.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Events(RiseSetResult),
    Skipped(SkipReason),
}
