// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Ephemeris provider seam.
//!
//! The solver never computes body positions itself. It asks an [`Ephemeris`]
//! for the geocentric apparent place of a body and for Greenwich apparent
//! sidereal time, and turns those into altitudes. Any provider that covers
//! 1900–2052 can be plugged in; [`LowPrecisionEphemeris`](crate::LowPrecisionEphemeris)
//! ships with the crate for the Sun and Moon.

use crate::error::EphemerisError;
use crate::event::{Body, Location};
use crate::instant::Time;
use crate::scales::{TT, UT};
use qtty::{Day, Seconds};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Astronomical unit in kilometres (IAU 2012).
pub const AU_KM: f64 = 149_597_870.7;

/// Standard atmosphere used by [`RefractionOption::Standard`].
pub const STANDARD_TEMPERATURE_C: f64 = 10.0;
pub const STANDARD_PRESSURE_MBAR: f64 = 1010.0;

/// Precision requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Accuracy {
    #[default]
    Full,
    /// Mean equinox of date, no nutation.
    Reduced,
}

/// Atmospheric model used for refraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RefractionOption {
    /// No refraction.
    None,
    /// 10 °C, 1010 mbar.
    #[default]
    Standard,
    /// The observer's own temperature and pressure.
    Site,
}

/// A place on the Earth's surface together with its weather.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub pressure_mbar: f64,
}

impl Observer {
    /// Sea-level observer under the standard atmosphere.
    pub fn on_surface(location: &Location) -> Self {
        Self {
            latitude: location.latitude(),
            longitude: location.longitude(),
            temperature_c: STANDARD_TEMPERATURE_C,
            pressure_mbar: STANDARD_PRESSURE_MBAR,
        }
    }

    pub fn with_weather(mut self, temperature_c: f64, pressure_mbar: f64) -> Self {
        self.temperature_c = temperature_c;
        self.pressure_mbar = pressure_mbar;
        self
    }
}

/// Geocentric apparent place of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Place {
    /// Right ascension, hours.
    pub right_ascension: f64,
    /// Declination, degrees.
    pub declination: f64,
    /// Geocentric distance, astronomical units.
    pub distance_au: f64,
}

impl Place {
    pub fn distance_km(&self) -> f64 {
        self.distance_au * AU_KM
    }
}

/// One instant expressed on both axes the provider may need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisInstant {
    pub ut: Time<UT>,
    pub tt: Time<TT>,
    pub delta_t: Seconds,
}

impl EphemerisInstant {
    /// Build from a UT Julian Date and the ΔT to apply.
    pub fn from_ut(jd_ut: f64, delta_t: Seconds) -> Self {
        Self {
            ut: Time::new(jd_ut),
            tt: Time::from_days(qtty::Days::new(jd_ut) + delta_t.to::<Day>()),
            delta_t,
        }
    }
}

/// External position provider.
pub trait Ephemeris {
    /// Geocentric apparent right ascension, declination and distance of `body`.
    fn place(
        &self,
        instant: &EphemerisInstant,
        body: Body,
        observer: &Observer,
        accuracy: Accuracy,
    ) -> Result<Place, EphemerisError>;

    /// Greenwich apparent sidereal time, hours in `[0, 24)`.
    fn sidereal_time(
        &self,
        instant: &EphemerisInstant,
        accuracy: Accuracy,
    ) -> Result<f64, EphemerisError>;

    /// Refraction in degrees for an object at the given observed zenith distance.
    fn refraction(&self, observer: &Observer, option: RefractionOption, zenith_distance: f64) -> f64 {
        bennett_refraction(observer, option, zenith_distance)
    }
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn place(
        &self,
        instant: &EphemerisInstant,
        body: Body,
        observer: &Observer,
        accuracy: Accuracy,
    ) -> Result<Place, EphemerisError> {
        (**self).place(instant, body, observer, accuracy)
    }

    fn sidereal_time(
        &self,
        instant: &EphemerisInstant,
        accuracy: Accuracy,
    ) -> Result<f64, EphemerisError> {
        (**self).sidereal_time(instant, accuracy)
    }

    fn refraction(&self, observer: &Observer, option: RefractionOption, zenith_distance: f64) -> f64 {
        (**self).refraction(observer, option, zenith_distance)
    }
}

/// Bennett (1982) refraction for an apparent altitude, scaled by pressure
/// and temperature. Zero above the zenith-distance range of 91°.
pub fn bennett_refraction(observer: &Observer, option: RefractionOption, zenith_distance: f64) -> f64 {
    let (temperature, pressure) = match option {
        RefractionOption::None => return 0.0,
        RefractionOption::Standard => (STANDARD_TEMPERATURE_C, STANDARD_PRESSURE_MBAR),
        RefractionOption::Site => (observer.temperature_c, observer.pressure_mbar),
    };
    if !(0.0..=91.0).contains(&zenith_distance) {
        return 0.0;
    }
    let h = (90.0 - zenith_distance).max(-1.0);
    let arcmin = 1.0 / (h + 7.31 / (h + 4.4)).to_radians().tan();
    let scale = (pressure / STANDARD_PRESSURE_MBAR) * (283.0 / (273.0 + temperature));
    arcmin * scale / 60.0
}
