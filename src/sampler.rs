// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Body altitude sampling.
//!
//! A [`BodyAltitudeSampler`] is bound to one event kind and one site. For an
//! hour offset from local midnight it asks the ephemeris for the body's
//! place and the sidereal time, computes the geometric altitude, and shifts
//! it so that the event threshold sits at zero:
//!
//! | Event | Corrected altitude |
//! |-------|--------------------|
//! | Moon | `h − asin(R⊕/Δ) + asin(R☾/Δ) + refraction` |
//! | Sun | `h + 50′` |
//! | Twilight | `h − threshold` |
//! | Planet | `h + refraction + asin(R/Δ)` |

use crate::delta_t::DeltaTModel;
use crate::ephemeris::{Accuracy, Ephemeris, EphemerisInstant, Observer, RefractionOption};
use crate::error::EphemerisError;
use crate::event::{Body, EventKind, Location};

/// Equatorial radius of the Earth, km.
pub const EARTH_RADIUS_KM: f64 = 6_378.14;

/// Apparent solar semidiameter plus horizontal refraction, degrees.
pub const SUN_HORIZON_DIP: f64 = 50.0 / 60.0;

/// One altitude sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySample {
    /// Geometric altitude of the body's centre, degrees.
    pub altitude: f64,
    /// Altitude relative to the event threshold, degrees.
    pub corrected_altitude: f64,
    /// Geocentric distance, km.
    pub distance_km: f64,
    /// Physical radius of the body, km.
    pub radius_km: f64,
}

/// Samples the corrected altitude of one event kind at one site.
#[derive(Debug)]
pub struct BodyAltitudeSampler<'a, E: Ephemeris + ?Sized> {
    ephemeris: &'a E,
    delta_t: &'a DeltaTModel,
    kind: EventKind,
    observer: Observer,
    accuracy: Accuracy,
    refraction: f64,
}

impl<'a, E: Ephemeris + ?Sized> BodyAltitudeSampler<'a, E> {
    /// Bind a sampler. Horizon refraction is evaluated here, once per site.
    pub fn new(
        ephemeris: &'a E,
        delta_t: &'a DeltaTModel,
        kind: EventKind,
        location: &Location,
        accuracy: Accuracy,
        refraction: RefractionOption,
    ) -> Self {
        let observer = Observer::on_surface(location);
        let refraction = ephemeris.refraction(&observer, refraction, 90.0);
        Self {
            ephemeris,
            delta_t,
            kind,
            observer,
            accuracy,
            refraction,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Horizon refraction applied to the Moon and planets, degrees.
    pub fn horizon_refraction(&self) -> f64 {
        self.refraction
    }

    /// Sample `hour` hours after `midnight_jd` (a UT Julian Date).
    pub fn sample(&self, midnight_jd: f64, hour: f64) -> Result<BodySample, EphemerisError> {
        let jd_ut = midnight_jd + hour / 24.0;
        let instant = EphemerisInstant::from_ut(jd_ut, self.delta_t.delta_t(jd_ut));
        let body = self.kind.body();

        let place = self
            .ephemeris
            .place(&instant, body, &self.observer, self.accuracy)?;
        let sidereal = self.ephemeris.sidereal_time(&instant, self.accuracy)?;

        let hour_angle = sidereal * 15.0 + self.observer.longitude - place.right_ascension * 15.0;
        let altitude = altitude(self.observer.latitude, place.declination, hour_angle);
        let distance_km = place.distance_km();
        let radius_km = body.radius_km();

        Ok(BodySample {
            altitude,
            corrected_altitude: altitude + self.correction(distance_km, radius_km),
            distance_km,
            radius_km,
        })
    }

    /// Shorthand for the corrected altitude alone.
    pub fn corrected_altitude(&self, midnight_jd: f64, hour: f64) -> Result<f64, EphemerisError> {
        self.sample(midnight_jd, hour).map(|s| s.corrected_altitude)
    }

    fn correction(&self, distance_km: f64, radius_km: f64) -> f64 {
        match self.kind {
            EventKind::Twilight(band) => -band.threshold_degrees(),
            EventKind::RiseSet(Body::Sun) => SUN_HORIZON_DIP,
            EventKind::RiseSet(Body::Moon) => {
                -angular_size(EARTH_RADIUS_KM, distance_km)
                    + angular_size(radius_km, distance_km)
                    + self.refraction
            }
            EventKind::RiseSet(_) => self.refraction + angular_size(radius_km, distance_km),
        }
    }
}

/// `asin(r / d)` in degrees.
fn angular_size(radius_km: f64, distance_km: f64) -> f64 {
    (radius_km / distance_km).clamp(-1.0, 1.0).asin().to_degrees()
}

/// Altitude in degrees from latitude, declination and local hour angle.
pub fn altitude(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let (phi, delta, h) = (
        latitude.to_radians(),
        declination.to_radians(),
        hour_angle.to_radians(),
    );
    let sin_alt = phi.sin() * delta.sin() + phi.cos() * delta.cos() * h.cos();
    sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{EphemerisInstant, Place};
    use crate::event::TwilightBand;

    /// Body fixed at RA 0h, Dec 0°, 1 AU; sidereal time 0h.
    struct Frozen;

    impl Ephemeris for Frozen {
        fn place(
            &self,
            _instant: &EphemerisInstant,
            _body: Body,
            _observer: &Observer,
            _accuracy: Accuracy,
        ) -> Result<Place, EphemerisError> {
            Ok(Place {
                right_ascension: 0.0,
                declination: 0.0,
                distance_au: 1.0,
            })
        }

        fn sidereal_time(
            &self,
            _instant: &EphemerisInstant,
            _accuracy: Accuracy,
        ) -> Result<f64, EphemerisError> {
            Ok(0.0)
        }
    }

    fn sampler(kind: EventKind) -> BodyAltitudeSampler<'static, Frozen> {
        static MODEL: std::sync::OnceLock<DeltaTModel> = std::sync::OnceLock::new();
        let model = MODEL.get_or_init(DeltaTModel::default);
        let site = Location::new(0.0, 0.0, 0.0).unwrap();
        BodyAltitudeSampler::new(
            &Frozen,
            model,
            kind,
            &site,
            Accuracy::Full,
            RefractionOption::Standard,
        )
    }

    #[test]
    fn altitude_formula() {
        assert!((altitude(0.0, 0.0, 0.0) - 90.0).abs() < 1e-9);
        assert!(altitude(0.0, 0.0, 90.0).abs() < 1e-9);
        assert!((altitude(45.0, 0.0, 0.0) - 45.0).abs() < 1e-9);
        assert!((altitude(90.0, 23.0, 137.0) - 23.0).abs() < 1e-9);
    }

    #[test]
    fn sun_is_lifted_by_fifty_arcmin() {
        let s = sampler(EventKind::SUN).sample(2_455_927.5, 0.0).unwrap();
        assert!((s.altitude - 90.0).abs() < 1e-9);
        assert!((s.corrected_altitude - s.altitude - 50.0 / 60.0).abs() < 1e-12);
        assert_eq!(s.radius_km, Body::Sun.radius_km());
    }

    #[test]
    fn twilight_subtracts_threshold() {
        let s = sampler(EventKind::Twilight(TwilightBand::Astronomical))
            .sample(2_455_927.5, 0.0)
            .unwrap();
        assert!((s.corrected_altitude - s.altitude - 18.0).abs() < 1e-12);
    }

    #[test]
    fn moon_correction_combines_parallax_radius_and_refraction() {
        let sampler = sampler(EventKind::MOON);
        let s = sampler.sample(2_455_927.5, 0.0).unwrap();
        let expected = -angular_size(EARTH_RADIUS_KM, s.distance_km)
            + angular_size(Body::Moon.radius_km(), s.distance_km)
            + sampler.horizon_refraction();
        assert!((s.corrected_altitude - s.altitude - expected).abs() < 1e-12);
        assert!(sampler.horizon_refraction() > 0.5);
    }

    #[test]
    fn planet_adds_refraction_and_radius() {
        let sampler = sampler(EventKind::RiseSet(Body::Jupiter));
        let s = sampler.sample(2_455_927.5, 0.0).unwrap();
        let expected =
            sampler.horizon_refraction() + angular_size(Body::Jupiter.radius_km(), s.distance_km);
        assert!((s.corrected_altitude - s.altitude - expected).abs() < 1e-12);
    }

    #[test]
    fn frozen_sky_ignores_hour_offset() {
        let sampler = sampler(EventKind::SUN);
        let a = sampler.corrected_altitude(2_455_927.5, 0.0).unwrap();
        let b = sampler.corrected_altitude(2_455_927.5, 13.0).unwrap();
        assert_eq!(a, b);
    }
}
