// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Low-precision analytic ephemeris for the Sun and Moon.
//!
//! * Sun: geometric longitude from the mean anomaly and equation of centre,
//!   corrected for aberration and nutation (Meeus ch. 25, low accuracy).
//! * Moon: the principal periodic terms of ELP-2000/82 in longitude,
//!   latitude and distance (Meeus ch. 47, truncated).
//! * Sidereal time: IAU 1982 GMST polynomial plus the equation of the
//!   equinoxes from a four-term nutation series.
//!
//! Typical errors are ~0.01° for the Sun and a few hundredths of a degree
//! for the Moon over 1900–2052, i.e. well under a minute of time in a
//! rise or set. Planets are not modelled and report
//! [`EphemerisError::UnsupportedBody`].

use crate::ephemeris::{Accuracy, Ephemeris, EphemerisInstant, Observer, Place, AU_KM};
use crate::error::EphemerisError;
use crate::event::Body;
use crate::instant::Time;
use crate::scales::JD;

/// First JD covered: 1899-12-30 00:00.
const SPAN_START_JD: f64 = 2_415_018.5;
/// Last JD covered: 2053-01-03 00:00.
const SPAN_END_JD: f64 = 2_470_174.5;

/// Multiples of (D, M, M′, F) and coefficient.
type Term = (i8, i8, i8, i8, f64);

/// Σl in 1e-6 degrees.
#[rustfmt::skip]
const MOON_LONGITUDE: [Term; 19] = [
    (0, 0, 1, 0, 6_288_774.0), (2, 0, -1, 0, 1_274_027.0), (2, 0, 0, 0, 658_314.0),
    (0, 0, 2, 0, 213_618.0), (0, 1, 0, 0, -185_116.0), (0, 0, 0, 2, -114_332.0),
    (2, 0, -2, 0, 58_793.0), (2, -1, -1, 0, 57_066.0), (2, 0, 1, 0, 53_322.0),
    (2, -1, 0, 0, 45_758.0), (0, 1, -1, 0, -40_923.0), (1, 0, 0, 0, -34_720.0),
    (0, 1, 1, 0, -30_383.0), (2, 0, 0, -2, 15_327.0), (0, 0, 1, 2, -12_528.0),
    (0, 0, 1, -2, 10_980.0), (4, 0, -1, 0, 10_675.0), (0, 0, 3, 0, 10_034.0),
    (4, 0, -2, 0, 8_548.0),
];

/// Σr in 1e-3 km.
#[rustfmt::skip]
const MOON_DISTANCE: [Term; 18] = [
    (0, 0, 1, 0, -20_905_355.0), (2, 0, -1, 0, -3_699_111.0), (2, 0, 0, 0, -2_955_968.0),
    (0, 0, 2, 0, -569_925.0), (0, 1, 0, 0, 48_888.0), (0, 0, 0, 2, -3_149.0),
    (2, 0, -2, 0, 246_158.0), (2, -1, -1, 0, -152_138.0), (2, 0, 1, 0, -170_733.0),
    (2, -1, 0, 0, -204_586.0), (0, 1, -1, 0, -129_620.0), (1, 0, 0, 0, 108_743.0),
    (0, 1, 1, 0, 104_755.0), (2, 0, 0, -2, 10_321.0), (0, 0, 1, -2, 79_661.0),
    (4, 0, -1, 0, -34_782.0), (0, 0, 3, 0, -23_210.0), (4, 0, -2, 0, -21_636.0),
];

/// Σb in 1e-6 degrees.
#[rustfmt::skip]
const MOON_LATITUDE: [Term; 13] = [
    (0, 0, 0, 1, 5_128_122.0), (0, 0, 1, 1, 280_602.0), (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0), (2, 0, -1, 1, 55_413.0), (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0), (0, 0, 2, 1, 17_198.0), (2, 0, 1, -1, 9_266.0),
    (0, 0, 2, -1, 8_822.0), (2, -1, 0, -1, 8_216.0), (2, 0, -2, -1, 4_324.0),
    (2, 0, 1, 1, 4_200.0),
];

/// Built-in Sun/Moon provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPrecisionEphemeris;

impl LowPrecisionEphemeris {
    pub fn new() -> Self {
        Self
    }

    fn check_span(jd: f64) -> Result<(), EphemerisError> {
        if (SPAN_START_JD..=SPAN_END_JD).contains(&jd) {
            Ok(())
        } else {
            Err(EphemerisError::OutOfRange { jd })
        }
    }
}

impl Ephemeris for LowPrecisionEphemeris {
    fn place(
        &self,
        instant: &EphemerisInstant,
        body: Body,
        _observer: &Observer,
        accuracy: Accuracy,
    ) -> Result<Place, EphemerisError> {
        Self::check_span(instant.tt.value())?;
        let t = Time::<JD>::new(instant.tt.value()).julian_centuries();
        let nutation = Nutation::for_accuracy(t, accuracy);
        match body {
            Body::Sun => Ok(sun_place(t, &nutation)),
            Body::Moon => Ok(moon_place(t, &nutation)),
            other => Err(EphemerisError::UnsupportedBody(other)),
        }
    }

    fn sidereal_time(
        &self,
        instant: &EphemerisInstant,
        accuracy: Accuracy,
    ) -> Result<f64, EphemerisError> {
        let jd_ut = instant.ut.value();
        Self::check_span(jd_ut)?;
        let t = Time::<JD>::new(instant.tt.value()).julian_centuries();
        let nutation = Nutation::for_accuracy(t, accuracy);
        let gast = greenwich_mean_sidereal_degrees(jd_ut)
            + nutation.longitude * nutation.true_obliquity(t).to_radians().cos();
        Ok(gast.rem_euclid(360.0) / 15.0)
    }
}

/// Nutation in longitude and obliquity, degrees.
struct Nutation {
    longitude: f64,
    obliquity: f64,
}

impl Nutation {
    fn at(t: f64) -> Self {
        let omega = (125.044_52 - 1_934.136_261 * t).to_radians();
        let l_sun = (280.466_5 + 36_000.769_8 * t).to_radians();
        let l_moon = (218.316_5 + 481_267.881_3 * t).to_radians();
        let arcsec = 1.0 / 3_600.0;
        Self {
            longitude: (-17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin()
                - 0.23 * (2.0 * l_moon).sin()
                + 0.21 * (2.0 * omega).sin())
                * arcsec,
            obliquity: (9.20 * omega.cos() + 0.57 * (2.0 * l_sun).cos()
                + 0.10 * (2.0 * l_moon).cos()
                - 0.09 * (2.0 * omega).cos())
                * arcsec,
        }
    }

    /// [`Accuracy::Reduced`] works in the mean equinox: no nutation at all.
    fn for_accuracy(t: f64, accuracy: Accuracy) -> Self {
        match accuracy {
            Accuracy::Full => Self::at(t),
            Accuracy::Reduced => Self {
                longitude: 0.0,
                obliquity: 0.0,
            },
        }
    }

    fn true_obliquity(&self, t: f64) -> f64 {
        mean_obliquity(t) + self.obliquity
    }
}

fn mean_obliquity(t: f64) -> f64 {
    23.439_291_111 - 0.013_004_2 * t - 1.64e-7 * t * t + 5.04e-7 * t * t * t
}

fn greenwich_mean_sidereal_degrees(jd_ut: f64) -> f64 {
    let d = jd_ut - Time::<JD>::J2000.value();
    let t = d / Time::<JD>::JULIAN_CENTURY.value();
    280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t - t * t * t / 38_710_000.0
}

/// Ecliptic (λ, β) in degrees to equatorial (RA hours, Dec degrees).
fn ecliptic_to_equatorial(lambda: f64, beta: f64, epsilon: f64) -> (f64, f64) {
    let (l, b, e) = (lambda.to_radians(), beta.to_radians(), epsilon.to_radians());
    let ra = (l.sin() * e.cos() - b.tan() * e.sin()).atan2(l.cos());
    let dec = (b.sin() * e.cos() + b.cos() * e.sin() * l.sin()).asin();
    (ra.to_degrees().rem_euclid(360.0) / 15.0, dec.to_degrees())
}

fn sun_place(t: f64, nutation: &Nutation) -> Place {
    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians();
    let e = 0.016_708_634 - 0.000_042_037 * t - 0.000_000_126_7 * t * t;
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();
    let true_longitude = l0 + c;
    let anomaly = m + c.to_radians();
    let radius = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * anomaly.cos());

    let aberration = -20.4898 / 3_600.0 / radius;
    let lambda = true_longitude + aberration + nutation.longitude;
    let (ra, dec) = ecliptic_to_equatorial(lambda, 0.0, nutation.true_obliquity(t));

    Place {
        right_ascension: ra,
        declination: dec,
        distance_au: radius,
    }
}

fn moon_place(t: f64, nutation: &Nutation) -> Place {
    let l_prime = 218.316_447_7 + 481_267.881_234_21 * t;
    let d = 297.850_192_1 + 445_267.111_403_4 * t;
    let m = 357.529_109_2 + 35_999.050_290_9 * t;
    let m_prime = 134.963_396_4 + 477_198.867_505_5 * t;
    let f = 93.272_095_0 + 483_202.017_523_3 * t;

    let argument = |(kd, km, kmp, kf, _): &Term| {
        (*kd as f64 * d + *km as f64 * m + *kmp as f64 * m_prime + *kf as f64 * f).to_radians()
    };
    let sum_sin = |terms: &[Term]| terms.iter().map(|term| term.4 * argument(term).sin()).sum::<f64>();
    let sum_cos = |terms: &[Term]| terms.iter().map(|term| term.4 * argument(term).cos()).sum::<f64>();

    let lambda = l_prime + sum_sin(&MOON_LONGITUDE) * 1e-6 + nutation.longitude;
    let beta = sum_sin(&MOON_LATITUDE) * 1e-6;
    let distance_km = 385_000.56 + sum_cos(&MOON_DISTANCE) * 1e-3;

    let (ra, dec) = ecliptic_to_equatorial(lambda, beta, nutation.true_obliquity(t));
    Place {
        right_ascension: ra,
        declination: dec,
        distance_au: distance_km / AU_KM,
    }
}
