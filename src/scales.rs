// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-scale marker types.
//!
//! | Marker | Description | Relation to JD(TT) |
//! |--------|-------------|--------------------|
//! | [`JD`] | Julian Date | identity |
//! | [`MJD`] | Modified Julian Date | `JD − 2 400 000.5` |
//! | [`TT`] | Terrestrial Time | identity |
//! | [`UT`] | Universal Time | `JD(TT) − ΔT` |

use super::instant::TimeScale;
use qtty::Days;

/// Julian Date: the identity scale.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JD;

impl TimeScale for JD {
    const LABEL: &'static str = "Julian Day:";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt
    }
}

/// Modified Julian Date: JD minus 2 400 000.5.
///
/// Several of the short-term ΔT fits are polynomials in MJD.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct MJD;

/// `JD = MJD + MJD_EPOCH`.
pub(crate) const MJD_EPOCH: Days = Days::new(2_400_000.5);

impl TimeScale for MJD {
    const LABEL: &'static str = "MJD";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value + MJD_EPOCH
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt - MJD_EPOCH
    }
}

/// Terrestrial Time, the argument of the ephemeris provider.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct TT;

impl TimeScale for TT {
    const LABEL: &'static str = "TT";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt
    }
}

/// Universal Time: civil time tied to Earth's rotation.
///
/// Conversion to TT adds ΔT from the default [`DeltaTModel`](crate::DeltaTModel)
/// (no leap-second source, 37 s fallback). Callers that configure their own
/// model should add its ΔT explicitly, as the altitude sampler does.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UT;

impl TimeScale for UT {
    const LABEL: &'static str = "UT";

    #[inline]
    fn to_jd_tt(ut_value: Days) -> Days {
        let dt = super::delta_t::delta_t(ut_value.value());
        ut_value + dt.to::<qtty::Day>()
    }

    #[inline]
    fn from_jd_tt(jd_tt: Days) -> Days {
        // ΔT varies by well under a second per day; three passes converge.
        let mut ut = jd_tt;
        for _ in 0..3 {
            let dt = super::delta_t::delta_t(ut.value()).to::<qtty::Day>();
            ut = jd_tt - dt;
        }
        ut
    }
}
