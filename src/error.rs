// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error taxonomy.
//!
//! | Variant | Meaning | Almanac loop |
//! |---------|---------|--------------|
//! | [`AlmanacError::InvalidArgument`] | caller input out of range | propagated |
//! | [`AlmanacError::InvalidDate`] | impossible day/month | cell left blank |
//! | [`AlmanacError::UpstreamFailure`] | ephemeris provider failed | logged, cell left blank |
//! | [`AlmanacError::Output`] | line sink refused a line | propagated |
//!
//! Leap-second source failures never surface here: the ΔT model logs them
//! and falls back to its configured count.

use crate::event::Body;
use thiserror::Error;

/// Result alias used by every public entry point.
pub type AlmanacResult<T> = Result<T, AlmanacError>;

/// Errors reported by the calendar, solver and formatter layers.
#[derive(Error, Debug)]
pub enum AlmanacError {
    /// An input is outside its documented range.
    #[error("invalid argument `{name}` = {value}: {reason}")]
    InvalidArgument {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The day/month/year triple is not a calendar date.
    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The ephemeris provider failed; the provider error is kept as source.
    #[error("ephemeris provider failure: {0}")]
    UpstreamFailure(#[from] EphemerisError),

    /// The output sink could not accept a line.
    #[error("almanac output failed: {0}")]
    Output(#[from] std::io::Error),
}

impl AlmanacError {
    pub(crate) fn invalid_argument(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidArgument {
            name,
            value,
            reason,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    pub fn is_invalid_date(&self) -> bool {
        matches!(self, Self::InvalidDate { .. })
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamFailure(_))
    }
}

/// Failure reported by an [`Ephemeris`](crate::Ephemeris) implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("body {0} is not covered by this ephemeris")]
    UnsupportedBody(Body),

    #[error("instant JD {jd} is outside the ephemeris span")]
    OutOfRange { jd: f64 },

    #[error("{0}")]
    Provider(String),
}

/// Failure reported by a [`LeapSecondSource`](crate::LeapSecondSource).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LeapSecondError {
    /// The instant precedes the first entry of the leap-second table.
    #[error("no leap-second data before {0}")]
    BeforeTable(String),

    #[error("leap-second source unavailable: {0}")]
    Unavailable(String),
}
