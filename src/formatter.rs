// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Year-long almanac tables.
//!
//! [`AlmanacFormatter::build_table`] runs the solver for every day slot of
//! a year (31 × 12, nonexistent dates included) and collects a
//! [`DayCell`] per slot. [`AlmanacFormatter::render`] then streams the
//! table to a [`LineSink`] in the fixed-width layout of the national
//! almanac offices: one row per day, one `HHMM HHMM` column pair per month,
//! and a second row for days with two rises or two sets.
//!
//! ```rust
//! use horizon_almanac::{almanac, EventKind};
//!
//! let mut lines: Vec<String> = Vec::new();
//! almanac(EventKind::SUN, 2012, 38.9, -77.0, -5.0, &mut lines).unwrap();
//! assert!(lines.iter().any(|l| l.starts_with("01  07")));
//! ```

use crate::analytic::LowPrecisionEphemeris;
use crate::ephemeris::Ephemeris;
use crate::error::AlmanacResult;
use crate::event::{DayOutcome, EventKind, Location, RiseSetResult};
use crate::solver::{validate_year, RiseSetSolver};
use std::io;

/// Width of one month column: two spaces and two `HHMM` fields.
pub const CELL_WIDTH: usize = 11;

/// Width of a day row: the day number and twelve month columns.
pub const ROW_WIDTH: usize = 2 + 12 * CELL_WIDTH;

/// From 23:59 on, the half-minute rounding offset is not applied.
const LAST_MINUTE: f64 = 23.9833;

const MONTH_NAMES: [&str; 12] = [
    "Jan.", "Feb.", "Mar.", "Apr.", "May", "June", "July", "Aug.", "Sept.", "Oct.", "Nov.", "Dec.",
];

const DAYLIGHT_NOTE: &str = "Add one hour for daylight time, if and when in use.";

// ------------------------------------------------------------------------------------
// Line sinks
// ------------------------------------------------------------------------------------

/// Destination for rendered lines.
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

/// Adapts any [`io::Write`] to a [`LineSink`], one `\n` per line.
#[derive(Debug)]
pub struct WriteSink<W: io::Write>(W);

impl<W: io::Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self(writer)
    }

    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: io::Write> LineSink for WriteSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.0, "{line}")
    }
}

// ------------------------------------------------------------------------------------
// Table cells
// ------------------------------------------------------------------------------------

/// Code printed instead of times when the body never crosses the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    AlwaysAbove,
    AlwaysBelow,
    AboveTwilightLimit,
    BelowTwilightLimit,
}

impl Sentinel {
    pub const fn code(self) -> &'static str {
        match self {
            Sentinel::AlwaysAbove => "****",
            Sentinel::AlwaysBelow => "----",
            Sentinel::AboveTwilightLimit => "////",
            Sentinel::BelowTwilightLimit => "====",
        }
    }

    fn for_result(kind: EventKind, result: &RiseSetResult) -> Option<Self> {
        match (result.is_circumpolar(), result.is_always_below(), kind.is_twilight()) {
            (true, _, false) => Some(Sentinel::AlwaysAbove),
            (true, _, true) => Some(Sentinel::AboveTwilightLimit),
            (_, true, false) => Some(Sentinel::AlwaysBelow),
            (_, true, true) => Some(Sentinel::BelowTwilightLimit),
            _ => None,
        }
    }
}

/// Why a cell carries no times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankReason {
    /// The day does not exist in that month.
    NonexistentDate,
    /// The ephemeris failed for that day.
    UpstreamFailure,
}

/// A rise/set (or begin/end) pair, hours after local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EventPair {
    pub rise: Option<f64>,
    pub set: Option<f64>,
}

impl EventPair {
    pub fn is_empty(&self) -> bool {
        self.rise.is_none() && self.set.is_none()
    }

    fn render(&self) -> String {
        format!("  {} {}", field(self.rise), field(self.set))
    }
}

/// One day of one month.
#[derive(Debug, Clone, PartialEq)]
pub enum DayCell {
    /// First and second rise/set of the day.
    Events {
        primary: EventPair,
        secondary: EventPair,
    },
    Sentinel(Sentinel),
    Blank(BlankReason),
}

impl DayCell {
    pub fn from_result(kind: EventKind, result: &RiseSetResult) -> Self {
        if let Some(sentinel) = Sentinel::for_result(kind, result) {
            return DayCell::Sentinel(sentinel);
        }
        let pair = |i: usize| EventPair {
            rise: result.rises().get(i).copied(),
            set: result.sets().get(i).copied(),
        };
        DayCell::Events {
            primary: pair(0),
            secondary: pair(1),
        }
    }

    /// The cell as printed on the day's first row.
    pub fn primary_text(&self) -> String {
        match self {
            DayCell::Events { primary, .. } => primary.render(),
            DayCell::Sentinel(sentinel) => format!("  {0} {0}", sentinel.code()),
            DayCell::Blank(_) => " ".repeat(CELL_WIDTH),
        }
    }

    /// The cell as printed on the day's second row, blank when unused.
    pub fn secondary_text(&self) -> String {
        match self {
            DayCell::Events { secondary, .. } if !secondary.is_empty() => secondary.render(),
            _ => " ".repeat(CELL_WIDTH),
        }
    }

    pub fn has_secondary(&self) -> bool {
        matches!(self, DayCell::Events { secondary, .. } if !secondary.is_empty())
    }
}

/// `HHMM` for a time in hours, rounded to the nearest minute.
///
/// Times from 23:59 on are truncated so a late event never rolls over to
/// `2400`; anything past the end of the day prints as `2359`.
pub fn format_hhmm(hours: f64) -> String {
    let hours = if hours >= LAST_MINUTE {
        hours
    } else {
        hours + 30.0 / 3600.0
    };
    let minutes = ((hours * 60.0).floor() as i64).clamp(0, 24 * 60 - 1);
    format!("{:02}{:02}", minutes / 60, minutes % 60)
}

fn field(hours: Option<f64>) -> String {
    hours.map_or_else(|| "    ".to_string(), format_hhmm)
}

// ------------------------------------------------------------------------------------
// Table
// ------------------------------------------------------------------------------------

/// A year of cells for one event kind and site.
#[derive(Debug, Clone, PartialEq)]
pub struct AlmanacTable {
    kind: EventKind,
    year: i32,
    location: Location,
    /// `[month - 1][day - 1]`.
    cells: Vec<Vec<DayCell>>,
}

impl AlmanacTable {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Cell for a 1-based month and day.
    pub fn cell(&self, month: u32, day: u32) -> Option<&DayCell> {
        let month = (month as usize).checked_sub(1)?;
        let day = (day as usize).checked_sub(1)?;
        self.cells.get(month)?.get(day)
    }

    /// All cells in month-major order with their 1-based month and day.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &DayCell)> {
        self.cells.iter().zip(1..).flat_map(|(days, month)| {
            days.iter()
                .zip(1..)
                .map(move |(cell, day)| (month, day, cell))
        })
    }

    fn row(&self, day: usize, text: impl Fn(&DayCell) -> String) -> String {
        self.cells
            .iter()
            .filter_map(|days| days.get(day))
            .map(text)
            .collect()
    }
}

// ------------------------------------------------------------------------------------
// Formatter
// ------------------------------------------------------------------------------------

/// Drives a [`RiseSetSolver`] over a year and lays the result out.
#[derive(Debug, Clone)]
pub struct AlmanacFormatter<'e, E: Ephemeris + ?Sized> {
    solver: RiseSetSolver<'e, E>,
}

impl<'e, E: Ephemeris + ?Sized> AlmanacFormatter<'e, E> {
    pub fn new(solver: RiseSetSolver<'e, E>) -> Self {
        Self { solver }
    }

    pub fn solver(&self) -> &RiseSetSolver<'e, E> {
        &self.solver
    }

    /// Solve every day slot of `year`.
    ///
    /// Nonexistent dates and ephemeris failures leave a blank cell (the
    /// latter logged at `warn`); an invalid year is returned as an error
    /// before any day is solved.
    pub fn build_table(
        &self,
        kind: EventKind,
        year: i32,
        location: &Location,
    ) -> AlmanacResult<AlmanacTable> {
        validate_year(year)?;
        log::debug!(
            "building {kind} almanac for {year} at {}, {}",
            location.latitude(),
            location.longitude()
        );

        let mut cells = Vec::with_capacity(12);
        for month in 1..=12 {
            let mut days = Vec::with_capacity(31);
            for day in 1..=31 {
                days.push(self.cell(kind, day, month, year, location)?);
            }
            cells.push(days);
        }

        Ok(AlmanacTable {
            kind,
            year,
            location: *location,
            cells,
        })
    }

    fn cell(
        &self,
        kind: EventKind,
        day: u32,
        month: u32,
        year: i32,
        location: &Location,
    ) -> AlmanacResult<DayCell> {
        match self.solver.day_outcome(kind, day, month, year, location) {
            Ok(DayOutcome::Events(result)) => Ok(DayCell::from_result(kind, &result)),
            Ok(DayOutcome::Skipped(reason)) => {
                log::trace!("skipping {reason:?}");
                Ok(DayCell::Blank(BlankReason::NonexistentDate))
            }
            Err(err) if err.is_upstream() => {
                log::warn!("{kind} {year}-{month:02}-{day:02} left blank: {err}");
                Ok(DayCell::Blank(BlankReason::UpstreamFailure))
            }
            Err(err) => Err(err),
        }
    }

    /// Stream `table` to `sink`: header, day rows, legend.
    pub fn render<S: LineSink + ?Sized>(&self, table: &AlmanacTable, sink: &mut S) -> AlmanacResult<()> {
        for line in header(table) {
            sink.write_line(line.trim_end())?;
        }

        for day in 0..31 {
            let mut primary = format!("{:02}", day + 1);
            primary.push_str(&table.row(day, DayCell::primary_text));
            sink.write_line(&primary)?;

            if table.cells.iter().any(|days| days.get(day).is_some_and(DayCell::has_secondary)) {
                let mut secondary = String::from("  ");
                secondary.push_str(&table.row(day, DayCell::secondary_text));
                sink.write_line(&secondary)?;
            }
        }

        sink.write_line("")?;
        for line in legend(table.kind) {
            sink.write_line(&line)?;
        }
        log::debug!("{} almanac for {} written", table.kind, table.year);
        Ok(())
    }

    /// [`build_table`](Self::build_table) followed by [`render`](Self::render).
    pub fn write<S: LineSink + ?Sized>(
        &self,
        kind: EventKind,
        year: i32,
        location: &Location,
        sink: &mut S,
    ) -> AlmanacResult<()> {
        let table = self.build_table(kind, year, location)?;
        self.render(&table, sink)
    }
}

fn header(table: &AlmanacTable) -> Vec<String> {
    let location = &table.location;
    let title = match table.kind {
        EventKind::RiseSet(_) => format!("{} for {}", table.kind, table.year),
        EventKind::Twilight(band) => format!("Begin and End of {} for {}", band.name(), table.year),
    };
    let (first, second) = if table.kind.is_twilight() {
        ("Begin", "End")
    } else {
        ("Rise", "Set")
    };

    let mut months = String::from("    ");
    let mut columns = String::from("Day ");
    let mut units = String::from("    ");
    for name in MONTH_NAMES {
        months.push_str(&format!("{name:^9}  "));
        columns.push_str(&format!("{first:<5}{second:>4}  "));
        units.push_str(&format!("{:>4} {:>4}  ", "h m", "h m"));
    }

    vec![
        format!(
            "Location: {}, {}",
            format_longitude(location.longitude()),
            format_latitude(location.latitude())
        ),
        format!("{title:^width$}", width = ROW_WIDTH),
        format!("{:^width$}", zone_label(location.time_zone()), width = ROW_WIDTH),
        String::new(),
        months,
        columns,
        units,
    ]
}

fn legend(kind: EventKind) -> Vec<String> {
    let lines = if kind.is_twilight() {
        [
            format!("{} Sun continuously above twilight limit", code(Sentinel::AboveTwilightLimit)),
            format!("{} Sun continuously below twilight limit", code(Sentinel::BelowTwilightLimit)),
        ]
    } else {
        let body = kind.body();
        [
            format!("{} {body} continuously above horizon", code(Sentinel::AlwaysAbove)),
            format!("{} {body} continuously below horizon", code(Sentinel::AlwaysBelow)),
        ]
    };
    let mut lines = lines.to_vec();
    lines.push(DAYLIGHT_NOTE.to_string());
    lines
}

fn code(sentinel: Sentinel) -> String {
    format!("({})", sentinel.code())
}

/// Degrees and whole arcminutes: `(hemisphere, degrees, minutes)`.
fn sexagesimal(value: f64, positive: char, negative: char) -> (char, u32, u32) {
    let minutes = (value.abs() * 60.0).round() as u32;
    let hemisphere = if value < 0.0 { negative } else { positive };
    (hemisphere, minutes / 60, minutes % 60)
}

/// `W075 00`.
fn format_longitude(longitude: f64) -> String {
    let (h, d, m) = sexagesimal(longitude, 'E', 'W');
    format!("{h}{d:03} {m:02}")
}

/// `N75 00`.
fn format_latitude(latitude: f64) -> String {
    let (h, d, m) = sexagesimal(latitude, 'N', 'S');
    format!("{h}{d:02} {m:02}")
}

fn zone_label(time_zone: f64) -> String {
    if time_zone == 0.0 {
        "Zone: Greenwich".to_string()
    } else {
        let side = if time_zone < 0.0 { "West" } else { "East" };
        format!("Zone: {}h {side} of Greenwich", time_zone.abs())
    }
}

/// Render the almanac for `kind` at a site with the built-in analytic
/// ephemeris.
pub fn almanac<S: LineSink + ?Sized>(
    kind: EventKind,
    year: i32,
    latitude: f64,
    longitude: f64,
    time_zone: f64,
    sink: &mut S,
) -> AlmanacResult<()> {
    let location = Location::new(latitude, longitude, time_zone)?;
    let solver = RiseSetSolver::new(&LowPrecisionEphemeris);
    AlmanacFormatter::new(solver).write(kind, year, &location, sink)
}
