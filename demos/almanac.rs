//! Sunrise/sunset and civil twilight tables for one site.
//!
//! ```text
//! RUST_LOG=debug cargo run --example almanac -- 38.8833 -77.0333 -5 2012
//! ```

use horizon_almanac::{
    AlmanacFormatter, EventKind, LineSink, Location, LowPrecisionEphemeris, RiseSetSolver,
    TwilightBand, WriteSink,
};
use std::error::Error;
use std::io;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<f64> = std::env::args()
        .skip(1)
        .map(|a| a.parse())
        .collect::<Result<_, _>>()?;
    let (latitude, longitude, time_zone, year) = match args.as_slice() {
        [lat, lon, tz, year] => (*lat, *lon, *tz, *year as i32),
        [] => (38.8833, -77.0333, -5.0, 2012),
        _ => return Err("usage: almanac <latitude> <longitude> <time zone> <year>".into()),
    };

    let site = Location::new(latitude, longitude, time_zone)?;
    let ephemeris = LowPrecisionEphemeris::new();
    let formatter = AlmanacFormatter::new(RiseSetSolver::new(&ephemeris));

    let mut out = WriteSink::new(io::stdout().lock());
    for kind in [EventKind::SUN, EventKind::Twilight(TwilightBand::Civil)] {
        formatter.write(kind, year, &site, &mut out)?;
        out.write_line("")?;
    }
    Ok(())
}
