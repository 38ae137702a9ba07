#![allow(dead_code)]

use approx::assert_relative_eq;
use fastrot::ephemeris::tabulated::{EphemerisRow, TabulatedEphemeris};
use fastrot::visibility::VisibilityStats;
use hifitime::Epoch;

/// MJD of 2016-08-03 00:00 UTC.
pub const NIGHT_MJD: f64 = 57603.0;

pub fn night_start() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2016, 8, 3)
}

/// Hourly table over `[from_mjd, to_mjd]` at a fixed declination, RA drifting 0.5°/h.
pub fn hourly_table(dec_deg: f64, mag: f64, from_mjd: f64, to_mjd: f64) -> TabulatedEphemeris {
    let hours = ((to_mjd - from_mjd) * 24.0).round() as usize;
    let rows = (0..=hours)
        .map(|h| EphemerisRow {
            mjd_utc: from_mjd + h as f64 / 24.0,
            ra_deg: (300.0 + 0.5 * h as f64) % 360.0,
            dec_deg,
            mag,
        })
        .collect();
    TabulatedEphemeris::new(rows).unwrap()
}

/// A body near the celestial pole: always about 47° high at Feder.
pub fn circumpolar(mag: f64) -> TabulatedEphemeris {
    hourly_table(89.0, mag, NIGHT_MJD, NIGHT_MJD + 1.0)
}

/// A body that never clears the horizon at Feder.
pub fn southern(mag: f64) -> TabulatedEphemeris {
    hourly_table(-80.0, mag, NIGHT_MJD, NIGHT_MJD + 1.0)
}

pub fn assert_stats_close(actual: &VisibilityStats, expected: &VisibilityStats, epsilon: f64) {
    assert_eq!(actual.minutes_visible, expected.minutes_visible);
    match (actual.peak_magnitude, expected.peak_magnitude) {
        (Some(a), Some(e)) => assert_relative_eq!(a, e, epsilon = epsilon),
        (a, e) => assert_eq!(a, e),
    }
    match (actual.min_airmass, expected.min_airmass) {
        (Some(a), Some(e)) => assert_relative_eq!(a, e, epsilon = epsilon),
        (a, e) => assert_eq!(a, e),
    }
}
