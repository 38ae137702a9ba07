use hifitime::{Duration, Epoch, Unit};

use crate::constants::{DPI, MINUTES_PER_DAY, T2000};

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982/2000 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: f64) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    // GMST at 0h UT1, seconds → radians
    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;

    // Earth rotation during the elapsed fraction of the day
    let h = tjm.fract() * DPI;
    (gmst0 + h * RAP).rem_euclid(DPI)
}

/// Local mean sidereal time, in radians within [0, 2π).
///
/// UTC stands in for UT1: |UT1 − UTC| < 0.9 s, i.e. below 4″ of hour angle,
/// which is far under what an airmass cut needs.
///
/// Arguments
/// ---------
/// * `epoch`: the instant
/// * `longitude`: east longitude of the site, in radians
pub fn local_sidereal_time(epoch: Epoch, longitude: f64) -> f64 {
    (gmst(epoch.to_mjd_utc_days()) + longitude).rem_euclid(DPI)
}

/// A whole number of minutes as a hifitime [`Duration`].
pub fn minutes(n: u32) -> Duration {
    Unit::Minute * i64::from(n)
}

/// Length of a duration expressed in (fractional) minutes.
pub fn to_minutes(d: Duration) -> f64 {
    d.to_unit(Unit::Day) * MINUTES_PER_DAY
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        assert_relative_eq!(gmst(tut), 4.851925725092499, epsilon = 1e-12);

        assert_relative_eq!(gmst(T2000), 4.894961212789145, epsilon = 1e-12);
    }

    #[test]
    fn test_local_sidereal_time_wraps() {
        let epoch = Epoch::from_mjd_utc(T2000);
        let lst = local_sidereal_time(epoch, -DPI / 4.0);
        assert!((0.0..DPI).contains(&lst));
        assert_relative_eq!(
            lst,
            (4.894961212789145 - DPI / 4.0).rem_euclid(DPI),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_minutes() {
        assert_eq!(minutes(15), Unit::Second * 900);
        assert_relative_eq!(to_minutes(minutes(90)), 90.0, epsilon = 1e-9);
    }
}
