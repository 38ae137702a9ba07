//! Low-precision solar ephemeris and sunrise/sunset search.
//!
//! The Sun's position follows the *Astronomical Almanac* low-precision formulae (about 0.01°
//! between 1950 and 2050), which is ample to place a night window: one hundredth of a degree
//! moves a sunset by a few seconds at mid latitudes.
//!
//! Rising and setting are defined for the **upper limb** of the Sun touching the site horizon
//! ([`ObservationSite::horizon`]). With the default −0°34′ horizon this reproduces the usual
//! almanac sunrise/sunset.

use hifitime::{Epoch, Unit};
use nalgebra::{Rotation3, Vector3};
use roots::{find_root_brent, SimpleConvergency};

use crate::constants::{Radian, DPI, MINUTES_PER_DAY, RADEG};
use crate::fastrot_errors::FastRotError;
use crate::observers::ObservationSite;

/// Mean angular semi-diameter of the Sun, in degrees.
pub const SUN_SEMIDIAMETER_DEG: f64 = 16.0 / 60.0;

/// JD of J2000.0
const J2000_JD: f64 = 2451545.0;

/// Bracketing cadence of the crossing search, in days.
const SCAN_STEP_DAYS: f64 = 10.0 / MINUTES_PER_DAY;

/// A crossing must happen within this many days, otherwise the Sun is circumpolar.
const SCAN_SPAN_DAYS: f64 = 2.0;

/// Apparent equatorial coordinates of the Sun, `(ra, dec)` in radians.
///
/// The ecliptic longitude is rotated about the equinox direction by the obliquity
/// of the ecliptic to get the equatorial unit vector.
pub fn sun_equatorial(epoch: Epoch) -> (Radian, Radian) {
    let n = epoch.to_jde_utc_days() - J2000_JD;

    // mean longitude and mean anomaly
    let l = (280.460 + 0.9856474 * n).rem_euclid(360.0) * RADEG;
    let g = (357.528 + 0.9856003 * n).rem_euclid(360.0) * RADEG;

    let lambda = l + (1.915 * g.sin() + 0.020 * (2.0 * g).sin()) * RADEG;
    let obliquity = (23.439 - 0.0000004 * n) * RADEG;

    let ecliptic = Vector3::new(lambda.cos(), lambda.sin(), 0.0);
    let equatorial = Rotation3::from_axis_angle(&Vector3::x_axis(), obliquity) * ecliptic;

    let ra = equatorial.y.atan2(equatorial.x).rem_euclid(DPI);
    let dec = equatorial.z.clamp(-1.0, 1.0).asin();
    (ra, dec)
}

/// Apparent altitude of the Sun's center seen from `site`, in radians.
pub fn sun_altitude(site: &ObservationSite, epoch: Epoch) -> Radian {
    let (ra, dec) = sun_equatorial(epoch);
    site.altitude(ra, dec, epoch)
}

/// First sunset strictly after `after`.
///
/// Errors
/// ----------
/// * [`FastRotError::SunEventNotFound`] if the Sun does not set within two days
///   (polar day or polar night).
/// * [`FastRotError::RootFindingError`] if the Brent refinement does not converge.
pub fn next_setting(site: &ObservationSite, after: Epoch) -> Result<Epoch, FastRotError> {
    next_crossing(site, after, false)
}

/// First sunrise strictly after `after`. See [`next_setting`] for the errors.
pub fn next_rising(site: &ObservationSite, after: Epoch) -> Result<Epoch, FastRotError> {
    next_crossing(site, after, true)
}

fn next_crossing(
    site: &ObservationSite,
    after: Epoch,
    rising: bool,
) -> Result<Epoch, FastRotError> {
    let target = site.horizon_rad() - SUN_SEMIDIAMETER_DEG * RADEG;
    let f = |t: f64| sun_altitude(site, after + Unit::Day * t) - target;

    let mut t0 = 0.0;
    let mut f0 = f(t0);
    while t0 < SCAN_SPAN_DAYS {
        let t1 = t0 + SCAN_STEP_DAYS;
        let f1 = f(t1);

        let crossed = if rising {
            f0 < 0.0 && f1 >= 0.0
        } else {
            f0 > 0.0 && f1 <= 0.0
        };

        if crossed {
            let mut convergency = SimpleConvergency {
                eps: 1e-9,
                max_iter: 100,
            };
            let t = find_root_brent(t0, t1, &f, &mut convergency)?;
            return Ok(after + Unit::Day * t);
        }

        t0 = t1;
        f0 = f1;
    }

    Err(FastRotError::SunEventNotFound {
        horizon_deg: site.horizon.into_inner(),
        after,
    })
}
