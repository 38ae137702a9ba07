//! # Airmass model
//!
//! Converts an apparent altitude into an airmass with the Hardie (1962) polynomial, a third
//! order correction to the plain secant of the zenith distance.
//!
//! R.H. Hardie, 1962, *Photoelectric Reductions*, chapter 8 of *Astronomical Techniques*,
//! W.A. Hiltner (Ed.), Stars and Stellar Systems II, University of Chicago Press, pp. 178-208.
//!
//! The function is only meaningful for altitudes strictly above the horizon. Below it the
//! polynomial still returns a number (negative, or infinite at exactly 0), and callers are
//! expected to reject it with a `0 < airmass < ceiling` range check.
//!
//! The cubic peaks near 2.85° of altitude and is not monotonic below it. Below the horizon it
//! can even come back inside the range (about 0.69 at −1.6°), so the evaluator drops
//! non-positive altitudes before the range check. Above the horizon, a narrow band around
//! +1.7° still passes a ceiling of 3; it is kept, as in historical reports.

use crate::constants::Radian;

/// Airmass for an apparent altitude, in radians.
///
/// The constants and the evaluation order are kept as published so that values match
/// historical reports bit for bit.
#[inline]
pub fn airmass(altitude: Radian) -> f64 {
    let sm1 = 1.0 / altitude.sin() - 1.0;
    1.0 + sm1 * (0.9981833 - sm1 * (0.002875 + 0.0008083 * sm1))
}

/// `true` when the airmass is a usable sample, i.e. `0 < airmass < ceiling`.
///
/// NaN and infinities fail both comparisons and are rejected.
#[inline]
pub fn is_accepted(airmass: f64, ceiling: f64) -> bool {
    airmass < ceiling && airmass > 0.0
}
