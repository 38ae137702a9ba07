//! # Observation site & horizon geometry
//!
//! This module gathers **ground-station handling** and the geometry needed to decide whether a
//! body is above the local horizon. It provides:
//!
//! - An [`ObservationSite`](crate::observers::ObservationSite) type storing the geodetic
//!   longitude/latitude, elevation, the atmospheric pressure used for refraction and the horizon
//!   depression used for sunrise/sunset.
//! - Conversion from equatorial coordinates (RA, Dec) to **apparent altitude** at an explicit
//!   instant ([`ObservationSite::altitude`](crate::observers::ObservationSite::altitude)).
//! - A low-precision solar model and sunrise/sunset search ([`sun`]).
//! - The usable [`NightWindow`](crate::observers::night_window::NightWindow) of a site for a date
//!   ([`night_window`]).
//!
//! ## Frames & conventions
//!
//! - Equatorial coordinates are **of date**; the hour angle uses the local mean sidereal time
//!   computed from [`gmst`](crate::time::gmst).
//! - No topocentric parallax is applied: for a main-belt or near-Earth object beyond 0.05 AU the
//!   shift is below 0.05°, negligible for an airmass cut.
//!
//! ```text
//! (RA, Dec) --(LST - RA)--> hour angle --(site latitude)--> altitude --(pressure)--> apparent altitude
//! ```
//!
//! ## Units
//!
//! - Longitude, latitude, horizon: **degrees** (east longitude positive).
//! - Elevation: **meters**.
//! - Pressure: **millibar**; `0` disables refraction.
//! - Every angle returned by a method is in **radians**.
//!
//! ## Design & invariants
//!
//! - Sites are immutable and carry no clock. Every query takes the instant as an argument, so a
//!   single site can be shared by concurrent evaluations.
//! - `NotNan<f64>` is used for all coordinates; the constructor rejects NaN and latitudes outside
//!   [−90°, 90°].
//!
//! ## See also
//! ------------
//! * [`sun::next_setting`] / [`sun::next_rising`] – sunset and sunrise for a site.
//! * [`NightWindow::for_night`](crate::observers::night_window::NightWindow::for_night) – the scan window.

pub mod night_window;
pub mod sun;

use std::fmt;

use hifitime::Epoch;
use ordered_float::NotNan;
use serde::Serialize;

use crate::constants::{Degree, Meter, Radian, DPI, RADEG, SUN_HORIZON_DEG};
use crate::fastrot_errors::FastRotError;
use crate::time::local_sidereal_time;

/// Ground station from which candidates are observed.
///
/// Units
/// -----
/// * `longitude`: degrees east of Greenwich.
/// * `latitude`: geodetic degrees.
/// * `elevation`: meters above the ellipsoid.
/// * `pressure`: millibar, `0` means no refraction compensation.
/// * `horizon`: degrees, altitude of the Sun's upper limb at sunrise/sunset. Only used to derive
///   the night window, never in the per-step scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObservationSite {
    pub longitude: NotNan<f64>,
    pub latitude: NotNan<f64>,
    pub elevation: NotNan<f64>,
    pub pressure: NotNan<f64>,
    pub horizon: NotNan<f64>,
    pub name: Option<String>,
}

impl ObservationSite {
    /// Create a new site from geodetic coordinates.
    ///
    /// The site starts without refraction (pressure 0) and with the standard −0°34′ horizon.
    ///
    /// Arguments
    /// -----------------
    /// * `longitude`: Geodetic longitude in **degrees** (east positive).
    /// * `latitude`: Geodetic latitude in **degrees**.
    /// * `elevation`: Height in **meters**.
    /// * `name`: Optional site name.
    ///
    /// Errors
    /// ----------
    /// * [`FastRotError::NanCoordinate`] if one of the inputs is NaN.
    /// * [`FastRotError::InvalidSite`] if the latitude is outside [−90°, 90°].
    pub fn new(
        longitude: Degree,
        latitude: Degree,
        elevation: Meter,
        name: Option<String>,
    ) -> Result<ObservationSite, FastRotError> {
        if !(-90.0..=90.0).contains(&latitude) && !latitude.is_nan() {
            return Err(FastRotError::InvalidSite(format!(
                "latitude {latitude}° is outside [-90, 90]"
            )));
        }

        Ok(ObservationSite {
            longitude: NotNan::new(longitude)?,
            latitude: NotNan::new(latitude)?,
            elevation: NotNan::new(elevation)?,
            pressure: NotNan::new(0.0)?,
            horizon: NotNan::new(SUN_HORIZON_DEG)?,
            name,
        })
    }

    /// Feder Observatory (Minnesota State University Moorhead), the historical default site.
    pub fn feder() -> Result<ObservationSite, FastRotError> {
        ObservationSite::new(
            -96.45328,
            46.86678,
            311.0,
            Some("Feder Observatory".to_string()),
        )
    }

    /// Return a copy of the site with another atmospheric pressure, in millibar.
    pub fn with_pressure(mut self, pressure: f64) -> Result<ObservationSite, FastRotError> {
        if pressure < 0.0 {
            return Err(FastRotError::InvalidSite(format!(
                "pressure must be >= 0, got {pressure}"
            )));
        }
        self.pressure = NotNan::new(pressure)?;
        Ok(self)
    }

    /// Return a copy of the site with another sunrise/sunset horizon, in degrees.
    pub fn with_horizon(mut self, horizon: Degree) -> Result<ObservationSite, FastRotError> {
        self.horizon = NotNan::new(horizon)?;
        Ok(self)
    }

    #[inline]
    pub fn longitude_rad(&self) -> Radian {
        self.longitude.into_inner() * RADEG
    }

    #[inline]
    pub fn latitude_rad(&self) -> Radian {
        self.latitude.into_inner() * RADEG
    }

    #[inline]
    pub fn horizon_rad(&self) -> Radian {
        self.horizon.into_inner() * RADEG
    }

    /// Local hour angle of a right ascension at `epoch`, in radians within (−π, π].
    pub fn hour_angle(&self, ra: Radian, epoch: Epoch) -> Radian {
        let h = (local_sidereal_time(epoch, self.longitude_rad()) - ra)
            .rem_euclid(DPI);
        if h > std::f64::consts::PI {
            h - DPI
        } else {
            h
        }
    }

    /// Geometric altitude of an equatorial direction at `epoch`, in radians.
    ///
    /// `sin(alt) = sin(φ)·sin(δ) + cos(φ)·cos(δ)·cos(H)`
    pub fn geometric_altitude(&self, ra: Radian, dec: Radian, epoch: Epoch) -> Radian {
        let phi = self.latitude_rad();
        let h = self.hour_angle(ra, epoch);
        let sin_alt = phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos();
        sin_alt.clamp(-1.0, 1.0).asin()
    }

    /// Apparent altitude of an equatorial direction at `epoch`, in radians.
    ///
    /// Identical to [`geometric_altitude`](Self::geometric_altitude) when the pressure is 0.
    pub fn altitude(&self, ra: Radian, dec: Radian, epoch: Epoch) -> Radian {
        let alt = self.geometric_altitude(ra, dec, epoch);
        alt + self.refraction(alt)
    }

    /// Atmospheric refraction for a geometric altitude, in radians.
    ///
    /// Sæmundsson (1986) formula scaled by `P / 1010 mbar` at 10 °C. Returns 0 when the
    /// pressure is 0 or the body is more than 1° below the horizon.
    pub fn refraction(&self, geometric_alt: Radian) -> Radian {
        let pressure = self.pressure.into_inner();
        if pressure <= 0.0 {
            return 0.0;
        }
        let h = geometric_alt / RADEG;
        if h < -1.0 {
            return 0.0;
        }
        let r_arcmin = 1.02 / ((h + 10.3 / (h + 5.11)) * RADEG).tan();
        let r_arcmin = r_arcmin * pressure / 1010.0;
        r_arcmin.max(0.0) / 60.0 * RADEG
    }
}

impl fmt::Display for ObservationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (lon {:.5}°, lat {:.5}°, {:.0} m)",
            self.name.as_deref().unwrap_or("unnamed site"),
            self.longitude.into_inner(),
            self.latitude.into_inner(),
            self.elevation.into_inner()
        )
    }
}

#[cfg(test)]
mod observation_site_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_site_constructor() {
        let site = ObservationSite::new(-96.45328, 46.86678, 311.0, Some("Feder".into())).unwrap();
        assert_eq!(site.longitude.into_inner(), -96.45328);
        assert_eq!(site.pressure.into_inner(), 0.0);
        assert_relative_eq!(site.horizon.into_inner(), -34.0 / 60.0);

        assert_eq!(
            ObservationSite::new(0.0, 95.0, 0.0, None),
            Err(FastRotError::InvalidSite(
                "latitude 95° is outside [-90, 90]".into()
            ))
        );
        assert!(matches!(
            ObservationSite::new(f64::NAN, 0.0, 0.0, None),
            Err(FastRotError::NanCoordinate(_))
        ));
        assert!(ObservationSite::feder().unwrap().with_pressure(-1.0).is_err());
    }

    #[test]
    fn test_feder_preset() {
        let site = ObservationSite::feder().unwrap();
        assert_eq!(site.latitude.into_inner(), 46.86678);
        assert_eq!(site.elevation.into_inner(), 311.0);
        assert_eq!(site.refraction(0.1), 0.0);
    }

    #[test]
    fn test_altitude_at_meridian() {
        let site = ObservationSite::new(0.0, 45.0, 0.0, None).unwrap();
        let epoch = Epoch::from_mjd_utc(60000.25);
        let lst = local_sidereal_time(epoch, 0.0);

        // upper transit: alt = 90° - |φ - δ|
        let alt = site.altitude(lst, 20.0 * RADEG, epoch);
        assert_relative_eq!(alt, 65.0 * RADEG, epsilon = 1e-9);

        // the pole stays at the latitude
        let alt = site.altitude(lst + 1.0, FRAC_PI_2, epoch);
        assert_relative_eq!(alt, 45.0 * RADEG, epsilon = 1e-9);

        // lower transit of a southern object is below the horizon
        let alt = site.altitude(lst + std::f64::consts::PI, -10.0 * RADEG, epoch);
        assert!(alt < 0.0);
    }

    #[test]
    fn test_refraction() {
        let site = ObservationSite::feder()
            .and_then(|s| s.with_pressure(1010.0))
            .unwrap();
        // about 34' at the horizon, under 1' at 45°
        let r0 = site.refraction(0.0) / RADEG * 60.0;
        assert!(r0 > 28.0 && r0 < 36.0, "{r0}");
        let r45 = site.refraction(45.0 * RADEG) / RADEG * 60.0;
        assert!(r45 > 0.9 && r45 < 1.1, "{r45}");
        assert_eq!(site.refraction(-5.0 * RADEG), 0.0);
    }
}
