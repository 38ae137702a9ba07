//! # Constants and type definitions for fastrot
//!
//! This module centralizes the **conversion factors**, the **default observing limits** and the
//! **common type definitions** used throughout the crate.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, days ↔ minutes)
//! - Default limits used to decide whether a fast rotator is worth observing
//! - Legacy sentinel values kept for bit-compatible historical reports
//! - Catalog identifiers for minor planets

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Hours → radians
pub const RADH: f64 = DPI / 24.0;

/// Number of minutes in a day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

// -------------------------------------------------------------------------------------------------
// Observing limits
// -------------------------------------------------------------------------------------------------

/// Faintest peak V magnitude accepted for a candidate.
pub const DEFAULT_MAG_LIMIT: f64 = 17.0;

/// A sample is only usable below this airmass.
pub const DEFAULT_AIRMASS_CEILING: f64 = 3.0;

/// Minimum number of minutes a candidate must spend below the airmass ceiling.
pub const DEFAULT_MIN_VISIBLE_MINUTES: f64 = 60.0;

/// Cadence of the visibility scan, in minutes.
pub const DEFAULT_COARSE_STEP_MINUTES: u32 = 1;

/// Cadence of the ephemeris rows produced for passing candidates, in minutes.
pub const DEFAULT_FINE_STEP_MINUTES: u32 = 15;

/// Weight applied to the magnitude margin (`mag_limit - peak_magnitude`) in the score.
pub const MAGNITUDE_WEIGHT: f64 = 2.5;

/// Standard sunrise/sunset horizon: −0°34′, the mean refraction at the horizon.
pub const SUN_HORIZON_DEG: Degree = -34.0 / 60.0;

// -------------------------------------------------------------------------------------------------
// Legacy sentinels
// -------------------------------------------------------------------------------------------------

/// Peak magnitude written for a candidate that never had an accepted sample.
pub const LEGACY_UNSET_MAGNITUDE: f64 = 0.0;

/// Minimum airmass written for a candidate that never had an accepted sample.
pub const LEGACY_UNSET_AIRMASS: f64 = 20.0;

/// Score written for candidates that did not pass the thresholds.
pub const LEGACY_FAIL_SCORE: f64 = 100.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Duration in hours
pub type Hour = f64;
/// Modified Julian Date (days)
pub type MJD = f64;

// -------------------------------------------------------------------------------------------------
// Identifiers
// -------------------------------------------------------------------------------------------------

/// Identifier of a minor planet in the source catalog.
///
/// This can be:
/// - A numbered asteroid or a catalog record number (e.g. `Int(2001)`)
/// - A provisional designation (e.g. `"2015 AB"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(untagged)]
pub enum ObjectNumber {
    /// Integer record number
    Int(u32),
    /// String-based designation
    String(String),
}

impl std::fmt::Display for ObjectNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectNumber::Int(n) => write!(f, "{n}"),
            ObjectNumber::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<u32> for ObjectNumber {
    fn from(n: u32) -> Self {
        ObjectNumber::Int(n)
    }
}

impl From<String> for ObjectNumber {
    fn from(s: String) -> Self {
        ObjectNumber::String(s)
    }
}

impl From<&str> for ObjectNumber {
    fn from(s: &str) -> Self {
        ObjectNumber::String(s.to_string())
    }
}

impl std::str::FromStr for ObjectNumber {
    type Err = std::num::ParseIntError;

    /// Pure digits parse as `Int`, anything containing another character is kept as `String`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<u32>() {
            Ok(n) => Ok(ObjectNumber::Int(n)),
            Err(e) => {
                if s.chars().any(|c| !c.is_ascii_digit()) {
                    Ok(ObjectNumber::String(s.to_string()))
                } else {
                    Err(e)
                }
            }
        }
    }
}
