//! # Observability parameters
//!
//! The limits and cadences that drive a run, with a validating fluent builder.
//!
//! | Parameter              | Default | Meaning                                                      |
//! |------------------------|---------|--------------------------------------------------------------|
//! | `mag_limit`            | 17.0    | a candidate passes only if its faintest V is below this      |
//! | `airmass_ceiling`      | 3.0     | a sample is usable only if `0 < airmass < ceiling`           |
//! | `min_visible_minutes`  | 60.0    | a candidate passes only with at least this many usable minutes |
//! | `coarse_step_minutes`  | 1       | cadence of the visibility scan                               |
//! | `fine_step_minutes`    | 15      | cadence of the ephemeris rows kept for passing candidates    |
//! | `night_margin_minutes` | 60      | cut after sunset and before sunrise to avoid twilight        |
//!
//! ```rust
//! use fastrot::params::ObservabilityParams;
//!
//! let params = ObservabilityParams::builder()
//!     .mag_limit(16.5)
//!     .min_visible_minutes(90.0)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.airmass_ceiling, 3.0);
//! ```

use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use hifitime::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AIRMASS_CEILING, DEFAULT_COARSE_STEP_MINUTES, DEFAULT_FINE_STEP_MINUTES,
    DEFAULT_MAG_LIMIT, DEFAULT_MIN_VISIBLE_MINUTES,
};
use crate::fastrot_errors::FastRotError;
use crate::time::minutes;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityParams {
    /// Faintest acceptable peak V magnitude (exclusive).
    pub mag_limit: f64,
    /// Upper airmass bound of a usable sample (exclusive).
    pub airmass_ceiling: f64,
    /// Minimum usable time over the night, in minutes (inclusive).
    pub min_visible_minutes: f64,
    pub coarse_step_minutes: u32,
    pub fine_step_minutes: u32,
    pub night_margin_minutes: u32,
}

impl ObservabilityParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ObservabilityParamsBuilder {
        ObservabilityParamsBuilder::new()
    }

    pub fn coarse_step(&self) -> Duration {
        minutes(self.coarse_step_minutes)
    }

    pub fn fine_step(&self) -> Duration {
        minutes(self.fine_step_minutes)
    }

    pub fn night_margin(&self) -> Duration {
        minutes(self.night_margin_minutes)
    }

    /// Check the parameters; deserialized values bypass the builder, so a run calls this first.
    pub fn validate(&self) -> Result<(), FastRotError> {
        if !self.mag_limit.is_finite() {
            return Err(FastRotError::InvalidParameter(
                "mag_limit must be finite".into(),
            ));
        }
        if !(gt0(self.airmass_ceiling) && self.airmass_ceiling.is_finite()) {
            return Err(FastRotError::InvalidParameter(
                "airmass_ceiling must be > 0 and finite".into(),
            ));
        }
        if !(ge0(self.min_visible_minutes) && self.min_visible_minutes.is_finite()) {
            return Err(FastRotError::InvalidParameter(
                "min_visible_minutes must be >= 0 and finite".into(),
            ));
        }
        if self.coarse_step_minutes == 0 {
            return Err(FastRotError::InvalidStep(
                "coarse_step_minutes must be >= 1".into(),
            ));
        }
        if self.fine_step_minutes == 0 {
            return Err(FastRotError::InvalidStep(
                "fine_step_minutes must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ObservabilityParams {
    fn default() -> Self {
        ObservabilityParams {
            mag_limit: DEFAULT_MAG_LIMIT,
            airmass_ceiling: DEFAULT_AIRMASS_CEILING,
            min_visible_minutes: DEFAULT_MIN_VISIBLE_MINUTES,
            coarse_step_minutes: DEFAULT_COARSE_STEP_MINUTES,
            fine_step_minutes: DEFAULT_FINE_STEP_MINUTES,
            night_margin_minutes: 60,
        }
    }
}

/// Return true iff x > 0.0 and comparable (i.e., not NaN).
#[inline]
fn gt0(x: f64) -> bool {
    x.partial_cmp(&0.0) == Some(Greater)
}

/// Return true iff x >= 0.0 and comparable (i.e., not NaN).
#[inline]
fn ge0(x: f64) -> bool {
    matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
}

/// Builder for [`ObservabilityParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityParamsBuilder {
    params: ObservabilityParams,
}

impl ObservabilityParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: ObservabilityParams::default(),
        }
    }

    pub fn mag_limit(mut self, v: f64) -> Self {
        self.params.mag_limit = v;
        self
    }
    pub fn airmass_ceiling(mut self, v: f64) -> Self {
        self.params.airmass_ceiling = v;
        self
    }
    pub fn min_visible_minutes(mut self, v: f64) -> Self {
        self.params.min_visible_minutes = v;
        self
    }
    pub fn coarse_step_minutes(mut self, v: u32) -> Self {
        self.params.coarse_step_minutes = v;
        self
    }
    pub fn fine_step_minutes(mut self, v: u32) -> Self {
        self.params.fine_step_minutes = v;
        self
    }
    pub fn night_margin_minutes(mut self, v: u32) -> Self {
        self.params.night_margin_minutes = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `mag_limit` finite.
    /// * `0 < airmass_ceiling < ∞`.
    /// * `0 ≤ min_visible_minutes < ∞`.
    /// * `coarse_step_minutes ≥ 1`, `fine_step_minutes ≥ 1`.
    ///
    /// A zero `night_margin_minutes` is allowed and scans from sunset to sunrise.
    pub fn build(self) -> Result<ObservabilityParams, FastRotError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

impl fmt::Display for ObservabilityParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Observability parameters")?;
            writeln!(f, "  mag_limit            = {}", self.mag_limit)?;
            writeln!(f, "  airmass_ceiling      = {}", self.airmass_ceiling)?;
            writeln!(f, "  min_visible_minutes  = {}", self.min_visible_minutes)?;
            writeln!(f, "  coarse_step_minutes  = {}", self.coarse_step_minutes)?;
            writeln!(f, "  fine_step_minutes    = {}", self.fine_step_minutes)?;
            write!(f, "  night_margin_minutes = {}", self.night_margin_minutes)
        } else {
            write!(
                f,
                "V < {}, airmass < {}, >= {} min (steps {}/{} min, margin {} min)",
                self.mag_limit,
                self.airmass_ceiling,
                self.min_visible_minutes,
                self.coarse_step_minutes,
                self.fine_step_minutes,
                self.night_margin_minutes
            )
        }
    }
}
