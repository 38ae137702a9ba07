//! # Night visibility evaluator
//!
//! Walks one [`NightWindow`] for one candidate at a fixed cadence and accumulates how long, how
//! faint and how high the candidate is while it is usable.
//!
//! ## Algorithm
//! -----------------
//! For every instant `t` of `[start, end)` spaced by `step`:
//!
//! 1. ask the [`SkyPositionProvider`] for the body's apparent altitude and magnitude at `t`,
//! 2. convert the altitude to an [`airmass`],
//! 3. keep the sample iff `altitude > 0` and `0 < airmass < ceiling`; a kept sample adds `step`
//!    minutes to `minutes_visible`, raises `peak_magnitude` (faintest V seen) and lowers
//!    `min_airmass`.
//!
//! Samples below the horizon are dropped before the range check: the polynomial turns over
//! there and can return a value inside the range (about 0.69 at −1.6°). This is not an error.
//!
//! ## Error Semantics
//! -----------------
//! * A provider failure at any instant aborts the evaluation of that candidate and is returned
//!   as is: visibility is never under-counted silently.
//! * A zero step or a non-positive/non-finite ceiling is a configuration error, reported before
//!   the first query.
//!
//! ## Unset values
//! -----------------
//! A candidate without any usable sample has `minutes_visible == 0` and no peak magnitude nor
//! minimum airmass (`None`). Historical reports wrote 0 and 20 instead; the
//! [`VisibilityStats::legacy_peak_magnitude`] and [`VisibilityStats::legacy_min_airmass`]
//! accessors give those values back.

use hifitime::Epoch;
use serde::Serialize;

use crate::airmass::{airmass, is_accepted};
use crate::catalog::CandidateBody;
use crate::constants::{Radian, LEGACY_UNSET_AIRMASS, LEGACY_UNSET_MAGNITUDE};
use crate::ephemeris::{SkyPosition, SkyPositionProvider};
use crate::fastrot_errors::FastRotError;
use crate::observers::night_window::NightWindow;
use crate::observers::ObservationSite;
use crate::time::minutes;

/// What one night looks like for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VisibilityStats {
    /// Minutes spent below the airmass ceiling.
    pub minutes_visible: u32,
    /// Faintest magnitude among the usable samples.
    pub peak_magnitude: Option<f64>,
    /// Lowest airmass among the usable samples.
    pub min_airmass: Option<f64>,
}

impl VisibilityStats {
    /// Account for one usable sample representing `step_minutes` minutes.
    pub fn record(&mut self, step_minutes: u32, magnitude: f64, airmass: f64) {
        self.minutes_visible += step_minutes;
        self.peak_magnitude = Some(match self.peak_magnitude {
            Some(peak) => peak.max(magnitude),
            None => magnitude,
        });
        self.min_airmass = Some(match self.min_airmass {
            Some(min) => min.min(airmass),
            None => airmass,
        });
    }

    /// `true` once at least one sample was usable.
    pub fn is_visible(&self) -> bool {
        self.minutes_visible > 0
    }

    pub fn hours_visible(&self) -> f64 {
        f64::from(self.minutes_visible) / 60.0
    }

    /// Peak magnitude, or 0 when unset.
    pub fn legacy_peak_magnitude(&self) -> f64 {
        self.peak_magnitude.unwrap_or(LEGACY_UNSET_MAGNITUDE)
    }

    /// Minimum airmass, or 20 when unset.
    pub fn legacy_min_airmass(&self) -> f64 {
        self.min_airmass.unwrap_or(LEGACY_UNSET_AIRMASS)
    }
}

/// One usable sample of the fine ephemeris kept for passing candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EphemerisLine {
    #[serde(serialize_with = "crate::serialize_epoch")]
    pub epoch: Epoch,
    pub ra: Radian,
    pub dec: Radian,
    pub magnitude: f64,
    pub airmass: f64,
}

/// Accumulate the visibility of `body` over `window`.
///
/// Arguments
/// -----------------
/// * `body`: the candidate.
/// * `window`: the night, scanned as `[start, end)`.
/// * `site`: the ground station.
/// * `provider`: answers position/brightness queries at explicit instants.
/// * `step_minutes`: scan cadence, also the weight of one usable sample.
/// * `airmass_ceiling`: exclusive upper bound of a usable airmass.
///
/// Errors
/// ----------
/// * [`FastRotError::InvalidStep`] / [`FastRotError::InvalidParameter`] on a bad cadence or ceiling.
/// * Whatever the provider returns when it cannot answer.
pub fn evaluate<P>(
    body: &CandidateBody,
    window: &NightWindow,
    site: &ObservationSite,
    provider: &P,
    step_minutes: u32,
    airmass_ceiling: f64,
) -> Result<VisibilityStats, FastRotError>
where
    P: SkyPositionProvider + ?Sized,
{
    let mut stats = VisibilityStats::default();
    scan(
        body,
        window,
        site,
        provider,
        step_minutes,
        airmass_ceiling,
        |_, pos, secz| stats.record(step_minutes, pos.magnitude, secz),
    )?;
    Ok(stats)
}

/// Usable samples of `body` over `window` at `step_minutes` cadence, in time order.
///
/// Same acceptance rule and errors as [`evaluate`].
pub fn ephemeris_lines<P>(
    body: &CandidateBody,
    window: &NightWindow,
    site: &ObservationSite,
    provider: &P,
    step_minutes: u32,
    airmass_ceiling: f64,
) -> Result<Vec<EphemerisLine>, FastRotError>
where
    P: SkyPositionProvider + ?Sized,
{
    let mut lines = Vec::new();
    scan(
        body,
        window,
        site,
        provider,
        step_minutes,
        airmass_ceiling,
        |epoch, pos, secz| {
            lines.push(EphemerisLine {
                epoch,
                ra: pos.ra,
                dec: pos.dec,
                magnitude: pos.magnitude,
                airmass: secz,
            })
        },
    )?;
    Ok(lines)
}

pub(crate) fn check_scan(step_minutes: u32, airmass_ceiling: f64) -> Result<(), FastRotError> {
    if step_minutes == 0 {
        return Err(FastRotError::InvalidStep(
            "scan step must be at least one minute".into(),
        ));
    }
    if !(airmass_ceiling > 0.0 && airmass_ceiling.is_finite()) {
        return Err(FastRotError::InvalidParameter(format!(
            "airmass ceiling must be > 0 and finite, got {airmass_ceiling}"
        )));
    }
    Ok(())
}

fn scan<P, F>(
    body: &CandidateBody,
    window: &NightWindow,
    site: &ObservationSite,
    provider: &P,
    step_minutes: u32,
    airmass_ceiling: f64,
    mut on_accept: F,
) -> Result<(), FastRotError>
where
    P: SkyPositionProvider + ?Sized,
    F: FnMut(Epoch, &SkyPosition, f64),
{
    check_scan(step_minutes, airmass_ceiling)?;

    for epoch in window.epochs(minutes(step_minutes)) {
        let pos = provider.sky_position(body, site, epoch)?;
        if pos.altitude <= 0.0 {
            continue;
        }
        let secz = airmass(pos.altitude);
        if is_accepted(secz, airmass_ceiling) {
            on_accept(epoch, &pos, secz);
        }
    }
    Ok(())
}
