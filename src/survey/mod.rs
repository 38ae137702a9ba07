//! # Night survey
//!
//! Runs the whole pipeline for one night: evaluate every candidate over the night window at
//! the coarse cadence, score it, keep the fine-step ephemeris of the passing ones, rank.
//!
//! ## Failure policy
//! -----------------
//! * Invalid parameters or catalog filter abort the run before any query.
//! * A provider failure only affects its own candidate, which is recorded with
//!   [`Outcome::Error`](crate::scoring::Outcome::Error) and ranked after every evaluated
//!   candidate. The rest of the run goes on.
//! * A provider returning a configuration error (bad site, bad step) aborts the run: it would
//!   fail the same way for every candidate.
//!
//! ## Execution
//! -----------------
//! Candidates are independent. They are evaluated in order on the calling thread, or on the
//! rayon pool with the `parallel` feature; the ranking is one sort once all of them are done,
//! so both paths return the same list. The `progress` feature adds a progress bar.
//!
//! ```rust
//! use fastrot::ephemeris::SkyPosition;
//! use fastrot::observers::{night_window::NightWindow, ObservationSite};
//! use fastrot::params::ObservabilityParams;
//! use fastrot::survey::survey;
//! use fastrot::{CandidateBody, FastRotError};
//! use hifitime::{Epoch, Unit};
//!
//! let site = ObservationSite::feder().unwrap();
//! let start = Epoch::from_gregorian_utc_hms(2016, 8, 3, 3, 0, 0);
//! let window = NightWindow::new(start, start + Unit::Hour * 5).unwrap();
//!
//! // every body sits 60° high, V = 15
//! let sky = |_: &CandidateBody, _: &ObservationSite, _: Epoch| -> Result<SkyPosition, FastRotError> {
//!     Ok(SkyPosition { altitude: 60f64.to_radians(), ra: 0.0, dec: 0.0, magnitude: 15.0 })
//! };
//!
//! let candidates = vec![CandidateBody::new(2001, "Einstein", 3.4)];
//! let report = survey(&candidates, &window, &site, &sky, &ObservabilityParams::default()).unwrap();
//! assert_eq!(report.passing().count(), 1);
//! assert_eq!(report.candidates[0].ephemeris.len(), 20);
//! ```

mod progress;

use std::time::Instant;

use hifitime::Epoch;
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::catalog::{CandidateBody, CatalogFilter, CatalogSource};
use crate::ephemeris::SkyPositionProvider;
use crate::fastrot_errors::FastRotError;
use crate::observers::night_window::NightWindow;
use crate::observers::ObservationSite;
use crate::params::ObservabilityParams;
use crate::scoring::{rank, LegacyRow, Outcome, ScoredCandidate};
use crate::time::to_minutes;
use crate::visibility::{ephemeris_lines, evaluate};

use self::progress::ScanProgress;

/// Ranked result of one night.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NightReport {
    pub window: NightWindow,
    pub params: ObservabilityParams,
    /// Every candidate, ranked. Nothing is filtered out.
    pub candidates: Vec<ScoredCandidate>,
}

impl NightReport {
    /// Passing candidates, best first.
    pub fn passing(&self) -> impl Iterator<Item = &ScoredCandidate> {
        self.candidates.iter().filter(|c| c.outcome.is_pass())
    }

    /// Candidates whose evaluation failed.
    pub fn errored(&self) -> impl Iterator<Item = &ScoredCandidate> {
        self.candidates
            .iter()
            .filter(|c| matches!(c.outcome, Outcome::Error(_)))
    }

    /// The ranking with the historical sentinel values.
    pub fn legacy_rows(&self) -> Vec<LegacyRow> {
        self.candidates.iter().map(|c| c.legacy_row()).collect()
    }
}

/// Evaluate, score and attach the fine ephemeris of one candidate.
///
/// A provider error becomes [`Outcome::Error`]. A failure of the fine pass of a passing
/// candidate is treated the same way, since its report would be incomplete; the coarse
/// statistics are kept so the report still shows what the candidate reached.
///
/// Errors
/// ----------
/// * Configuration errors ([`FastRotError::is_configuration_error`]) are not specific to one
///   candidate and are returned, so that the run stops.
pub fn assess_candidate<P>(
    body: &CandidateBody,
    window: &NightWindow,
    site: &ObservationSite,
    provider: &P,
    params: &ObservabilityParams,
) -> Result<ScoredCandidate, FastRotError>
where
    P: SkyPositionProvider + ?Sized,
{
    let evaluation = match evaluate(
        body,
        window,
        site,
        provider,
        params.coarse_step_minutes,
        params.airmass_ceiling,
    ) {
        Err(err) if err.is_configuration_error() => return Err(err),
        evaluation => evaluation,
    };

    let mut scored = ScoredCandidate::assess(
        body.clone(),
        evaluation.as_ref().copied(),
        params.mag_limit,
        params.min_visible_minutes,
    );

    if scored.outcome.is_pass() {
        match ephemeris_lines(
            body,
            window,
            site,
            provider,
            params.fine_step_minutes,
            params.airmass_ceiling,
        ) {
            Ok(lines) => scored.ephemeris = lines,
            Err(err) if err.is_configuration_error() => return Err(err),
            Err(err) => {
                scored.outcome = Outcome::Error(format!("fine ephemeris: {err}"));
                scored.score = None;
            }
        }
    }

    match &scored.outcome {
        Outcome::Error(reason) => log::warn!("{body}: evaluation failed: {reason}"),
        outcome => log::debug!(
            "{body}: {outcome:?}, {} min visible, score {:?}",
            scored.stats.map(|s| s.minutes_visible).unwrap_or_default(),
            scored.score
        ),
    }
    Ok(scored)
}

/// Rank `candidates` for the night `window` at `site`.
///
/// Errors
/// ----------
/// * [`FastRotError::InvalidStep`] / [`FastRotError::InvalidParameter`] when `params` does not
///   validate, or any configuration error raised while scanning. Other per-candidate failures
///   are not errors of the run.
pub fn survey<P>(
    candidates: &[CandidateBody],
    window: &NightWindow,
    site: &ObservationSite,
    provider: &P,
    params: &ObservabilityParams,
) -> Result<NightReport, FastRotError>
where
    P: SkyPositionProvider + ?Sized,
{
    params.validate()?;

    log::info!(
        "survey: {} candidates from {} over {window} ({:.0} min, {params})",
        candidates.len(),
        site,
        to_minutes(window.duration())
    );

    let progress = ScanProgress::new(candidates.len());
    let assess = |body: &CandidateBody| -> Result<ScoredCandidate, FastRotError> {
        let started = Instant::now();
        let scored = assess_candidate(body, window, site, provider, params)?;
        progress.done(&scored, started.elapsed());
        Ok(scored)
    };

    #[cfg(feature = "parallel")]
    let scored: Result<Vec<ScoredCandidate>, FastRotError> =
        candidates.par_iter().map(assess).collect();
    #[cfg(not(feature = "parallel"))]
    let scored: Result<Vec<ScoredCandidate>, FastRotError> =
        candidates.iter().map(assess).collect();

    progress.finish();
    let scored = scored?;

    let ranked = rank(scored);
    let report = NightReport {
        window: *window,
        params: params.clone(),
        candidates: ranked,
    };

    log::info!(
        "survey: {} pass, {} error, {} evaluated",
        report.passing().count(),
        report.errored().count(),
        report.candidates.len()
    );
    Ok(report)
}

/// Select the fast rotators from `catalog`, derive the night following `after` and survey it.
///
/// Errors
/// ----------
/// * Parameter and catalog filter validation errors.
/// * [`FastRotError::SunEventNotFound`] / [`FastRotError::InvalidNightWindow`] when the site
///   has no usable night after `after`.
/// * Whatever the catalog source returns.
pub fn survey_night<C, P>(
    catalog: &C,
    filter: &CatalogFilter,
    site: &ObservationSite,
    provider: &P,
    after: Epoch,
    params: &ObservabilityParams,
) -> Result<NightReport, FastRotError>
where
    C: CatalogSource + ?Sized,
    P: SkyPositionProvider + ?Sized,
{
    params.validate()?;
    filter.validate()?;
    let window = NightWindow::for_night(site, after, params.night_margin())?;
    let candidates = catalog.fast_rotators(filter)?;
    survey(&candidates, &window, site, provider, params)
}
