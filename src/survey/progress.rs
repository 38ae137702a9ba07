//! Progress reporting for the candidate loop.
//!
//! With the `progress` feature, [`ScanProgress`] drives an `indicatif` bar whose message keeps
//! the running outcome counts and the slowest candidate so far, e.g.
//!
//! ```text
//! ██████████░░░░ 120/300 (40%) | 85/s | ETA 00:00:02 | pass 4, fail 112, error 4 | slowest: Eros [433] 3.1ms
//! ```
//!
//! A slow candidate usually points at a provider that is fetching or interpolating far more
//! than the others. Without the feature [`ScanProgress`] is a zero-sized no-op, so the survey
//! loop is written once.

use std::time::Duration;

use crate::scoring::ScoredCandidate;

#[cfg(feature = "progress")]
use std::sync::Mutex;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

#[cfg(feature = "progress")]
use crate::scoring::Outcome;

#[cfg(feature = "progress")]
const TEMPLATE: &str =
    "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}";

/// Running outcome counts of a survey.
#[cfg(feature = "progress")]
#[derive(Debug, Default)]
pub(crate) struct Tally {
    pass: usize,
    fail: usize,
    error: usize,
    slowest: Option<(String, Duration)>,
}

#[cfg(feature = "progress")]
impl Tally {
    pub(crate) fn record(&mut self, scored: &ScoredCandidate, elapsed: Duration) {
        match scored.outcome {
            Outcome::Pass => self.pass += 1,
            Outcome::Fail => self.fail += 1,
            Outcome::Error(_) => self.error += 1,
        }
        if self.slowest.as_ref().map_or(true, |(_, d)| elapsed > *d) {
            self.slowest = Some((scored.body.to_string(), elapsed));
        }
    }

    pub(crate) fn summary(&self) -> String {
        let counts = format!(
            "pass {}, fail {}, error {}",
            self.pass, self.fail, self.error
        );
        match &self.slowest {
            Some((body, elapsed)) => format!("{counts} | slowest: {body} {elapsed:.1?}"),
            None => counts,
        }
    }
}

#[cfg(feature = "progress")]
pub(crate) struct ScanProgress {
    bar: ProgressBar,
    tally: Mutex<Tally>,
}

#[cfg(feature = "progress")]
impl ScanProgress {
    pub(crate) fn new(total: usize) -> Self {
        let bar = ProgressBar::new((total as u64).max(1));
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(200));
        ScanProgress {
            bar,
            tally: Mutex::new(Tally::default()),
        }
    }

    /// One more candidate scored, `elapsed` after its evaluation started.
    pub(crate) fn done(&self, scored: &ScoredCandidate, elapsed: Duration) {
        if let Ok(mut tally) = self.tally.lock() {
            tally.record(scored, elapsed);
            self.bar.set_message(tally.summary());
        }
        self.bar.inc(1);
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(not(feature = "progress"))]
pub(crate) struct ScanProgress;

#[cfg(not(feature = "progress"))]
impl ScanProgress {
    pub(crate) fn new(_total: usize) -> Self {
        ScanProgress
    }

    pub(crate) fn done(&self, _scored: &ScoredCandidate, _elapsed: Duration) {}

    pub(crate) fn finish(&self) {}
}
