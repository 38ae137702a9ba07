//! # Scoring & ranking
//!
//! Turns per-candidate visibility statistics into an outcome, a score and a total order.
//!
//! ## Pass test
//! -----------------
//! A candidate passes iff
//!
//! ```text
//! minutes_visible >= minutes_limit  &&  peak_magnitude < mag_limit
//! ```
//!
//! An unset peak magnitude compares as 0, the value historical reports carried.
//!
//! ## Score
//! -----------------
//! For a passing candidate, lower is better:
//!
//! ```text
//! score = -( minutes_visible / 60 + (mag_limit - peak_magnitude) * 2.5 - min_airmass )
//! ```
//!
//! Failing and errored candidates have no score. Their historical value is 100, see
//! [`ScoredCandidate::legacy_score`].
//!
//! ## Order
//! -----------------
//! Passing candidates by ascending score, then failing ones, then the ones whose evaluation
//! errored. The sort is stable: ties keep the input order. Nothing is dropped.

use std::cmp::Ordering;

use serde::Serialize;

use crate::catalog::CandidateBody;
use crate::constants::{Hour, ObjectNumber, LEGACY_FAIL_SCORE, MAGNITUDE_WEIGHT};
use crate::fastrot_errors::FastRotError;
use crate::visibility::{EphemerisLine, VisibilityStats};

/// Verdict of one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
    /// The candidate could not be evaluated; holds the diagnostic.
    Error(String),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    /// Position of the outcome class in the ranking.
    fn rank(&self) -> u8 {
        match self {
            Outcome::Pass => 0,
            Outcome::Fail => 1,
            Outcome::Error(_) => 2,
        }
    }
}

/// A candidate after scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub body: CandidateBody,
    /// `None` when the coarse evaluation errored.
    pub stats: Option<VisibilityStats>,
    pub outcome: Outcome,
    /// `Some` only for passing candidates.
    pub score: Option<f64>,
    /// Fine-step ephemeris; only filled for passing candidates.
    pub ephemeris: Vec<EphemerisLine>,
}

impl ScoredCandidate {
    /// Apply the pass test and the score to one evaluation result.
    pub fn assess(
        body: CandidateBody,
        evaluation: Result<VisibilityStats, &FastRotError>,
        mag_limit: f64,
        minutes_limit: f64,
    ) -> ScoredCandidate {
        match evaluation {
            Ok(stats) => {
                let (outcome, score) = if passes(&stats, mag_limit, minutes_limit) {
                    (Outcome::Pass, Some(score(&stats, mag_limit)))
                } else {
                    (Outcome::Fail, None)
                };
                ScoredCandidate {
                    body,
                    stats: Some(stats),
                    outcome,
                    score,
                    ephemeris: Vec::new(),
                }
            }
            Err(err) => ScoredCandidate {
                body,
                stats: None,
                outcome: Outcome::Error(err.to_string()),
                score: None,
                ephemeris: Vec::new(),
            },
        }
    }

    /// Score, or 100 for failing and errored candidates.
    pub fn legacy_score(&self) -> f64 {
        self.score.unwrap_or(LEGACY_FAIL_SCORE)
    }

    /// Flat record with the historical sentinel values in place of unset fields.
    pub fn legacy_row(&self) -> LegacyRow {
        let stats = self.stats.unwrap_or_default();
        LegacyRow {
            id: self.body.id.clone(),
            name: self.body.name.clone(),
            rotation_period: self.body.rotation_period,
            minutes_visible: stats.minutes_visible,
            peak_magnitude: stats.legacy_peak_magnitude(),
            min_airmass: stats.legacy_min_airmass(),
            score: self.legacy_score(),
            passed: self.outcome.is_pass(),
        }
    }
}

/// One line of a historical report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyRow {
    pub id: ObjectNumber,
    pub name: String,
    pub rotation_period: Hour,
    pub minutes_visible: u32,
    pub peak_magnitude: f64,
    pub min_airmass: f64,
    pub score: f64,
    pub passed: bool,
}

/// Pass test on visibility statistics.
pub fn passes(stats: &VisibilityStats, mag_limit: f64, minutes_limit: f64) -> bool {
    f64::from(stats.minutes_visible) >= minutes_limit && stats.legacy_peak_magnitude() < mag_limit
}

/// Score of passing statistics; lower is better.
///
/// ```
/// use fastrot::scoring::score;
/// use fastrot::visibility::VisibilityStats;
///
/// let stats = VisibilityStats {
///     minutes_visible: 120,
///     peak_magnitude: Some(16.5),
///     min_airmass: Some(1.2),
/// };
/// assert!((score(&stats, 17.0) + 2.05).abs() < 1e-12);
/// ```
pub fn score(stats: &VisibilityStats, mag_limit: f64) -> f64 {
    -(stats.hours_visible() + (mag_limit - stats.legacy_peak_magnitude()) * MAGNITUDE_WEIGHT
        - stats.legacy_min_airmass())
}

/// Order scored candidates: passing by ascending score, then failing, then errored.
pub fn rank(mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    candidates.sort_by(compare);
    candidates
}

fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    a.outcome.rank().cmp(&b.outcome.rank()).then_with(|| match (a.score, b.score) {
        (Some(sa), Some(sb)) => sa.total_cmp(&sb),
        _ => Ordering::Equal,
    })
}

/// Score every evaluation and return the full ranked list.
///
/// Arguments
/// -----------------
/// * `evaluations`: each candidate with the result of its visibility evaluation, in input order.
/// * `mag_limit`: exclusive upper bound on the peak magnitude.
/// * `minutes_limit`: inclusive lower bound on the visible minutes.
///
/// Return
/// ----------
/// * One [`ScoredCandidate`] per input, ranked. The function holds no state: the same input
///   always gives the same list.
pub fn score_and_rank(
    evaluations: &[(CandidateBody, Result<VisibilityStats, FastRotError>)],
    mag_limit: f64,
    minutes_limit: f64,
) -> Vec<ScoredCandidate> {
    rank(
        evaluations
            .iter()
            .map(|(body, evaluation)| {
                ScoredCandidate::assess(body.clone(), evaluation.as_ref().copied(), mag_limit, minutes_limit)
            })
            .collect(),
    )
}

#[cfg(test)]
mod scoring_test {
    use super::*;
    use approx::assert_relative_eq;
    use hifitime::Epoch;

    fn stats(minutes: u32, peak: f64, min_airmass: f64) -> VisibilityStats {
        VisibilityStats {
            minutes_visible: minutes,
            peak_magnitude: Some(peak),
            min_airmass: Some(min_airmass),
        }
    }

    fn body(id: u32) -> CandidateBody {
        CandidateBody::new(id, format!("({id})"), 2.0)
    }

    #[test]
    fn test_reference_score() {
        let s = stats(120, 16.5, 1.2);
        assert!(passes(&s, 17.0, 60.0));
        assert_relative_eq!(score(&s, 17.0), -2.05, epsilon = 1e-12);
    }

    #[test]
    fn test_pass_test_bounds() {
        // minutes are inclusive, magnitude is exclusive
        assert!(passes(&stats(60, 16.9, 1.5), 17.0, 60.0));
        assert!(!passes(&stats(59, 16.9, 1.5), 17.0, 60.0));
        assert!(!passes(&stats(300, 17.0, 1.5), 17.0, 60.0));
        // unset magnitude compares as 0
        assert!(passes(&VisibilityStats::default(), 17.0, 0.0));
        assert!(!passes(&VisibilityStats::default(), 17.0, 60.0));
    }

    #[test]
    fn test_short_visibility_fails_and_sorts_last() {
        let evaluations = vec![
            (body(1), Ok(stats(30, 12.0, 1.0))),
            (body(2), Ok(stats(120, 16.5, 1.2))),
            (body(3), Ok(stats(400, 16.9, 2.9))),
        ];
        let ranked = score_and_rank(&evaluations, 17.0, 60.0);

        let last = ranked.last().unwrap();
        assert_eq!(last.body.id, ObjectNumber::Int(1));
        assert_eq!(last.outcome, Outcome::Fail);
        assert_eq!(last.score, None);
        assert_eq!(last.legacy_score(), 100.0);
        assert!(ranked[..2].iter().all(|c| c.outcome.is_pass()));
    }

    #[test]
    fn test_stable_ranking() {
        // scores [100, -2.05, 100, -5.0]
        let evaluations = vec![
            (body(0), Ok(stats(30, 16.0, 1.5))),
            (body(1), Ok(stats(120, 16.5, 1.2))),
            (body(2), Ok(stats(10, 16.0, 1.5))),
            (body(3), Ok(stats(240, 16.0, 1.5))),
        ];
        let ranked = score_and_rank(&evaluations, 17.0, 60.0);

        assert_relative_eq!(ranked[0].score.unwrap(), -5.0, epsilon = 1e-12);
        let order: Vec<ObjectNumber> = ranked.iter().map(|c| c.body.id.clone()).collect();
        assert_eq!(
            order,
            vec![
                ObjectNumber::Int(3),
                ObjectNumber::Int(1),
                ObjectNumber::Int(0),
                ObjectNumber::Int(2)
            ]
        );
        let legacy: Vec<f64> = ranked.iter().map(|c| c.legacy_score()).collect();
        assert_relative_eq!(legacy[1], -2.05, epsilon = 1e-12);
        assert_eq!(&legacy[2..], &[100.0, 100.0]);
    }

    #[test]
    fn test_errors_rank_after_failures() {
        let epoch = Epoch::from_mjd_utc(60000.0);
        let evaluations = vec![
            (
                body(7),
                Err(FastRotError::EphemerisUnavailable {
                    body: ObjectNumber::Int(7),
                    epoch,
                }),
            ),
            (body(8), Ok(stats(0, 0.0, 20.0))),
            (body(9), Ok(stats(90, 15.0, 1.1))),
        ];
        let ranked = score_and_rank(&evaluations, 17.0, 60.0);

        assert_eq!(ranked[0].outcome, Outcome::Pass);
        assert_eq!(ranked[1].outcome, Outcome::Fail);
        assert!(matches!(ranked[2].outcome, Outcome::Error(_)));
        assert_eq!(ranked[2].stats, None);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_idempotent() {
        let evaluations = vec![
            (body(0), Ok(stats(75, 16.2, 1.3))),
            (body(1), Ok(stats(75, 16.2, 1.3))),
            (body(2), Ok(stats(20, 11.0, 1.0))),
            (body(3), Ok(stats(300, 14.0, 1.05))),
        ];
        let first = score_and_rank(&evaluations, 17.0, 60.0);
        let second = score_and_rank(&evaluations, 17.0, 60.0);
        assert_eq!(first, second);
        // equal scores keep input order
        assert_eq!(first[1].body.id, ObjectNumber::Int(0));
        assert_eq!(first[2].body.id, ObjectNumber::Int(1));
    }

    #[test]
    fn test_legacy_row() {
        let failed = ScoredCandidate::assess(body(5), Ok(VisibilityStats::default()), 17.0, 60.0);
        let row = failed.legacy_row();
        assert_eq!(row.peak_magnitude, 0.0);
        assert_eq!(row.min_airmass, 20.0);
        assert_eq!(row.score, 100.0);
        assert!(!row.passed);
    }
}
