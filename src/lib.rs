//! Which fast-rotating minor planets can be observed tonight, and which first.
//!
//! For one night at one site, every candidate is scanned minute by minute, its airmass and
//! brightness are accumulated into [`VisibilityStats`], and the candidates are scored and
//! ranked. See [`survey::survey`] for the whole pipeline.

pub mod airmass;
pub mod catalog;
pub mod constants;
pub mod ephemeris;
pub mod fastrot_errors;
pub mod observers;
pub mod params;
pub mod scoring;
pub mod survey;
pub mod time;
pub mod visibility;

pub use catalog::{CandidateBody, CatalogFilter, CatalogSource};
pub use constants::ObjectNumber;
pub use ephemeris::{SkyPosition, SkyPositionProvider};
pub use fastrot_errors::FastRotError;
pub use observers::{night_window::NightWindow, ObservationSite};
pub use params::ObservabilityParams;
pub use scoring::{score_and_rank, Outcome, ScoredCandidate};
pub use survey::{survey, survey_night, NightReport};
pub use visibility::{evaluate, VisibilityStats};

/// Epochs are written as their UTC Gregorian representation.
pub(crate) fn serialize_epoch<S: serde::Serializer>(
    epoch: &hifitime::Epoch,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(epoch)
}
