//! # Ephemeris provider
//!
//! The visibility scan needs, for one body and one instant, where the body stands in the site's
//! sky and how bright it is. That question is answered by a [`SkyPositionProvider`].
//!
//! ## Contract
//!
//! - The instant is always an explicit argument. Providers keep no "current time", so one
//!   provider can serve several candidates at once (the trait requires `Sync`).
//! - A provider that cannot answer returns an error (typically
//!   [`FastRotError::EphemerisUnavailable`] or [`FastRotError::EphemerisOutOfRange`]). The
//!   evaluator never skips a missing sample silently.
//!
//! ## Implementations
//!
//! - [`tabulated::TabulatedEphemeris`] – one body, interpolated from an (instant, RA, Dec, V)
//!   table such as a HORIZONS observer table sampled hourly.
//! - [`tabulated::EphemerisBook`] – a table per catalog identifier.
//! - Any `Fn(&CandidateBody, &ObservationSite, Epoch) -> Result<SkyPosition, FastRotError>`
//!   closure, convenient for synthetic skies.

pub mod tabulated;

use hifitime::Epoch;
use serde::Serialize;

use crate::catalog::CandidateBody;
use crate::constants::Radian;
use crate::fastrot_errors::FastRotError;
use crate::observers::ObservationSite;

/// Where a body stands at one instant, and how bright it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyPosition {
    /// Apparent altitude, radians
    pub altitude: Radian,
    /// Right ascension, radians
    pub ra: Radian,
    /// Declination, radians
    pub dec: Radian,
    /// Apparent V magnitude
    pub magnitude: f64,
}

/// Answers "where is `body` in the sky of `site` at `epoch`".
pub trait SkyPositionProvider: Sync {
    fn sky_position(
        &self,
        body: &CandidateBody,
        site: &ObservationSite,
        epoch: Epoch,
    ) -> Result<SkyPosition, FastRotError>;
}

impl<F> SkyPositionProvider for F
where
    F: Fn(&CandidateBody, &ObservationSite, Epoch) -> Result<SkyPosition, FastRotError> + Sync,
{
    fn sky_position(
        &self,
        body: &CandidateBody,
        site: &ObservationSite,
        epoch: Epoch,
    ) -> Result<SkyPosition, FastRotError> {
        self(body, site, epoch)
    }
}
