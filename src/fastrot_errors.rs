use hifitime::Epoch;
use thiserror::Error;

use crate::constants::ObjectNumber;

#[derive(Error, Debug)]
pub enum FastRotError {
    #[error("Invalid night window: start {start} is not before end {end}")]
    InvalidNightWindow { start: Epoch, end: Epoch },

    #[error("Invalid scan step: {0}")]
    InvalidStep(String),

    #[error("Invalid observability parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid observation site: {0}")]
    InvalidSite(String),

    #[error("NaN encountered in a site coordinate")]
    NanCoordinate(#[from] ordered_float::FloatIsNan),

    #[error("No ephemeris available for object {body} at {epoch}")]
    EphemerisUnavailable { body: ObjectNumber, epoch: Epoch },

    #[error("Epoch {epoch} is outside the tabulated ephemeris of object {body}")]
    EphemerisOutOfRange { body: ObjectNumber, epoch: Epoch },

    #[error("Invalid ephemeris table: {0}")]
    InvalidEphemerisTable(String),

    #[error("Unable to read ephemeris CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Catalog query failed: {0}")]
    CatalogError(String),

    #[error("The Sun does not cross the {horizon_deg}° horizon after {after}")]
    SunEventNotFound { horizon_deg: f64, after: Epoch },

    #[error("ROOTS finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),
}

impl FastRotError {
    /// Configuration errors abort a whole run, every other error only fails one candidate.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            FastRotError::InvalidNightWindow { .. }
                | FastRotError::InvalidStep(_)
                | FastRotError::InvalidParameter(_)
                | FastRotError::InvalidSite(_)
                | FastRotError::NanCoordinate(_)
        )
    }
}

impl PartialEq for FastRotError {
    fn eq(&self, other: &Self) -> bool {
        use FastRotError::*;
        match (self, other) {
            (
                InvalidNightWindow { start: s1, end: e1 },
                InvalidNightWindow { start: s2, end: e2 },
            ) => s1 == s2 && e1 == e2,
            (InvalidStep(a), InvalidStep(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (InvalidSite(a), InvalidSite(b)) => a == b,
            (
                EphemerisUnavailable { body: b1, epoch: e1 },
                EphemerisUnavailable { body: b2, epoch: e2 },
            ) => b1 == b2 && e1 == e2,
            (
                EphemerisOutOfRange { body: b1, epoch: e1 },
                EphemerisOutOfRange { body: b2, epoch: e2 },
            ) => b1 == b2 && e1 == e2,
            (InvalidEphemerisTable(a), InvalidEphemerisTable(b)) => a == b,
            (CatalogError(a), CatalogError(b)) => a == b,
            (
                SunEventNotFound {
                    horizon_deg: h1,
                    after: a1,
                },
                SunEventNotFound {
                    horizon_deg: h2,
                    after: a2,
                },
            ) => h1 == h2 && a1 == a2,
            (RootFindingError(a), RootFindingError(b)) => a == b,

            // not comparable: same variant is enough
            (NanCoordinate(_), NanCoordinate(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
