//! Ephemerides interpolated from a table.
//!
//! A table holds rows `(mjd_utc, ra_deg, dec_deg, mag)` in strictly increasing time order, as
//! exported from a HORIZONS observer table (geocentric or topocentric RA/Dec, predicted V). Any
//! instant inside the tabulated span is served by linear interpolation between the two
//! surrounding rows; right ascension is interpolated along the short arc so that the 0h/24h
//! wrap does not produce a spurious jump. Instants outside the span are an error.
//!
//! With an hourly table the linear interpolation error on RA/Dec is far below what a 3-airmass
//! cut can resolve, even for fast-moving near-Earth objects.

use std::collections::HashMap;
use std::io;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use super::{SkyPosition, SkyPositionProvider};
use crate::catalog::CandidateBody;
use crate::constants::{Degree, ObjectNumber, DPI, MJD, RADEG};
use crate::fastrot_errors::FastRotError;
use crate::observers::ObservationSite;

/// One tabulated sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EphemerisRow {
    pub mjd_utc: MJD,
    pub ra_deg: Degree,
    pub dec_deg: Degree,
    pub mag: f64,
}

/// Ephemeris of a single body.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedEphemeris {
    rows: Vec<EphemerisRow>,
}

impl TabulatedEphemeris {
    /// Build a table, checking that it can be interpolated.
    ///
    /// Errors
    /// ----------
    /// * [`FastRotError::InvalidEphemerisTable`] when there are fewer than two rows, a value is
    ///   not finite, or the epochs are not strictly increasing.
    pub fn new(rows: Vec<EphemerisRow>) -> Result<TabulatedEphemeris, FastRotError> {
        if rows.len() < 2 {
            return Err(FastRotError::InvalidEphemerisTable(format!(
                "at least 2 rows are needed, got {}",
                rows.len()
            )));
        }

        if let Some((i, _)) = rows.iter().enumerate().find(|(_, r)| {
            !(r.mjd_utc.is_finite()
                && r.ra_deg.is_finite()
                && r.dec_deg.is_finite()
                && r.mag.is_finite())
        }) {
            return Err(FastRotError::InvalidEphemerisTable(format!(
                "row {i} holds a non-finite value"
            )));
        }

        if let Some(i) = rows.windows(2).position(|w| w[1].mjd_utc <= w[0].mjd_utc) {
            return Err(FastRotError::InvalidEphemerisTable(format!(
                "epochs are not strictly increasing at row {}",
                i + 1
            )));
        }

        Ok(TabulatedEphemeris { rows })
    }

    /// Read a CSV table with the header `mjd_utc,ra_deg,dec_deg,mag`.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<TabulatedEphemeris, FastRotError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let rows = csv_reader
            .deserialize::<EphemerisRow>()
            .collect::<Result<Vec<_>, _>>()?;
        TabulatedEphemeris::new(rows)
    }

    pub fn rows(&self) -> &[EphemerisRow] {
        &self.rows
    }

    /// First and last tabulated instants.
    pub fn span(&self) -> (Epoch, Epoch) {
        let first = self.rows[0].mjd_utc;
        let last = self.rows[self.rows.len() - 1].mjd_utc;
        (Epoch::from_mjd_utc(first), Epoch::from_mjd_utc(last))
    }

    /// Interpolated `(ra, dec, mag)` at `epoch`, angles in radians, or `None` outside the span.
    pub fn interpolate(&self, epoch: Epoch) -> Option<(f64, f64, f64)> {
        let (first, last) = self.span();
        if epoch < first || epoch > last {
            return None;
        }
        let t = epoch.to_mjd_utc_days();

        // index of the first row strictly after t, clamped so that [idx - 1, idx] is a segment
        let idx = self
            .rows
            .partition_point(|r| r.mjd_utc <= t)
            .clamp(1, self.rows.len() - 1);
        let (r0, r1) = (&self.rows[idx - 1], &self.rows[idx]);
        let u = (t - r0.mjd_utc) / (r1.mjd_utc - r0.mjd_utc);

        // shortest arc between the two right ascensions
        let mut dra = (r1.ra_deg - r0.ra_deg).rem_euclid(360.0);
        if dra > 180.0 {
            dra -= 360.0;
        }
        let ra = ((r0.ra_deg + u * dra) * RADEG).rem_euclid(DPI);
        let dec = (r0.dec_deg + u * (r1.dec_deg - r0.dec_deg)) * RADEG;
        let mag = r0.mag + u * (r1.mag - r0.mag);

        Some((ra, dec, mag))
    }
}

impl SkyPositionProvider for TabulatedEphemeris {
    fn sky_position(
        &self,
        body: &CandidateBody,
        site: &ObservationSite,
        epoch: Epoch,
    ) -> Result<SkyPosition, FastRotError> {
        let (ra, dec, magnitude) =
            self.interpolate(epoch)
                .ok_or_else(|| FastRotError::EphemerisOutOfRange {
                    body: body.id.clone(),
                    epoch,
                })?;

        Ok(SkyPosition {
            altitude: site.altitude(ra, dec, epoch),
            ra,
            dec,
            magnitude,
        })
    }
}

/// One [`TabulatedEphemeris`] per catalog identifier.
#[derive(Debug, Clone, Default)]
pub struct EphemerisBook {
    tables: HashMap<ObjectNumber, TabulatedEphemeris>,
}

impl EphemerisBook {
    pub fn new() -> Self {
        EphemerisBook::default()
    }

    /// Register the table of `id`, returning the table it replaces if any.
    pub fn insert(
        &mut self,
        id: impl Into<ObjectNumber>,
        table: TabulatedEphemeris,
    ) -> Option<TabulatedEphemeris> {
        self.tables.insert(id.into(), table)
    }

    pub fn get(&self, id: &ObjectNumber) -> Option<&TabulatedEphemeris> {
        self.tables.get(id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl SkyPositionProvider for EphemerisBook {
    fn sky_position(
        &self,
        body: &CandidateBody,
        site: &ObservationSite,
        epoch: Epoch,
    ) -> Result<SkyPosition, FastRotError> {
        self.tables
            .get(&body.id)
            .ok_or_else(|| FastRotError::EphemerisUnavailable {
                body: body.id.clone(),
                epoch,
            })?
            .sky_position(body, site, epoch)
    }
}
