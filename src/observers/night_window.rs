use std::fmt;

use hifitime::{Duration, Epoch, TimeSeries, Unit};
use serde::Serialize;

use crate::fastrot_errors::FastRotError;
use crate::observers::sun::{next_rising, next_setting};
use crate::observers::ObservationSite;

/// The usable part of one night at a site: `[start, end)`, with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NightWindow {
    #[serde(serialize_with = "crate::serialize_epoch")]
    start: Epoch,
    #[serde(serialize_with = "crate::serialize_epoch")]
    end: Epoch,
}

impl NightWindow {
    /// Build a window from explicit bounds.
    ///
    /// Errors
    /// ----------
    /// * [`FastRotError::InvalidNightWindow`] if `start >= end`.
    pub fn new(start: Epoch, end: Epoch) -> Result<NightWindow, FastRotError> {
        if start >= end {
            return Err(FastRotError::InvalidNightWindow { start, end });
        }
        Ok(NightWindow { start, end })
    }

    /// Night following `after` at `site`, shrunk by `margin` on both sides.
    ///
    /// The window opens `margin` after the next sunset and closes `margin` before the
    /// following sunrise, so that twilight does not contaminate the scan. The historical
    /// setup uses a one hour margin, see [`NightWindow::for_night_default`].
    ///
    /// Errors
    /// ----------
    /// * [`FastRotError::SunEventNotFound`] under polar day or night.
    /// * [`FastRotError::InvalidNightWindow`] when the night is shorter than twice the margin.
    pub fn for_night(
        site: &ObservationSite,
        after: Epoch,
        margin: Duration,
    ) -> Result<NightWindow, FastRotError> {
        let sunset = next_setting(site, after)?;
        let sunrise = next_rising(site, sunset)?;
        NightWindow::new(sunset + margin, sunrise - margin)
    }

    /// [`NightWindow::for_night`] with the one hour margin.
    pub fn for_night_default(
        site: &ObservationSite,
        after: Epoch,
    ) -> Result<NightWindow, FastRotError> {
        NightWindow::for_night(site, after, Unit::Hour * 1)
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn end(&self) -> Epoch {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open membership test.
    pub fn contains(&self, epoch: Epoch) -> bool {
        epoch >= self.start && epoch < self.end
    }

    /// Instants `start, start + step, ...` strictly before `end`.
    pub fn epochs(&self, step: Duration) -> TimeSeries {
        TimeSeries::exclusive(self.start, self.end, step)
    }
}

impl fmt::Display for NightWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}
