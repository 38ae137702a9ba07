//! # Candidate catalog
//!
//! Fast rotators are selected from a small-body catalog by rotation period and orbit size.
//! The catalog itself lives outside this crate (a HORIZONS search, a local database dump, ...),
//! so it is modelled by the [`CatalogSource`] trait which hands back **structured records**:
//! no text is ever column-sliced here.
//!
//! [`InMemoryCatalog`] is the in-process implementation used by tests and by callers that already
//! hold the catalog entries.
//!
//! ## Selection
//!
//! [`CatalogFilter`] keeps bodies with
//!
//! ```text
//! min_period < rotation period < max_period   (hours)
//! aphelion distance  < max_aphelion            (AU)
//! perihelion distance > min_perihelion         (AU)
//! ```
//!
//! The defaults (0 h, 3.5 h, 2.5 AU, 0.9 AU) select fast rotators from the inner main belt and
//! the Mars-crossers, which stay bright enough for small telescopes.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::constants::{AstronomicalUnit, Hour, ObjectNumber};
use crate::fastrot_errors::FastRotError;

/// A minor planet to evaluate. Immutable once retrieved from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateBody {
    /// Catalog key, passed back to the ephemeris provider.
    pub id: ObjectNumber,
    pub name: String,
    /// Rotation period, in hours.
    pub rotation_period: Hour,
}

impl CandidateBody {
    pub fn new(id: impl Into<ObjectNumber>, name: impl Into<String>, rotation_period: Hour) -> Self {
        CandidateBody {
            id: id.into(),
            name: name.into(),
            rotation_period,
        }
    }

    /// Compose a display name from the catalog's primary designation and proper name.
    ///
    /// * undefined primary designation → the name alone,
    /// * unnamed body → the primary designation alone,
    /// * otherwise `"<name> (<designation>)"`.
    ///
    /// ```
    /// use fastrot::catalog::CandidateBody;
    ///
    /// assert_eq!(CandidateBody::display_name("1999 JM8", "unnamed"), "1999 JM8");
    /// assert_eq!(CandidateBody::display_name("undefined", "Eros"), "Eros");
    /// assert_eq!(CandidateBody::display_name("A898 PA", "Eros"), "Eros (A898 PA)");
    /// ```
    pub fn display_name(primary: &str, name: &str) -> String {
        let primary = primary.trim();
        let name = name.trim();
        if primary.contains("undefine") {
            name.to_string()
        } else if name.contains("unnamed") {
            primary.to_string()
        } else {
            format!("{name} ({primary})")
        }
    }
}

impl fmt::Display for CandidateBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id)
    }
}

/// A catalog record: the body plus the orbit quantities the selection needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub body: CandidateBody,
    /// Aphelion distance, AU
    pub aphelion: AstronomicalUnit,
    /// Perihelion distance, AU
    pub perihelion: AstronomicalUnit,
}

/// Period/distance filter applied to the catalog. All bounds are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub min_period: Hour,
    pub max_period: Hour,
    pub max_aphelion: AstronomicalUnit,
    pub min_perihelion: AstronomicalUnit,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        CatalogFilter {
            min_period: 0.0,
            max_period: 3.5,
            max_aphelion: 2.5,
            min_perihelion: 0.9,
        }
    }
}

impl CatalogFilter {
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        let period = entry.body.rotation_period;
        period < self.max_period
            && period > self.min_period
            && entry.aphelion < self.max_aphelion
            && entry.perihelion > self.min_perihelion
    }

    /// The filter as a HORIZONS small-body search string.
    ///
    /// ```
    /// use fastrot::catalog::CatalogFilter;
    ///
    /// assert_eq!(
    ///     CatalogFilter::default().horizons_query(),
    ///     "ROTPER<3.5, ROTPER>0.0, ADIST<2.5, QR>0.9"
    /// );
    /// ```
    pub fn horizons_query(&self) -> String {
        [
            format!("ROTPER<{:?}", self.max_period),
            format!("ROTPER>{:?}", self.min_period),
            format!("ADIST<{:?}", self.max_aphelion),
            format!("QR>{:?}", self.min_perihelion),
        ]
        .iter()
        .join(", ")
    }

    /// Reject empty or inverted ranges before querying.
    pub fn validate(&self) -> Result<(), FastRotError> {
        if !(self.min_period < self.max_period) {
            return Err(FastRotError::CatalogError(format!(
                "empty rotation period range ({}, {})",
                self.min_period, self.max_period
            )));
        }
        if !(self.min_perihelion < self.max_aphelion) {
            return Err(FastRotError::CatalogError(format!(
                "perihelion bound {} AU is beyond aphelion bound {} AU",
                self.min_perihelion, self.max_aphelion
            )));
        }
        Ok(())
    }
}

/// Anything able to list the fast rotators matching a filter.
pub trait CatalogSource {
    fn fast_rotators(&self, filter: &CatalogFilter) -> Result<Vec<CandidateBody>, FastRotError>;
}

/// Catalog held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: Vec<CatalogEntry>,
}

impl InMemoryCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        InMemoryCatalog { entries }
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        InMemoryCatalog::new(iter.into_iter().collect())
    }
}

impl CatalogSource for InMemoryCatalog {
    fn fast_rotators(&self, filter: &CatalogFilter) -> Result<Vec<CandidateBody>, FastRotError> {
        filter.validate()?;
        let selected: Vec<CandidateBody> = self
            .entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .map(|entry| entry.body.clone())
            .collect();
        log::info!(
            "catalog: {} of {} entries match {}",
            selected.len(),
            self.entries.len(),
            filter.horizons_query()
        );
        Ok(selected)
    }
}
