//! Core data models used throughout the report pipeline.
//!
//! Rows mirror what the store returns for one reporting period; the
//! projected types ([`Sighting`], [`Vacancy`]) are what the aggregator and
//! renderers work with.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::Serialize;

/// A scheduled rotation, identified by its date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportingPeriod {
    pub num: i64,
    pub date: NaiveDate,
    pub special_note: Option<String>,
}

/// One active row from `species_list` joined with its location, geography,
/// and species category.
#[derive(Debug, Clone, Default)]
pub struct SightingRow {
    pub location_id: i64,
    pub species: Option<String>,
    pub confirmation: Option<i64>,
    pub official_name: Option<String>,
    pub short_name: Option<String>,
    pub notes: Option<String>,
    pub private: Option<i64>,
    pub sub_area: Option<String>,
    pub area: Option<String>,
    pub category_code: Option<i64>,
    pub category_type: Option<String>,
    pub category_subtype: Option<String>,
}

/// A location with no `species_list` row for the period.
#[derive(Debug, Clone, Default)]
pub struct LocationRow {
    pub location_id: i64,
    pub official_name: Option<String>,
    pub short_name: Option<String>,
    pub notes: Option<String>,
    pub private: Option<i64>,
    pub sub_area: Option<String>,
    pub area: Option<String>,
}

/// Report grouping key for a location.
///
/// Keys compare by heading name only, so an area and a sub-area-only
/// location that share a name land in the same section. Named keys sort
/// lexicographically; [`GeoKey::Unknown`] always sorts last.
#[derive(Debug, Clone)]
pub enum GeoKey {
    Known(String),
    KnownSubAreaOnly(String),
    Unknown,
}

impl GeoKey {
    /// No sub-area → `Unknown`; a sub-area without an area → the sub-area;
    /// otherwise the area.
    pub fn derive(sub_area: Option<&str>, area: Option<&str>) -> Self {
        let sub_area = sub_area.map(str::trim).filter(|s| !s.is_empty());
        let area = area.map(str::trim).filter(|s| !s.is_empty());
        match (sub_area, area) {
            (None, _) => GeoKey::Unknown,
            (Some(sub), None) => GeoKey::KnownSubAreaOnly(sub.to_string()),
            (Some(_), Some(area)) => GeoKey::Known(area.to_string()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            GeoKey::Known(name) | GeoKey::KnownSubAreaOnly(name) => Some(name),
            GeoKey::Unknown => None,
        }
    }

    /// Heading text, using `unknown` for [`GeoKey::Unknown`].
    pub fn label<'a>(&'a self, unknown: &'a str) -> &'a str {
        self.name().unwrap_or(unknown)
    }
}

impl PartialEq for GeoKey {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for GeoKey {}

impl Hash for GeoKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl Ord for GeoKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.name(), other.name()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for GeoKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Whether a sighting was reported by more than one source. A location
/// with no report at all is a [`Vacancy`], not a state of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Confirmation {
    Unconfirmed,
    Confirmed,
}

impl Confirmation {
    pub fn from_marker(marker: Option<i64>) -> Self {
        match marker {
            Some(v) if v != 0 => Confirmation::Confirmed,
            _ => Confirmation::Unconfirmed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Ordinary,
    Notable,
}

/// One species observed at one location for one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
    pub location_id: i64,
    pub label: String,
    pub primary_name: String,
    pub short_name: Option<String>,
    pub alternate_names: Vec<String>,
    pub sub_area: Option<String>,
    pub area: Option<String>,
    pub note: Option<String>,
    pub restricted: bool,
    pub confirmation: Confirmation,
    pub tag: Tag,
    pub category_code: Option<i64>,
}

impl Sighting {
    pub fn geo(&self) -> GeoKey {
        GeoKey::derive(self.sub_area.as_deref(), self.area.as_deref())
    }

    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.primary_name)
    }

    pub fn alternates_joined(&self) -> String {
        self.alternate_names.join("/")
    }

    pub fn is_notable(&self) -> bool {
        self.tag == Tag::Notable
    }
}

/// A known location without a sighting this period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vacancy {
    pub location_id: i64,
    pub name: String,
    pub geo: GeoKey,
    pub restricted: bool,
}
