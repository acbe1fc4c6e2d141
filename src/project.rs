//! Row projection: one flat relational row → one [`Sighting`] or [`Vacancy`].

use crate::error::ReportError;
use crate::models::{Confirmation, GeoKey, LocationRow, Sighting, SightingRow, Tag, Vacancy};
use crate::store::AltNameLookup;

/// Project an active row.
///
/// The row must already represent a sighting; rows with no species label
/// are malformed, not vacant.
pub fn project(
    row: &SightingRow,
    alternates: Option<&dyn AltNameLookup>,
    notable_label: &str,
) -> Result<Sighting, ReportError> {
    let label = required(row.species.as_deref(), row.location_id, "species")?;
    let primary_name = required(row.official_name.as_deref(), row.location_id, "official_name")?;

    let is_notable = [&row.category_type, &row.category_subtype]
        .iter()
        .any(|cat| cat.as_deref().map(str::trim) == Some(notable_label));

    Ok(Sighting {
        location_id: row.location_id,
        label,
        primary_name,
        short_name: non_blank(row.short_name.as_deref()),
        alternate_names: alternates
            .map(|lookup| lookup.alternate_names(row.location_id))
            .unwrap_or_default(),
        sub_area: non_blank(row.sub_area.as_deref()),
        area: non_blank(row.area.as_deref()),
        note: non_blank(row.notes.as_deref()),
        restricted: truthy(row.private),
        confirmation: Confirmation::from_marker(row.confirmation),
        tag: if is_notable { Tag::Notable } else { Tag::Ordinary },
        category_code: row.category_code,
    })
}

/// Project a location that has no row for the period.
pub fn project_vacancy(row: &LocationRow) -> Result<Vacancy, ReportError> {
    let primary = required(row.official_name.as_deref(), row.location_id, "official_name")?;
    Ok(Vacancy {
        location_id: row.location_id,
        name: non_blank(row.short_name.as_deref()).unwrap_or(primary),
        geo: GeoKey::derive(row.sub_area.as_deref(), row.area.as_deref()),
        restricted: truthy(row.private),
    })
}

fn required(
    value: Option<&str>,
    location_id: i64,
    field: &'static str,
) -> Result<String, ReportError> {
    non_blank(value).ok_or(ReportError::MalformedRow { location_id, field })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn truthy(flag: Option<i64>) -> bool {
    matches!(flag, Some(v) if v != 0)
}
