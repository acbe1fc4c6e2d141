//! Reporting-period resolution.
//!
//! A report "as of" a date uses the most recent rotation on or before that
//! date. Dates earlier than every stored rotation fall back to the oldest
//! rotation; the caller is told why so it can warn once.

use chrono::NaiveDate;

use crate::error::ReportError;
use crate::models::ReportingPeriod;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPeriod {
    pub period: ReportingPeriod,
    pub requested: NaiveDate,
    /// Why the earliest period was substituted, if it was.
    pub fallback: Option<ReportError>,
}

impl ResolvedPeriod {
    pub fn fell_back(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Latest period dated on or before `date`. `periods` must be in date order.
pub fn locate(periods: &[ReportingPeriod], date: NaiveDate) -> Result<&ReportingPeriod, ReportError> {
    let idx = periods.partition_point(|p| p.date <= date);
    if idx == 0 {
        return Err(match periods.first() {
            Some(first) => ReportError::LookupFailure(format!(
                "date {} is prior to any stored rotation (oldest is {})",
                date, first.date
            )),
            None => ReportError::LookupFailure("no rotations are stored".to_string()),
        });
    }
    Ok(&periods[idx - 1])
}

/// [`locate`], degrading to the earliest period when there is no match.
pub fn resolve(periods: &[ReportingPeriod], date: NaiveDate) -> Result<ResolvedPeriod, ReportError> {
    match locate(periods, date) {
        Ok(period) => Ok(ResolvedPeriod {
            period: period.clone(),
            requested: date,
            fallback: None,
        }),
        Err(err) => {
            let earliest = periods.first().ok_or_else(|| err.clone())?;
            Ok(ResolvedPeriod {
                period: earliest.clone(),
                requested: date,
                fallback: Some(err),
            })
        }
    }
}
