use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A place returned by the geo lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PlaceCandidate {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Either an IANA identifier ("Asia/Kolkata") or a numeric offset ("5.5")
    #[serde(rename = "timezone", default)]
    pub timezone_identifier: String,
}

/// Convert a timezone identifier to an offset in hours for a local date/time
///
/// Numeric strings are taken literally. For IANA names the offset in force at
/// that local moment is used; ambiguous local times (DST fold) take the
/// earlier offset, and times skipped by a DST jump have none.
pub fn resolve_utc_offset(identifier: &str, date: NaiveDate, time: NaiveTime) -> Option<f64> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return None;
    }

    if let Ok(hours) = identifier.parse::<f64>() {
        return hours.is_finite().then_some(hours);
    }

    let tz: Tz = identifier.parse().ok()?;
    let local = NaiveDateTime::new(date, time);
    let resolved = tz.from_local_datetime(&local).earliest()?;
    let seconds = resolved.offset().fix().local_minus_utc();

    Some(seconds as f64 / 3600.0)
}
