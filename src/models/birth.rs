use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FormError;

/// Gender selector on the birth form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(FormError::InvalidGender(s.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Ayanamsa choices offered by the selector, as (id, label)
///
/// Ids are opaque to the client and forwarded to the backend as-is.
pub const AYANAMSA_CHOICES: &[(i32, &str)] = &[(1, "Lahiri"), (3, "Raman"), (5, "Krishnamurti")];

/// Fully typed birth details, as posted to the generation endpoint
///
/// Numeric fields that failed to parse carry NaN (or `None` for the
/// ayanamsa), which serialize as JSON `null`; the backend rejects them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub gender: Gender,
    /// Serialized as `YYYY-MM-DD`
    #[serde(rename = "dob")]
    pub date_of_birth: NaiveDate,
    /// Serialized as `HH:MM:SS`
    #[serde(rename = "tob")]
    pub time_of_birth: NaiveTime,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Offset from UTC in hours (e.g. 5.5 for IST)
    #[serde(rename = "timezone")]
    pub utc_offset_hours: f64,
    #[serde(rename = "ayanamsa")]
    pub ayanamsa_id: Option<i32>,
    #[serde(rename = "city")]
    pub place_name: String,
}

impl BirthDetails {
    /// Whether the coordinates are finite and inside the valid ranges
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}
