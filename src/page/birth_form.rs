//! Birth-detail form state
//!
//! Numeric fields keep the raw text the user typed and are only coerced when
//! the form is submitted.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::models::{resolve_utc_offset, BirthDetails, Gender, PlaceCandidate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Addressable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BirthField {
    Name,
    Gender,
    City,
    Date,
    Time,
    Latitude,
    Longitude,
    Timezone,
    Ayanamsa,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthForm {
    pub name: String,
    pub gender: Gender,
    pub city: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub latitude: String,
    pub longitude: String,
    /// Offset from UTC in hours, e.g. "5.5" for India or "-5" for EST
    pub timezone: String,
    pub ayanamsa: String,
    /// Zone of the selected place while `timezone` is derived from it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_timezone: Option<String>,
}

impl Default for BirthForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: Gender::default(),
            city: String::new(),
            date: NaiveDate::from_ymd_opt(1989, 2, 24).unwrap_or_default(),
            time: NaiveTime::from_hms_opt(16, 30, 0).unwrap_or_default(),
            latitude: String::new(),
            longitude: String::new(),
            timezone: String::new(),
            ayanamsa: "1".to_string(),
            place_timezone: None,
        }
    }
}

impl BirthForm {
    /// Update one field from user input.
    ///
    /// Only the date, time and gender widgets can reject a value; free-text
    /// fields take anything.
    pub fn set(&mut self, field: BirthField, value: &str) -> Result<(), FormError> {
        match field {
            BirthField::Name => self.name = value.to_string(),
            BirthField::Gender => self.gender = value.parse()?,
            BirthField::City => self.city = value.to_string(),
            BirthField::Date => {
                self.date = parse_date(value)?;
                self.refresh_offset();
            }
            BirthField::Time => {
                self.time = parse_time(value)?;
                self.refresh_offset();
            }
            BirthField::Latitude => self.latitude = value.to_string(),
            BirthField::Longitude => self.longitude = value.to_string(),
            BirthField::Timezone => {
                self.timezone = value.to_string();
                self.place_timezone = None;
            }
            BirthField::Ayanamsa => self.ayanamsa = value.to_string(),
        }
        Ok(())
    }

    /// Copy a chosen place into the form.
    ///
    /// The offset follows the candidate's timezone at the birth date/time,
    /// and is recomputed when either changes until the user types an offset
    /// by hand. Returns whether the offset was filled.
    pub fn apply_place(&mut self, place: &PlaceCandidate) -> bool {
        self.city = place.name.clone();
        self.latitude = place.latitude.to_string();
        self.longitude = place.longitude.to_string();
        self.place_timezone = Some(place.timezone_identifier.clone());
        self.refresh_offset()
    }

    /// An offset that cannot be resolved is cleared for manual entry.
    fn refresh_offset(&mut self) -> bool {
        let Some(identifier) = self.place_timezone.as_deref() else {
            return false;
        };

        match resolve_utc_offset(identifier, self.date, self.time) {
            Some(offset) => {
                self.timezone = offset.to_string();
                true
            }
            None => {
                tracing::info!(
                    timezone = %identifier,
                    date = %self.date,
                    time = %self.time,
                    "could not resolve UTC offset, awaiting manual entry"
                );
                self.timezone.clear();
                false
            }
        }
    }

    /// Coerce the raw fields into a payload. Unparseable numbers become NaN.
    pub fn to_details(&self) -> BirthDetails {
        let name = self.name.trim();
        BirthDetails {
            name: (!name.is_empty()).then(|| name.to_string()),
            gender: self.gender,
            date_of_birth: self.date,
            time_of_birth: self.time,
            latitude: parse_float(&self.latitude),
            longitude: parse_float(&self.longitude),
            utc_offset_hours: parse_float(&self.timezone),
            ayanamsa_id: self.ayanamsa.trim().parse().ok(),
            place_name: self.city.clone(),
        }
    }

    /// Hand the coerced payload to `on_submit`. No validation, no I/O.
    pub fn submit<F, R>(&self, on_submit: F) -> R
    where
        F: FnOnce(BirthDetails) -> R,
    {
        let details = self.to_details();
        if !details.has_valid_coordinates() {
            tracing::debug!(
                lat = %self.latitude,
                lon = %self.longitude,
                "submitting coordinates outside valid range"
            );
        }
        on_submit(details)
    }
}

fn parse_float(text: &str) -> f64 {
    text.trim().parse().unwrap_or(f64::NAN)
}

fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| FormError::InvalidDate(value.to_string()))
}

fn parse_time(value: &str) -> Result<NaiveTime, FormError> {
    let value_trimmed = value.trim();
    NaiveTime::parse_from_str(value_trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value_trimmed, "%H:%M"))
        .map_err(|_| FormError::InvalidTime(value.to_string()))
}
