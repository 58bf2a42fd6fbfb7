use serde::{Deserialize, Serialize};

use super::{Dasha, ZodiacSign};

/// A graha as placed by the backend
///
/// Every field is defaulted: the client renders whatever arrived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Planet {
    pub id: i32,
    pub name: String,
    #[serde(rename = "house")]
    pub house_number: u8,
    #[serde(rename = "sign")]
    pub sign_number: u8,
    /// Sidereal ecliptic longitude in degrees
    #[serde(rename = "longitude")]
    pub longitude_degrees: f64,
    pub is_retrograde: bool,
    pub latitude: Option<f64>,
    pub speed: Option<f64>,
    pub nakshatra: Option<u8>,
    pub pada: Option<u8>,
}

impl Planet {
    pub fn sign(&self) -> Option<ZodiacSign> {
        ZodiacSign::from_number(self.sign_number)
    }

    /// Two-character chart label ("Su", "Mo", ...)
    pub fn abbreviation(&self) -> String {
        self.name.chars().take(2).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct House {
    pub number: u8,
    #[serde(rename = "sign")]
    pub sign_number: u8,
    /// Cusp longitude
    pub longitude: Option<f64>,
}

/// Avakahada and panchang attributes of the birth moment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicDetails {
    pub ascendant_lord: String,
    pub rasi_lord: String,
    pub nakshatra_lord: String,
    pub nakshatra_charan: String,
    pub yoga: String,
    pub karan: String,
    pub tithi: String,
    pub day: String,
    pub gana: String,
    pub yoni: String,
    pub nadi: String,
    pub varan: String,
    pub vashya: String,
}

/// Ghatak chakra (inauspicious factors)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhatakDetails {
    pub month: String,
    pub tithi: String,
    pub day: String,
    pub nakshatra: String,
    pub yoga: String,
    pub karan: String,
    pub prahar: String,
    pub moon: String,
}

/// Body of a successful `POST /api/v1/kundli/generate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KundliResponse {
    pub houses: Option<Vec<House>>,
    pub planets: Vec<Planet>,
    pub lagna_sign: Option<u8>,
    /// Ascendant longitude in degrees
    pub lagna: Option<f64>,
    pub ayanamsa_value: Option<f64>,
    pub julian_day: Option<f64>,
    pub dasha: Option<Dasha>,
    pub basic_details: Option<BasicDetails>,
    pub ghatak_details: Option<GhatakDetails>,
}

impl KundliResponse {
    pub fn lagna(&self) -> Option<ZodiacSign> {
        self.lagna_sign.and_then(ZodiacSign::from_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fixture() {
        let response: KundliResponse =
            serde_json::from_str(include_str!("../../fixtures/kundli_delhi.json")).unwrap();

        assert_eq!(response.lagna_sign, Some(4));
        assert_eq!(response.lagna(), Some(ZodiacSign::Cancer));
        assert_eq!(response.houses.as_ref().map(Vec::len), Some(12));
        assert_eq!(response.planets.len(), 9);

        let sun = &response.planets[0];
        assert_eq!(sun.name, "Sun");
        assert_eq!(sun.house_number, 8);
        assert_eq!(sun.abbreviation(), "Su");
        assert_eq!(sun.nakshatra, Some(24));
    }

    #[test]
    fn test_missing_fields_default() {
        let response: KundliResponse =
            serde_json::from_str(r#"{"planets":[{"name":"Moon"}]}"#).unwrap();

        assert!(response.houses.is_none());
        assert!(response.dasha.is_none());
        assert_eq!(response.planets[0].house_number, 0);
        assert!(!response.planets[0].is_retrograde);
    }

    #[test]
    fn test_abbreviation_is_char_based() {
        let planet = Planet {
            name: "Ké".to_string(),
            ..Planet::default()
        };
        assert_eq!(planet.abbreviation(), "Ké");

        let planet = Planet {
            name: "R".to_string(),
            ..Planet::default()
        };
        assert_eq!(planet.abbreviation(), "R");
    }
}
