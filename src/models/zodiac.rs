use serde::{Deserialize, Serialize};
use std::fmt;

/// Zodiac signs (rashis) in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Get sign from the backend's sign number (1 = Aries, 12 = Pisces)
    pub fn from_number(number: u8) -> Option<Self> {
        let sign = match number {
            1 => ZodiacSign::Aries,
            2 => ZodiacSign::Taurus,
            3 => ZodiacSign::Gemini,
            4 => ZodiacSign::Cancer,
            5 => ZodiacSign::Leo,
            6 => ZodiacSign::Virgo,
            7 => ZodiacSign::Libra,
            8 => ZodiacSign::Scorpio,
            9 => ZodiacSign::Sagittarius,
            10 => ZodiacSign::Capricorn,
            11 => ZodiacSign::Aquarius,
            12 => ZodiacSign::Pisces,
            _ => return None,
        };
        Some(sign)
    }

    /// Sanskrit rashi name
    pub fn rashi(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Mesha",
            ZodiacSign::Taurus => "Vrishabha",
            ZodiacSign::Gemini => "Mithuna",
            ZodiacSign::Cancer => "Karka",
            ZodiacSign::Leo => "Simha",
            ZodiacSign::Virgo => "Kanya",
            ZodiacSign::Libra => "Tula",
            ZodiacSign::Scorpio => "Vrishchika",
            ZodiacSign::Sagittarius => "Dhanu",
            ZodiacSign::Capricorn => "Makara",
            ZodiacSign::Aquarius => "Kumbha",
            ZodiacSign::Pisces => "Meena",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_numbers_are_one_based() {
        assert_eq!(ZodiacSign::from_number(1), Some(ZodiacSign::Aries));
        assert_eq!(ZodiacSign::from_number(12), Some(ZodiacSign::Pisces));
        assert_eq!(ZodiacSign::from_number(0), None);
        assert_eq!(ZodiacSign::from_number(13), None);
    }

    #[test]
    fn test_display_and_rashi() {
        let sign = ZodiacSign::Cancer;
        assert_eq!(sign.to_string(), "Cancer");
        assert_eq!(sign.rashi(), "Karka");
    }
}
