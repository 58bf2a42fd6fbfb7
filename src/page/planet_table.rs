use std::fmt::Write;

use serde::Serialize;

use crate::models::Planet;

/// One row of the planetary positions table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetRow {
    pub id: i32,
    pub planet: String,
    pub sign: u8,
    /// Sign name, blank when the number is out of range
    pub sign_name: String,
    /// Sanskrit rashi name, blank when the number is out of range
    pub rashi: &'static str,
    /// "R" for retrograde, "D" for direct
    pub motion: &'static str,
    /// Longitude to two decimals with a degree mark
    pub degree: String,
}

pub fn planet_rows(planets: &[Planet]) -> Vec<PlanetRow> {
    planets
        .iter()
        .map(|p| PlanetRow {
            id: p.id,
            planet: p.name.clone(),
            sign: p.sign_number,
            sign_name: p.sign().map(|s| s.to_string()).unwrap_or_default(),
            rashi: p.sign().map(|s| s.rashi()).unwrap_or_default(),
            motion: if p.is_retrograde { "R" } else { "D" },
            degree: format!("{:.2}°", p.longitude_degrees),
        })
        .collect()
}

pub fn planet_table_text(rows: &[PlanetRow]) -> String {
    let mut text = String::from("Planetary Positions\n");
    let _ = writeln!(text, "{:<10} {:<26} {:<4} {:>8}", "Planet", "Sign", "D/R", "Degree");
    for row in rows {
        let sign = if row.rashi.is_empty() {
            row.sign.to_string()
        } else {
            format!("{} {} ({})", row.sign, row.sign_name, row.rashi)
        };
        let _ = writeln!(
            text,
            "{:<10} {:<26} {:<4} {:>8}",
            row.planet,
            sign,
            row.motion,
            row.degree
        );
    }
    text
}
