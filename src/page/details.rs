use std::fmt::Write;

use serde::Serialize;

use crate::models::{BasicDetails, GhatakDetails};

/// Avakahada/panchang and ghatak chakra tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsView {
    pub basic: Vec<(&'static str, String)>,
    /// `None` renders as "No Ghatak details available"
    pub ghatak: Option<Vec<(&'static str, String)>>,
}

/// Nothing is shown unless the backend sent basic details
pub fn details_view(basic: Option<&BasicDetails>, ghatak: Option<&GhatakDetails>) -> Option<DetailsView> {
    let basic = basic?;
    Some(DetailsView {
        basic: vec![
            ("Ascendant Lord", basic.ascendant_lord.clone()),
            ("Rasi Lord", basic.rasi_lord.clone()),
            ("Nakshatra Lord", basic.nakshatra_lord.clone()),
            ("Nakshatra - Charan", basic.nakshatra_charan.clone()),
            ("Yoga", basic.yoga.clone()),
            ("Karan", basic.karan.clone()),
            ("Tithi", basic.tithi.clone()),
            ("Day", basic.day.clone()),
            ("Gana", basic.gana.clone()),
            ("Yoni", basic.yoni.clone()),
            ("Nadi", basic.nadi.clone()),
            ("Varan", basic.varan.clone()),
            ("Vashya", basic.vashya.clone()),
        ],
        ghatak: ghatak.map(|g| {
            vec![
                ("Month", g.month.clone()),
                ("Tithi", g.tithi.clone()),
                ("Day", g.day.clone()),
                ("Nakshatra", g.nakshatra.clone()),
                ("Yoga", g.yoga.clone()),
                ("Karan", g.karan.clone()),
                ("Prahar", g.prahar.clone()),
                ("Moon", g.moon.clone()),
            ]
        }),
    })
}

impl DetailsView {
    pub fn to_text(&self) -> String {
        let mut text = String::from("Avakahada & Panchang\n");
        for (label, value) in &self.basic {
            let _ = writeln!(text, "  {:<20} {}", label, value);
        }
        text.push_str("Ghatak Chakra (Inauspicious)\n");
        match &self.ghatak {
            Some(rows) => {
                for (label, value) in rows {
                    let _ = writeln!(text, "  {:<20} {}", label, value);
                }
            }
            None => text.push_str("  No Ghatak details available\n"),
        }
        text
    }
}
