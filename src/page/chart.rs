//! North Indian (diamond) chart layout
//!
//! The geometry is a fixed table: twelve anchors for planet labels, twelve
//! for sign numbers, and the lines that cut a square into twelve houses.
//! House 1 (the lagna) sits at the top centre; houses run counter-clockwise.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use serde::Serialize;

use crate::models::{House, Planet};

/// Side of the square canvas
pub const CANVAS_SIZE: u32 = 400;

pub const CAPTION: &str = "North Indian Chart";

/// Band above the square that holds the caption
const CAPTION_BAND: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

const fn pt(x: u32, y: u32) -> Point {
    Point { x, y }
}

/// Planet label anchors, index 0 = house 1
pub const PLANET_ANCHORS: [Point; 12] = [
    pt(200, 80),
    pt(100, 30),
    pt(30, 100),
    pt(80, 200),
    pt(30, 300),
    pt(100, 370),
    pt(200, 320),
    pt(300, 370),
    pt(370, 300),
    pt(320, 200),
    pt(370, 100),
    pt(300, 30),
];

/// Sign number anchors, index 0 = house 1
pub const SIGN_ANCHORS: [Point; 12] = [
    pt(200, 120),
    pt(60, 20),
    pt(20, 60),
    pt(140, 200),
    pt(20, 340),
    pt(60, 380),
    pt(200, 280),
    pt(340, 380),
    pt(380, 340),
    pt(260, 200),
    pt(380, 60),
    pt(340, 20),
];

/// Two full diagonals, then the inner diamond joining the edge midpoints
pub const CHART_LINES: [(Point, Point); 6] = [
    (pt(0, 0), pt(400, 400)),
    (pt(400, 0), pt(0, 400)),
    (pt(200, 0), pt(0, 200)),
    (pt(0, 200), pt(200, 400)),
    (pt(200, 400), pt(400, 200)),
    (pt(400, 200), pt(200, 0)),
];

/// One house as drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseCell {
    pub number: u8,
    /// Sign number shown in the house (the house number when unknown)
    pub sign: u8,
    /// Two-letter planet labels in backend order
    pub planets: Vec<String>,
    pub planet_anchor: Point,
    pub sign_anchor: Point,
}

impl HouseCell {
    /// Planet labels joined the way they are drawn ("Su Ve Ra")
    pub fn planet_text(&self) -> String {
        self.planets.join(" ")
    }
}

/// Everything needed to draw one chart. Rebuilt on every render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRenderModel {
    pub lagna_sign: Option<u8>,
    pub houses: Vec<HouseCell>,
}

/// Group planet labels by house number, keeping arrival order within a house.
/// Planets with a house outside 1..=12 are skipped.
pub fn planets_by_house(planets: &[Planet]) -> BTreeMap<u8, Vec<String>> {
    let mut grouped: BTreeMap<u8, Vec<String>> = BTreeMap::new();
    for planet in planets {
        if !(1..=12).contains(&planet.house_number) {
            tracing::warn!(
                planet = %planet.name,
                house = planet.house_number,
                "planet outside houses 1-12, not drawn"
            );
            continue;
        }
        grouped
            .entry(planet.house_number)
            .or_default()
            .push(planet.abbreviation());
    }
    grouped
}

/// Sign shown in a house; falls back to the house number itself when the
/// house list is missing or has no entry for it.
pub fn sign_for_house(houses: Option<&[House]>, number: u8) -> u8 {
    houses
        .and_then(|houses| houses.iter().find(|h| h.number == number))
        .map(|h| h.sign_number)
        .unwrap_or(number)
}

/// Lay out the twelve houses
pub fn layout(planets: &[Planet], houses: Option<&[House]>, lagna_sign: Option<u8>) -> ChartRenderModel {
    let mut grouped = planets_by_house(planets);

    let houses = (1..=12u8)
        .zip(PLANET_ANCHORS.iter().zip(SIGN_ANCHORS.iter()))
        .map(|(number, (planet_anchor, sign_anchor))| HouseCell {
            number,
            sign: sign_for_house(houses, number),
            planets: grouped.remove(&number).unwrap_or_default(),
            planet_anchor: *planet_anchor,
            sign_anchor: *sign_anchor,
        })
        .collect();

    ChartRenderModel { lagna_sign, houses }
}

impl ChartRenderModel {
    pub fn house(&self, number: u8) -> Option<&HouseCell> {
        self.houses.iter().find(|h| h.number == number)
    }

    pub fn write_svg<W: Write>(&self, out: &mut W) -> fmt::Result {
        let size = CANVAS_SIZE;
        let band = CAPTION_BAND;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 -{band} {size} {}" class="kundli-svg">"#,
            size + band
        )?;
        writeln!(
            out,
            r#"  <text x="{}" y="-10" class="chart-caption" text-anchor="middle">{CAPTION}</text>"#,
            size / 2
        )?;
        writeln!(
            out,
            r#"  <rect x="2" y="2" width="{}" height="{}" class="chart-line" fill="none" stroke="currentColor"/>"#,
            size - 4,
            size - 4
        )?;
        for (from, to) in CHART_LINES {
            writeln!(
                out,
                r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" class="chart-line" stroke="currentColor"/>"#,
                from.x, from.y, to.x, to.y
            )?;
        }

        for house in &self.houses {
            writeln!(out, r#"  <g data-house="{}">"#, house.number)?;
            writeln!(
                out,
                r#"    <text x="{}" y="{}" class="rash-num" text-anchor="middle">{}</text>"#,
                house.sign_anchor.x, house.sign_anchor.y, house.sign
            )?;
            writeln!(
                out,
                r#"    <text x="{}" y="{}" class="planet-text" text-anchor="middle">{}</text>"#,
                house.planet_anchor.x,
                house.planet_anchor.y,
                escape_xml(&house.planet_text())
            )?;
            writeln!(out, "  </g>")?;
        }

        writeln!(out, "</svg>")
    }

    /// SVG document for the chart
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        // fmt::Write for String never fails
        let _ = self.write_svg(&mut svg);
        svg
    }

    /// One line per house: "1 [4] Mo Ke"
    pub fn to_text(&self) -> String {
        let mut text = format!("{CAPTION}\n");
        for house in &self.houses {
            let planets = house.planet_text();
            let _ = writeln!(
                text,
                "{:>2} [{:>2}] {}",
                house.number,
                house.sign,
                if planets.is_empty() { "-" } else { planets.as_str() }
            );
        }
        text
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
