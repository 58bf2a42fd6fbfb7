//! Vimshottari dasha timeline view
//!
//! At most one major period is expanded at a time; clicking the expanded one
//! collapses it again.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::Dasha;

/// Expand/collapse state of the timeline, keyed by major-period position
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DashaTimeline {
    expanded: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashaView {
    pub mahadashas: Vec<MahaDashaRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MahaDashaRow {
    pub index: usize,
    pub planet: String,
    pub start: String,
    pub end: String,
    pub expanded: bool,
    /// Present only while expanded and when the backend sent sub-periods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_periods: Option<Vec<AntarDashaRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AntarDashaRow {
    /// "<major> - <sub>", e.g. "Ketu - Venus"
    pub label: String,
    pub end: String,
}

impl DashaTimeline {
    /// Click on major period `index`
    pub fn toggle(&mut self, index: usize) {
        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    /// Build the visible rows. `None` when there is no major-period list at
    /// all; an empty list still yields an (empty) view.
    pub fn render(&self, dasha: Option<&Dasha>, date_format: &str) -> Option<DashaView> {
        let mahadashas = dasha?.mahadashas.as_ref()?;

        let rows = mahadashas
            .iter()
            .enumerate()
            .map(|(index, md)| {
                let expanded = self.expanded == Some(index);
                let sub_periods = md.sub_periods.as_ref().filter(|_| expanded).map(|subs| {
                    subs.iter()
                        .map(|ad| AntarDashaRow {
                            label: format!("{} - {}", md.planet, ad.planet),
                            end: format_date(ad.end_date.as_deref(), date_format),
                        })
                        .collect()
                });

                MahaDashaRow {
                    index,
                    planet: md.planet.clone(),
                    start: format_date(md.start_date.as_deref(), date_format),
                    end: format_date(md.end_date.as_deref(), date_format),
                    expanded,
                    sub_periods,
                }
            })
            .collect();

        Some(DashaView { mahadashas: rows })
    }
}

impl DashaView {
    pub fn to_text(&self) -> String {
        let mut text = String::from("Vimshottari Dasha\n");
        for row in &self.mahadashas {
            let marker = if row.expanded { '-' } else { '+' };
            let _ = writeln!(
                text,
                "{} [{}] {}  {} - {}",
                marker, row.index, row.planet, row.start, row.end
            );
            for sub in row.sub_periods.iter().flatten() {
                let _ = writeln!(text, "      {}  {}", sub.label, sub.end);
            }
        }
        text
    }
}

/// Format a backend date for display.
///
/// Accepts RFC 3339 timestamps, ISO date-times and plain dates. Missing
/// values give an empty string; unparseable text is returned as-is.
pub fn format_date(value: Option<&str>, date_format: &str) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return String::new();
    };

    let Some(date) = parse_date(value) else {
        tracing::debug!(value, "unrecognised dasha date");
        return value.to_string();
    };

    let mut out = String::new();
    if write!(out, "{}", date.format(date_format)).is_err() {
        tracing::warn!(date_format, "invalid date format, using ISO dates");
        return date.to_string();
    }
    out
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = value.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }
    value.parse::<NaiveDate>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::delhi_fixture;

    const DMY: &str = "%d/%m/%Y";

    fn fixture_dasha() -> Dasha {
        delhi_fixture().dasha.unwrap()
    }

    #[test]
    fn test_toggle_state_machine() {
        let mut timeline = DashaTimeline::default();
        assert_eq!(timeline.expanded, None);

        timeline.toggle(0);
        assert_eq!(timeline.expanded, Some(0));
        timeline.toggle(1);
        assert_eq!(timeline.expanded, Some(1));
        timeline.toggle(1);
        assert_eq!(timeline.expanded, None);
    }

    #[test]
    fn test_double_click_is_a_no_op() {
        for start in [None, Some(0), Some(3)] {
            for index in 0..4 {
                let mut timeline = DashaTimeline { expanded: start };
                timeline.toggle(index);
                timeline.toggle(index);
                assert_eq!(timeline.expanded, start, "start {start:?}, index {index}");
            }
        }
    }

    #[test]
    fn test_expanding_is_mutually_exclusive() {
        let dasha = fixture_dasha();
        let mut timeline = DashaTimeline::default();

        let view = timeline.render(Some(&dasha), DMY).unwrap();
        assert_eq!(view.mahadashas.len(), 2);
        assert!(view.mahadashas.iter().all(|r| r.sub_periods.is_none()));

        timeline.toggle(0);
        let view = timeline.render(Some(&dasha), DMY).unwrap();
        let subs = view.mahadashas[0].sub_periods.as_ref().unwrap();
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[1].label, "Ketu - Venus");
        assert_eq!(subs[1].end, "06/10/1987");
        assert!(view.mahadashas[1].sub_periods.is_none());

        timeline.toggle(1);
        let view = timeline.render(Some(&dasha), DMY).unwrap();
        assert!(view.mahadashas[0].sub_periods.is_none());
        assert!(!view.mahadashas[0].expanded);
        assert_eq!(view.mahadashas[1].sub_periods.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_list_renders_nothing_but_empty_list_renders() {
        let timeline = DashaTimeline::default();
        assert!(timeline.render(None, DMY).is_none());
        assert!(timeline.render(Some(&Dasha::default()), DMY).is_none());

        let empty = Dasha {
            mahadashas: Some(Vec::new()),
        };
        let view = timeline.render(Some(&empty), DMY).unwrap();
        assert!(view.mahadashas.is_empty());
    }

    #[test]
    fn test_period_boundaries() {
        let view = DashaTimeline::default()
            .render(Some(&fixture_dasha()), DMY)
            .unwrap();
        assert_eq!(view.mahadashas[0].planet, "Ketu");
        assert_eq!(view.mahadashas[0].start, "10/03/1986");
        assert_eq!(view.mahadashas[0].end, "10/03/1993");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(None, DMY), "");
        assert_eq!(format_date(Some(""), DMY), "");
        assert_eq!(format_date(Some("1989-02-24"), DMY), "24/02/1989");
        assert_eq!(format_date(Some("1989-02-24T16:30:00.123456"), DMY), "24/02/1989");
        assert_eq!(format_date(Some("1989-02-24T23:30:00+05:30"), DMY), "24/02/1989");
        assert_eq!(format_date(Some("1989-02-24"), "%x"), "02/24/89");
        assert_eq!(format_date(Some("someday"), DMY), "someday");
    }

    #[test]
    fn test_text_view() {
        let mut timeline = DashaTimeline::default();
        timeline.toggle(0);
        let text = timeline.render(Some(&fixture_dasha()), DMY).unwrap().to_text();

        assert!(text.contains("- [0] Ketu  10/03/1986 - 10/03/1993"));
        assert!(text.contains("Ketu - Sun  10/03/1993"));
        assert!(text.contains("+ [1] Venus"));
    }
}
