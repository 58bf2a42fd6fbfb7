use serde::{Deserialize, Serialize};

/// Vimshottari timeline as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dasha {
    /// `None` when the backend left the list out entirely
    pub mahadashas: Option<Vec<MahaDasha>>,
}

/// A major period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MahaDasha {
    pub planet: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Chronological; together they cover the major period
    pub sub_periods: Option<Vec<AntarDasha>>,
}

/// A sub-period; its start is the previous sub-period's end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntarDasha {
    pub planet: String,
    pub end_date: Option<String>,
}
