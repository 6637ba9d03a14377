use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Visits per reading room over the report period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomVisits {
    #[serde(rename = "room__name")]
    pub room_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookTotal {
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    #[serde(default)]
    pub room_data: Vec<RoomVisits>,
    pub total_books: BookTotal,
    pub new_readers: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderStatistics {
    pub readers_under_20: i64,
    /// Share of readers per education level, in percent.
    #[serde(default)]
    pub education_statistics: BTreeMap<String, f64>,
}

/// Result of `/reports/complex/`. Which fields are present depends on the
/// report kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplexReport {
    pub readers_under_20: Option<i64>,
    #[serde(default)]
    pub education_statistics: BTreeMap<String, f64>,
    #[serde(default)]
    pub room_data: Vec<RoomVisits>,
    pub total_books: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexReportKind {
    Summary,
    ReaderStatistics,
}

impl ComplexReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexReportKind::Summary => "summary",
            ComplexReportKind::ReaderStatistics => "reader_statistics",
        }
    }
}

impl fmt::Display for ComplexReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
