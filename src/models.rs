use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Thresholds;

/// One vaccination-due event, immutable once ingested.
#[derive(Debug, Clone)]
pub struct VaccinationRecord {
    pub district: String,
    pub facility: String,
    pub unit: String,
    pub dose_number: u32,
    pub due_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
}

impl VaccinationRecord {
    /// A record counts as completed whenever a completion date is present,
    /// regardless of how it relates to the due date.
    pub fn completed(&self) -> bool {
        self.completed_date.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitSummary {
    pub district: String,
    pub facility: String,
    pub unit: String,
    pub target: usize,
    pub completed: usize,
    /// Completion percentage, rounded to 2 decimal places. 0.0 when target is 0.
    pub ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacilitySummary {
    pub district: String,
    pub facility: String,
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
    pub total_units: usize,
}

impl FacilitySummary {
    pub fn at_risk(&self) -> bool {
        self.red > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Green,
    Yellow,
    Red,
}

impl Tier {
    /// Maps a completion ratio onto exactly one tier. The floor threshold is
    /// inclusive for YELLOW, the target threshold inclusive for GREEN.
    pub fn classify(ratio: f64, thresholds: &Thresholds) -> Tier {
        if ratio >= thresholds.target() {
            Tier::Green
        } else if ratio >= thresholds.floor() {
            Tier::Yellow
        } else {
            Tier::Red
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Green => "on target",
            Tier::Yellow => "needs improvement",
            Tier::Red => "critical",
        }
    }
}
