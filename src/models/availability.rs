use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::validation::format_time;

/// Candidate interval `[start, end)` as reported by the backend at query time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilitySlot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub available: bool,
}

impl AvailabilitySlot {
    pub fn time_label(&self) -> String {
        format_time(&self.start)
    }
}

/// Response envelope of the availability endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityDay {
    pub employee_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub slots: Vec<AvailabilitySlot>,
    #[serde(default)]
    pub total_available: u32,
    #[serde(default)]
    pub total_slots: u32,
}

impl AvailabilityDay {
    /// Slots ordered by start time.
    pub fn into_sorted_slots(self) -> Vec<AvailabilitySlot> {
        let mut slots = self.slots;
        slots.sort_by_key(|s| s.start);
        slots
    }
}
