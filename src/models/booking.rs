use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::validation::{format_date, format_time_range};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
        }
    }
}

/// Contact sub-form of the booking draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub consent: bool,
}

/// Body of the public booking call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRequest {
    pub service_id: i64,
    pub employee_id: i64,
    pub start_time: DateTime<FixedOffset>,
    pub client_name: String,
    pub client_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_notes: Option<String>,
    pub gdpr_consent: bool,
}

/// Server-issued booking result. Its times are authoritative over the
/// slot the visitor picked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingConfirmation {
    pub appointment_id: i64,
    pub status: BookingStatus,
    #[serde(rename = "start_time")]
    pub start: DateTime<FixedOffset>,
    #[serde(rename = "end_time")]
    pub end: DateTime<FixedOffset>,
    #[serde(default)]
    pub message: String,
}

impl BookingConfirmation {
    pub fn date_label(&self) -> String {
        format_date(&self.start.date_naive())
    }

    pub fn time_range_label(&self) -> String {
        format_time_range(&self.start, &self.end)
    }
}
