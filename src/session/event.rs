use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{
    AvailabilitySlot, BookingConfirmation, BusinessProfile, EmployeeEntry, ServiceCatalogEntry,
};

use super::effect::{AvailabilityKey, CatalogKey, EmployeesKey};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Phone,
    Email,
    Notes,
    Consent,
}

/// Events the presentation layer can send.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserEvent {
    ServiceChosen { service_id: i64 },
    EmployeeChosen { employee_id: i64 },
    DateChanged { date: NaiveDate },
    SlotChosen { start: DateTime<FixedOffset> },
    ContactEdited { field: ContactField, value: String },
    ConsentChanged { given: bool },
    SubmitRequested,
    BackRequested,
    ReloadRequested,
}

impl UserEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UserEvent::ServiceChosen { .. } => "service_chosen",
            UserEvent::EmployeeChosen { .. } => "employee_chosen",
            UserEvent::DateChanged { .. } => "date_changed",
            UserEvent::SlotChosen { .. } => "slot_chosen",
            UserEvent::ContactEdited { .. } => "contact_edited",
            UserEvent::ConsentChanged { .. } => "consent_changed",
            UserEvent::SubmitRequested => "submit_requested",
            UserEvent::BackRequested => "back_requested",
            UserEvent::ReloadRequested => "reload_requested",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogOutcome {
    Loaded {
        profile: BusinessProfile,
        services: Vec<ServiceCatalogEntry>,
    },
    NotFound,
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Confirmed(BookingConfirmation),
    Conflict { message: String },
    Rejected { message: String },
}

/// Everything that can drive a transition: visitor input and loader results.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    User(UserEvent),
    CatalogLoaded {
        key: CatalogKey,
        outcome: CatalogOutcome,
    },
    EmployeesLoaded {
        key: EmployeesKey,
        employees: Vec<EmployeeEntry>,
    },
    AvailabilityLoaded {
        key: AvailabilityKey,
        slots: Vec<AvailabilitySlot>,
    },
    BookingResolved {
        ticket: u64,
        outcome: SubmissionOutcome,
    },
}

impl From<UserEvent> for Event {
    fn from(event: UserEvent) -> Self {
        Event::User(event)
    }
}
