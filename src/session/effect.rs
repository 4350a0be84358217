use chrono::NaiveDate;

use crate::models::BookingRequest;

/// Identifies one catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogKey {
    pub ticket: u64,
    pub slug: String,
}

/// Identifies one employee-roster load by its dependency tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeesKey {
    pub ticket: u64,
    pub slug: String,
    pub service_id: i64,
}

/// Identifies one availability load by its dependency tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityKey {
    pub ticket: u64,
    pub slug: String,
    pub employee_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadCatalog(CatalogKey),
    LoadEmployees(EmployeesKey),
    LoadAvailability(AvailabilityKey),
    SubmitBooking {
        ticket: u64,
        slug: String,
        request: BookingRequest,
    },
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::LoadCatalog(_) => "load_catalog",
            Effect::LoadEmployees(_) => "load_employees",
            Effect::LoadAvailability(_) => "load_availability",
            Effect::SubmitBooking { .. } => "submit_booking",
        }
    }
}
