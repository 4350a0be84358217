use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{
    AvailabilitySlot, BookingConfirmation, BookingRequest, BusinessProfile, EmployeeEntry,
    ServiceCatalogEntry,
};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("slot no longer available: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Public booking endpoints of the backend, scoped by business slug.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn business_profile(&self, slug: &str) -> Result<BusinessProfile, BackendError>;

    async fn list_services(&self, slug: &str) -> Result<Vec<ServiceCatalogEntry>, BackendError>;

    async fn list_employees(
        &self,
        slug: &str,
        service_id: i64,
    ) -> Result<Vec<EmployeeEntry>, BackendError>;

    async fn availability(
        &self,
        slug: &str,
        employee_id: i64,
        service_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, BackendError>;

    async fn create_booking(
        &self,
        slug: &str,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, BackendError>;
}
