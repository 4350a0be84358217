use crate::session::{AvailabilityKey, CatalogOutcome, EmployeesKey};
use crate::models::{AvailabilitySlot, EmployeeEntry};

use super::backend::{BackendError, BookingBackend};

/// Profile and services are fetched concurrently; both must succeed.
pub async fn load_catalog(backend: &dyn BookingBackend, slug: &str) -> CatalogOutcome {
    let (profile, services) =
        tokio::join!(backend.business_profile(slug), backend.list_services(slug));

    match (profile, services) {
        (Ok(profile), Ok(services)) => {
            tracing::info!(slug, services = services.len(), "catalog loaded");
            CatalogOutcome::Loaded { profile, services }
        }
        (Err(BackendError::NotFound(detail)), _) => {
            tracing::info!(slug, detail = %detail, "business not found");
            CatalogOutcome::NotFound
        }
        (Err(e), _) | (Ok(_), Err(e)) => {
            tracing::error!(slug, error = %e, "failed to load booking page");
            CatalogOutcome::Failed {
                message: e.to_string(),
            }
        }
    }
}

/// Failures degrade to an empty roster.
pub async fn load_employees(backend: &dyn BookingBackend, key: &EmployeesKey) -> Vec<EmployeeEntry> {
    match backend.list_employees(&key.slug, key.service_id).await {
        Ok(employees) => employees,
        Err(e) => {
            tracing::warn!(
                slug = %key.slug,
                service_id = key.service_id,
                error = %e,
                "employee lookup failed, showing none"
            );
            Vec::new()
        }
    }
}

/// Failures degrade to an empty day. Unavailable slots are kept.
pub async fn load_availability(
    backend: &dyn BookingBackend,
    key: &AvailabilityKey,
) -> Vec<AvailabilitySlot> {
    match backend
        .availability(&key.slug, key.employee_id, key.service_id, key.date)
        .await
    {
        Ok(mut slots) => {
            slots.sort_by_key(|s| s.start);
            slots
        }
        Err(e) => {
            tracing::warn!(
                slug = %key.slug,
                employee_id = key.employee_id,
                service_id = key.service_id,
                date = %key.date,
                error = %e,
                "availability lookup failed, showing empty day"
            );
            Vec::new()
        }
    }
}
