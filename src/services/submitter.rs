use serde::{Deserialize, Serialize};

use crate::models::BookingRequest;
use crate::session::{ContactField, Selection, SubmissionOutcome};
use crate::validation::{is_valid_phone, normalize_phone};

use super::backend::{BackendError, BookingBackend};

pub const MAX_NOTES_CHARS: usize = 500;

pub const CONFLICT_MESSAGE: &str =
    "Sorry, that time slot was just booked. Please go back and choose another time.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    pub field: ContactField,
    pub message: String,
}

impl FieldError {
    fn new(field: ContactField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    Incomplete(&'static str),
    InvalidContact(Vec<FieldError>),
}

/// Checks the draft and builds the request body. Nothing invalid reaches
/// the network.
pub fn build_request(selection: &Selection) -> Result<BookingRequest, RequestError> {
    let service = selection.service.as_ref().ok_or(RequestError::Incomplete("service"))?;
    let employee = selection.employee.as_ref().ok_or(RequestError::Incomplete("employee"))?;
    let slot = selection.slot.as_ref().ok_or(RequestError::Incomplete("slot"))?;
    let contact = &selection.contact;

    let mut errors = Vec::new();
    let name = contact.name.trim();
    if name.is_empty() {
        errors.push(FieldError::new(ContactField::Name, "Please enter your full name."));
    }
    if !is_valid_phone(&contact.phone) {
        errors.push(FieldError::new(
            ContactField::Phone,
            "Enter a Romanian mobile number, e.g. 0712345678 or +40712345678.",
        ));
    }
    if !contact.consent {
        errors.push(FieldError::new(
            ContactField::Consent,
            "Consent to personal data processing is required.",
        ));
    }
    if contact
        .notes
        .as_deref()
        .is_some_and(|n| n.chars().count() > MAX_NOTES_CHARS)
    {
        errors.push(FieldError::new(
            ContactField::Notes,
            "Notes can be at most 500 characters.",
        ));
    }
    if !errors.is_empty() {
        return Err(RequestError::InvalidContact(errors));
    }

    Ok(BookingRequest {
        service_id: service.id,
        employee_id: employee.id,
        start_time: slot.start,
        client_name: name.to_string(),
        client_phone: normalize_phone(&contact.phone),
        client_email: contact.email.clone(),
        client_notes: contact.notes.clone(),
        gdpr_consent: contact.consent,
    })
}

/// Sends one booking request. Any 409, whatever caused it, is reported as
/// a conflict.
pub async fn submit(
    backend: &dyn BookingBackend,
    slug: &str,
    request: &BookingRequest,
) -> SubmissionOutcome {
    tracing::info!(
        slug,
        service_id = request.service_id,
        employee_id = request.employee_id,
        start = %request.start_time,
        "submitting booking"
    );

    match backend.create_booking(slug, request).await {
        Ok(confirmation) => {
            tracing::info!(
                slug,
                appointment_id = confirmation.appointment_id,
                status = confirmation.status.as_str(),
                "booking created"
            );
            SubmissionOutcome::Confirmed(confirmation)
        }
        Err(BackendError::Conflict(detail)) => {
            tracing::info!(slug, start = %request.start_time, detail = %detail, "slot taken at submit time");
            SubmissionOutcome::Conflict {
                message: CONFLICT_MESSAGE.to_string(),
            }
        }
        Err(e) => {
            tracing::warn!(slug, error = %e, "booking failed");
            SubmissionOutcome::Rejected {
                message: user_message(&e),
            }
        }
    }
}

fn user_message(err: &BackendError) -> String {
    match err {
        BackendError::Validation(detail) | BackendError::NotFound(detail) => detail.clone(),
        BackendError::Transport(_) => {
            "Could not reach the booking service. Please try again.".to_string()
        }
        BackendError::Conflict(_) => CONFLICT_MESSAGE.to_string(),
        BackendError::Status { .. } => {
            "The booking could not be completed. Please try again.".to_string()
        }
    }
}
