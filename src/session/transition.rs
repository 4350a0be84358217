use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::services::submitter::{self, RequestError};
use crate::validation::tomorrow;

use super::effect::{AvailabilityKey, CatalogKey, Effect, EmployeesKey};
use super::event::{CatalogOutcome, ContactField, Event, SubmissionOutcome, UserEvent};
use super::state::{Notice, NoticeKind, PageStatus, SessionState, Step};

/// Next snapshot plus the work it asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("the booking page has not finished loading")]
    PageNotReady,

    #[error("{event} is not allowed on step {step}")]
    NotAllowed { step: Step, event: &'static str },

    #[error("unknown service {0}")]
    UnknownService(i64),

    #[error("unknown employee {0}")]
    UnknownEmployee(i64),

    #[error("no slot starts at {0}")]
    UnknownSlot(DateTime<FixedOffset>),

    #[error("slot at {0} is not available")]
    SlotUnavailable(DateTime<FixedOffset>),

    #[error("date {0} is in the past")]
    DateInPast(NaiveDate),

    #[error("a booking request is already in flight")]
    SubmissionInFlight,

    #[error("selection is incomplete: missing {0}")]
    IncompleteSelection(&'static str),
}

/// Computes the snapshot that follows `event`. `state` is never mutated;
/// a rejected event leaves the caller's snapshot as it was.
pub fn transition(
    state: &SessionState,
    event: Event,
    today: NaiveDate,
) -> Result<Transition, TransitionError> {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        Event::User(user) => apply_user_event(&mut next, user, today, &mut effects)?,
        Event::CatalogLoaded { key, outcome } => apply_catalog(&mut next, key, outcome),
        Event::EmployeesLoaded { key, employees } => {
            if employees_current(&next, &key) {
                next.pending_employees = None;
                next.employees = employees;
            } else {
                tracing::debug!(ticket = key.ticket, service_id = key.service_id, "discarding stale employee list");
            }
        }
        Event::AvailabilityLoaded { key, slots } => {
            if availability_current(&next, &key) {
                next.pending_availability = None;
                next.slots = slots;
            } else {
                tracing::debug!(ticket = key.ticket, date = %key.date, "discarding stale availability");
            }
        }
        Event::BookingResolved { ticket, outcome } => apply_booking(&mut next, ticket, outcome),
    }

    Ok(Transition {
        state: next,
        effects,
    })
}

fn apply_user_event(
    next: &mut SessionState,
    event: UserEvent,
    today: NaiveDate,
    effects: &mut Vec<Effect>,
) -> Result<(), TransitionError> {
    if !next.is_ready() && event != UserEvent::ReloadRequested {
        return Err(TransitionError::PageNotReady);
    }

    let step = next.step;
    let name = event.name();
    let not_allowed = || TransitionError::NotAllowed { step, event: name };

    match event {
        UserEvent::ServiceChosen { service_id } => {
            if step != Step::SelectService {
                return Err(not_allowed());
            }
            let service = next
                .services
                .iter()
                .find(|s| s.id == service_id)
                .cloned()
                .ok_or(TransitionError::UnknownService(service_id))?;

            next.selection.service = Some(service);
            next.selection.employee = None;
            next.selection.clear_slot();
            next.employees.clear();
            next.slots.clear();
            next.pending_availability = None;
            enter_select_employee(next, effects);
        }

        UserEvent::EmployeeChosen { employee_id } => {
            if step != Step::SelectEmployee {
                return Err(not_allowed());
            }
            let employee = next
                .employees
                .iter()
                .find(|e| e.id == employee_id)
                .cloned()
                .ok_or(TransitionError::UnknownEmployee(employee_id))?;

            next.selection.employee = Some(employee);
            next.selection.clear_slot();
            if next.selection.date.map_or(true, |d| d < today) {
                next.selection.date = Some(tomorrow(today));
            }
            next.slots.clear();
            enter_select_slot(next, effects);
        }

        UserEvent::DateChanged { date } => {
            if step != Step::SelectSlot {
                return Err(not_allowed());
            }
            if date < today {
                return Err(TransitionError::DateInPast(date));
            }
            next.selection.date = Some(date);
            next.selection.clear_slot();
            next.slots.clear();
            effects.extend(next.begin_availability_load());
        }

        UserEvent::SlotChosen { start } => {
            if step != Step::SelectSlot {
                return Err(not_allowed());
            }
            let slot = next
                .slots
                .iter()
                .find(|s| s.start == start)
                .cloned()
                .ok_or(TransitionError::UnknownSlot(start))?;
            if !slot.available {
                return Err(TransitionError::SlotUnavailable(start));
            }

            next.selection.time_label = Some(slot.time_label());
            next.selection.slot = Some(slot);
            next.field_errors.clear();
            next.notice = None;
            next.step = Step::EnterContact;
        }

        UserEvent::ContactEdited { field, value } => {
            if step != Step::EnterContact {
                return Err(not_allowed());
            }
            let contact = &mut next.selection.contact;
            match field {
                ContactField::Name => contact.name = value,
                ContactField::Phone => contact.phone = value,
                ContactField::Email => contact.email = non_blank(value),
                ContactField::Notes => contact.notes = non_blank(value),
                ContactField::Consent => contact.consent = value.trim().eq_ignore_ascii_case("true"),
            }
            next.field_errors.retain(|e| e.field != field);
        }

        UserEvent::ConsentChanged { given } => {
            if step != Step::EnterContact {
                return Err(not_allowed());
            }
            next.selection.contact.consent = given;
            next.field_errors.retain(|e| e.field != ContactField::Consent);
        }

        UserEvent::SubmitRequested => {
            if step != Step::EnterContact {
                return Err(not_allowed());
            }
            if next.is_submitting() {
                return Err(TransitionError::SubmissionInFlight);
            }

            match submitter::build_request(&next.selection) {
                Ok(request) => {
                    let ticket = next.issue_ticket();
                    next.pending_submission = Some(ticket);
                    next.field_errors.clear();
                    next.notice = None;
                    effects.push(Effect::SubmitBooking {
                        ticket,
                        slug: next.slug.clone(),
                        request,
                    });
                }
                Err(RequestError::Incomplete(missing)) => {
                    return Err(TransitionError::IncompleteSelection(missing));
                }
                Err(RequestError::InvalidContact(errors)) => {
                    next.field_errors = errors;
                }
            }
        }

        UserEvent::BackRequested => {
            if next.is_submitting() {
                return Err(TransitionError::SubmissionInFlight);
            }
            match step.previous() {
                Some(Step::SelectService) => {
                    next.selection.clear_slot();
                    next.pending_employees = None;
                    next.pending_availability = None;
                    next.step = Step::SelectService;
                }
                Some(Step::SelectEmployee) => {
                    next.selection.clear_slot();
                    next.pending_availability = None;
                    enter_select_employee(next, effects);
                }
                Some(Step::SelectSlot) => {
                    next.notice = None;
                    next.field_errors.clear();
                    enter_select_slot(next, effects);
                }
                _ => return Err(not_allowed()),
            }
        }

        UserEvent::ReloadRequested => effects.push(next.reset()),
    }

    Ok(())
}

fn enter_select_employee(next: &mut SessionState, effects: &mut Vec<Effect>) {
    next.step = Step::SelectEmployee;
    effects.extend(next.begin_employees_load());
}

fn enter_select_slot(next: &mut SessionState, effects: &mut Vec<Effect>) {
    next.step = Step::SelectSlot;
    effects.extend(next.begin_availability_load());
}

fn apply_catalog(next: &mut SessionState, key: CatalogKey, outcome: CatalogOutcome) {
    if next.pending_catalog.as_ref() != Some(&key) {
        tracing::debug!(ticket = key.ticket, slug = %key.slug, "discarding stale catalog");
        return;
    }
    next.pending_catalog = None;

    match outcome {
        CatalogOutcome::Loaded { profile, services } => {
            let (services, malformed): (Vec<_>, Vec<_>) =
                services.into_iter().partition(|s| s.is_well_formed());
            for svc in &malformed {
                tracing::warn!(slug = %next.slug, service_id = svc.id, "dropping malformed catalog entry");
            }
            next.profile = Some(profile);
            next.services = services;
            next.page = PageStatus::Ready;
        }
        CatalogOutcome::NotFound => next.page = PageStatus::NotFound,
        CatalogOutcome::Failed { message } => next.page = PageStatus::Failed { message },
    }
}

fn apply_booking(next: &mut SessionState, ticket: u64, outcome: SubmissionOutcome) {
    if next.pending_submission != Some(ticket) || next.step != Step::EnterContact {
        tracing::debug!(ticket, "discarding stale booking result");
        return;
    }
    next.pending_submission = None;

    match outcome {
        SubmissionOutcome::Confirmed(confirmation) => {
            next.confirmation = Some(confirmation);
            next.notice = None;
            next.step = Step::Confirmed;
        }
        SubmissionOutcome::Conflict { message } => {
            next.notice = Some(Notice {
                kind: NoticeKind::Conflict,
                message,
            });
        }
        SubmissionOutcome::Rejected { message } => {
            next.notice = Some(Notice {
                kind: NoticeKind::Failure,
                message,
            });
        }
    }
}

fn employees_current(state: &SessionState, key: &EmployeesKey) -> bool {
    state.pending_employees.as_ref() == Some(key)
        && state.selection.service.as_ref().map(|s| s.id) == Some(key.service_id)
}

fn availability_current(state: &SessionState, key: &AvailabilityKey) -> bool {
    state.pending_availability.as_ref() == Some(key)
        && state.selection.service.as_ref().map(|s| s.id) == Some(key.service_id)
        && state.selection.employee.as_ref().map(|e| e.id) == Some(key.employee_id)
        && state.selection.date == Some(key.date)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
