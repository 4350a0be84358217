use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::models::BookingStatus;
use crate::services::submitter::FieldError;

use super::state::{Notice, PageStatus, SessionState, Step};

/// What the presentation layer renders for one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub page: PageStatus,
    pub step: Step,
    pub step_number: u8,
    pub can_go_back: bool,
    pub business: Option<BusinessView>,
    pub services: Vec<ServiceView>,
    pub employees: Vec<EmployeeView>,
    pub date: Option<NaiveDate>,
    pub min_date: NaiveDate,
    pub slot_grid: SlotGridStatus,
    pub slots: Vec<SlotView>,
    pub summary: SelectionSummary,
    pub loading: LoadingFlags,
    pub field_errors: Vec<FieldError>,
    pub notice: Option<Notice>,
    pub confirmation: Option<ConfirmationView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessView {
    pub name: String,
    pub vertical: String,
    pub location: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price_label: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeView {
    pub id: i64,
    pub name: String,
    pub initials: String,
    pub role: Option<String>,
    pub color: String,
    pub avatar_url: Option<String>,
}

/// Distinguishes a fully booked day from a day with no schedule.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlotGridStatus {
    Hidden,
    Loading,
    NoSchedule,
    FullyBooked,
    Open,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub time: String,
    pub enabled: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionSummary {
    pub service: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price_label: Option<String>,
    pub employee: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub contact_notes: Option<String>,
    pub consent: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LoadingFlags {
    pub catalog: bool,
    pub employees: bool,
    pub availability: bool,
    pub submitting: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationView {
    pub appointment_id: i64,
    pub status: BookingStatus,
    pub message: String,
    pub service: Option<String>,
    pub employee: Option<String>,
    pub date: String,
    pub time_range: String,
    pub price_label: Option<String>,
    pub cancellation_notice: Option<String>,
}

impl SessionView {
    pub fn build(state: &SessionState, today: NaiveDate) -> Self {
        let selection = &state.selection;

        let slot_grid = if state.step != Step::SelectSlot {
            SlotGridStatus::Hidden
        } else if state.pending_availability.is_some() && state.slots.is_empty() {
            SlotGridStatus::Loading
        } else if state.slots.is_empty() {
            SlotGridStatus::NoSchedule
        } else if state.selectable_slots().next().is_none() {
            SlotGridStatus::FullyBooked
        } else {
            SlotGridStatus::Open
        };

        let slots = state
            .slots
            .iter()
            .map(|slot| SlotView {
                start: slot.start,
                end: slot.end,
                time: slot.time_label(),
                enabled: slot.available,
                selected: selection.slot.as_ref().map(|s| s.start) == Some(slot.start),
            })
            .collect();

        let summary = SelectionSummary {
            service: selection.service.as_ref().map(|s| s.name.clone()),
            duration_minutes: selection.service.as_ref().map(|s| s.duration_minutes),
            price_label: selection.service.as_ref().map(|s| s.price_label()),
            employee: selection.employee.as_ref().map(|e| e.name().to_string()),
            date: selection.date,
            time: selection.time_label.clone(),
            contact_name: selection.contact.name.clone(),
            contact_phone: selection.contact.phone.clone(),
            contact_email: selection.contact.email.clone(),
            contact_notes: selection.contact.notes.clone(),
            consent: selection.contact.consent,
        };

        let confirmation = state.confirmation.as_ref().map(|c| ConfirmationView {
            appointment_id: c.appointment_id,
            status: c.status,
            message: c.message.clone(),
            service: summary.service.clone(),
            employee: summary.employee.clone(),
            date: c.date_label(),
            time_range: c.time_range_label(),
            price_label: summary.price_label.clone(),
            cancellation_notice: state.profile.as_ref().map(|p| p.cancellation_notice()),
        });

        Self {
            page: state.page.clone(),
            step: state.step,
            step_number: state.step.number(),
            can_go_back: state.step.previous().is_some() && !state.is_submitting(),
            business: state.profile.as_ref().map(|p| BusinessView {
                name: p.name.clone(),
                vertical: p.vertical.clone(),
                location: p.location_line(),
                phone: p.phone.clone(),
            }),
            services: state
                .services
                .iter()
                .map(|s| ServiceView {
                    id: s.id,
                    name: s.name.clone(),
                    description: s.description.clone(),
                    duration_minutes: s.duration_minutes,
                    price_label: s.price_label(),
                    color: s.color.clone(),
                })
                .collect(),
            employees: state
                .employees
                .iter()
                .map(|e| EmployeeView {
                    id: e.id,
                    name: e.name().to_string(),
                    initials: e.initials(),
                    role: e.role.clone(),
                    color: e.color.clone(),
                    avatar_url: e.avatar_url.clone(),
                })
                .collect(),
            date: selection.date,
            min_date: today,
            slot_grid,
            slots,
            summary,
            loading: LoadingFlags {
                catalog: state.pending_catalog.is_some(),
                employees: state.pending_employees.is_some(),
                availability: state.pending_availability.is_some(),
                submitting: state.is_submitting(),
            },
            field_errors: state.field_errors.clone(),
            notice: state.notice.clone(),
            confirmation,
        }
    }
}
