use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    AvailabilitySlot, BookingConfirmation, BusinessProfile, ContactDetails, EmployeeEntry,
    ServiceCatalogEntry,
};
use crate::services::submitter::FieldError;

use super::effect::{AvailabilityKey, CatalogKey, Effect, EmployeesKey};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    SelectService,
    SelectEmployee,
    SelectSlot,
    EnterContact,
    Confirmed,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::SelectService => "select_service",
            Step::SelectEmployee => "select_employee",
            Step::SelectSlot => "select_slot",
            Step::EnterContact => "enter_contact",
            Step::Confirmed => "confirmed",
        }
    }

    /// 1-based position for progress indicators.
    pub fn number(&self) -> u8 {
        match self {
            Step::SelectService => 1,
            Step::SelectEmployee => 2,
            Step::SelectSlot => 3,
            Step::EnterContact => 4,
            Step::Confirmed => 5,
        }
    }

    /// Target of the back edge. `None` for the first and the terminal step.
    pub fn previous(&self) -> Option<Step> {
        match self {
            Step::SelectService | Step::Confirmed => None,
            Step::SelectEmployee => Some(Step::SelectService),
            Step::SelectSlot => Some(Step::SelectEmployee),
            Step::EnterContact => Some(Step::SelectSlot),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the initial profile + catalog load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageStatus {
    Loading,
    Ready,
    NotFound,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Conflict,
    Failure,
}

/// Banner shown on the contact step after a rejected submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// The visitor's working draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    pub service: Option<ServiceCatalogEntry>,
    pub employee: Option<EmployeeEntry>,
    pub date: Option<NaiveDate>,
    pub slot: Option<AvailabilitySlot>,
    pub time_label: Option<String>,
    pub contact: ContactDetails,
}

impl Selection {
    pub fn clear_slot(&mut self) {
        self.slot = None;
        self.time_label = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub slug: String,
    pub page: PageStatus,
    pub step: Step,
    pub profile: Option<BusinessProfile>,
    pub services: Vec<ServiceCatalogEntry>,
    pub employees: Vec<EmployeeEntry>,
    pub slots: Vec<AvailabilitySlot>,
    pub selection: Selection,
    pub pending_catalog: Option<CatalogKey>,
    pub pending_employees: Option<EmployeesKey>,
    pub pending_availability: Option<AvailabilityKey>,
    pub pending_submission: Option<u64>,
    pub field_errors: Vec<FieldError>,
    pub notice: Option<Notice>,
    pub confirmation: Option<BookingConfirmation>,
    next_ticket: u64,
}

impl SessionState {
    /// Fresh session for `slug`, together with the catalog load it needs.
    pub fn open(slug: impl Into<String>) -> (Self, Effect) {
        let mut state = Self::blank(slug.into(), 0);
        let effect = state.begin_catalog_load();
        (state, effect)
    }

    fn blank(slug: String, next_ticket: u64) -> Self {
        Self {
            slug,
            page: PageStatus::Loading,
            step: Step::SelectService,
            profile: None,
            services: Vec::new(),
            employees: Vec::new(),
            slots: Vec::new(),
            selection: Selection::default(),
            pending_catalog: None,
            pending_employees: None,
            pending_availability: None,
            pending_submission: None,
            field_errors: Vec::new(),
            notice: None,
            confirmation: None,
            next_ticket,
        }
    }

    /// Discards everything except ticket numbering, so results of loads
    /// issued before the reset can never match again.
    pub(crate) fn reset(&mut self) -> Effect {
        *self = Self::blank(std::mem::take(&mut self.slug), self.next_ticket);
        self.begin_catalog_load()
    }

    pub(crate) fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    pub(crate) fn begin_catalog_load(&mut self) -> Effect {
        let key = CatalogKey {
            ticket: self.issue_ticket(),
            slug: self.slug.clone(),
        };
        self.pending_catalog = Some(key.clone());
        Effect::LoadCatalog(key)
    }

    /// `None` when no service is selected.
    pub(crate) fn begin_employees_load(&mut self) -> Option<Effect> {
        let service_id = self.selection.service.as_ref()?.id;
        let key = EmployeesKey {
            ticket: self.issue_ticket(),
            slug: self.slug.clone(),
            service_id,
        };
        self.pending_employees = Some(key.clone());
        Some(Effect::LoadEmployees(key))
    }

    /// `None` unless service, employee and date are all selected.
    pub(crate) fn begin_availability_load(&mut self) -> Option<Effect> {
        let service_id = self.selection.service.as_ref()?.id;
        let employee_id = self.selection.employee.as_ref()?.id;
        let date = self.selection.date?;
        let key = AvailabilityKey {
            ticket: self.issue_ticket(),
            slug: self.slug.clone(),
            employee_id,
            service_id,
            date,
        };
        self.pending_availability = Some(key.clone());
        Some(Effect::LoadAvailability(key))
    }

    pub fn is_ready(&self) -> bool {
        self.page == PageStatus::Ready
    }

    pub fn is_submitting(&self) -> bool {
        self.pending_submission.is_some()
    }

    pub fn selectable_slots(&self) -> impl Iterator<Item = &AvailabilitySlot> {
        self.slots.iter().filter(|s| s.available)
    }

    /// Selection invariants that must hold after every transition.
    pub fn invariants_hold(&self) -> bool {
        let needs_service = self.step != Step::SelectService;
        let needs_employee = matches!(
            self.step,
            Step::SelectSlot | Step::EnterContact | Step::Confirmed
        );
        let needs_slot = matches!(self.step, Step::EnterContact | Step::Confirmed);

        (!needs_service || self.selection.service.is_some())
            && (!needs_employee || self.selection.employee.is_some())
            && (!needs_employee || self.selection.date.is_some())
            && (!needs_slot || self.selection.slot.is_some())
            && (self.selection.slot.is_some() == self.selection.time_label.is_some())
            && (self.step == Step::Confirmed) == self.confirmation.is_some()
            && (!self.is_submitting() || self.step == Step::EnterContact)
    }
}
