use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{
    dispatch, CatalogOutcome, ContactField, Effect, Event, SessionState, Step,
    SubmissionOutcome, UserEvent,
};
use crate::models::{
    AvailabilitySlot, BookingConfirmation, BookingStatus, BusinessProfile, EmployeeEntry,
    ServiceCatalogEntry,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

fn base_time() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-10-15T09:00:00+00:00").unwrap()
}

fn slot_start(i: u8) -> DateTime<FixedOffset> {
    base_time() + Duration::minutes(30 * i64::from(i))
}

/// Visitor actions plus the ways a pending effect may resolve.
#[derive(Debug, Clone)]
enum Action {
    User(UserEvent),
    /// Resolve the pending effect at this index (modulo queue length).
    Resolve(usize),
    /// Resolve with a conflict or failure instead of success.
    Reject(usize, bool),
}

fn user_event() -> impl Strategy<Value = UserEvent> {
    prop_oneof![
        (1i64..4).prop_map(|service_id| UserEvent::ServiceChosen { service_id }),
        (1i64..4).prop_map(|employee_id| UserEvent::EmployeeChosen { employee_id }),
        (0i64..4).prop_map(|d| UserEvent::DateChanged {
            date: today() + Duration::days(d)
        }),
        (0u8..4).prop_map(|i| UserEvent::SlotChosen { start: slot_start(i) }),
        Just(UserEvent::ContactEdited {
            field: ContactField::Name,
            value: "Ion Popescu".to_string()
        }),
        Just(UserEvent::ContactEdited {
            field: ContactField::Phone,
            value: "0722334455".to_string()
        }),
        any::<bool>().prop_map(|given| UserEvent::ConsentChanged { given }),
        Just(UserEvent::SubmitRequested),
        Just(UserEvent::BackRequested),
    ]
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => user_event().prop_map(Action::User),
        2 => any::<usize>().prop_map(Action::Resolve),
        1 => (any::<usize>(), any::<bool>()).prop_map(|(i, c)| Action::Reject(i, c)),
    ]
}

fn employees() -> Vec<EmployeeEntry> {
    (1..=2)
        .map(|id| EmployeeEntry {
            id,
            full_name: format!("Employee {id}"),
            display_name: None,
            avatar_url: None,
            color: "#2563eb".to_string(),
            role: None,
        })
        .collect()
}

fn slots() -> Vec<AvailabilitySlot> {
    (0..3)
        .map(|i| AvailabilitySlot {
            start: slot_start(i),
            end: slot_start(i + 1),
            available: i != 1,
        })
        .collect()
}

fn resolve(effect: Effect, reject: Option<bool>) -> Event {
    match effect {
        Effect::LoadCatalog(key) => Event::CatalogLoaded {
            key,
            outcome: CatalogOutcome::Loaded {
                profile: serde_json::from_str::<BusinessProfile>(
                    r#"{"id":1,"slug":"s","name":"S"}"#,
                )
                .unwrap(),
                services: (1..=2)
                    .map(|id| ServiceCatalogEntry {
                        id,
                        name: format!("Service {id}"),
                        description: None,
                        duration_minutes: 30,
                        price: Decimal::new(50, 0),
                        price_max: None,
                        currency: "RON".to_string(),
                        color: "#2563eb".to_string(),
                    })
                    .collect(),
            },
        },
        Effect::LoadEmployees(key) => Event::EmployeesLoaded {
            key,
            employees: employees(),
        },
        Effect::LoadAvailability(key) => Event::AvailabilityLoaded {
            key,
            slots: slots(),
        },
        Effect::SubmitBooking { ticket, request, .. } => {
            let outcome = match reject {
                Some(true) => SubmissionOutcome::Conflict {
                    message: "taken".to_string(),
                },
                Some(false) => SubmissionOutcome::Rejected {
                    message: "error".to_string(),
                },
                None => SubmissionOutcome::Confirmed(BookingConfirmation {
                    appointment_id: 1,
                    status: BookingStatus::Confirmed,
                    start: request.start_time,
                    end: request.start_time + Duration::minutes(30),
                    message: String::new(),
                }),
            };
            Event::BookingResolved { ticket, outcome }
        }
    }
}

proptest! {
    #[test]
    fn test_invariants_hold_for_any_event_sequence(
        actions in prop::collection::vec(action(), 1..60)
    ) {
        let (mut state, first) = SessionState::open("s");
        let mut pending = vec![first];
        prop_assert!(state.invariants_hold());

        for action in actions {
            let event = match action {
                Action::User(e) => Some(Event::from(e)),
                Action::Resolve(i) if !pending.is_empty() => {
                    let effect = pending.remove(i % pending.len());
                    Some(resolve(effect, None))
                }
                Action::Reject(i, conflict) if !pending.is_empty() => {
                    let effect = pending.remove(i % pending.len());
                    Some(resolve(effect, Some(conflict)))
                }
                _ => None,
            };

            if let Some(event) = event {
                let before = state.clone();
                match dispatch(&mut state, event, today()) {
                    Ok(effects) => pending.extend(effects),
                    Err(_) => prop_assert_eq!(&state, &before),
                }
            }

            prop_assert!(state.invariants_hold(), "broken invariants: {:?}", state);
            if state.step == Step::SelectEmployee {
                prop_assert!(state.selection.slot.is_none());
            }
        }
    }
}
