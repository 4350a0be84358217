//! Booking session state machine.
//!
//! All state changes go through [`transition`], a pure function of the
//! current snapshot and one [`Event`]. Network work is described by the
//! returned [`Effect`]s and fed back in as result events.

pub mod effect;
pub mod event;
pub mod state;
pub mod transition;
pub mod view;

#[cfg(test)]
mod proptests;

use chrono::NaiveDate;

pub use effect::{AvailabilityKey, CatalogKey, EmployeesKey, Effect};
pub use event::{CatalogOutcome, ContactField, Event, SubmissionOutcome, UserEvent};
pub use state::{Notice, NoticeKind, PageStatus, Selection, SessionState, Step};
pub use transition::{transition, Transition, TransitionError};
pub use view::SessionView;

/// Applies `event` in place and returns the effects to run.
pub fn dispatch(
    state: &mut SessionState,
    event: Event,
    today: NaiveDate,
) -> Result<Vec<Effect>, TransitionError> {
    let Transition { state: next, effects } = transition(state, event, today)?;
    *state = next;
    Ok(effects)
}
