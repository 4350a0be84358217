use std::collections::VecDeque;
use std::sync::Arc;

use chrono::NaiveDate;

use super::backend::BookingBackend;
use super::{loaders, submitter};
use crate::session::{self, Effect, Event, SessionState, SessionView, TransitionError, UserEvent};

/// Source of "today" for date defaults and the minimum selectable date.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => chrono::Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Runs one effect against the backend and returns the event carrying its
/// result. Never fails: loader errors are already folded into the result.
pub async fn execute(backend: &dyn BookingBackend, effect: Effect) -> Event {
    match effect {
        Effect::LoadCatalog(key) => {
            let outcome = loaders::load_catalog(backend, &key.slug).await;
            Event::CatalogLoaded { key, outcome }
        }
        Effect::LoadEmployees(key) => {
            let employees = loaders::load_employees(backend, &key).await;
            Event::EmployeesLoaded { key, employees }
        }
        Effect::LoadAvailability(key) => {
            let slots = loaders::load_availability(backend, &key).await;
            Event::AvailabilityLoaded { key, slots }
        }
        Effect::SubmitBooking {
            ticket,
            slug,
            request,
        } => {
            let outcome = submitter::submit(backend, &slug, &request).await;
            Event::BookingResolved { ticket, outcome }
        }
    }
}

/// A single visitor session that owns its state and drives its own
/// effects to completion.
pub struct BookingSession {
    state: SessionState,
    backend: Arc<dyn BookingBackend>,
    clock: Clock,
}

impl BookingSession {
    /// Opens a session for `slug` and waits for the catalog.
    pub async fn open(backend: Arc<dyn BookingBackend>, slug: &str, clock: Clock) -> Self {
        let (state, effect) = SessionState::open(slug);
        let mut session = Self {
            state,
            backend,
            clock,
        };
        session.drive(vec![effect]).await;
        session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> SessionView {
        SessionView::build(&self.state, self.clock.today())
    }

    /// Applies one event without running the effects it produces.
    pub fn dispatch(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        session::dispatch(&mut self.state, event, self.clock.today())
    }

    /// Applies a visitor event and runs every load or submission it causes.
    pub async fn send(&mut self, event: UserEvent) -> Result<(), TransitionError> {
        let effects = self.dispatch(event.into()).map_err(|e| {
            tracing::debug!(slug = %self.state.slug, error = %e, "event rejected");
            e
        })?;
        self.drive(effects).await;
        Ok(())
    }

    async fn drive(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            let event = execute(self.backend.as_ref(), effect).await;
            match self.dispatch(event) {
                Ok(more) => queue.extend(more),
                Err(e) => tracing::warn!(slug = %self.state.slug, error = %e, "result event rejected"),
            }
        }
    }
}
