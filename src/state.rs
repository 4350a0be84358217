use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use uuid::Uuid;

use crate::config::AppConfig;
use crate::services::{BookingBackend, Clock};
use crate::session::SessionState;

pub struct SessionEntry {
    pub state: SessionState,
    pub last_activity: Instant,
}

pub struct AppState {
    pub config: AppConfig,
    pub backend: Arc<dyn BookingBackend>,
    pub sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn BookingBackend>, clock: Clock) -> Self {
        Self {
            config,
            backend,
            sessions: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
