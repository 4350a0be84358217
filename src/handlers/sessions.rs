use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::flow;
use crate::session::{self, Effect, SessionState, SessionView, UserEvent};
use crate::state::{AppState, SessionEntry};

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub view: SessionView,
}

// POST /api/book/:slug/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let id = Uuid::new_v4();
    let (session, effect) = SessionState::open(slug.trim());

    {
        let mut sessions = state.sessions();
        prune_expired(&state, &mut sessions);
        if sessions.len() >= state.config.max_sessions {
            tracing::warn!(active = sessions.len(), "session limit reached");
            return Err(AppError::RateLimited("too many active sessions".to_string()));
        }
        sessions.insert(
            id,
            SessionEntry {
                state: session,
                last_activity: Instant::now(),
            },
        );
    }

    tracing::info!(session_id = %id, slug = %slug, "booking session opened");
    run_effects(&state, id, vec![effect]).await;
    respond(&state, id)
}

// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    respond(&state, id)
}

// POST /api/sessions/:id/events
pub async fn post_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(event): Json<UserEvent>,
) -> Result<Json<SessionResponse>, AppError> {
    let effects = {
        let mut sessions = state.sessions();
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;
        entry.last_activity = Instant::now();

        let name = event.name();
        session::dispatch(&mut entry.state, event.into(), state.clock.today()).map_err(|e| {
            tracing::debug!(session_id = %id, event = name, error = %e, "event rejected");
            AppError::from(e)
        })?
    };

    run_effects(&state, id, effects).await;
    respond(&state, id)
}

/// Drives the effects on a detached task and waits for it. A request
/// dropped mid-flight (client disconnect, proxy timeout) therefore cannot
/// abandon a submission with `pending_submission` still set.
async fn run_effects(state: &Arc<AppState>, id: Uuid, effects: Vec<Effect>) {
    if effects.is_empty() {
        return;
    }
    let task = tokio::spawn(drive_effects(state.clone(), id, effects));
    if let Err(e) = task.await {
        tracing::error!(session_id = %id, error = %e, "effect task failed");
    }
}

/// Runs effects with the session table unlocked, applying each result
/// under the lock. Results for a session that has since expired are dropped.
async fn drive_effects(state: Arc<AppState>, id: Uuid, effects: Vec<Effect>) {
    let mut queue: VecDeque<Effect> = effects.into();

    while let Some(effect) = queue.pop_front() {
        let name = effect.name();
        let event = flow::execute(state.backend.as_ref(), effect).await;

        let applied = {
            let mut sessions = state.sessions();
            sessions
                .get_mut(&id)
                .map(|entry| session::dispatch(&mut entry.state, event, state.clock.today()))
        };
        match applied {
            Some(Ok(more)) => queue.extend(more),
            Some(Err(e)) => {
                tracing::warn!(session_id = %id, effect = name, error = %e, "result event rejected")
            }
            None => {
                tracing::debug!(session_id = %id, effect = name, "session gone before result arrived");
                return;
            }
        }
    }
}

fn respond(state: &AppState, id: Uuid) -> Result<Json<SessionResponse>, AppError> {
    let sessions = state.sessions();
    let entry = sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;

    Ok(Json(SessionResponse {
        session_id: id,
        view: SessionView::build(&entry.state, state.clock.today()),
    }))
}

fn prune_expired(state: &AppState, sessions: &mut HashMap<Uuid, SessionEntry>) {
    let ttl = state.config.session_ttl;
    let before = sessions.len();
    sessions.retain(|_, entry| entry.last_activity.elapsed() < ttl);
    let pruned = before - sessions.len();
    if pruned > 0 {
        tracing::info!(pruned, "expired booking sessions removed");
    }
}
