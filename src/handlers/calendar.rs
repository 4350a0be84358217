use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::calendar::generate_ics;
use crate::state::AppState;

// GET /api/sessions/:id/calendar.ics
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (filename, ics) = {
        let sessions = state.sessions();
        let entry = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;
        let session = &entry.state;

        let confirmation = session
            .confirmation
            .as_ref()
            .ok_or_else(|| AppError::NotFound("no confirmed booking".to_string()))?;
        let service_name = session
            .selection
            .service
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("Appointment");
        let (business_name, location) = session
            .profile
            .as_ref()
            .map(|p| (p.name.clone(), p.location_line()))
            .unwrap_or_else(|| ("Booking".to_string(), None));

        let ics = generate_ics(
            confirmation,
            service_name,
            &business_name,
            location.as_deref(),
            chrono::Utc::now(),
        );
        (format!("booking-{}.ics", confirmation.appointment_id), ics)
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
