use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::{error::ServiceError, models::email::SendMode, services::AppState};

pub async fn send_question(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    send(&state, SendMode::Question).await
}

pub async fn send_hint(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    send(&state, SendMode::Hint).await
}

pub async fn send_solution(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    send(&state, SendMode::Solution).await
}

async fn send(
    state: &AppState,
    mode: SendMode,
) -> Result<&'static str, (StatusCode, String)> {
    match state.mailer_service.handle_send(mode).await {
        Ok(report) => {
            tracing::info!(
                "Sent {} email for puzzles {:?}",
                report.mode,
                report.puzzle_ids
            );
            Ok(mode.acknowledgement())
        }
        Err(e) => {
            tracing::error!("Failed to send {} email: {}", mode, e);
            Err((status_for(&e), e.to_string()))
        }
    }
}

fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Selection(_) | ServiceError::MissingTodayPuzzles => StatusCode::CONFLICT,
        ServiceError::Store(_) | ServiceError::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
