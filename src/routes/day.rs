use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::day::Day;
use crate::error::AppResult;
use crate::state::AppState;
use crate::viewer::{DayView, LoadTicket};

// --- Templates ---

#[derive(Template)]
#[template(path = "pages/day.html")]
pub struct DayTemplate {
    pub view: Option<DayView>,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(day_page))
        .route("/prev", post(previous_day))
        .route("/next", post(next_day))
        .route("/like", post(like_day))
        .route("/api/view", get(current_view))
        .route("/api/days/{day}", get(stored_day))
}

// --- Loading ---

/// Run one day load and render it if it is still the latest. Failures are
/// logged and the previous view stays up.
pub async fn load(state: &AppState, ticket: LoadTicket) {
    match state.store.get_image(ticket.day).await {
        Ok(record) => {
            let mut viewer = state.viewer.lock().await;
            if let Err(e) = viewer.present(ticket, &record) {
                tracing::error!("Failed to render image for {}: {}", ticket.day, e);
            }
        }
        Err(e) => tracing::error!("Failed to load image for {}: {}", ticket.day, e),
    }
}

/// Load the viewer's current day.
pub async fn reload(state: &AppState) {
    let ticket = state.viewer.lock().await.reload();
    load(state, ticket).await;
}

// --- Handlers ---

async fn day_page(State(state): State<AppState>) -> Html<DayTemplate> {
    let never_rendered = state.viewer.lock().await.view().is_none();
    if never_rendered {
        reload(&state).await;
    }

    let view = state.viewer.lock().await.view().cloned();
    Html(DayTemplate { view })
}

async fn previous_day(State(state): State<AppState>) -> Redirect {
    let ticket = state.viewer.lock().await.previous();
    load(&state, ticket).await;
    Redirect::to("/")
}

async fn next_day(State(state): State<AppState>) -> Redirect {
    let ticket = state.viewer.lock().await.next();
    match ticket {
        Some(ticket) => load(&state, ticket).await,
        None => tracing::debug!("Next is disabled; already on today"),
    }
    Redirect::to("/")
}

async fn like_day(State(state): State<AppState>) -> Redirect {
    let day = state.viewer.lock().await.like();
    // The indicator is already flipped; a failed write is only logged
    if let Some(day) = day {
        if let Err(e) = state.store.mark_liked(day) {
            tracing::error!("Failed to save like for {}: {}", day, e);
        }
    }
    Redirect::to("/")
}

async fn current_view(State(state): State<AppState>) -> Json<Option<DayView>> {
    Json(state.viewer.lock().await.view().cloned())
}

/// Raw stored record for a day. Never fetches.
async fn stored_day(State(state): State<AppState>, Path(day): Path<Day>) -> AppResult<Response> {
    let record = state.store.stored(day)?;
    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        record.to_json(),
    )
        .into_response())
}
