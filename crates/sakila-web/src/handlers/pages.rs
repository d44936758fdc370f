use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use minijinja::context;

pub async fn index() -> Redirect {
    Redirect::to("/actors")
}

/// Generic failure page. Falls back to plain text if rendering fails too.
pub async fn error(State(state): State<AppState>) -> Response {
    match state.templates.render("error.html", context! {}) {
        Ok(page) => (StatusCode::INTERNAL_SERVER_ERROR, page).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render error page");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "page not found")
}
