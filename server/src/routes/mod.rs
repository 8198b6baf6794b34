//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server fronts the built front-end bundle. Every request passes
//! through request tracing, then auth request logging, then the route guard,
//! before reaching either `/healthz` or the static file service. Unknown
//! paths fall back to `index.html` so client-side routes render.

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth_log, guard};

/// Full application router serving `static_dir` behind the guard.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let site = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(site)
        .layer(from_fn_with_state(state, guard::guard))
        .layer(from_fn(auth_log::log_auth_request))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
