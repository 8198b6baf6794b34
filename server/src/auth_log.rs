//! Auth request logging for login, dashboard and `/api/auth/*` traffic.
//!
//! Logs the path, method, response status and whether the request carried a
//! token cookie. Cookie values and other headers are never logged.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use session::routes::{self, LOGIN};

use crate::guard::has_token;

const AUTH_API_PREFIX: &str = "/api/auth";

/// Paths whose requests are logged.
#[must_use]
pub fn is_logged_path(path: &str) -> bool {
    let auth_api = path
        .strip_prefix(AUTH_API_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
    auth_api || path == LOGIN || routes::is_dashboard(path)
}

pub async fn log_auth_request(jar: CookieJar, req: Request, next: Next) -> Response {
    if !is_logged_path(req.uri().path()) {
        return next.run(req).await;
    }

    let path = req.uri().path().to_owned();
    let method = req.method().clone();
    let authenticated = has_token(&jar);

    let response = next.run(req).await;
    tracing::info!(%method, %path, authenticated, status = response.status().as_u16(), "auth request");
    response
}

#[cfg(test)]
#[path = "auth_log_test.rs"]
mod tests;
