//! Route guard: per-navigation allow or redirect decision.
//!
//! SYSTEM CONTEXT
//! ==============
//! The guard runs in front of the static front-end and sees only the
//! request: its path, its `Referer`, and the `userToken` cookie the client's
//! session store mirrors. It never validates the token; presence is the whole
//! test. Real access control belongs to the backend API.
//!
//! Rules, first match wins, applied only to guarded paths
//! (`/dashboard`, `/dashboard/*`, `/login`, `/register`):
//!
//! 1. `/dashboard` with a referer containing `/login` is allowed.
//! 2. No token and not an auth page: redirect to `/login?from=<path>`.
//! 3. Token on an auth page: redirect to `/dashboard`.
//! 4. Otherwise allow.
//!
//! TRADE-OFFS
//! ==========
//! Rule 1 exists to avoid a redirect loop right after login, before the
//! browser has sent the fresh cookie. The referer is client-supplied, so the
//! rule lets anyone reach the dashboard shell without a token. It can be
//! switched off with `GUARD_LOGIN_REFERER_BYPASS=false`, and every
//! cookie-less bypass is logged.

use axum::extract::{Request, State};
use axum::http::header::REFERER;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use session::cookies::TOKEN_COOKIE;
use session::routes::{self, DASHBOARD, FROM_PARAM, LOGIN};

use crate::state::AppState;

/// Knobs for the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPolicy {
    /// Whether rule 1 (login-referer bypass) is active.
    pub login_referer_bypass: bool,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self { login_referer_bypass: true }
    }
}

/// What the guard sees of an incoming navigation.
#[derive(Debug, Clone, Copy)]
pub struct Navigation<'a> {
    pub path: &'a str,
    pub referer: Option<&'a str>,
    pub has_token: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Allowed only because of the login-referer bypass.
    AllowFromLogin,
    RedirectToLogin { from: String },
    RedirectToDashboard,
}

impl Decision {
    /// `Location` for redirect decisions.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::Allow | Self::AllowFromLogin => None,
            Self::RedirectToLogin { from } => Some(format!("{LOGIN}?{FROM_PARAM}={}", urlencoding::encode(from))),
            Self::RedirectToDashboard => Some(DASHBOARD.to_owned()),
        }
    }
}

/// Evaluate the guard rules for one navigation. Pure; no I/O.
#[must_use]
pub fn decide(nav: &Navigation<'_>, policy: GuardPolicy) -> Decision {
    if !routes::is_guarded(nav.path) {
        return Decision::Allow;
    }

    let from_login = nav.referer.is_some_and(|r| r.contains(LOGIN));
    if policy.login_referer_bypass && nav.path == DASHBOARD && from_login {
        return Decision::AllowFromLogin;
    }

    let auth_page = routes::is_auth_page(nav.path);
    match (nav.has_token, auth_page) {
        (false, false) => Decision::RedirectToLogin { from: nav.path.to_owned() },
        (true, true) => Decision::RedirectToDashboard,
        _ => Decision::Allow,
    }
}

/// Token cookie present with a non-empty value.
#[must_use]
pub fn has_token(jar: &CookieJar) -> bool {
    jar.get(TOKEN_COOKIE).is_some_and(|c| !c.value().is_empty())
}

/// Axum middleware applying [`decide`] to every request.
pub async fn guard(State(state): State<AppState>, jar: CookieJar, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let referer = req.headers().get(REFERER).and_then(|v| v.to_str().ok());
    let has_token = has_token(&jar);
    let nav = Navigation { path: &path, referer, has_token };

    let decision = decide(&nav, state.guard);
    if decision == Decision::AllowFromLogin && !has_token {
        tracing::warn!(%path, "dashboard reached via login referer without a token cookie");
    }

    match decision.location() {
        Some(location) => {
            tracing::debug!(%path, %location, "guard redirect");
            Redirect::temporary(&location).into_response()
        }
        None => next.run(req).await,
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
