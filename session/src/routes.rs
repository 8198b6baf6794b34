//! Route paths shared by the session store and the server-side guard.

/// Login entry point. Logout navigates here.
pub const LOGIN: &str = "/login";
/// Registration page; classified the same as login.
pub const REGISTER: &str = "/register";
/// Dashboard root. Successful logins land here.
pub const DASHBOARD: &str = "/dashboard";
/// Query parameter carrying the originally requested path on a login redirect.
pub const FROM_PARAM: &str = "from";

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn matches_exact(path: &str, route: &str) -> bool {
    path.strip_prefix(route).is_some_and(|rest| rest.is_empty() || rest == "/")
}

/// The login or register page itself. Pages below them are not auth pages.
#[must_use]
pub fn is_auth_page(path: &str) -> bool {
    matches_exact(path, LOGIN) || matches_exact(path, REGISTER)
}

/// `/dashboard` or any page under it.
#[must_use]
pub fn is_dashboard(path: &str) -> bool {
    matches_prefix(path, DASHBOARD)
}

/// Paths the route guard evaluates. Everything else is public.
#[must_use]
pub fn is_guarded(path: &str) -> bool {
    is_dashboard(path) || is_auth_page(path)
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
