use super::*;

fn nav<'a>(path: &'a str, referer: Option<&'a str>, has_token: bool) -> Navigation<'a> {
    Navigation { path, referer, has_token }
}

fn check(path: &str, referer: Option<&str>, has_token: bool) -> Decision {
    decide(&nav(path, referer, has_token), GuardPolicy::default())
}

// =============================================================================
// rule 1: login-referer bypass
// =============================================================================

#[test]
fn dashboard_from_login_is_allowed_without_cookie() {
    let decision = check("/dashboard", Some("http://localhost:3000/login"), false);
    assert_eq!(decision, Decision::AllowFromLogin);
}

#[test]
fn dashboard_from_login_is_allowed_with_cookie() {
    let decision = check("/dashboard", Some("http://localhost:3000/login?from=%2Fdashboard"), true);
    assert_eq!(decision, Decision::AllowFromLogin);
}

#[test]
fn bypass_only_applies_to_dashboard_root() {
    let decision = check("/dashboard/employees", Some("http://localhost/login"), false);
    assert_eq!(decision, Decision::RedirectToLogin { from: "/dashboard/employees".into() });
}

#[test]
fn bypass_can_be_disabled() {
    let policy = GuardPolicy { login_referer_bypass: false };
    let decision = decide(&nav("/dashboard", Some("http://localhost/login"), false), policy);
    assert_eq!(decision, Decision::RedirectToLogin { from: "/dashboard".into() });
}

#[test]
fn other_referers_do_not_bypass() {
    let decision = check("/dashboard", Some("http://localhost/pricing"), false);
    assert_eq!(decision, Decision::RedirectToLogin { from: "/dashboard".into() });
}

// =============================================================================
// rule 2: unauthenticated on protected page
// =============================================================================

#[test]
fn dashboard_without_cookie_redirects_to_login_with_from() {
    let decision = check("/dashboard", None, false);
    assert_eq!(decision.location().as_deref(), Some("/login?from=%2Fdashboard"));
}

#[test]
fn nested_dashboard_path_is_encoded() {
    let decision = check("/dashboard/vendors/7/edit", None, false);
    assert_eq!(decision.location().as_deref(), Some("/login?from=%2Fdashboard%2Fvendors%2F7%2Fedit"));
}

#[test]
fn register_without_cookie_is_allowed() {
    assert_eq!(check("/register", None, false), Decision::Allow);
}

#[test]
fn login_without_cookie_is_allowed() {
    assert_eq!(check("/login", None, false), Decision::Allow);
}

// =============================================================================
// rule 3: authenticated on auth page
// =============================================================================

#[test]
fn login_with_cookie_redirects_to_dashboard() {
    let decision = check("/login", None, true);
    assert_eq!(decision, Decision::RedirectToDashboard);
    assert_eq!(decision.location().as_deref(), Some("/dashboard"));
}

#[test]
fn register_with_cookie_redirects_to_dashboard() {
    assert_eq!(check("/register", None, true), Decision::RedirectToDashboard);
}

// =============================================================================
// rule 4 and unguarded paths
// =============================================================================

#[test]
fn dashboard_with_cookie_is_allowed() {
    assert_eq!(check("/dashboard", None, true), Decision::Allow);
    assert_eq!(check("/dashboard/branch-admin", None, true), Decision::Allow);
}

#[test]
fn unguarded_paths_always_pass() {
    for path in ["/", "/pricing", "/contact", "/verify-otp"] {
        assert_eq!(check(path, None, false), Decision::Allow, "{path}");
        assert_eq!(check(path, None, true), Decision::Allow, "{path}");
    }
}

#[test]
fn pages_below_auth_pages_are_not_guarded() {
    for path in ["/login/reset", "/register/confirm"] {
        assert_eq!(check(path, None, true), Decision::Allow, "{path}");
        assert_eq!(check(path, None, false), Decision::Allow, "{path}");
    }
}

#[test]
fn allow_decisions_have_no_location() {
    assert_eq!(Decision::Allow.location(), None);
    assert_eq!(Decision::AllowFromLogin.location(), None);
}

// =============================================================================
// has_token
// =============================================================================

#[test]
fn has_token_requires_non_empty_value() {
    use axum_extra::extract::cookie::Cookie;

    assert!(!has_token(&CookieJar::new()));
    assert!(!has_token(&CookieJar::new().add(Cookie::new("userToken", ""))));
    assert!(!has_token(&CookieJar::new().add(Cookie::new("other", "x"))));
    assert!(has_token(&CookieJar::new().add(Cookie::new("userToken", "abc"))));
}
