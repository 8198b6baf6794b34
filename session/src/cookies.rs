//! The `userToken` cookie that mirrors the session token for the guard.
//!
//! The cookie is site-wide (`Path=/`) and lives for 30 days from the moment
//! it is written. Logout overwrites it with an empty value expiring at the
//! Unix epoch, which every cookie jar treats as a delete.
//!
//! Tokens are opaque and may hold `;` or spaces, so the cookie is always
//! percent-encoded on the wire and in storage.

use cookie::Cookie;
use time::{Duration, OffsetDateTime};

/// Cookie name read by the route guard.
pub const TOKEN_COOKIE: &str = "userToken";
/// Lifetime of the mirrored cookie: 30 days.
pub const TOKEN_COOKIE_MAX_AGE_SECS: i64 = 2_592_000;

/// Cookie written on login.
#[must_use]
pub fn token_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token.to_owned()))
        .path("/")
        .max_age(Duration::seconds(TOKEN_COOKIE_MAX_AGE_SECS))
        .build()
}

/// Cookie written on logout.
#[must_use]
pub fn expired_token_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// `userToken=<token>` as sent in a `Cookie` request header, percent-encoded.
#[must_use]
pub fn token_cookie_header(token: &str) -> String {
    Cookie::new(TOKEN_COOKIE, token.to_owned()).stripped().encoded().to_string()
}

/// Absolute expiry of `cookie` if it were stored at `now`.
///
/// `Max-Age` wins over `Expires`, as in browsers. `None` means a
/// session-scoped cookie with no expiry.
#[must_use]
pub fn expiry_at(cookie: &Cookie<'_>, now: OffsetDateTime) -> Option<OffsetDateTime> {
    if let Some(max_age) = cookie.max_age() {
        return Some(now + max_age);
    }
    cookie.expires_datetime()
}

/// Whether a cookie with the given absolute expiry is still live at `now`.
#[must_use]
pub fn is_live(expires_at: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
    expires_at.is_none_or(|at| at > now)
}

#[cfg(test)]
#[path = "cookies_test.rs"]
mod tests;
