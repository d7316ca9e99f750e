//! Auth cookie construction.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use gatehouse_entity::session::TokenPair;

/// Cookie holding `JWT <access token>`.
pub const ACCESS_COOKIE: &str = "token";
/// Cookie holding the raw refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";
/// The only path the refresh cookie is sent to.
pub const REFRESH_COOKIE_PATH: &str = "/api/user/refreshtoken";

/// Adds both auth cookies for a freshly issued pair.
pub fn with_token_cookies(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, format!("JWT {}", tokens.access_token)))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict);

    let refresh = Cookie::build((REFRESH_COOKIE, tokens.refresh_token.clone()))
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict);

    jar.add(access).add(refresh)
}
