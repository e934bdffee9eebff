//! Session token issuance and verification.
//!
//! Sessions are stateless: the server signs whatever identity payload the
//! login call supplied into an HS256 JWT, hands it back in an HttpOnly
//! cookie, and later trusts any cookie whose signature checks out and whose
//! expiry has not passed. There is no server-side session record, so logout
//! only clears the cookie and cannot invalidate tokens already captured.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};

use crate::app::AppContext;
use crate::config::Environment;
use crate::error::AppError;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

/// How long an issued token stays valid.
const TOKEN_VALIDITY_DAYS: i64 = 365;

/// Sign `claims` with `secret`, stamping issue and expiry times into them.
pub fn issue_token(mut claims: Map<String, Value>, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::days(TOKEN_VALIDITY_DAYS);
    claims.insert("iat".to_string(), Value::from(now.timestamp()));
    claims.insert("exp".to_string(), Value::from(expires_at.timestamp()));

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign session token: {e}")))
}

/// Decode a token and return the claims it was issued with.
///
/// Signature mismatch, expiry, and structural garbage all collapse into
/// [`AppError::Forbidden`]; the client learns nothing about which check failed.
pub fn verify_token(token: &str, secret: &str) -> Result<Map<String, Value>, AppError> {
    decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Forbidden)
}

/// Build the session cookie for an issued token.
///
/// HttpOnly always. In production the cookie is Secure and SameSite=None so
/// the browser sends it on cross-site requests; in development it stays
/// SameSite=Strict over plain HTTP.
pub fn session_cookie(token: String, environment: Environment) -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, token);
    apply_transport_flags(&mut cookie, environment);
    cookie
}

/// Build the cookie that tells the client to drop its session immediately.
pub fn removal_cookie(environment: Environment) -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, "");
    apply_transport_flags(&mut cookie, environment);
    cookie.make_removal();
    cookie
}

fn apply_transport_flags(cookie: &mut Cookie<'static>, environment: Environment) {
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(environment.is_production());
    cookie.set_same_site(if environment.is_production() {
        SameSite::None
    } else {
        SameSite::Strict
    });
}

/// Claims of the verified session token attached to the current request.
///
/// Naming this extractor in a handler signature is what puts the route behind
/// the authentication gate: extraction fails with 401 when the cookie is
/// missing and 403 when its token does not verify.
#[derive(Debug, Clone)]
pub struct Identity(pub Map<String, Value>);

#[axum::async_trait]
impl FromRequestParts<AppContext> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, ctx: &AppContext) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(TOKEN_COOKIE).ok_or(AppError::Unauthenticated)?;
        let claims = verify_token(cookie.value(), &ctx.config.auth.secret_key)?;
        Ok(Self(claims))
    }
}
