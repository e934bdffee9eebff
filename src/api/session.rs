//! Login and logout: issuing and revoking the session cookie.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::app::AppContext;
use crate::auth;
use crate::error::AppError;

/// Body acknowledging a session operation.
#[derive(Debug, Serialize)]
pub struct SessionAck {
    /// Always true; failures surface as error responses instead.
    pub success: bool,
}

/// `POST /jwt` - sign the posted identity payload into a session cookie.
///
/// The payload is signed as supplied, without content validation; a non-object
/// body is treated as an empty claims mapping.
pub async fn issue_session(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Json(payload): Json<Value>,
) -> Result<(CookieJar, Json<SessionAck>), AppError> {
    let claims = payload.as_object().cloned().unwrap_or_default();
    debug!(claim_count = claims.len(), "issuing session token");

    let token = auth::issue_token(claims, &ctx.config.auth.secret_key)?;
    let jar = jar.add(auth::session_cookie(token, ctx.config.environment));

    Ok((jar, Json(SessionAck { success: true })))
}

/// `GET /logout` - tell the client to drop its session cookie.
///
/// Purely advisory: tokens are stateless, so one captured earlier stays valid
/// until it expires.
pub async fn end_session(
    State(ctx): State<AppContext>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionAck>) {
    let jar = jar.add(auth::removal_cookie(ctx.config.environment));
    (jar, Json(SessionAck { success: true }))
}
