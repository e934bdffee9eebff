//! Aggregate counts for the landing page.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app::AppContext;
use crate::error::AppError;

/// Document counts per collection at the moment of the call.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PlatformStats {
    /// Registered users.
    pub users: u64,
    /// Stored reviews.
    pub reviews: u64,
    /// Stored service listings.
    pub services: u64,
}

/// `GET /platform-stats` - count each collection.
///
/// The three counts run one after another without a transaction; a write
/// landing between them can skew the snapshot slightly.
pub async fn platform_stats(
    State(ctx): State<AppContext>,
) -> Result<Json<PlatformStats>, AppError> {
    let users = ctx.store.users().count().await?;
    let reviews = ctx.store.reviews().count().await?;
    let services = ctx.store.services().count().await?;

    Ok(Json(PlatformStats {
        users,
        reviews,
        services,
    }))
}
