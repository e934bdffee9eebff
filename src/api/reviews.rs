//! Handlers for the review resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::app::AppContext;
use crate::error::AppError;
use crate::store::{Document, DocumentId, InsertResult};

use super::{non_empty_text, MessageResponse};

/// `POST /reviews` - store a review, stamping it with the submission time.
///
/// A review must carry a service reference, an author email, a text body and
/// a numeric rating; anything less is rejected wholesale.
pub async fn create_review(
    State(ctx): State<AppContext>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<InsertResult>), AppError> {
    let mut review = payload.as_object().cloned().unwrap_or_default();

    let complete = non_empty_text(&review, "serviceId")
        && non_empty_text(&review, "userEmail")
        && non_empty_text(&review, "text")
        && review.get("rating").is_some_and(Value::is_number);
    if !complete {
        return Err(AppError::InvalidInput("Incomplete review data.".to_string()));
    }

    review.insert(
        "date".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    let ack = ctx.store.reviews().insert_one(review).await?;
    info!(id = %ack.inserted_id, "review created");
    Ok((StatusCode::CREATED, Json(ack)))
}

/// `GET /reviews/:service_id` - every review referencing one service, in
/// submission order.
///
/// The segment is matched as an opaque string against the reviews' stored
/// `serviceId` field; an id no review references yields an empty list.
pub async fn reviews_for_service(
    State(ctx): State<AppContext>,
    Path(service_id): Path<String>,
) -> Result<Json<Vec<Document>>, AppError> {
    let reviews = ctx
        .store
        .reviews()
        .find_by_field("serviceId", &service_id)
        .await?;
    Ok(Json(reviews))
}

/// Query parameters for the per-user review listing.
#[derive(Debug, Deserialize)]
pub struct UserReviewsQuery {
    /// Author email to filter by; absent matches nothing.
    pub email: Option<String>,
}

/// `GET /user/reviews?email=` - every review written by one author.
pub async fn user_reviews(
    State(ctx): State<AppContext>,
    Query(query): Query<UserReviewsQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let email = query.email.unwrap_or_default();
    let reviews = ctx.store.reviews().find_by_field("userEmail", &email).await?;
    Ok(Json(reviews))
}

/// `PUT /updateReview/:id` - merge the posted fields into a review.
pub async fn update_review(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = DocumentId::parse(&id)?;
    let patch = payload.as_object().cloned().unwrap_or_default();

    let outcome = ctx.store.reviews().update_one(id, patch).await?;
    if outcome.matched_count == 0 {
        return Err(AppError::NotFound("Review"));
    }

    info!(%id, "review updated");
    Ok(Json(MessageResponse::new("Review updated successfully.")))
}

/// `DELETE /deleteReview/:id` - remove a review.
pub async fn delete_review(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = DocumentId::parse(&id)?;

    let outcome = ctx.store.reviews().delete_one(id).await?;
    if outcome.deleted_count == 0 {
        return Err(AppError::NotFound("Review"));
    }

    info!(%id, "review deleted");
    Ok(Json(MessageResponse::new("Review deleted successfully.")))
}
