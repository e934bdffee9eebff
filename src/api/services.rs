//! Handlers for the service listing resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use tracing::info;

use crate::app::AppContext;
use crate::auth::Identity;
use crate::error::AppError;
use crate::store::{Document, DocumentId, InsertResult};

use super::{non_empty_text, MessageResponse};

/// Cap applied to the public service listing.
const LIST_LIMIT: u32 = 6;

/// `POST /service` - store a new service listing. Requires a session token.
pub async fn create_service(
    State(ctx): State<AppContext>,
    _identity: Identity,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<InsertResult>), AppError> {
    let service = payload.as_object().cloned().unwrap_or_default();
    if !non_empty_text(&service, "serviceTitle") || !non_empty_text(&service, "userEmail") {
        return Err(AppError::InvalidInput(
            "Service title and user email are required.".to_string(),
        ));
    }

    let ack = ctx.store.services().insert_one(service).await?;
    info!(id = %ack.inserted_id, "service created");
    Ok((StatusCode::CREATED, Json(ack)))
}

/// `GET /services` - the public listing, capped at six services in insertion
/// order.
pub async fn list_services(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<Document>>, AppError> {
    let services = ctx.store.services().find_all(Some(LIST_LIMIT)).await?;
    Ok(Json(services))
}

/// `GET /service/:id` - fetch one service by identifier.
pub async fn get_service(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let id = DocumentId::parse(&id)?;
    let service = ctx
        .store
        .services()
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Service"))?;
    Ok(Json(service))
}

/// `PUT /updateService/:id` - merge the posted fields into a service.
pub async fn update_service(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = DocumentId::parse(&id)?;
    let patch = payload.as_object().cloned().unwrap_or_default();

    let outcome = ctx.store.services().update_one(id, patch).await?;
    if outcome.matched_count == 0 {
        return Err(AppError::NotFound("Service"));
    }

    info!(%id, "service updated");
    Ok(Json(MessageResponse::new("Service updated successfully.")))
}

/// `DELETE /service/:id` - remove a service.
pub async fn delete_service(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = DocumentId::parse(&id)?;

    let outcome = ctx.store.services().delete_one(id).await?;
    if outcome.deleted_count == 0 {
        return Err(AppError::NotFound("Service"));
    }

    info!(%id, "service deleted");
    Ok(Json(MessageResponse::new("Service deleted successfully.")))
}
