//! Photo upload and gallery endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use salonkit_common::{AppError, AppResult};
use salonkit_core::{BulkPhotoAction, UploadPhotoInput};
use salonkit_db::entities::photo;
use serde::{Deserialize, Serialize};

use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::rate_limit::{RateLimiterState, rate_limit_heavy_middleware};
use crate::response::ApiResponse;

pub fn router(limiter: RateLimiterState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_photos).put(bulk_update))
        .route(
            "/upload",
            post(upload_photo).layer(from_fn_with_state(limiter, rate_limit_heavy_middleware)),
        )
        .route("/{id}", put(update_photo).delete(delete_photo))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    order_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePhotoBody {
    alt: Option<String>,
    sort_order: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkResult {
    affected: u64,
}

/// Ingest an uploaded photo.
///
/// Multipart fields: `file` (required), `photoId`, `orderId`.
async fn upload_photo(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<photo::Model>> {
    let mut filename = None;
    let mut mime_type = None;
    let mut data = None;
    let mut photo_id = None;
    let mut order_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart data: {e}")))?
    {
        match field.name() {
            Some("file") => {
                filename = field.file_name().map(ToString::to_string);
                mime_type = field.content_type().map(ToString::to_string);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?
                        .to_vec(),
                );
            }
            Some("photoId") => {
                photo_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            Some("orderId") => {
                order_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let filename = filename.unwrap_or_else(|| "photo".to_string());
    let mime_type = mime_type.unwrap_or_else(|| "application/octet-stream".to_string());

    let photo = state
        .photo_service
        .upload(
            &user.id,
            UploadPhotoInput {
                filename,
                mime_type,
                data,
                photo_id,
                order_id,
            },
        )
        .await?;

    Ok(ApiResponse::ok(photo))
}

/// List the caller's photos, optionally scoped to one order.
async fn list_photos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<photo::Model>>> {
    let photos = match query.order_id {
        Some(order_id) => {
            state
                .photo_service
                .list_for_order(&user.id, &order_id)
                .await?
        }
        None => state.photo_service.list_for_user(&user.id).await?,
    };

    Ok(ApiResponse::ok(photos))
}

async fn update_photo(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePhotoBody>,
) -> AppResult<ApiResponse<photo::Model>> {
    let photo = state
        .photo_service
        .update(&user.id, &id, body.alt, body.sort_order)
        .await?;
    Ok(ApiResponse::ok(photo))
}

async fn delete_photo(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.photo_service.delete(&user.id, &id).await?;
    Ok(ApiResponse::ok(()))
}

/// Apply a bulk action (reorder, delete, update_alt) to owned photos.
async fn bulk_update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(action): Json<BulkPhotoAction>,
) -> AppResult<ApiResponse<BulkResult>> {
    let affected = state.photo_service.bulk(&user.id, action).await?;
    Ok(ApiResponse::ok(BulkResult { affected }))
}
