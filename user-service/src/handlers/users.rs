use crate::models::{NewUser, UserResponse};
use crate::services::metrics::{
    record_store_error, record_user_created, record_user_deleted, record_user_lookup,
};
use crate::services::StoreError;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// `POST /user/add`
///
/// Any decode failure, a missing content type included, is a 500 carrying
/// the decoder's message. Success returns the new id as a bare hex string.
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("Received POST on /user/add");

    let new_user: NewUser = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Failed to decode user payload: {}", e);
        AppError::MalformedPayload(e)
    })?;

    let id = state.users.create(new_user).await.map_err(|e| {
        record_store_error("create");
        AppError::from(e)
    })?;

    record_user_created();
    tracing::info!(user_id = %id, "User created");

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], id.to_hex()))
}

/// `GET /user/{id}`
///
/// Unknown and unparseable ids both yield the zero-value user with 200.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(user_id = %id, "Received GET on /user/{{id}}");

    let user = match state.users.find_by_id(&id).await {
        Ok(Some(user)) => {
            record_user_lookup(true);
            UserResponse::from(user)
        }
        Ok(None) => {
            record_user_lookup(false);
            tracing::info!(user_id = %id, "User not found");
            UserResponse::default()
        }
        Err(StoreError::InvalidId(_)) => {
            record_user_lookup(false);
            tracing::warn!(user_id = %id, "Lookup with malformed user id");
            UserResponse::default()
        }
        Err(e) => {
            record_store_error("find");
            return Err(e.into());
        }
    };

    Ok(Json(user))
}

/// `DELETE /user/delete/{id}`
///
/// 200 when a user was removed, 500 when there was nothing to remove. No body
/// either way.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(user_id = %id, "Received DELETE on /user/delete/{{id}}");

    let removed = match state.users.delete_by_id(&id).await {
        Ok(removed) => removed,
        Err(StoreError::InvalidId(_)) => {
            tracing::warn!(user_id = %id, "Delete with malformed user id");
            false
        }
        Err(e) => {
            record_store_error("delete");
            return Err(e.into());
        }
    };

    record_user_deleted(removed);

    let status = if removed {
        tracing::info!(user_id = %id, "User deleted");
        StatusCode::OK
    } else {
        tracing::info!(user_id = %id, "No user deleted");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, [(header::CONTENT_TYPE, "application/json")]))
}
