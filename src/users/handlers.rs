use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{CreatedResponse, DeletedResponse, NewUser, UpdatedResponse, User, UserUpdate},
        repo::StoreError,
    },
};

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/users/create", post(create_user))
        .route("/users/selectAll", get(select_all))
        .route("/users/update/:id", put(update_user))
        .route("/users/delete/:id", delete(delete_user))
}

fn store_failed(op: &'static str) -> impl FnOnce(StoreError) -> ApiError {
    move |e| {
        let message = e.to_string();
        let api_error = ApiError::from(e);
        if api_error.status().is_client_error() {
            warn!(error = %message, op, "store rejected request");
        } else {
            error!(error = %message, op, "store call failed");
        }
        api_error
    }
}

#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(payload) = payload?;
    let id = state
        .users
        .insert(&payload)
        .await
        .map_err(store_failed("insert"))?;

    info!(user_id = id, "user created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Takes no request input; every row comes back unfiltered.
#[instrument(skip_all)]
pub async fn select_all(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .users
        .select_all()
        .await
        .map_err(store_failed("select_all"))?;
    Ok(Json(users))
}

#[instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let updated = state
        .users
        .update_by_id(id, &payload)
        .await
        .map_err(store_failed("update_by_id"))?;

    info!(user_id = id, updated, "user update applied");
    Ok(Json(UpdatedResponse { updated }))
}

#[instrument(skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Path(id) = id?;
    let deleted = state
        .users
        .delete_by_id(id)
        .await
        .map_err(store_failed("delete_by_id"))?;

    info!(user_id = id, deleted, "user delete applied");
    Ok(Json(DeletedResponse { deleted }))
}
