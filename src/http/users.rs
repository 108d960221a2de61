use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tracing::info;

use crate::models::user::{NewUser, User, WalletUpdate};
use crate::state::AppState;

use super::{ApiJson, HttpError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{privy_id}", get(get_user_by_privy_id))
        .route("/users/{privy_id}/wallet", put(update_wallet))
        .route("/users/by-id/{id}", get(get_user))
}

async fn create_user(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<NewUser>,
) -> Result<Json<User>, HttpError> {
    payload.validate().map_err(HttpError::bad_request)?;
    let user = state.store.create_user(payload).await?;
    info!("Registered user {} with wallet {}", user.id, user.wallet_address);
    Ok(Json(user))
}

async fn get_user_by_privy_id(
    Path(privy_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<User>, HttpError> {
    state
        .store
        .get_user_by_privy_id(&privy_id)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::not_found("User"))
}

async fn get_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<User>, HttpError> {
    let id = super::user_id_param(&id)?;
    state
        .store
        .get_user(id)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::not_found("User"))
}

async fn update_wallet(
    Path(privy_id): Path<String>,
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<WalletUpdate>,
) -> Result<Json<User>, HttpError> {
    payload.validate().map_err(HttpError::bad_request)?;
    let user = state.store.update_user_wallet(&privy_id, payload).await?;
    info!("Imported wallet {} for user {}", user.wallet_address, user.id);
    Ok(Json(user))
}
