use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::models::token::{NewToken, Token};
use crate::state::AppState;

use super::{ApiJson, HttpError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tokens", post(create_token))
        .route("/tokens/{chain_id}", get(list_tokens))
        .route("/tokens/{chain_id}/{address}", get(get_token))
}

async fn list_tokens(
    Path(chain_id): Path<String>,
    State(state): State<AppState>,
) -> Json<Vec<Token>> {
    Json(state.store.list_tokens(&chain_id).await)
}

async fn get_token(
    Path((chain_id, address)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<Token>, HttpError> {
    state
        .store
        .get_token(&chain_id, &address)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::not_found("Token"))
}

/// Registers a custom ERC-20 whose metadata the client read from the chain.
async fn create_token(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<NewToken>,
) -> Result<Json<Token>, HttpError> {
    payload.validate().map_err(HttpError::bad_request)?;
    let token = state.store.create_token(payload).await?;
    info!(
        "Added token {} at {} on chain {}",
        token.symbol, token.address, token.chain_id
    );
    Ok(Json(token))
}
