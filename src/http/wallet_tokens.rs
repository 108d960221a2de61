use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tracing::{debug, info};

use crate::models::wallet_token::{BalanceUpdate, NewWalletToken, WalletToken};
use crate::state::AppState;
use crate::validation::{sanitize_evm_address, validate_chain_id};

use super::{ApiJson, HttpError, user_id_param};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/wallet-tokens", post(add_wallet_token))
        .route("/wallet-tokens/{user_id}", get(list_wallet_tokens))
        .route(
            "/wallet-tokens/{user_id}/{chain_id}",
            get(list_wallet_tokens_on_chain),
        )
        .route(
            "/wallet-tokens/{user_id}/{chain_id}/{token_address}",
            put(update_balance),
        )
}

async fn list_wallet_tokens(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<WalletToken>>, HttpError> {
    let user_id = user_id_param(&user_id)?;
    Ok(Json(state.store.list_wallet_tokens(user_id).await))
}

async fn list_wallet_tokens_on_chain(
    Path((user_id, chain_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<Vec<WalletToken>>, HttpError> {
    let user_id = user_id_param(&user_id)?;
    Ok(Json(
        state
            .store
            .list_wallet_tokens_on_chain(user_id, &chain_id)
            .await,
    ))
}

async fn update_balance(
    Path((user_id, chain_id, token_address)): Path<(String, String, String)>,
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<BalanceUpdate>,
) -> Result<Json<WalletToken>, HttpError> {
    let user_id = user_id_param(&user_id)?;
    let chain_id = validate_chain_id(&chain_id).map_err(HttpError::bad_request)?;
    let token_address =
        sanitize_evm_address(&token_address, "tokenAddress").map_err(HttpError::bad_request)?;
    payload.validate().map_err(HttpError::bad_request)?;

    let entry = state
        .store
        .upsert_wallet_token_balance(user_id, &chain_id, &token_address, payload.balance)
        .await;
    debug!(
        "Balance of {} on chain {} for user {} is {}",
        entry.token_address, entry.chain_id, entry.user_id, entry.balance
    );
    Ok(Json(entry))
}

/// Adds a custom token to a user's wallet before its first balance refresh.
async fn add_wallet_token(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<NewWalletToken>,
) -> Result<Json<WalletToken>, HttpError> {
    payload.validate().map_err(HttpError::bad_request)?;
    let entry = state.store.add_wallet_token(payload).await?;
    info!(
        "User {} now tracks {} on chain {}",
        entry.user_id, entry.token_address, entry.chain_id
    );
    Ok(Json(entry))
}
