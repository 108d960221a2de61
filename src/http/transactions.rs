use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tracing::info;

use crate::models::transaction::{NewTransaction, StatusUpdate, Transaction};
use crate::state::AppState;

use super::{ApiJson, HttpError, user_id_param};

pub fn router() -> Router<AppState> {
    // `{id}` is a user id on the listing routes and a transaction hash on the
    // status route; the router needs one name per segment.
    Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions/{id}", get(list_transactions))
        .route("/transactions/{id}/{chain_id}", get(list_transactions_on_chain))
        .route("/transactions/{id}/status", put(update_status))
        .route("/transactions/by-hash/{hash}", get(get_transaction))
}

/// Used by whatever watches the chain to check a submission before confirming it.
async fn get_transaction(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Transaction>, HttpError> {
    state
        .store
        .get_transaction(&hash)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::not_found("Transaction"))
}

async fn list_transactions(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, HttpError> {
    let user_id = user_id_param(&user_id)?;
    Ok(Json(state.store.list_transactions(user_id).await))
}

async fn list_transactions_on_chain(
    Path((user_id, chain_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, HttpError> {
    let user_id = user_id_param(&user_id)?;
    Ok(Json(
        state
            .store
            .list_transactions_on_chain(user_id, &chain_id)
            .await,
    ))
}

async fn create_transaction(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<NewTransaction>,
) -> Result<Json<Transaction>, HttpError> {
    payload.validate().map_err(HttpError::bad_request)?;
    let transaction = state.store.create_transaction(payload).await?;
    info!(
        "Recorded {} transfer {} from {} to {}",
        transaction.token_symbol.as_deref().unwrap_or("native"),
        transaction.hash,
        transaction.from,
        transaction.to
    );
    Ok(Json(transaction))
}

async fn update_status(
    Path(hash): Path<String>,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<StatusUpdate>,
) -> Result<Json<Transaction>, HttpError> {
    payload.validate().map_err(HttpError::bad_request)?;
    let transaction = state
        .store
        .update_transaction_status(&hash, payload.status, payload.block_number)
        .await?;
    info!(
        "Transaction {} marked {} at block {:?}",
        transaction.hash, transaction.status, transaction.block_number
    );
    Ok(Json(transaction))
}
