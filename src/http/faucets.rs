//! Faucet directory. Entries point at external faucet sites; the cooldown is
//! advisory text for the client and nothing here dispenses tokens.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::models::faucet::{Faucet, NewFaucet};
use crate::state::AppState;

use super::{ApiJson, HttpError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/faucets", post(create_faucet))
        .route("/faucets/{chain_id}", get(list_faucets))
}

async fn list_faucets(
    Path(chain_id): Path<String>,
    State(state): State<AppState>,
) -> Json<Vec<Faucet>> {
    Json(state.store.list_faucets(&chain_id).await)
}

async fn create_faucet(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<NewFaucet>,
) -> Result<Json<Faucet>, HttpError> {
    payload.validate().map_err(HttpError::bad_request)?;
    let faucet = state.store.create_faucet(payload).await?;
    info!(
        "Added {} faucet {} on chain {}",
        faucet.token_symbol, faucet.url, faucet.chain_id
    );
    Ok(Json(faucet))
}
