use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::models::network::{NewNetwork, Network};
use crate::state::AppState;

use super::{ApiJson, HttpError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/networks", get(list_networks).post(create_network))
        .route("/networks/{chain_id}", get(get_network))
}

async fn list_networks(State(state): State<AppState>) -> Json<Vec<Network>> {
    Json(state.store.list_networks().await)
}

async fn get_network(
    Path(chain_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Network>, HttpError> {
    state
        .store
        .get_network(&chain_id)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::not_found("Network"))
}

async fn create_network(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<NewNetwork>,
) -> Result<Json<Network>, HttpError> {
    payload.validate().map_err(HttpError::bad_request)?;
    let network = state.store.create_network(payload).await?;
    info!("Added network {} ({})", network.name, network.chain_id);
    Ok(Json(network))
}
