use std::any::Any;
use std::time::Duration;

use axum::extract::{FromRequest, Request, State};
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::state::AppState;
use crate::store::{StoreError, StoreStats};
use crate::validation::parse_user_id;

mod faucets;
mod networks;
mod tokens;
mod transactions;
mod users;
mod wallet_tokens;

/// The served application: the API router behind trailing-slash normalization.
pub type App = NormalizePath<Router>;

pub fn app(state: AppState) -> App {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

pub fn router(state: AppState) -> Router {
    assert!(
        state.start_time.elapsed() < Duration::from_secs(86_400),
        "Application uptime exceeds 24 hours before router creation"
    );

    // The wallet front end is served from a different origin during development.
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let api_router = Router::new()
        .merge(users::router())
        .merge(networks::router())
        .merge(tokens::router())
        .merge(transactions::router())
        .merge(wallet_tokens::router())
        .merge(faucets::router());

    Router::new()
        .route("/health", get(health_live))
        .route("/health/ready", get(health_ready))
        .nest("/api", api_router)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_live(State(state): State<AppState>) -> Result<Json<HealthResponse>, HttpError> {
    let uptime = state.start_time.elapsed().as_secs();
    let response = HealthResponse {
        status: "live",
        uptime_seconds: uptime,
    };
    Ok(Json(response))
}

async fn health_ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>, HttpError> {
    let collections = state.store.stats().await;
    if collections.networks == 0 {
        return Err(HttpError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "No networks configured".to_string(),
        ));
    }

    let response = ReadyResponse {
        status: "ready",
        collections,
    };
    Ok(Json(response))
}

async fn route_not_found() -> HttpError {
    HttpError::new(StatusCode::NOT_FOUND, "Route not found".to_string())
}

async fn method_not_allowed() -> HttpError {
    HttpError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed".to_string(),
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
struct ReadyResponse {
    status: &'static str,
    collections: StoreStats,
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: String) -> Self {
        assert!(status != StatusCode::OK, "Error status cannot be 200");
        assert!(!message.is_empty(), "Error message cannot be empty");
        Self { status, message }
    }

    pub fn bad_request(err: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string())
    }

    pub fn not_found(entity: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{entity} not found"))
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::NotFound { .. } | StoreError::InvalidTransition { .. } => {
                StatusCode::BAD_REQUEST
            }
            StoreError::Conflict { .. } => StatusCode::CONFLICT,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        info!("HTTP error: {}", self.message);
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// JSON body extractor whose rejections use the API's `{"error": ...}` shape
/// with a 400 status instead of axum's plain-text 415/422 responses.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| HttpError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

pub(crate) fn user_id_param(raw: &str) -> Result<i64, HttpError> {
    parse_user_id(raw).map_err(HttpError::bad_request)
}

/// Turns a handler panic into the same JSON error shape, exposing the panic text.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|message| message.to_string()))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| "Internal server error".to_string());
    error!("Handler panicked: {message}");
    HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::Request as HttpRequest;
    use axum::http::header::{
        ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD,
        ORIGIN,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::fixtures::Fixtures;
    use crate::store::WalletStore;

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";
    const NATIVE: &str = "0x0000000000000000000000000000000000000000";

    async fn seeded_app() -> App {
        let store = WalletStore::seeded(&Fixtures::testnets())
            .await
            .expect("fixtures seed cleanly");
        app(AppState::new(Arc::new(store)))
    }

    async fn send(app: &App, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = HttpRequest::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = app.clone().oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, value)
    }

    fn transaction_body(user_id: i64, hash: &str) -> Value {
        json!({
            "userId": user_id,
            "chainId": "11155111",
            "hash": hash,
            "from": ALICE,
            "to": BOB,
            "value": "0.25",
            "tokenAddress": null,
            "tokenSymbol": "ETH",
            "status": "pending"
        })
    }

    #[tokio::test]
    async fn user_lifecycle() {
        let app = seeded_app().await;
        let body = json!({
            "privyId": "did:privy:alice",
            "walletAddress": ALICE,
            "encryptedPrivateKey": "0xsecret"
        });

        let (status, created) = send(&app, Method::POST, "/api/users", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["id"], 1);
        assert_eq!(created["privyId"], "did:privy:alice");
        assert!(created["createdAt"].is_string());

        let (status, fetched) = send(&app, Method::GET, "/api/users/did:privy:alice", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, by_id) = send(&app, Method::GET, "/api/users/by-id/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(by_id, created);

        let (status, duplicate) = send(&app, Method::POST, "/api/users", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(duplicate["error"], "User did:privy:alice already exists");

        let (status, updated) = send(
            &app,
            Method::PUT,
            "/api/users/did:privy:alice/wallet",
            Some(json!({ "walletAddress": BOB, "encryptedPrivateKey": "0xnew" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["walletAddress"], BOB);
        assert_eq!(updated["createdAt"], created["createdAt"]);
    }

    #[tokio::test]
    async fn user_errors_use_json_bodies() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/api/users/did:privy:ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "User not found" }));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            Some(json!({ "privyId": "did:privy:alice" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("walletAddress"));

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/users/did:privy:ghost/wallet",
            Some(json!({ "walletAddress": BOB, "encryptedPrivateKey": "0xnew" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User not found");

        let (status, body) = send(&app, Method::GET, "/api/users/by-id/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn body_without_json_content_type_is_rejected() {
        let app = seeded_app().await;
        let request = HttpRequest::builder()
            .method(Method::POST)
            .uri("/api/users")
            .body(Body::from("privyId=alice"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn invalid_address_is_rejected() {
        let app = seeded_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            Some(json!({
                "privyId": "did:privy:alice",
                "walletAddress": "not-an-address",
                "encryptedPrivateKey": "0xsecret"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "walletAddress must start with 0x");
    }

    #[tokio::test]
    async fn networks_and_tokens() {
        let app = seeded_app().await;

        let (status, networks) = send(&app, Method::GET, "/api/networks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(networks.as_array().unwrap().len(), 4);
        assert_eq!(networks[0]["chainId"], "11155111");
        assert_eq!(networks[0]["isTestnet"], true);

        let (status, body) = send(&app, Method::GET, "/api/networks/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Network not found");

        let (status, tokens) = send(&app, Method::GET, "/api/tokens/11155111", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tokens.as_array().unwrap().len(), 2);
        assert_eq!(tokens[0]["symbol"], "ETH");
        assert_eq!(tokens[0]["isNative"], true);
        assert_eq!(tokens[0]["decimals"], 18);

        let (status, tokens) = send(&app, Method::GET, "/api/tokens/424242", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tokens, json!([]));

        let uri = format!("/api/tokens/97/{NATIVE}");
        let (status, token) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(token["symbol"], "BNB");

        let uri = format!("/api/tokens/97/{BOB}");
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Token not found");
    }

    #[tokio::test]
    async fn custom_token_flow() {
        let app = seeded_app().await;
        let (status, token) = send(
            &app,
            Method::POST,
            "/api/tokens",
            Some(json!({
                "chainId": "80001",
                "address": BOB,
                "symbol": "TST",
                "name": "Test Token",
                "decimals": 8,
                "logoUrl": null,
                "isNative": false
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(token["id"], 6);

        let (status, entry) = send(
            &app,
            Method::POST,
            "/api/wallet-tokens",
            Some(json!({
                "userId": 1,
                "chainId": "80001",
                "tokenAddress": BOB,
                "balance": "0",
                "isVisible": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entry["balance"], "0");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/wallet-tokens",
            Some(json!({ "userId": 1, "chainId": "80001", "tokenAddress": BOB })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, tokens) = send(&app, Method::GET, "/api/tokens/80001", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tokens.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn transaction_lifecycle() {
        let app = seeded_app().await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/transactions",
            Some(transaction_body(1, "0xabc")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["status"], "pending");
        assert_eq!(created["blockNumber"], Value::Null);
        assert!(created["timestamp"].is_string());

        let (status, duplicate) = send(
            &app,
            Method::POST,
            "/api/transactions",
            Some(transaction_body(2, "0xabc")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(duplicate["error"], "Transaction 0xabc already exists");

        let (status, listed) = send(&app, Method::GET, "/api/transactions/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([created]));

        let (status, listed) = send(&app, Method::GET, "/api/transactions/1/97", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([]));

        let (status, confirmed) = send(
            &app,
            Method::PUT,
            "/api/transactions/0xabc/status",
            Some(json!({ "status": "confirmed", "blockNumber": 123 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmed["status"], "confirmed");
        assert_eq!(confirmed["blockNumber"], 123);

        let (status, fetched) =
            send(&app, Method::GET, "/api/transactions/by-hash/0xabc", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, confirmed);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/transactions/0xdef/status",
            Some(json!({ "status": "confirmed", "blockNumber": 123 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Transaction not found");

        let (status, _) = send(&app, Method::GET, "/api/transactions/by-hash/0xdef", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/transactions/0xabc/status",
            Some(json!({ "status": "failed" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Transaction 0xabc cannot move from confirmed to failed"
        );
    }

    #[tokio::test]
    async fn unknown_status_value_is_rejected() {
        let app = seeded_app().await;
        send(
            &app,
            Method::POST,
            "/api/transactions",
            Some(transaction_body(1, "0xabc")),
        )
        .await;
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/transactions/0xabc/status",
            Some(json!({ "status": "dropped" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("dropped"));
    }

    #[tokio::test]
    async fn non_numeric_user_id_is_a_bad_request() {
        let app = seeded_app().await;
        for uri in [
            "/api/transactions/notanumber",
            "/api/transactions/notanumber/11155111",
            "/api/wallet-tokens/notanumber",
            "/api/wallet-tokens/notanumber/11155111",
        ] {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"], "userId must be an integer, got notanumber");
        }
    }

    #[tokio::test]
    async fn balance_refresh_upserts() {
        let app = seeded_app().await;
        let uri = format!("/api/wallet-tokens/1/11155111/{NATIVE}");

        let (status, first) = send(&app, Method::PUT, &uri, Some(json!({ "balance": "5" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["isVisible"], true);
        let (status, second) = send(&app, Method::PUT, &uri, Some(json!({ "balance": "5" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, second);

        let (status, listed) = send(&app, Method::GET, "/api/wallet-tokens/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([second]));

        let (status, listed) = send(&app, Method::GET, "/api/wallet-tokens/1/97", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([]));

        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "balance": 5.0 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "balance": "-1" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "balance must be a non-negative decimal string, got -1"
        );
    }

    #[tokio::test]
    async fn balance_refresh_requires_numeric_chain_id() {
        let app = seeded_app().await;
        let uri = format!("/api/wallet-tokens/1/sepolia/{NATIVE}");
        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "balance": "1" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "chainId must be a decimal number, got sepolia");

        let (_, listed) = send(&app, Method::GET, "/api/wallet-tokens/1", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn trailing_slash_is_ignored() {
        let app = seeded_app().await;
        let (status, networks) = send(&app, Method::GET, "/api/networks/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(networks.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let app = seeded_app().await;
        let request = HttpRequest::builder()
            .method(Method::OPTIONS)
            .uri(format!("/api/wallet-tokens/1/11155111/{NATIVE}"))
            .header(ORIGIN, "http://localhost:5173")
            .header(ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = headers[ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("PUT"), "{methods}");
    }

    #[tokio::test]
    async fn unknown_routes_use_json_bodies() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/api/nowhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Route not found" }));

        let (status, body) = send(&app, Method::GET, "/api/transactions/1/status", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Method not allowed" }));
    }

    #[tokio::test]
    async fn faucets_by_chain() {
        let app = seeded_app().await;
        let (status, faucets) = send(&app, Method::GET, "/api/faucets/11155111", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(faucets[0]["url"], "https://sepoliafaucet.com");
        assert_eq!(faucets[0]["amount"], "0.5");
        assert_eq!(faucets[0]["cooldownHours"], 24);

        let (status, faucets) = send(&app, Method::GET, "/api/faucets/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(faucets, json!([]));
    }

    #[tokio::test]
    async fn health_endpoints() {
        let app = seeded_app().await;
        let (status, live) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(live["status"], "live");

        let (status, ready) = send(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ready["collections"]["networks"], 4);
        assert_eq!(ready["collections"]["walletTokens"], 0);

        let empty = super::app(AppState::new(Arc::new(WalletStore::new())));
        let (status, body) = send(&empty, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "No networks configured");
    }

    async fn explode() -> &'static str {
        panic!("store exploded")
    }

    #[tokio::test]
    async fn panics_become_json_500() {
        let app = Router::new()
            .route("/boom", get(explode))
            .layer(CatchPanicLayer::custom(handle_panic));
        let request = HttpRequest::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "store exploded" }));
    }
}
