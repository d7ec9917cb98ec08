use std::time::Duration;

use axum::{
    Json, Router,
    extract::Request,
    http::{
        Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::{self, Next},
    response::{Html, Response},
    routing::{get, patch},
};
use log::info;
use poker_server_domain::{game_record::ArcGameRecordRepository, player::ArcPlayerRepository};
use tower_http::cors::{Any, CorsLayer};

use crate::auth;

mod game_records;
mod players;

#[derive(Clone)]
pub struct AppState {
    pub players: ArcPlayerRepository,
    pub game_records: ArcGameRecordRepository,
    pub api_token: String,
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest(
            "/poker/v1",
            Router::new()
                .route("/players", get(players::get_all).post(players::create))
                .route("/players/{id}", get(players::get_by_id))
                .route(
                    "/game-records",
                    get(game_records::get_all).post(game_records::create),
                )
                .route("/game-records/pending", get(game_records::get_pending))
                .route(
                    "/game-records/player-stats",
                    get(game_records::get_player_stats),
                )
                .route("/game-records/settle-all", patch(game_records::settle_all))
                .route(
                    "/game-records/{id}",
                    get(game_records::get_by_id).delete(game_records::delete),
                )
                .route("/health", get(health)),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .merge(api)
        .fallback(welcome)
        .layer(middleware::from_fn(log_request))
        .layer(cors_layer())
        .with_state(state)
}

pub async fn run(
    port: u16,
    state: AppState,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .unwrap();

    info!("API server listening on port {}", port);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .unwrap();

    info!("HTTP API shut down gracefully");
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Unmatched paths get a plain welcome page, not an API error.
async fn welcome() -> Html<&'static str> {
    Html("Welcome to Poker API")
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    info!("{} {} -> {}", method, path, response.status().as_u16());
    response
}

// Any origin, the verbs the API serves, and the headers clients send.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT])
        .max_age(Duration::from_secs(600))
}
