use std::sync::Arc;

use log::info;
use poker_persistence_sqlite::{
    create_db_pool, game_records::SqliteGameRecordRepository, init_schema,
    players::SqlitePlayerRepository,
};
use poker_server_api::http::{self, AppState};

mod logs;

struct ServerConfig {
    port: u16,
    api_token: String,
    database_path: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        let port = std::env::var("POKER_HTTP_PORT")
            .expect("POKER_HTTP_PORT must be set")
            .parse::<u16>()
            .expect("POKER_HTTP_PORT must be a valid u16");
        let api_token = std::env::var("POKER_API_TOKEN").expect("POKER_API_TOKEN must be set");
        let database_path = std::env::var("POKER_DB").expect("POKER_DB must be set");
        Self {
            port,
            api_token,
            database_path,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    logs::init_logger();

    let config = ServerConfig::from_env();

    let pool = create_db_pool(&config.database_path);
    init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    let state = AppState {
        players: Arc::new(SqlitePlayerRepository::new(pool.clone())),
        game_records: Arc::new(SqliteGameRecordRepository::new(pool)),
        api_token: config.api_token,
    };

    info!("Starting application");

    http::run(config.port, state, shutdown_signal()).await;
}
