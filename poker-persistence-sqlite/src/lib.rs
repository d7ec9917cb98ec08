use poker_server_domain::{ServiceError, ServiceResult};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub mod game_records;
pub mod players;

const PLAYERS_DDL: &str = "CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    avatar TEXT,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const GAME_RECORDS_DDL: &str = "CREATE TABLE IF NOT EXISTS game_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player1_id INTEGER NOT NULL REFERENCES players(id),
    player2_id INTEGER NOT NULL REFERENCES players(id),
    player3_id INTEGER NOT NULL REFERENCES players(id),
    player4_id INTEGER NOT NULL REFERENCES players(id),
    player1_bomb_score INTEGER NOT NULL,
    player2_bomb_score INTEGER NOT NULL,
    player3_bomb_score INTEGER NOT NULL,
    player4_bomb_score INTEGER NOT NULL,
    player1_final_score INTEGER NOT NULL,
    player2_final_score INTEGER NOT NULL,
    player3_final_score INTEGER NOT NULL,
    player4_final_score INTEGER NOT NULL,
    game_result_type TEXT NOT NULL,
    settlement_status TEXT NOT NULL DEFAULT 'PENDING',
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    remarks TEXT
)";

pub fn create_db_pool(db_path: &str) -> Pool<Sqlite> {
    let conn_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_lazy_with(conn_options)
}

/// Single-connection in-memory database, already carrying the schema.
/// Every connection gets its own in-memory database, so the pool is
/// pinned to one connection that must never be recycled.
pub async fn create_memory_db_pool() -> ServiceResult<Pool<Sqlite>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &Pool<Sqlite>) -> ServiceResult<()> {
    for ddl in [PLAYERS_DDL, GAME_RECORDS_DDL] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
    }
    Ok(())
}
