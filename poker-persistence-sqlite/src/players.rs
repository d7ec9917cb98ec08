use poker_server_domain::{
    ServiceError, ServiceResult,
    player::{CreatePlayer, Player, PlayerId, PlayerRepository},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

pub struct SqlitePlayerRepository {
    pool: Pool<Sqlite>,
}

impl SqlitePlayerRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn player_from_row(row: &SqliteRow) -> sqlx::Result<Player> {
        Ok(Player {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            avatar: row.try_get("avatar")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait::async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn get_players(&self) -> ServiceResult<Vec<Player>> {
        let rows = sqlx::query("SELECT * FROM players ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        rows.iter()
            .map(|row| {
                Self::player_from_row(row).map_err(|e| ServiceError::Internal(e.to_string()))
            })
            .collect()
    }

    async fn create_player(&self, input: &CreatePlayer) -> ServiceResult<Player> {
        let row = sqlx::query("INSERT INTO players (name, avatar) VALUES (?, ?) RETURNING *")
            .bind(&input.name)
            .bind(&input.avatar)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ServiceError::Internal(format!("Failed to create player: {e}")))?;
        Self::player_from_row(&row).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    async fn get_player_by_id(&self, id: PlayerId) -> ServiceResult<Option<Player>> {
        let row = sqlx::query("SELECT * FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        match row {
            Some(row) => Self::player_from_row(&row)
                .map(Some)
                .map_err(|e| ServiceError::Internal(e.to_string())),
            None => Ok(None),
        }
    }

    async fn player_exists(&self, id: PlayerId) -> ServiceResult<bool> {
        let row = sqlx::query("SELECT 1 FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        Ok(row.is_some())
    }
}
