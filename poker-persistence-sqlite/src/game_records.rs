use poker_server_domain::{
    ServiceError, ServiceResult,
    game_record::{
        CreateGameRecord, GameRecord, GameRecordId, GameRecordRepository, GameResultType,
        SettlementStatus,
    },
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

pub struct SqliteGameRecordRepository {
    pool: Pool<Sqlite>,
}

impl SqliteGameRecordRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn record_from_row(row: &SqliteRow) -> sqlx::Result<GameRecord> {
        let result_type: String = row.try_get("game_result_type")?;
        let settlement_status: String = row.try_get("settlement_status")?;
        Ok(GameRecord {
            id: row.try_get("id")?,
            player1_id: row.try_get("player1_id")?,
            player2_id: row.try_get("player2_id")?,
            player3_id: row.try_get("player3_id")?,
            player4_id: row.try_get("player4_id")?,
            player1_bomb_score: row.try_get("player1_bomb_score")?,
            player2_bomb_score: row.try_get("player2_bomb_score")?,
            player3_bomb_score: row.try_get("player3_bomb_score")?,
            player4_bomb_score: row.try_get("player4_bomb_score")?,
            player1_final_score: row.try_get("player1_final_score")?,
            player2_final_score: row.try_get("player2_final_score")?,
            player3_final_score: row.try_get("player3_final_score")?,
            player4_final_score: row.try_get("player4_final_score")?,
            game_result_type: result_type.parse::<GameResultType>().map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "game_result_type".to_string(),
                    source: Box::new(e),
                }
            })?,
            settlement_status: settlement_status.parse::<SettlementStatus>().map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "settlement_status".to_string(),
                    source: Box::new(e),
                }
            })?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            remarks: row.try_get("remarks")?,
        })
    }

    async fn fetch_records(&self, query: &str) -> ServiceResult<Vec<GameRecord>> {
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        rows.iter()
            .map(|row| {
                Self::record_from_row(row).map_err(|e| ServiceError::Internal(e.to_string()))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl GameRecordRepository for SqliteGameRecordRepository {
    async fn get_game_records(&self) -> ServiceResult<Vec<GameRecord>> {
        self.fetch_records("SELECT * FROM game_records ORDER BY created_at DESC, id DESC")
            .await
    }

    async fn get_pending_game_records(&self) -> ServiceResult<Vec<GameRecord>> {
        self.fetch_records(
            "SELECT * FROM game_records WHERE settlement_status = 'PENDING' \
             ORDER BY created_at DESC, id DESC",
        )
        .await
    }

    async fn get_settled_game_records(&self) -> ServiceResult<Vec<GameRecord>> {
        self.fetch_records(
            "SELECT * FROM game_records WHERE settlement_status = 'SETTLED' \
             ORDER BY created_at DESC, id DESC",
        )
        .await
    }

    async fn get_game_record_by_id(&self, id: GameRecordId) -> ServiceResult<Option<GameRecord>> {
        let row = sqlx::query("SELECT * FROM game_records WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        match row {
            Some(row) => Self::record_from_row(&row)
                .map(Some)
                .map_err(|e| ServiceError::Internal(e.to_string())),
            None => Ok(None),
        }
    }

    async fn create_game_record(&self, input: &CreateGameRecord) -> ServiceResult<GameRecord> {
        // Fail fast on the first missing player, before touching the table.
        for player_id in input.player_ids() {
            let found = sqlx::query("SELECT 1 FROM players WHERE id = ?")
                .bind(player_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            if found.is_none() {
                return Err(ServiceError::DependencyViolation(format!(
                    "Player with ID {player_id} does not exist"
                )));
            }
        }

        let res = sqlx::query(
            "INSERT INTO game_records (\
                player1_id, player2_id, player3_id, player4_id, \
                player1_bomb_score, player2_bomb_score, player3_bomb_score, player4_bomb_score, \
                player1_final_score, player2_final_score, player3_final_score, player4_final_score, \
                game_result_type, settlement_status, remarks\
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'PENDING', ?)",
        )
        .bind(input.player1_id)
        .bind(input.player2_id)
        .bind(input.player3_id)
        .bind(input.player4_id)
        .bind(input.player1_bomb_score)
        .bind(input.player2_bomb_score)
        .bind(input.player3_bomb_score)
        .bind(input.player4_bomb_score)
        .bind(input.player1_final_score)
        .bind(input.player2_final_score)
        .bind(input.player3_final_score)
        .bind(input.player4_final_score)
        .bind(input.game_result_type.as_str())
        .bind(&input.remarks)
        .execute(&self.pool)
        .await
        .map_err(|e| ServiceError::Internal(format!("Failed to create game record: {e}")))?;

        // Re-read to pick up generated id and timestamps. Not atomic with a
        // concurrent delete of the same row; an accepted race.
        let id = res.last_insert_rowid();
        match self.get_game_record_by_id(id).await? {
            Some(record) => Ok(record),
            None => ServiceError::internal(
                "Failed to create game record: inserted row missing on read-back",
            ),
        }
    }

    async fn delete_game_record(&self, id: GameRecordId) -> ServiceResult<bool> {
        let res = sqlx::query("DELETE FROM game_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        Ok(res.rows_affected() > 0)
    }

    async fn settle_all_pending(&self) -> ServiceResult<u64> {
        let res = sqlx::query(
            "UPDATE game_records \
             SET settlement_status = 'SETTLED', updated_at = CURRENT_TIMESTAMP \
             WHERE settlement_status = 'PENDING'",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
        Ok(res.rows_affected())
    }
}
