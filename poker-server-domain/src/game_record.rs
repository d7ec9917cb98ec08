use std::{str::FromStr, sync::Arc};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{ServiceError, ServiceResult, player::PlayerId};

pub type GameRecordId = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResultType {
    DoubleWin,
    SingleWin,
    Draw,
}

impl GameResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResultType::DoubleWin => "DOUBLE_WIN",
            GameResultType::SingleWin => "SINGLE_WIN",
            GameResultType::Draw => "DRAW",
        }
    }
}

impl FromStr for GameResultType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DOUBLE_WIN" => Ok(GameResultType::DoubleWin),
            "SINGLE_WIN" => Ok(GameResultType::SingleWin),
            "DRAW" => Ok(GameResultType::Draw),
            other => Err(ServiceError::Internal(format!(
                "unexpected game result type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    Pending,
    Settled,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Pending => "PENDING",
            SettlementStatus::Settled => "SETTLED",
        }
    }
}

impl FromStr for SettlementStatus {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(SettlementStatus::Pending),
            "SETTLED" => Ok(SettlementStatus::Settled),
            other => Err(ServiceError::Internal(format!(
                "unexpected settlement status: {other}"
            ))),
        }
    }
}

/// One finished hand among exactly four players. Slots 1/2 form one
/// partnership, slots 3/4 the other; that positional convention drives
/// the win statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameRecordId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player3_id: PlayerId,
    pub player4_id: PlayerId,
    pub player1_bomb_score: i64,
    pub player2_bomb_score: i64,
    pub player3_bomb_score: i64,
    pub player4_bomb_score: i64,
    pub player1_final_score: i64,
    pub player2_final_score: i64,
    pub player3_final_score: i64,
    pub player4_final_score: i64,
    pub game_result_type: GameResultType,
    pub settlement_status: SettlementStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Per-slot view of a record, in slot order.
#[derive(Clone, Copy, Debug)]
pub struct GameSlot {
    pub player_id: PlayerId,
    pub bomb_score: i64,
    pub final_score: i64,
}

impl GameRecord {
    pub fn slots(&self) -> [GameSlot; 4] {
        [
            GameSlot {
                player_id: self.player1_id,
                bomb_score: self.player1_bomb_score,
                final_score: self.player1_final_score,
            },
            GameSlot {
                player_id: self.player2_id,
                bomb_score: self.player2_bomb_score,
                final_score: self.player2_final_score,
            },
            GameSlot {
                player_id: self.player3_id,
                bomb_score: self.player3_bomb_score,
                final_score: self.player3_final_score,
            },
            GameSlot {
                player_id: self.player4_id,
                bomb_score: self.player4_bomb_score,
                final_score: self.player4_final_score,
            },
        ]
    }
}

/// Insert payload; settlement status is always PENDING on creation and is
/// never taken from the client.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateGameRecord {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player3_id: PlayerId,
    pub player4_id: PlayerId,
    pub player1_bomb_score: i64,
    pub player2_bomb_score: i64,
    pub player3_bomb_score: i64,
    pub player4_bomb_score: i64,
    pub player1_final_score: i64,
    pub player2_final_score: i64,
    pub player3_final_score: i64,
    pub player4_final_score: i64,
    pub game_result_type: GameResultType,
    pub remarks: Option<String>,
}

impl CreateGameRecord {
    pub fn player_ids(&self) -> [PlayerId; 4] {
        [
            self.player1_id,
            self.player2_id,
            self.player3_id,
            self.player4_id,
        ]
    }
}

pub type ArcGameRecordRepository = Arc<dyn GameRecordRepository + Send + Sync + 'static>;

#[async_trait::async_trait]
pub trait GameRecordRepository {
    /// All records, newest first.
    async fn get_game_records(&self) -> ServiceResult<Vec<GameRecord>>;
    /// Records still awaiting settlement, newest first.
    async fn get_pending_game_records(&self) -> ServiceResult<Vec<GameRecord>>;
    /// Settled records only; the input to the statistics aggregation.
    async fn get_settled_game_records(&self) -> ServiceResult<Vec<GameRecord>>;
    /// `Ok(None)` for an unknown id, never an error.
    async fn get_game_record_by_id(&self, id: GameRecordId) -> ServiceResult<Option<GameRecord>>;
    /// Validates that all four referenced players exist, then inserts with
    /// PENDING status and returns the hydrated row.
    async fn create_game_record(&self, input: &CreateGameRecord) -> ServiceResult<GameRecord>;
    /// Returns whether a row was deleted.
    async fn delete_game_record(&self, id: GameRecordId) -> ServiceResult<bool>;
    /// Transitions every PENDING record to SETTLED in one atomic statement
    /// and returns the number of rows affected.
    async fn settle_all_pending(&self) -> ServiceResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_type_round_trips_through_db_strings() {
        for ty in [
            GameResultType::DoubleWin,
            GameResultType::SingleWin,
            GameResultType::Draw,
        ] {
            assert_eq!(ty.as_str().parse::<GameResultType>().unwrap(), ty);
        }
        assert!("TRIPLE_WIN".parse::<GameResultType>().is_err());
    }

    #[test]
    fn settlement_status_rejects_unknown_db_value() {
        assert_eq!(
            "PENDING".parse::<SettlementStatus>().unwrap(),
            SettlementStatus::Pending
        );
        assert!("CANCELLED".parse::<SettlementStatus>().is_err());
    }

    #[test]
    fn result_type_uses_wire_spelling_in_json() {
        let json = serde_json::to_string(&GameResultType::DoubleWin).unwrap();
        assert_eq!(json, "\"DOUBLE_WIN\"");
        let parsed: GameResultType = serde_json::from_str("\"DRAW\"").unwrap();
        assert_eq!(parsed, GameResultType::Draw);
        assert!(serde_json::from_str::<GameResultType>("\"draw\"").is_err());
    }
}
