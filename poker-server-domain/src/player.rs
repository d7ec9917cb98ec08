use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ServiceResult;

pub type PlayerId = i64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insert payload; id and timestamp are generated by the store.
#[derive(Clone, Debug, Deserialize)]
pub struct CreatePlayer {
    pub name: String,
    pub avatar: Option<String>,
}

pub type ArcPlayerRepository = Arc<dyn PlayerRepository + Send + Sync + 'static>;

#[async_trait::async_trait]
pub trait PlayerRepository {
    /// All players, newest first.
    async fn get_players(&self) -> ServiceResult<Vec<Player>>;
    /// Inserts and returns the hydrated row including the generated id.
    async fn create_player(&self, input: &CreatePlayer) -> ServiceResult<Player>;
    /// `Ok(None)` for an unknown id, never an error.
    async fn get_player_by_id(&self, id: PlayerId) -> ServiceResult<Option<Player>>;
    async fn player_exists(&self, id: PlayerId) -> ServiceResult<bool>;
}
