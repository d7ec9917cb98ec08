use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use log::info;
use poker_server_domain::{
    ServiceError,
    game_record::{CreateGameRecord, GameRecord},
    stats::{PlayerStats, SortField, SortOrder, compute_player_stats},
};
use serde::{Deserialize, Serialize};

use crate::{app::ApiError, http::AppState};

pub async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<GameRecord>>, ApiError> {
    let records = state.game_records.get_game_records().await?;
    Ok(Json(records))
}

pub async fn get_pending(
    State(state): State<AppState>,
) -> Result<Json<Vec<GameRecord>>, ApiError> {
    let records = state.game_records.get_pending_game_records().await?;
    Ok(Json(records))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameRecord>, ApiError> {
    let id = parse_record_id(&id)?;
    match state.game_records.get_game_record_by_id(id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ServiceError::NotFound("Game record not found".to_string()).into()),
    }
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateGameRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<GameRecord>), ApiError> {
    let Ok(Json(input)) = payload else {
        return Err(ServiceError::BadRequest("Invalid input".to_string()).into());
    };
    if input.player_ids().iter().any(|&id| id <= 0) {
        return Err(ServiceError::BadRequest("Invalid input".to_string()).into());
    }
    let record = state.game_records.create_game_record(&input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_record_id(&id)?;
    if state.game_records.delete_game_record(id).await? {
        Ok(Json(MessageResponse {
            message: "Game record deleted successfully".to_string(),
        }))
    } else {
        Err(ServiceError::NotFound("Game record not found".to_string()).into())
    }
}

pub async fn settle_all(State(state): State<AppState>) -> Result<Json<SettleAllResponse>, ApiError> {
    let settled_count = state.game_records.settle_all_pending().await?;
    info!("settled {} game records", settled_count);
    Ok(Json(SettleAllResponse {
        message: format!("Successfully settled {} game records", settled_count),
        settled_count,
    }))
}

pub async fn get_player_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Vec<PlayerStats>>, ApiError> {
    let sort_by = query
        .sort_by
        .as_deref()
        .unwrap_or("win_rate")
        .parse::<SortField>()?;
    let order = query
        .order
        .as_deref()
        .unwrap_or("desc")
        .parse::<SortOrder>()?;

    let players = state.players.get_players().await?;
    let settled = state.game_records.get_settled_game_records().await?;
    Ok(Json(compute_player_stats(
        &players, &settled, sort_by, order,
    )))
}

#[derive(Deserialize)]
pub struct StatsQuery {
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,
    order: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct SettleAllResponse {
    pub message: String,
    #[serde(rename = "settledCount")]
    pub settled_count: u64,
}

fn parse_record_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ServiceError::BadRequest("Invalid game record ID".to_string()).into())
}
