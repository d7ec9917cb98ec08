use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use poker_server_domain::{
    ServiceError,
    player::{CreatePlayer, Player},
};
use serde::Deserialize;

use crate::{app::ApiError, http::AppState};

pub async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Player>>, ApiError> {
    let players = state.players.get_players().await?;
    Ok(Json(players))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let id = id
        .parse::<i64>()
        .map_err(|_| ServiceError::BadRequest("Invalid player ID".to_string()))?;
    match state.players.get_player_by_id(id).await? {
        Some(player) => Ok(Json(player)),
        None => Err(ServiceError::NotFound("Player not found".to_string()).into()),
    }
}

#[derive(Deserialize)]
pub struct CreatePlayerRequest {
    name: Option<String>,
    avatar: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let Ok(Json(input)) = payload else {
        return Err(ServiceError::BadRequest("Invalid input".to_string()).into());
    };
    let Some(name) = input.name.filter(|n| !n.is_empty()) else {
        return Err(ServiceError::BadRequest("Name is required".to_string()).into());
    };
    let player = state
        .players
        .create_player(&CreatePlayer {
            name,
            avatar: input.avatar,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(player)))
}
