use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::data::PlayerCatalog;
use crate::{OwError, Player, PlayerStats, PredictionResult, Role, TEAM_SIZE};

// ── Predict Endpoint ────────────────────────────────────────────

/// Player as sent by the UI. Role may be omitted and is then taken from the catalog.
#[derive(Debug, Deserialize)]
pub struct PlayerPayload {
    pub name: String,
    #[serde(default)]
    pub matches_played: u32,
    pub stats: PlayerStats,
    #[serde(default)]
    pub role: Option<Role>,
}

impl PlayerPayload {
    fn resolve(self, catalog: &PlayerCatalog) -> crate::Result<Player> {
        let role = match self.role {
            Some(role) => role,
            None => catalog.require(&self.name)?.role,
        };
        Ok(Player {
            name: self.name,
            matches_played: self.matches_played,
            stats: self.stats,
            role,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub team1: Vec<PlayerPayload>,
    pub team2: Vec<PlayerPayload>,
}

fn resolve_team(catalog: &PlayerCatalog, team: Vec<PlayerPayload>) -> crate::Result<Vec<Player>> {
    team.into_iter().map(|p| p.resolve(catalog)).collect()
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        ApiError::bad_request(format!(
            "Request must include team1 and team2, each with exactly {} players ({})",
            TEAM_SIZE,
            e.body_text()
        ))
    })?;

    if request.team1.len() != TEAM_SIZE || request.team2.len() != TEAM_SIZE {
        return Err(OwError::InvalidRoster(format!(
            "Request must include team1 and team2, each with exactly {} players",
            TEAM_SIZE
        ))
        .into());
    }

    let team1 = resolve_team(&state.catalog, request.team1)?;
    let team2 = resolve_team(&state.catalog, request.team2)?;

    let service = Arc::clone(&state.service);
    let result = tokio::task::spawn_blocking(move || service.predict(&team1, &team2))
        .await
        .map_err(|e| ApiError::internal(format!("prediction task failed: {}", e)))??;

    Ok(Json(result))
}

// ── Players Endpoint ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlayersParams {
    pub q: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<Player>,
}

pub async fn players(
    State(state): State<AppState>,
    Query(params): Query<PlayersParams>,
) -> Result<Json<PlayersResponse>, ApiError> {
    let role = match params.role.as_deref() {
        Some(name) => Some(
            Role::from_name(name)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown role: {}", name)))?,
        ),
        None => None,
    };

    let players = state
        .catalog
        .search(params.q.as_deref().unwrap_or(""), role)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(PlayersResponse { players }))
}
