//! HTTP API
//!
//! JSON endpoints the web UI calls: player search and match prediction.

pub mod handlers;

use crate::data::PlayerCatalog;
use crate::predict::{OnnxLoader, PredictionService};
use crate::{Config, OwError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<PlayerCatalog>,
    pub service: Arc<PredictionService>,
}

/// Error rendered as `{"error": "..."}` with a status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<OwError> for ApiError {
    fn from(e: OwError) -> Self {
        if e.is_client_error() {
            ApiError::bad_request(e.to_string())
        } else {
            ApiError::internal(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("{}", self.message);
        } else {
            log::debug!("Rejected request: {}", self.message);
        }
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/predict", post(handlers::predict))
        .route("/api/players", get(handlers::players))
        .with_state(state)
}

/// Load the catalog and model, then serve until the process exits
pub async fn serve(config: &Config) -> crate::Result<()> {
    let catalog = PlayerCatalog::load(&config.data.players_path)?;
    let service = PredictionService::new(OnnxLoader::new(&config.model.path));
    service.adapter().warm_up()?;

    let state = AppState {
        catalog: Arc::new(catalog),
        service: Arc::new(service),
    };

    let listener = tokio::net::TcpListener::bind(config.server.bind.as_str()).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_catalog, FakeLoader, TEAM1_NAMES, TEAM2_NAMES};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app(loader: FakeLoader) -> Router {
        build_router(AppState {
            catalog: Arc::new(sample_catalog()),
            service: Arc::new(PredictionService::new(loader)),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn post_json(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/predict")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn team_json(names: &[&str]) -> Value {
        let catalog = sample_catalog();
        Value::Array(
            names
                .iter()
                .map(|n| {
                    let p = catalog.require(n).unwrap();
                    json!({
                        "name": p.name,
                        "matches_played": p.matches_played,
                        "stats": p.stats,
                    })
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_predict_success() {
        let (loader, counters) = FakeLoader::probabilities(vec![0.3, 0.7]);
        let body = json!({ "team1": team_json(&TEAM1_NAMES), "team2": team_json(&TEAM2_NAMES) });

        let (status, json) = send(app(loader), post_json(&body)).await;
        assert_eq!(status, StatusCode::OK);
        let p1 = json["team1WinProbability"].as_f64().unwrap();
        let p2 = json["team2WinProbability"].as_f64().unwrap();
        assert!((p1 - 0.7).abs() < 1e-9);
        assert!((p1 + p2 - 1.0).abs() < 1e-12);
        assert_eq!(counters.runs(), 1);
    }

    #[tokio::test]
    async fn test_predict_four_players() {
        let (loader, counters) = FakeLoader::probabilities(vec![0.3, 0.7]);
        let body = json!({
            "team1": team_json(&TEAM1_NAMES[..4]),
            "team2": team_json(&TEAM2_NAMES),
        });

        let (status, json) = send(app(loader), post_json(&body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("exactly 5 players"));
        assert_eq!(counters.runs(), 0);
    }

    #[tokio::test]
    async fn test_predict_missing_team() {
        let (loader, _) = FakeLoader::probabilities(vec![0.3, 0.7]);
        let body = json!({ "team1": team_json(&TEAM1_NAMES) });
        let (status, json) = send(app(loader), post_json(&body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_predict_unknown_player_without_role() {
        let (loader, _) = FakeLoader::probabilities(vec![0.3, 0.7]);
        let mut team1 = team_json(&TEAM1_NAMES);
        team1[0]["name"] = json!("Mystery");
        let body = json!({ "team1": team1, "team2": team_json(&TEAM2_NAMES) });

        let (status, json) = send(app(loader), post_json(&body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("Mystery"));
    }

    #[tokio::test]
    async fn test_predict_explicit_role_for_unknown_player() {
        let (loader, _) = FakeLoader::probabilities(vec![0.3, 0.7]);
        let mut team1 = team_json(&TEAM1_NAMES);
        team1[0]["name"] = json!("Mystery");
        team1[0]["role"] = json!("Tank");
        let body = json!({ "team1": team1, "team2": team_json(&TEAM2_NAMES) });

        let (status, _) = send(app(loader), post_json(&body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_predict_model_missing_is_server_error() {
        let (loader, _) = FakeLoader::failing();
        let body = json!({ "team1": team_json(&TEAM1_NAMES), "team2": team_json(&TEAM2_NAMES) });
        let (status, json) = send(app(loader), post_json(&body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("load model"));
    }

    #[tokio::test]
    async fn test_players_endpoint() {
        let (loader, _) = FakeLoader::probabilities(vec![0.5, 0.5]);
        let request = Request::builder()
            .uri("/api/players?q=tank&role=tank")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(app(loader), request).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = json["players"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Tank A", "Tank B"]);
    }

    #[tokio::test]
    async fn test_players_excludes_ineligible_and_bad_role() {
        let (loader, _) = FakeLoader::probabilities(vec![0.5, 0.5]);
        let request = Request::builder()
            .uri("/api/players")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(app(loader), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["players"].as_array().unwrap().len(), 10);

        let (loader, _) = FakeLoader::probabilities(vec![0.5, 0.5]);
        let request = Request::builder()
            .uri("/api/players?role=healer")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(loader), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
