//! Prediction service: the single entry point for match predictions

use super::adapter::InferenceAdapter;
use super::backend::ModelLoader;
use crate::features::build_features;
use crate::{OwError, Player, PredictionResult, Result, TEAM_SIZE};

/// Validates both teams, builds features and runs the shared adapter.
/// Results are not cached; only the model handle is.
pub struct PredictionService {
    adapter: InferenceAdapter,
}

impl PredictionService {
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self::from_adapter(InferenceAdapter::new(loader))
    }

    pub fn from_adapter(adapter: InferenceAdapter) -> Self {
        PredictionService { adapter }
    }

    pub fn adapter(&self) -> &InferenceAdapter {
        &self.adapter
    }

    /// Predict a match between two complete teams
    pub fn predict(&self, team1: &[Player], team2: &[Player]) -> Result<PredictionResult> {
        if team1.len() != TEAM_SIZE || team2.len() != TEAM_SIZE {
            return Err(OwError::InvalidRoster(format!(
                "team1 and team2 must each have exactly {} players (got {} and {})",
                TEAM_SIZE,
                team1.len(),
                team2.len()
            )));
        }

        let features = build_features(team1, team2)?;
        let result = self.adapter.predict(&features)?;
        log::info!(
            "Predicted team1 {:.1}% / team2 {:.1}%",
            result.team1() * 100.0,
            result.team2() * 100.0
        );
        Ok(result)
    }
}

/// Format a prediction for display
pub fn format_prediction(result: &PredictionResult, team1: &[Player], team2: &[Player]) -> String {
    let names = |team: &[Player]| {
        team.iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let verdict = match result.favored() {
        Some(side) => format!("{} favored", side),
        None => "Even match".to_string(),
    };

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  Team 1: {}
│  Team 2: {}
├─────────────────────────────────────────────────┤
│  Team 1 win probability:  {:.1}%
│  Team 2 win probability:  {:.1}%
│  {}
└─────────────────────────────────────────────────┘
"#,
        names(team1),
        names(team2),
        result.team1() * 100.0,
        result.team2() * 100.0,
        verdict
    )
}
