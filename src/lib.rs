//! OWCS match prediction
//!
//! Assemble two role-constrained five-player rosters from a player catalog and
//! score the matchup with a pre-trained ONNX classifier.

pub mod data;
pub mod features;
pub mod predict;
pub mod server;
pub mod team;

#[cfg(test)]
mod test_support;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use team::roster::RosterError;

/// Players per team
pub const TEAM_SIZE: usize = 5;

/// Environment variable overriding the model artifact location
pub const MODEL_PATH_ENV: &str = "OWCS_MODEL_PATH";

/// Player role within a team composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Tank,
    Damage,
    Support,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Tank, Role::Damage, Role::Support];

    /// Maximum number of players with this role on one team
    pub fn limit(&self) -> usize {
        match self {
            Role::Tank => 1,
            Role::Damage => 2,
            Role::Support => 2,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "tank" => Some(Role::Tank),
            "damage" | "dps" => Some(Role::Damage),
            "support" => Some(Role::Support),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Tank => write!(f, "Tank"),
            Role::Damage => write!(f, "Damage"),
            Role::Support => write!(f, "Support"),
        }
    }
}

/// One of the nine aggregate statistics tracked per player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKey {
    DamageDealt,
    HealingDone,
    DamageMitigated,
    Eliminations,
    Deaths,
    KdRatio,
    ObjectiveTime,
    Assists,
    FinalBlows,
}

impl StatKey {
    /// Display name as used in the player dataset
    pub fn label(&self) -> &'static str {
        match self {
            StatKey::DamageDealt => "Damage Dealt",
            StatKey::HealingDone => "Healing Done",
            StatKey::DamageMitigated => "Damage Mitigated",
            StatKey::Eliminations => "Eliminations",
            StatKey::Deaths => "Deaths",
            StatKey::KdRatio => "K/D Ratio",
            StatKey::ObjectiveTime => "Objective Time",
            StatKey::Assists => "Assists",
            StatKey::FinalBlows => "Final Blows",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate historical statistics for a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(rename = "Damage Dealt")]
    pub damage_dealt: f64,
    #[serde(rename = "Healing Done")]
    pub healing_done: f64,
    #[serde(rename = "Damage Mitigated")]
    pub damage_mitigated: f64,
    #[serde(rename = "Eliminations")]
    pub eliminations: f64,
    #[serde(rename = "Deaths")]
    pub deaths: f64,
    #[serde(rename = "K/D Ratio")]
    pub kd_ratio: f64,
    #[serde(rename = "Objective Time")]
    pub objective_time: f64,
    #[serde(rename = "Assists")]
    pub assists: f64,
    #[serde(rename = "Final Blows")]
    pub final_blows: f64,
}

impl PlayerStats {
    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::DamageDealt => self.damage_dealt,
            StatKey::HealingDone => self.healing_done,
            StatKey::DamageMitigated => self.damage_mitigated,
            StatKey::Eliminations => self.eliminations,
            StatKey::Deaths => self.deaths,
            StatKey::KdRatio => self.kd_ratio,
            StatKey::ObjectiveTime => self.objective_time,
            StatKey::Assists => self.assists,
            StatKey::FinalBlows => self.final_blows,
        }
    }
}

/// A player from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub matches_played: u32,
    pub stats: PlayerStats,
    pub role: Role,
}

impl Player {
    /// Players without recorded matches cannot be picked
    pub fn is_eligible(&self) -> bool {
        self.matches_played > 0
    }
}

/// Which of the two teams in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Team1 => write!(f, "Team 1"),
            Side::Team2 => write!(f, "Team 2"),
        }
    }
}

/// Complementary win probabilities for the two teams
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    team1_win_probability: f64,
    team2_win_probability: f64,
}

impl PredictionResult {
    /// Build a result from team 1's probability, clamped into [0, 1].
    /// Team 2 always receives the complement.
    pub fn new(team1_win_probability: f64) -> Self {
        let p = team1_win_probability.clamp(0.0, 1.0);
        PredictionResult {
            team1_win_probability: p,
            team2_win_probability: 1.0 - p,
        }
    }

    pub fn team1(&self) -> f64 {
        self.team1_win_probability
    }

    pub fn team2(&self) -> f64 {
        self.team2_win_probability
    }

    pub fn probability(&self, side: Side) -> f64 {
        match side {
            Side::Team1 => self.team1_win_probability,
            Side::Team2 => self.team2_win_probability,
        }
    }

    /// The favored side, or None on an exact tie
    pub fn favored(&self) -> Option<Side> {
        match self
            .team1_win_probability
            .partial_cmp(&self.team2_win_probability)
        {
            Some(std::cmp::Ordering::Greater) => Some(Side::Team1),
            Some(std::cmp::Ordering::Less) => Some(Side::Team2),
            _ => None,
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum OwError {
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Roster change rejected: {0}")]
    Roster(#[from] RosterError),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Unexpected model output: {0}")]
    InferenceOutput(String),

    #[error("Player catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OwError {
    /// Whether the caller can fix the request (4xx) as opposed to a server fault (5xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OwError::InvalidRoster(_) | OwError::UnknownPlayer(_) | OwError::Roster(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OwError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub players_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            path: "server-models/match_prediction_model.onnx".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            players_path: "data/players_data.json".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OwError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| OwError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| OwError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply the model path override from the environment, if set
    pub fn apply_env_overrides(&mut self) {
        self.apply_model_path_override(std::env::var(MODEL_PATH_ENV).ok());
    }

    fn apply_model_path_override(&mut self, value: Option<String>) {
        if let Some(path) = value.filter(|p| !p.trim().is_empty()) {
            log::debug!("Model path overridden by {}: {}", MODEL_PATH_ENV, path);
            self.model.path = path;
        }
    }
}
