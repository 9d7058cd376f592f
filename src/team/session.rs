//! Two-roster match session with cross-team exclusion

use super::roster::{Roster, RosterError};
use crate::data::PlayerCatalog;
use crate::predict::PredictionService;
use crate::{Player, PredictionResult, Result, Side};

/// The pair of rosters a single UI session builds up before predicting
#[derive(Debug, Clone, Default)]
pub struct MatchSession {
    team1: Roster,
    team2: Roster,
}

impl MatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    /// Add a player to one side; players on the other side are unavailable
    pub fn add(&mut self, side: Side, player: Player) -> std::result::Result<(), RosterError> {
        let (target, other) = match side {
            Side::Team1 => (&mut self.team1, &self.team2),
            Side::Team2 => (&mut self.team2, &self.team1),
        };
        let result = target.add(player, &other.names());
        if let Err(e) = &result {
            log::debug!("{} add rejected: {}", side, e);
        }
        result
    }

    pub fn remove(&mut self, side: Side, name: &str) -> Option<Player> {
        match side {
            Side::Team1 => self.team1.remove(name),
            Side::Team2 => self.team2.remove(name),
        }
    }

    pub fn reset_team(&mut self, side: Side) {
        match side {
            Side::Team1 => self.team1.clear(),
            Side::Team2 => self.team2.clear(),
        }
    }

    pub fn reset(&mut self) {
        self.team1.clear();
        self.team2.clear();
    }

    /// Catalog players that may be added to `side` right now
    pub fn available_for<'a>(&self, side: Side, catalog: &'a PlayerCatalog) -> Vec<&'a Player> {
        let other = self.roster(side.opponent());
        self.roster(side).available_for(catalog, &other.names())
    }

    /// Both teams have five players
    pub fn is_ready(&self) -> bool {
        self.team1.is_complete() && self.team2.is_complete()
    }

    pub fn predict(&self, service: &PredictionService) -> Result<PredictionResult> {
        service.predict(self.team1.players(), self.team2.players())
    }
}
