//! Per-team roster with size and role limits

use crate::data::PlayerCatalog;
use crate::{Player, Role, TEAM_SIZE};
use std::collections::HashSet;
use thiserror::Error;

/// Why a roster mutation was rejected. The roster is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("roster already has {} players", TEAM_SIZE)]
    RosterFull,

    #[error("no {0} slots left on this team")]
    RoleLimitExceeded(Role),

    #[error("{0} is already on this team")]
    DuplicatePlayer(String),

    #[error("{0} is already on the other team")]
    PlayerUnavailable(String),
}

/// Fill level of a roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterState {
    Empty,
    Partial(usize),
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RoleCounts {
    tank: usize,
    damage: usize,
    support: usize,
}

impl RoleCounts {
    fn get(&self, role: Role) -> usize {
        match role {
            Role::Tank => self.tank,
            Role::Damage => self.damage,
            Role::Support => self.support,
        }
    }

    fn slot(&mut self, role: Role) -> &mut usize {
        match role {
            Role::Tank => &mut self.tank,
            Role::Damage => &mut self.damage,
            Role::Support => &mut self.support,
        }
    }
}

/// A team in progress: up to five distinct players, at most one Tank,
/// two Damage and two Support. Insertion order is kept for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    players: Vec<Player>,
    counts: RoleCounts,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player. `excluded` holds the names already on the opposing team.
    pub fn add(&mut self, player: Player, excluded: &HashSet<&str>) -> Result<(), RosterError> {
        if self.players.len() >= TEAM_SIZE {
            return Err(RosterError::RosterFull);
        }
        if self.remaining(player.role) == 0 {
            return Err(RosterError::RoleLimitExceeded(player.role));
        }
        if self.contains(&player.name) {
            return Err(RosterError::DuplicatePlayer(player.name));
        }
        if excluded.contains(player.name.as_str()) {
            return Err(RosterError::PlayerUnavailable(player.name));
        }

        *self.counts.slot(player.role) += 1;
        self.players.push(player);
        Ok(())
    }

    /// Remove a player by name. Absent names are ignored.
    pub fn remove(&mut self, name: &str) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.name == name)?;
        let player = self.players.remove(idx);
        *self.counts.slot(player.role) -= 1;
        Some(player)
    }

    pub fn clear(&mut self) {
        self.players.clear();
        self.counts = RoleCounts::default();
    }

    pub fn is_complete(&self) -> bool {
        self.players.len() == TEAM_SIZE
    }

    pub fn state(&self) -> RosterState {
        match self.players.len() {
            0 => RosterState::Empty,
            n if n >= TEAM_SIZE => RosterState::Full,
            n => RosterState::Partial(n),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    pub fn names(&self) -> HashSet<&str> {
        self.players.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn role_count(&self, role: Role) -> usize {
        self.counts.get(role)
    }

    /// Open slots left for a role
    pub fn remaining(&self, role: Role) -> usize {
        role.limit().saturating_sub(self.counts.get(role))
    }

    /// Catalog players that could be added next
    pub fn available_for<'a>(
        &self,
        catalog: &'a PlayerCatalog,
        excluded: &HashSet<&str>,
    ) -> Vec<&'a Player> {
        if self.is_complete() {
            return Vec::new();
        }
        catalog
            .eligible()
            .filter(|p| !self.contains(&p.name))
            .filter(|p| !excluded.contains(p.name.as_str()))
            .filter(|p| self.remaining(p.role) > 0)
            .collect()
    }
}
