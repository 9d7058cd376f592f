//! Player catalog backed by the players_data.json dataset

use crate::{OwError, Player, Result, Role};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Deserialize)]
struct CatalogFile {
    players: Vec<Player>,
}

/// Read-only collection of players, keyed by name
#[derive(Debug, Clone, Default)]
pub struct PlayerCatalog {
    players: Vec<Player>,
    index: HashMap<String, usize>,
}

impl PlayerCatalog {
    /// Load the catalog from a JSON file of the form `{ "players": [...] }`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OwError::Catalog(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json(&content)?;
        log::info!(
            "Loaded {} players ({} eligible) from {}",
            catalog.len(),
            catalog.eligible().count(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)
            .map_err(|e| OwError::Catalog(format!("Failed to parse player data: {}", e)))?;
        Self::from_players(file.players)
    }

    /// Build a catalog, rejecting duplicate names
    pub fn from_players(players: Vec<Player>) -> Result<Self> {
        let mut index = HashMap::with_capacity(players.len());
        for (i, player) in players.iter().enumerate() {
            if index.insert(player.name.clone(), i).is_some() {
                return Err(OwError::Catalog(format!(
                    "Duplicate player name: {}",
                    player.name
                )));
            }
        }
        Ok(PlayerCatalog { players, index })
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.index.get(name).map(|&i| &self.players[i])
    }

    /// Look up a player, failing with `UnknownPlayer`
    pub fn require(&self, name: &str) -> Result<&Player> {
        self.get(name)
            .ok_or_else(|| OwError::UnknownPlayer(name.to_string()))
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players with at least one recorded match, in catalog order
    pub fn eligible(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_eligible())
    }

    /// Case-insensitive name search over eligible players
    pub fn search<'a>(&'a self, query: &str, role: Option<Role>) -> Vec<&'a Player> {
        let needle = query.trim().to_lowercase();
        self.eligible()
            .filter(|p| role.map_or(true, |r| p.role == r))
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .collect()
    }
}
