//! Team stat difference features
//!
//! Each entry is the summed stat of team 1 minus the summed stat of team 2.
//! Values are raw dataset units with no scaling.

use crate::{OwError, Player, Result, StatKey, TEAM_SIZE};
use std::ops::Neg;

/// Feature order and the model input each entry feeds.
///
/// This order is baked into the deployed artifact. Changing it requires a
/// retrained model.
pub const FEATURE_SCHEMA: [(StatKey, &str); FeatureVector::DIM] = [
    (StatKey::DamageDealt, "Damage_Dealt_10m_hist_diff"),
    (StatKey::Eliminations, "Eliminations_10m_hist_diff"),
    (StatKey::FinalBlows, "Final_Blows_10m_hist_diff"),
    (StatKey::KdRatio, "K_D_Ratio_hist_diff"),
    (StatKey::Deaths, "Deaths_10m_hist_diff"),
    (StatKey::HealingDone, "Healing_Done_10m_hist_diff"),
    (StatKey::DamageMitigated, "Damage_Mitigated_10m_hist_diff"),
    (StatKey::ObjectiveTime, "Objective_Time_10m_hist_diff"),
    (StatKey::Assists, "Assists_10m_hist_diff"),
];

/// Per-stat difference between two teams, in `FEATURE_SCHEMA` order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FeatureVector::DIM]);

impl FeatureVector {
    /// Dimension of feature vector
    pub const DIM: usize = 9;

    pub fn from_values(values: [f64; Self::DIM]) -> Self {
        FeatureVector(values)
    }

    pub fn values(&self) -> &[f64; Self::DIM] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.0.iter().map(|v| *v as f32).collect()
    }

    pub fn get(&self, key: StatKey) -> f64 {
        FEATURE_SCHEMA
            .iter()
            .position(|(k, _)| *k == key)
            .map(|i| self.0[i])
            .unwrap_or(0.0)
    }

    /// Model input names paired with their values
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_SCHEMA
            .iter()
            .zip(self.0.iter())
            .map(|((_, name), value)| (*name, *value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

impl Neg for FeatureVector {
    type Output = FeatureVector;

    fn neg(self) -> FeatureVector {
        FeatureVector(self.0.map(|v| -v))
    }
}

fn sum_stat(players: &[Player], key: StatKey) -> f64 {
    players.iter().map(|p| p.stats.get(key)).sum()
}

/// Build the difference vector for two complete teams
pub fn build_features(team1: &[Player], team2: &[Player]) -> Result<FeatureVector> {
    for (label, team) in [("team1", team1), ("team2", team2)] {
        if team.len() != TEAM_SIZE {
            return Err(OwError::InvalidRoster(format!(
                "{} has {} players, expected {}",
                label,
                team.len(),
                TEAM_SIZE
            )));
        }
    }

    let mut values = [0.0; FeatureVector::DIM];
    for (slot, (key, _)) in values.iter_mut().zip(FEATURE_SCHEMA.iter()) {
        *slot = sum_stat(team1, *key) - sum_stat(team2, *key);
    }
    Ok(FeatureVector(values))
}
