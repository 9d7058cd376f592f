//! Shared fixtures and fake inference backends for unit tests

use crate::data::PlayerCatalog;
use crate::features::FEATURE_SCHEMA;
use crate::predict::adapter::PLACEHOLDER_INPUTS;
use crate::predict::{InferenceBackend, ModelInput, ModelLoader, OutputSpec};
use crate::team::MatchSession;
use crate::{OwError, Player, PlayerStats, Result, Role, Side};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A player whose stats are a fixed line scaled by `base`
pub(crate) fn player(name: &str, role: Role, base: f64) -> Player {
    Player {
        name: name.to_string(),
        matches_played: 10,
        role,
        stats: PlayerStats {
            damage_dealt: 1000.0 * base,
            healing_done: 500.0 * base,
            damage_mitigated: 800.0 * base,
            eliminations: 20.0 * base,
            deaths: 6.0 * base,
            kd_ratio: 2.5 * base,
            objective_time: 90.0 * base,
            assists: 8.0 * base,
            final_blows: 9.0 * base,
        },
    }
}

/// A complete 1/2/2 team
pub(crate) fn team(prefix: &str, base: f64) -> Vec<Player> {
    vec![
        player(&format!("{} Tank", prefix), Role::Tank, base),
        player(&format!("{} Damage 1", prefix), Role::Damage, base),
        player(&format!("{} Damage 2", prefix), Role::Damage, base),
        player(&format!("{} Support 1", prefix), Role::Support, base),
        player(&format!("{} Support 2", prefix), Role::Support, base),
    ]
}

pub(crate) const TEAM1_NAMES: [&str; 5] =
    ["Tank A", "Damage A1", "Damage A2", "Support A1", "Support A2"];
pub(crate) const TEAM2_NAMES: [&str; 5] =
    ["Tank B", "Damage B1", "Damage B2", "Support B1", "Support B2"];

/// Two full teams' worth of players plus one ineligible player
pub(crate) fn sample_catalog() -> PlayerCatalog {
    let mut players = Vec::new();
    for (names, base) in [(TEAM1_NAMES, 2.0), (TEAM2_NAMES, 1.0)] {
        for name in names {
            let role = if name.starts_with("Tank") {
                Role::Tank
            } else if name.starts_with("Damage") {
                Role::Damage
            } else {
                Role::Support
            };
            players.push(player(name, role, base));
        }
    }
    let mut benched = player("Benched", Role::Damage, 1.0);
    benched.matches_played = 0;
    players.push(benched);
    PlayerCatalog::from_players(players).unwrap()
}

pub(crate) fn fill_session(session: &mut MatchSession, catalog: &PlayerCatalog) {
    for (side, names) in [(Side::Team1, TEAM1_NAMES), (Side::Team2, TEAM2_NAMES)] {
        for name in names {
            session
                .add(side, catalog.require(name).unwrap().clone())
                .unwrap();
        }
    }
}

/// Observations shared between a fake loader, its backend and the test
#[derive(Default)]
pub(crate) struct FakeCounters {
    loads: AtomicUsize,
    runs: AtomicUsize,
    last_inputs: Mutex<Vec<ModelInput>>,
    last_output: Mutex<Option<String>>,
}

impl FakeCounters {
    pub(crate) fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub(crate) fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub(crate) fn last_inputs(&self) -> Vec<ModelInput> {
        self.last_inputs.lock().unwrap().clone()
    }

    pub(crate) fn last_output(&self) -> Option<String> {
        self.last_output.lock().unwrap().clone()
    }
}

pub(crate) struct FakeLoader {
    outputs: Vec<OutputSpec>,
    values: HashMap<String, Vec<f64>>,
    fail: bool,
    load_delay_ms: u64,
    counters: Arc<FakeCounters>,
}

impl FakeLoader {
    fn build(
        outputs: Vec<OutputSpec>,
        values: HashMap<String, Vec<f64>>,
        fail: bool,
    ) -> (Self, Arc<FakeCounters>) {
        let counters = Arc::new(FakeCounters::default());
        let loader = FakeLoader {
            outputs,
            values,
            fail,
            load_delay_ms: 0,
            counters: Arc::clone(&counters),
        };
        (loader, counters)
    }

    /// sklearn-style outputs: an int label tensor then a probability tensor
    pub(crate) fn probabilities(probs: Vec<f64>) -> (Self, Arc<FakeCounters>) {
        let label = if probs.get(1) > probs.first() { 1.0 } else { 0.0 };
        let values = HashMap::from([
            ("output_label".to_string(), vec![label]),
            ("output_probability".to_string(), probs),
        ]);
        Self::build(
            vec![
                OutputSpec::tensor("output_label"),
                OutputSpec::tensor("output_probability"),
            ],
            values,
            false,
        )
    }

    /// Probabilities hidden behind a non-tensor ZipMap output
    pub(crate) fn label_only(label: f64) -> (Self, Arc<FakeCounters>) {
        let values = HashMap::from([("output_label".to_string(), vec![label])]);
        Self::build(
            vec![
                OutputSpec::tensor("output_label"),
                OutputSpec::other("output_probability"),
            ],
            values,
            false,
        )
    }

    pub(crate) fn failing() -> (Self, Arc<FakeCounters>) {
        Self::build(Vec::new(), HashMap::new(), true)
    }

    pub(crate) fn with_load_delay_ms(mut self, ms: u64) -> Self {
        self.load_delay_ms = ms;
        self
    }
}

impl ModelLoader for FakeLoader {
    fn load(&self) -> Result<Box<dyn InferenceBackend>> {
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        if self.load_delay_ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(self.load_delay_ms));
        }
        if self.fail {
            return Err(OwError::ModelLoad("fake model missing".to_string()));
        }
        Ok(Box::new(FakeBackend {
            outputs: self.outputs.clone(),
            values: self.values.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

struct FakeBackend {
    outputs: Vec<OutputSpec>,
    values: HashMap<String, Vec<f64>>,
    counters: Arc<FakeCounters>,
}

impl InferenceBackend for FakeBackend {
    fn input_names(&self) -> Vec<String> {
        FEATURE_SCHEMA
            .iter()
            .map(|(_, name)| name.to_string())
            .chain(PLACEHOLDER_INPUTS.iter().map(|(name, _)| name.to_string()))
            .collect()
    }

    fn outputs(&self) -> &[OutputSpec] {
        &self.outputs
    }

    fn run(&self, inputs: &[ModelInput], output: &str) -> Result<Vec<f64>> {
        self.counters.runs.fetch_add(1, Ordering::SeqCst);
        *self.counters.last_inputs.lock().unwrap() = inputs.to_vec();
        *self.counters.last_output.lock().unwrap() = Some(output.to_string());

        // Mirror the runtime: every declared input must be fed
        for name in self.input_names() {
            if !inputs.iter().any(|i| i.name == name) {
                return Err(OwError::InferenceOutput(format!("missing input {}", name)));
            }
        }
        self.values
            .get(output)
            .cloned()
            .ok_or_else(|| OwError::InferenceOutput(format!("no output {}", output)))
    }
}
