//! Simulation settings
//!
//! Every field has a default, so a JSON file only needs the keys it changes.

use crate::game::{TableRules, VerbosityLevel};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// The driver stops starting new turns once this many have begun
    pub max_turn_count: u32,
    pub should_terminate_on_illegal_action: bool,
    pub starting_life: i32,
    pub opening_hand_size: usize,
    pub max_hand_size: usize,
    pub lands_per_turn: u32,
    pub max_actions_per_window: usize,
    pub seed: u64,
    pub verbosity: VerbosityLevel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_turn_count: 100,
            should_terminate_on_illegal_action: false,
            starting_life: 20,
            opening_hand_size: 7,
            max_hand_size: 7,
            lands_per_turn: 1,
            max_actions_per_window: 1000,
            seed: 0,
            verbosity: VerbosityLevel::Normal,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_max_turns(mut self, max_turn_count: u32) -> Self {
        self.max_turn_count = max_turn_count;
        self
    }

    pub fn with_terminate_on_illegal_action(mut self, terminate: bool) -> Self {
        self.should_terminate_on_illegal_action = terminate;
        self
    }

    pub fn with_starting_life(mut self, life: i32) -> Self {
        self.starting_life = life;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_max_actions_per_window(mut self, max: usize) -> Self {
        self.max_actions_per_window = max;
        self
    }

    /// The rule knobs the tabletop itself enforces
    pub fn table_rules(&self) -> TableRules {
        TableRules {
            starting_life: self.starting_life,
            opening_hand_size: self.opening_hand_size,
            max_hand_size: self.max_hand_size,
            lands_per_turn: self.lands_per_turn,
        }
    }
}
