use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::history::{ConsumptionEvent, EventHistory};
use crate::timestamp::TimePoint;

use super::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    /// The player-controlled character
    #[default]
    Avatar,
    Npc,
}

/// A living character with its own consumption log and numeric attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub kind: CharacterKind,
    #[serde(default)]
    pub variables: HashMap<String, f64>,
    #[serde(default)]
    pub consumption_history: EventHistory<ConsumptionEvent>,
}

impl Character {
    pub fn new(name: impl Into<String>, kind: CharacterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn avatar(name: impl Into<String>) -> Self {
        Self::new(name, CharacterKind::Avatar)
    }

    pub fn npc(name: impl Into<String>) -> Self {
        Self::new(name, CharacterKind::Npc)
    }

    pub fn consume(&mut self, item_id: impl Into<String>, time: TimePoint) {
        self.consumption_history
            .append(ConsumptionEvent::new(item_id, time));
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: f64) {
        self.variables.insert(name.into(), value);
    }
}

impl Subject for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn consumption_history(&self) -> Option<&EventHistory<ConsumptionEvent>> {
        Some(&self.consumption_history)
    }

    fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }
}
