use crate::data::types::Type;
use crate::sim::stat_stages::StatKey;
use crate::sim::status::Status;
use crate::sim::weather::Weather;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatTarget {
    User,
    Opponent,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatusInflict {
    pub status: Status,
    /// Percent chance in 0..=100.
    pub chance: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatChange {
    pub target: StatTarget,
    pub stat: StatKey,
    pub stages: i8,
    /// Percent chance in 0..=100.
    #[serde(default = "always")]
    pub chance: u8,
}

fn always() -> u8 {
    100
}

fn default_accuracy() -> Option<u8> {
    Some(100)
}

fn default_pp() -> u8 {
    10
}

/// Immutable move template. PP lives on each combatant's [`MoveSlot`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: Type,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: u16,
    /// `None` never misses.
    #[serde(default = "default_accuracy")]
    pub accuracy: Option<u8>,
    #[serde(default)]
    pub priority: i8,
    #[serde(default = "default_pp")]
    pub pp: u8,
    #[serde(default)]
    pub contact: bool,
    #[serde(default)]
    pub high_crit: bool,
    #[serde(default)]
    pub multi_hit: Option<(u8, u8)>,
    #[serde(default)]
    pub recoil_percent: u8,
    #[serde(default)]
    pub status_effect: Option<StatusInflict>,
    #[serde(default)]
    pub stat_change: Option<StatChange>,
    #[serde(default)]
    pub sets_weather: Option<Weather>,
}

impl MoveData {
    pub fn new(name: impl Into<String>, move_type: Type, category: MoveCategory, power: u16) -> Self {
        Self {
            name: name.into(),
            move_type,
            category,
            power,
            accuracy: Some(100),
            priority: 0,
            pp: default_pp(),
            contact: false,
            high_crit: false,
            multi_hit: None,
            recoil_percent: 0,
            status_effect: None,
            stat_change: None,
            sets_weather: None,
        }
    }

    /// Fallback used when every move slot is out of PP.
    pub fn struggle() -> Self {
        Self {
            accuracy: None,
            pp: 1,
            contact: true,
            recoil_percent: 25,
            ..Self::new("Struggle", Type::Normal, MoveCategory::Physical, 50)
        }
    }

    /// Zero-power moves skip the damage phase entirely.
    pub fn is_utility(&self) -> bool {
        self.power == 0
    }

    pub fn has_secondary_effect(&self) -> bool {
        self.status_effect.is_some() || self.stat_change.is_some()
    }

    pub fn id(&self) -> String {
        normalize_id(&self.name)
    }
}

/// Lowercase alphanumeric form used for registry lookups.
pub fn normalize_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A move as known by one combatant, with its own PP counter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub data: MoveData,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveSlot {
    pub fn new(data: MoveData) -> Self {
        let max_pp = data.pp;
        Self {
            data,
            pp: max_pp,
            max_pp,
        }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn has_pp(&self) -> bool {
        self.pp > 0
    }

    pub fn spend_pp(&mut self) {
        self.pp = self.pp.saturating_sub(1);
    }
}
