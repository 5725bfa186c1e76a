use crate::data::moves::{normalize_id, MoveCategory, MoveData, MoveSlot, StatChange, StatTarget, StatusInflict};
use crate::data::types::Type;
use crate::sim::abilities::{standard_abilities, Ability};
use crate::sim::items::{standard_items, HeldItem};
use crate::sim::stat_stages::StatKey;
use crate::sim::status::Status;
use crate::sim::weather::Weather;
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use tracing::debug;

/// Lookup tables for moves, held items and abilities, keyed by normalized id.
#[derive(Clone, Debug)]
pub struct Registry {
    moves: HashMap<String, MoveData>,
    items: HashMap<String, HeldItem>,
    abilities: HashMap<String, Ability>,
    struggle: MoveData,
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

fn physical(name: &str, move_type: Type, power: u16) -> MoveData {
    MoveData {
        contact: true,
        ..MoveData::new(name, move_type, MoveCategory::Physical, power)
    }
}

fn special(name: &str, move_type: Type, power: u16) -> MoveData {
    MoveData::new(name, move_type, MoveCategory::Special, power)
}

fn utility(name: &str, move_type: Type) -> MoveData {
    MoveData::new(name, move_type, MoveCategory::Special, 0)
}

fn inflicts(status: Status, chance: u8) -> Option<StatusInflict> {
    Some(StatusInflict { status, chance })
}

fn shifts(target: StatTarget, stat: StatKey, stages: i8, chance: u8) -> Option<StatChange> {
    Some(StatChange {
        target,
        stat,
        stages,
        chance,
    })
}

fn standard_moves() -> Vec<MoveData> {
    vec![
        MoveData {
            pp: 35,
            ..physical("Tackle", Type::Normal, 40)
        },
        MoveData {
            priority: 1,
            pp: 30,
            ..physical("Quick Attack", Type::Normal, 40)
        },
        MoveData {
            recoil_percent: 33,
            pp: 15,
            ..physical("Double-Edge", Type::Normal, 120)
        },
        MoveData {
            accuracy: None,
            pp: 20,
            ..special("Swift", Type::Normal, 60)
        },
        MoveData {
            pp: 25,
            status_effect: inflicts(Status::Burn, 10),
            ..special("Ember", Type::Flame, 40)
        },
        MoveData {
            pp: 15,
            status_effect: inflicts(Status::Burn, 10),
            ..special("Flamethrower", Type::Flame, 90)
        },
        MoveData {
            pp: 15,
            recoil_percent: 33,
            status_effect: inflicts(Status::Burn, 10),
            ..physical("Flare Blitz", Type::Flame, 120)
        },
        MoveData {
            pp: 25,
            ..special("Water Gun", Type::Aqua, 40)
        },
        MoveData {
            pp: 15,
            ..special("Surf", Type::Aqua, 90)
        },
        MoveData {
            pp: 25,
            ..physical("Vine Whip", Type::Leaf, 45)
        },
        MoveData {
            accuracy: Some(95),
            pp: 25,
            high_crit: true,
            contact: false,
            ..physical("Razor Leaf", Type::Leaf, 55)
        },
        MoveData {
            pp: 30,
            status_effect: inflicts(Status::Paralysis, 10),
            ..special("Thunder Shock", Type::Volt, 40)
        },
        MoveData {
            pp: 15,
            status_effect: inflicts(Status::Paralysis, 10),
            ..special("Thunderbolt", Type::Volt, 90)
        },
        MoveData {
            accuracy: Some(90),
            pp: 20,
            status_effect: inflicts(Status::Paralysis, 100),
            ..utility("Thunder Wave", Type::Volt)
        },
        MoveData {
            pp: 10,
            status_effect: inflicts(Status::Frozen, 10),
            ..special("Ice Beam", Type::Frost, 90)
        },
        MoveData {
            pp: 25,
            high_crit: true,
            ..physical("Karate Chop", Type::Brawl, 50)
        },
        MoveData {
            pp: 30,
            multi_hit: Some((2, 2)),
            ..physical("Double Kick", Type::Brawl, 30)
        },
        MoveData {
            pp: 35,
            contact: false,
            status_effect: inflicts(Status::Poison, 30),
            ..physical("Poison Sting", Type::Venom, 15)
        },
        MoveData {
            accuracy: Some(75),
            pp: 35,
            status_effect: inflicts(Status::Poison, 100),
            ..utility("Poison Powder", Type::Venom)
        },
        MoveData {
            contact: false,
            ..physical("Earthquake", Type::Terra, 100)
        },
        MoveData {
            pp: 35,
            ..physical("Wing Attack", Type::Gale, 60)
        },
        MoveData {
            stat_change: shifts(StatTarget::Opponent, StatKey::Special, -1, 10),
            ..special("Psychic", Type::Mind, 90)
        },
        MoveData {
            accuracy: Some(95),
            pp: 20,
            contact: false,
            multi_hit: Some((2, 5)),
            ..physical("Pin Missile", Type::Insect, 25)
        },
        MoveData {
            accuracy: Some(90),
            contact: false,
            ..physical("Rock Slide", Type::Stone, 75)
        },
        MoveData {
            pp: 15,
            stat_change: shifts(StatTarget::Opponent, StatKey::Special, -1, 20),
            ..special("Shadow Ball", Type::Spirit, 80)
        },
        MoveData {
            pp: 15,
            ..physical("Dragon Claw", Type::Dragon, 80)
        },
        MoveData {
            pp: 25,
            ..physical("Bite", Type::Shadow, 60)
        },
        MoveData {
            accuracy: Some(75),
            pp: 15,
            stat_change: shifts(StatTarget::Opponent, StatKey::Defense, -1, 30),
            ..physical("Iron Tail", Type::Metal, 100)
        },
        MoveData {
            pp: 15,
            stat_change: shifts(StatTarget::Opponent, StatKey::Special, -1, 30),
            ..special("Moonblast", Type::Fae, 95)
        },
        MoveData {
            accuracy: None,
            pp: 20,
            stat_change: shifts(StatTarget::User, StatKey::Attack, 2, 100),
            ..utility("Swords Dance", Type::Normal)
        },
        MoveData {
            pp: 40,
            stat_change: shifts(StatTarget::Opponent, StatKey::Attack, -1, 100),
            ..utility("Growl", Type::Normal)
        },
        MoveData {
            accuracy: None,
            pp: 30,
            stat_change: shifts(StatTarget::User, StatKey::Speed, 2, 100),
            ..utility("Agility", Type::Mind)
        },
        MoveData {
            accuracy: None,
            pp: 15,
            stat_change: shifts(StatTarget::User, StatKey::Evasion, 1, 100),
            ..utility("Double Team", Type::Normal)
        },
        MoveData {
            pp: 20,
            stat_change: shifts(StatTarget::Opponent, StatKey::Accuracy, -1, 100),
            ..utility("Sand Attack", Type::Terra)
        },
        MoveData {
            accuracy: Some(75),
            pp: 15,
            status_effect: inflicts(Status::Sleep, 100),
            ..utility("Sleep Powder", Type::Leaf)
        },
        MoveData {
            accuracy: Some(85),
            pp: 15,
            status_effect: inflicts(Status::Burn, 100),
            ..utility("Will-O-Wisp", Type::Flame)
        },
        MoveData {
            accuracy: None,
            pp: 5,
            sets_weather: Some(Weather::Rain),
            ..utility("Rain Dance", Type::Aqua)
        },
        MoveData {
            accuracy: None,
            pp: 5,
            sets_weather: Some(Weather::Sun),
            ..utility("Sunny Day", Type::Flame)
        },
        MoveData {
            accuracy: None,
            pp: 10,
            sets_weather: Some(Weather::Sandstorm),
            ..utility("Sandstorm", Type::Stone)
        },
        MoveData {
            accuracy: None,
            pp: 10,
            sets_weather: Some(Weather::Hail),
            ..utility("Hail", Type::Frost)
        },
    ]
}

impl Registry {
    /// Empty tables; only Struggle is known.
    pub fn empty() -> Self {
        Self {
            moves: HashMap::new(),
            items: HashMap::new(),
            abilities: HashMap::new(),
            struggle: MoveData::struggle(),
        }
    }

    /// The built-in move, item and ability catalog.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for data in standard_moves() {
            registry.insert_move(data);
        }
        for item in standard_items() {
            registry.items.insert(normalize_id(&item.name), item);
        }
        for ability in standard_abilities() {
            registry.abilities.insert(normalize_id(&ability.name), ability);
        }
        debug!(
            moves = registry.moves.len(),
            items = registry.items.len(),
            abilities = registry.abilities.len(),
            "loaded standard registry"
        );
        registry
    }

    /// Builds a registry from a JSON array of moves on top of the standard catalog.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut registry = Self::standard();
        registry.extend_from_json(raw)?;
        Ok(registry)
    }

    /// Adds or replaces moves from a JSON array. Nothing is inserted if any entry fails.
    pub fn extend_from_json(&mut self, raw: &str) -> Result<usize> {
        let parsed: Vec<MoveData> = serde_json::from_str(raw).context("Failed to parse move data JSON")?;
        let count = parsed.len();
        for data in parsed {
            self.insert_move(data);
        }
        Ok(count)
    }

    pub fn insert_move(&mut self, data: MoveData) {
        self.moves.insert(data.id(), data);
    }

    pub fn move_data(&self, name: &str) -> Result<&MoveData> {
        self.moves
            .get(&normalize_id(name))
            .ok_or_else(|| anyhow!("Unknown move: {name}"))
    }

    /// A fresh slot with full PP for the named move.
    pub fn move_slot(&self, name: &str) -> Result<MoveSlot> {
        self.move_data(name).map(|data| MoveSlot::new(data.clone()))
    }

    pub fn item(&self, name: &str) -> Result<HeldItem> {
        self.items
            .get(&normalize_id(name))
            .cloned()
            .ok_or_else(|| anyhow!("Unknown item: {name}"))
    }

    pub fn ability(&self, name: &str) -> Result<Ability> {
        self.abilities
            .get(&normalize_id(name))
            .cloned()
            .ok_or_else(|| anyhow!("Unknown ability: {name}"))
    }

    pub fn struggle(&self) -> &MoveData {
        &self.struggle
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::abilities::AbilityEffect;
    use crate::sim::items::ItemEffect;

    #[test]
    fn lookups_ignore_case_and_punctuation() -> Result<()> {
        let registry = Registry::standard();
        assert_eq!(registry.move_data("thunder-wave")?.name, "Thunder Wave");
        assert_eq!(registry.move_data("WILL-O-WISP")?.status_effect, inflicts(Status::Burn, 100));
        assert_eq!(registry.item("focus sash")?.effect, ItemEffect::FocusSash);
        assert_eq!(registry.ability("skill-link")?.effect, AbilityEffect::MaxHits);
        Ok(())
    }

    #[test]
    fn unknown_names_are_errors() {
        let registry = Registry::standard();
        let err = registry.move_data("Hyper Beam").unwrap_err();
        assert!(err.to_string().contains("Hyper Beam"));
        assert!(registry.item("Master Ball").is_err());
        assert!(registry.ability("Levitate").is_err());
    }

    #[test]
    fn move_slots_start_with_full_pp() -> Result<()> {
        let slot = Registry::standard().move_slot("Quick Attack")?;
        assert_eq!(slot.pp, 30);
        assert_eq!(slot.max_pp, 30);
        assert_eq!(slot.data.priority, 1);
        Ok(())
    }

    #[test]
    fn weather_moves_are_utility() -> Result<()> {
        let registry = Registry::standard();
        for name in ["Rain Dance", "Sunny Day", "Sandstorm", "Hail"] {
            let data = registry.move_data(name)?;
            assert!(data.is_utility(), "{name}");
            assert!(data.sets_weather.is_some(), "{name}");
        }
        Ok(())
    }

    #[test]
    fn json_moves_extend_the_catalog() -> Result<()> {
        let raw = r#"[
            {"name": "Mega Punch", "type": "normal", "category": "physical", "power": 80, "accuracy": 85, "contact": true},
            {"name": "Tackle", "type": "normal", "category": "physical", "power": 50}
        ]"#;
        let registry = Registry::from_json(raw)?;
        assert_eq!(registry.move_data("Mega Punch")?.accuracy, Some(85));
        assert_eq!(registry.move_data("Tackle")?.power, 50);
        Ok(())
    }

    #[test]
    fn malformed_json_leaves_registry_untouched() {
        let mut registry = Registry::standard();
        let before = registry.move_count();
        let raw = r#"[{"name": "Good", "type": "normal", "category": "physical"}, {"name": "Bad", "type": "plasma"}]"#;
        assert!(registry.extend_from_json(raw).is_err());
        assert_eq!(registry.move_count(), before);
    }

    #[test]
    fn struggle_is_always_available() {
        let registry = Registry::empty();
        assert_eq!(registry.struggle().name, "Struggle");
        assert_eq!(registry.struggle().recoil_percent, 25);
    }
}
