use crate::data::moves::{MoveCategory, MoveData};
use crate::data::types::Type;
use crate::sim::combatant::Combatant;
use crate::sim::status::Status;
use crate::sim::weather::Weather;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub effect: AbilityEffect,
}

impl Ability {
    pub fn new(name: impl Into<String>, effect: AbilityEffect) -> Self {
        Self {
            name: name.into(),
            effect,
        }
    }
}

/// Closed set of ability behaviours, each carrying its own parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Stage changes applied to the holder are doubled.
    StageAmplifier,
    /// Stage changes applied to the holder are negated.
    StageInverter,
    WeatherSpeed { weather: Weather },
    /// Opponent accuracy is scaled by `multiplier` in the matching weather.
    WeatherEvasion { weather: Weather, multiplier: f64 },
    WeatherImmune,
    WeatherSummon { weather: Weather },
    Intimidate,
    StatusImmunity { statuses: Vec<Status> },
    CritImmune,
    CritStageBoost,
    CritDamage { multiplier: f64 },
    StabBoost { multiplier: f64 },
    CategoryPower { category: MoveCategory, multiplier: f64 },
    WeakMovePower { max_power: u16, multiplier: f64 },
    SecondaryPower { multiplier: f64 },
    /// Boosts one move type while the holder is at or below a third of its HP.
    Pinch { move_type: Type, multiplier: f64 },
    TypeResist { types: Vec<Type>, multiplier: f64 },
    FullHpShield { multiplier: f64 },
    /// Physical damage taken is divided by `defense_multiplier` while statused.
    StatusGuard { defense_multiplier: f64 },
    MaxHits,
    NoRecoil,
}

pub fn standard_abilities() -> Vec<Ability> {
    use AbilityEffect::*;
    vec![
        Ability::new("Simple", StageAmplifier),
        Ability::new("Contrary", StageInverter),
        Ability::new("Swift Swim", WeatherSpeed { weather: Weather::Rain }),
        Ability::new("Chlorophyll", WeatherSpeed { weather: Weather::Sun }),
        Ability::new("Sand Rush", WeatherSpeed { weather: Weather::Sandstorm }),
        Ability::new("Slush Rush", WeatherSpeed { weather: Weather::Hail }),
        Ability::new(
            "Sand Veil",
            WeatherEvasion {
                weather: Weather::Sandstorm,
                multiplier: 0.8,
            },
        ),
        Ability::new(
            "Snow Cloak",
            WeatherEvasion {
                weather: Weather::Hail,
                multiplier: 0.8,
            },
        ),
        Ability::new("Overcoat", WeatherImmune),
        Ability::new("Drizzle", WeatherSummon { weather: Weather::Rain }),
        Ability::new("Drought", WeatherSummon { weather: Weather::Sun }),
        Ability::new("Sand Stream", WeatherSummon { weather: Weather::Sandstorm }),
        Ability::new("Snow Warning", WeatherSummon { weather: Weather::Hail }),
        Ability::new("Intimidate", Intimidate),
        Ability::new("Limber", StatusImmunity { statuses: vec![Status::Paralysis] }),
        Ability::new("Insomnia", StatusImmunity { statuses: vec![Status::Sleep] }),
        Ability::new("Immunity", StatusImmunity { statuses: vec![Status::Poison] }),
        Ability::new("Water Veil", StatusImmunity { statuses: vec![Status::Burn] }),
        Ability::new("Magma Armor", StatusImmunity { statuses: vec![Status::Frozen] }),
        Ability::new("Battle Armor", CritImmune),
        Ability::new("Super Luck", CritStageBoost),
        Ability::new("Sniper", CritDamage { multiplier: 3.0 }),
        Ability::new("Adaptability", StabBoost { multiplier: 2.0 }),
        Ability::new(
            "Huge Power",
            CategoryPower {
                category: MoveCategory::Physical,
                multiplier: 2.0,
            },
        ),
        Ability::new(
            "Technician",
            WeakMovePower {
                max_power: 60,
                multiplier: 1.5,
            },
        ),
        Ability::new("Sheer Force", SecondaryPower { multiplier: 1.3 }),
        Ability::new(
            "Blaze",
            Pinch {
                move_type: Type::Flame,
                multiplier: 1.5,
            },
        ),
        Ability::new(
            "Torrent",
            Pinch {
                move_type: Type::Aqua,
                multiplier: 1.5,
            },
        ),
        Ability::new(
            "Overgrow",
            Pinch {
                move_type: Type::Leaf,
                multiplier: 1.5,
            },
        ),
        Ability::new(
            "Thick Fat",
            TypeResist {
                types: vec![Type::Flame, Type::Frost],
                multiplier: 0.5,
            },
        ),
        Ability::new("Multiscale", FullHpShield { multiplier: 0.5 }),
        Ability::new("Marvel Scale", StatusGuard { defense_multiplier: 1.5 }),
        Ability::new("Skill Link", MaxHits),
        Ability::new("Rock Head", NoRecoil),
    ]
}

/// Amplify first, then invert.
pub fn adjust_stage_delta(holder: &Combatant, delta: i8) -> i8 {
    match holder.ability_effect() {
        Some(AbilityEffect::StageAmplifier) => delta.saturating_mul(2),
        Some(AbilityEffect::StageInverter) => delta.saturating_neg(),
        _ => delta,
    }
}

pub fn ability_blocks_status(holder: &Combatant, status: Status) -> bool {
    matches!(
        holder.ability_effect(),
        Some(AbilityEffect::StatusImmunity { statuses }) if statuses.contains(&status)
    )
}

pub fn weather_speed_multiplier(holder: &Combatant, weather: Option<Weather>) -> f64 {
    match (holder.ability_effect(), weather) {
        (Some(AbilityEffect::WeatherSpeed { weather: boosted }), Some(current)) if *boosted == current => 2.0,
        _ => 1.0,
    }
}

pub fn weather_evasion_multiplier(holder: &Combatant, weather: Option<Weather>) -> f64 {
    match (holder.ability_effect(), weather) {
        (Some(AbilityEffect::WeatherEvasion { weather: kind, multiplier }), Some(current))
            if *kind == current =>
        {
            *multiplier
        }
        _ => 1.0,
    }
}

pub fn is_weather_immune(holder: &Combatant) -> bool {
    matches!(holder.ability_effect(), Some(AbilityEffect::WeatherImmune))
}

pub fn summoned_weather(holder: &Combatant) -> Option<Weather> {
    match holder.ability_effect() {
        Some(AbilityEffect::WeatherSummon { weather }) => Some(*weather),
        _ => None,
    }
}

pub fn has_intimidate(holder: &Combatant) -> bool {
    matches!(holder.ability_effect(), Some(AbilityEffect::Intimidate))
}

pub fn blocks_critical(defender: &Combatant) -> bool {
    matches!(defender.ability_effect(), Some(AbilityEffect::CritImmune))
}

pub fn boosts_critical_stage(attacker: &Combatant) -> bool {
    matches!(attacker.ability_effect(), Some(AbilityEffect::CritStageBoost))
}

pub fn critical_multiplier(attacker: &Combatant) -> f64 {
    match attacker.ability_effect() {
        Some(AbilityEffect::CritDamage { multiplier }) => *multiplier,
        _ => 2.0,
    }
}

pub fn stab_multiplier(attacker: &Combatant) -> f64 {
    match attacker.ability_effect() {
        Some(AbilityEffect::StabBoost { multiplier }) => *multiplier,
        _ => 1.5,
    }
}

pub fn forces_max_hits(attacker: &Combatant) -> bool {
    matches!(attacker.ability_effect(), Some(AbilityEffect::MaxHits))
}

pub fn negates_recoil(attacker: &Combatant) -> bool {
    matches!(attacker.ability_effect(), Some(AbilityEffect::NoRecoil))
}

pub fn attacker_damage_modifier(attacker: &Combatant, move_data: &MoveData) -> f64 {
    match attacker.ability_effect() {
        Some(AbilityEffect::CategoryPower { category, multiplier }) if *category == move_data.category => {
            *multiplier
        }
        Some(AbilityEffect::WeakMovePower { max_power, multiplier }) if move_data.power <= *max_power => {
            *multiplier
        }
        Some(AbilityEffect::SecondaryPower { multiplier }) if move_data.has_secondary_effect() => {
            *multiplier
        }
        Some(AbilityEffect::Pinch { move_type, multiplier })
            if *move_type == move_data.move_type
                && u32::from(attacker.current_hp) * 3 <= u32::from(attacker.max_hp()) =>
        {
            *multiplier
        }
        _ => 1.0,
    }
}

pub fn defender_damage_modifier(defender: &Combatant, move_data: &MoveData) -> f64 {
    match defender.ability_effect() {
        Some(AbilityEffect::TypeResist { types, multiplier }) if types.contains(&move_data.move_type) => {
            *multiplier
        }
        Some(AbilityEffect::FullHpShield { multiplier }) if defender.at_full_hp() => *multiplier,
        Some(AbilityEffect::StatusGuard { defense_multiplier })
            if defender.status.is_some() && move_data.category == MoveCategory::Physical =>
        {
            1.0 / *defense_multiplier
        }
        _ => 1.0,
    }
}
