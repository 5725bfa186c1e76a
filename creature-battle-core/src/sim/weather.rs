use crate::battle_log::{BattleEvent, BattleLog};
use crate::data::types::Type;
use crate::sim::abilities::is_weather_immune;
use crate::sim::combatant::Combatant;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Rain,
    Sun,
    Sandstorm,
    Hail,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weather::Rain => "rain",
            Weather::Sun => "harsh sunlight",
            Weather::Sandstorm => "sandstorm",
            Weather::Hail => "hail",
        };
        f.write_str(name)
    }
}

/// The single battlefield weather slot.
///
/// `turns_remaining == 0` while a weather is active means it lasts until replaced.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct WeatherEngine {
    kind: Option<Weather>,
    turns_remaining: u8,
}

impl WeatherEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Weather> {
        self.kind
    }

    pub fn turns_remaining(&self) -> u8 {
        self.turns_remaining
    }

    pub fn set_weather(&mut self, kind: Weather, turns: u8, log: &mut BattleLog) {
        debug!(?kind, turns, previous = ?self.kind, "weather set");
        self.kind = Some(kind);
        self.turns_remaining = turns;
        log.push(BattleEvent::WeatherStarted { weather: kind });
    }

    /// Called once per completed turn. Returns true when the weather just ended.
    pub fn tick(&mut self, log: &mut BattleLog) -> bool {
        let Some(kind) = self.kind else {
            return false;
        };
        if self.turns_remaining == 0 {
            return false;
        }
        self.turns_remaining -= 1;
        if self.turns_remaining > 0 {
            return false;
        }
        self.kind = None;
        log.push(BattleEvent::WeatherCleared { weather: kind });
        true
    }
}

pub fn weather_damage_modifier(weather: Option<Weather>, move_type: Type) -> f64 {
    match weather {
        Some(Weather::Sun) => match move_type {
            Type::Flame => 1.5,
            Type::Aqua => 0.5,
            _ => 1.0,
        },
        Some(Weather::Rain) => match move_type {
            Type::Aqua => 1.5,
            Type::Flame => 0.5,
            _ => 1.0,
        },
        _ => 1.0,
    }
}

pub fn is_weather_type_immune(types: &[Type], weather: Weather) -> bool {
    match weather {
        Weather::Sandstorm => types
            .iter()
            .any(|t| matches!(t, Type::Stone | Type::Terra | Type::Metal)),
        Weather::Hail => types.contains(&Type::Frost),
        Weather::Rain | Weather::Sun => true,
    }
}

pub fn weather_residual_damage(combatant: &Combatant, weather: Option<Weather>) -> Option<(u16, Weather)> {
    let weather = weather?;
    if combatant.is_fainted()
        || is_weather_type_immune(&combatant.types, weather)
        || is_weather_immune(combatant)
    {
        return None;
    }
    let dmg = (combatant.max_hp() / 16).max(1);
    Some((dmg, weather))
}
