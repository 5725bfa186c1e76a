use crate::battle_log::{BattleEvent, BattleLog};
use crate::sim::abilities::{adjust_stage_delta, weather_speed_multiplier};
use crate::sim::battle::Side;
use crate::sim::combatant::Combatant;
use crate::sim::weather::Weather;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    Attack,
    Defense,
    Special,
    Speed,
    Accuracy,
    Evasion,
}

impl StatKey {
    pub const ALL: [StatKey; 6] = [
        StatKey::Attack,
        StatKey::Defense,
        StatKey::Special,
        StatKey::Speed,
        StatKey::Accuracy,
        StatKey::Evasion,
    ];

    fn index(self) -> usize {
        match self {
            StatKey::Attack => 0,
            StatKey::Defense => 1,
            StatKey::Special => 2,
            StatKey::Speed => 3,
            StatKey::Accuracy => 4,
            StatKey::Evasion => 5,
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatKey::Attack => "Attack",
            StatKey::Defense => "Defense",
            StatKey::Special => "Special",
            StatKey::Speed => "Speed",
            StatKey::Accuracy => "accuracy",
            StatKey::Evasion => "evasiveness",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StatStageTable {
    stages: [i8; 6],
}

impl StatStageTable {
    pub fn get(&self, stat: StatKey) -> i8 {
        self.stages[stat.index()]
    }

    pub fn reset(&mut self) {
        self.stages = [0; 6];
    }

    pub fn is_neutral(&self) -> bool {
        self.stages.iter().all(|&s| s == 0)
    }

    /// Clamps into range and returns the change actually applied.
    fn shift(&mut self, stat: StatKey, delta: i8) -> i8 {
        let current = self.stages[stat.index()];
        let next = current.saturating_add(delta).clamp(MIN_STAGE, MAX_STAGE);
        self.stages[stat.index()] = next;
        next - current
    }
}

/// Stage tables for both sides of a battle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StatStageEngine {
    player: StatStageTable,
    opponent: StatStageTable,
}

impl StatStageEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, side: Side) -> &StatStageTable {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    fn table_mut(&mut self, side: Side) -> &mut StatStageTable {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// Applies `delta` to `side`'s stage for `stat`, after the holder's ability
    /// has amplified or inverted it, and narrates the outcome.
    ///
    /// Returns the applied delta, which is 0 when the stage was already at its limit.
    pub fn modify_stage(
        &mut self,
        side: Side,
        stat: StatKey,
        delta: i8,
        holder: &Combatant,
        who: &str,
        log: &mut BattleLog,
    ) -> i8 {
        let requested = adjust_stage_delta(holder, delta);
        if requested == 0 {
            return 0;
        }
        let applied = self.table_mut(side).shift(stat, requested);
        trace!(?side, ?stat, delta, requested, applied, "stage change");
        if applied == 0 {
            log.push(BattleEvent::StatUnchanged {
                who: who.to_string(),
                stat,
                rising: requested > 0,
            });
        } else {
            log.push(BattleEvent::StatChanged {
                who: who.to_string(),
                stat,
                stages: applied,
            });
        }
        applied
    }

    pub fn reset_stages(&mut self, side: Side) {
        self.table_mut(side).reset();
    }
}

/// `(2 + n) / 2` for raises, `2 / (2 - n)` for drops.
pub fn stage_multiplier(stage: i8) -> f64 {
    let stage = f64::from(stage.clamp(MIN_STAGE, MAX_STAGE));
    if stage >= 0.0 {
        (2.0 + stage) / 2.0
    } else {
        2.0 / (2.0 - stage)
    }
}

/// Three-based table used by accuracy and evasion.
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let stage = f64::from(stage.clamp(MIN_STAGE, MAX_STAGE));
    if stage >= 0.0 {
        (3.0 + stage) / 3.0
    } else {
        3.0 / (3.0 - stage)
    }
}

/// Stat after stages and ability multipliers. Never below 1.
pub fn effective_stat(combatant: &Combatant, stat: StatKey, stage: i8, weather: Option<Weather>) -> u16 {
    let base = f64::from(combatant.base_stat(stat));
    let ability = match stat {
        StatKey::Speed => weather_speed_multiplier(combatant, weather),
        _ => 1.0,
    };
    let value = (base * stage_multiplier(stage) * ability).floor();
    value.clamp(1.0, f64::from(u16::MAX)) as u16
}
