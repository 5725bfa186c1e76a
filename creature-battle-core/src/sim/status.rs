use crate::battle_log::{BattleEvent, BattleLog};
use crate::sim::abilities::ability_blocks_status;
use crate::sim::combatant::Combatant;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Burn,
    Poison,
    Paralysis,
    Sleep,
    Frozen,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Burn => "burned",
            Status::Poison => "poisoned",
            Status::Paralysis => "paralyzed",
            Status::Sleep => "asleep",
            Status::Frozen => "frozen",
        };
        f.write_str(label)
    }
}

const PARALYSIS_BLOCK_CHANCE: f64 = 0.25;
const THAW_CHANCE: f64 = 0.2;

/// Fails when the target already carries a status or its ability blocks `status`.
pub fn apply_status(target: &mut Combatant, status: Status, rng: &mut impl Rng) -> bool {
    if target.status.is_some() || ability_blocks_status(target, status) {
        return false;
    }
    if status == Status::Sleep {
        target.sleep_turns = rng.gen_range(1..=3);
    }
    target.status = Some(status);
    true
}

pub fn cure_status(target: &mut Combatant) {
    target.status = None;
    target.sleep_turns = 0;
}

/// Pre-move check. Narrates why the combatant cannot act and returns false if so.
///
/// A sleeping combatant spends the turn asleep and wakes once its counter runs
/// out, so a counter of `n` blocks exactly `n` move attempts.
pub fn check_can_act(actor: &mut Combatant, who: &str, rng: &mut impl Rng, log: &mut BattleLog) -> bool {
    match actor.status {
        Some(Status::Sleep) => {
            log.push(BattleEvent::FastAsleep { who: who.to_string() });
            actor.sleep_turns = actor.sleep_turns.saturating_sub(1);
            if actor.sleep_turns == 0 {
                cure_status(actor);
                log.push(BattleEvent::WokeUp { who: who.to_string() });
            }
            false
        }
        Some(Status::Frozen) => {
            if rng.gen_bool(THAW_CHANCE) {
                cure_status(actor);
                log.push(BattleEvent::Thawed { who: who.to_string() });
                true
            } else {
                log.push(BattleEvent::FrozenSolid { who: who.to_string() });
                false
            }
        }
        Some(Status::Paralysis) => {
            if rng.gen_bool(PARALYSIS_BLOCK_CHANCE) {
                log.push(BattleEvent::FullyParalyzed { who: who.to_string() });
                false
            } else {
                true
            }
        }
        Some(Status::Burn) | Some(Status::Poison) | None => true,
    }
}

pub fn status_damage(combatant: &Combatant) -> Option<u16> {
    if combatant.is_fainted() {
        return None;
    }
    let divisor = match combatant.status? {
        Status::Burn => 16,
        Status::Poison => 8,
        _ => return None,
    };
    Some((combatant.max_hp() / divisor).max(1))
}

/// Applies burn or poison damage and narrates it. Returns the HP lost.
pub fn tick_status_damage(combatant: &mut Combatant, who: &str, log: &mut BattleLog) -> u16 {
    let Some(amount) = status_damage(combatant) else {
        return 0;
    };
    let Some(status) = combatant.status else {
        return 0;
    };
    let lost = combatant.take_damage(amount);
    trace!(who, ?status, lost, "status damage");
    log.push(BattleEvent::StatusDamage {
        who: who.to_string(),
        status,
        amount: lost,
    });
    if combatant.is_fainted() {
        log.push(BattleEvent::Fainted { who: who.to_string() });
    }
    lost
}
