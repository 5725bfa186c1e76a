pub mod attacking;
pub mod secondary;

use crate::battle_log::{effectiveness_event, ident, BattleEvent, BattleLog};
use crate::data::moves::{MoveData, StatChange, StatTarget};
use crate::data::types::type_effectiveness;
use crate::sim::battle::Side;
use crate::sim::combatant::Combatant;
use crate::sim::damage::{check_critical, roll_damage, DamageContext};
use crate::sim::faint_handler::prevent_ko_if_applicable;
use crate::sim::items;
use crate::sim::stat_stages::StatStageEngine;
use crate::sim::status::{apply_status, check_can_act, tick_status_damage};
use crate::sim::weather::WeatherEngine;
use rand::Rng;
use tracing::debug;

pub use attacking::{accuracy_check, adjusted_accuracy, calculate_hit_count, recoil_damage};
pub use secondary::{roll_stat_change, roll_status_inflict};

/// The move an actor will use, after choice locks and PP have been resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveChoice {
    Slot(usize),
    Struggle,
}

/// Battle state a move touches besides the two combatants.
pub(crate) struct MoveContext<'a, R: Rng> {
    pub actor_side: Side,
    pub stages: &'a mut StatStageEngine,
    pub weather: &'a mut WeatherEngine,
    pub log: &'a mut BattleLog,
    pub rng: &'a mut R,
    pub weather_turns: u8,
    pub struggle: &'a MoveData,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveResult {
    Blocked,
    Missed,
    Immune,
    Utility,
    Hit { damage: u32, critical: bool, hits: u8 },
}

/// Resolves one action from the status pre-check through the post-action status ticks.
pub(crate) fn execute_move<R: Rng>(
    actor: &mut Combatant,
    target: &mut Combatant,
    choice: MoveChoice,
    ctx: &mut MoveContext<'_, R>,
) -> MoveResult {
    let actor_name = ident(ctx.actor_side, &actor.species);
    let target_name = ident(ctx.actor_side.opposite(), &target.species);

    let result = if check_can_act(actor, &actor_name, ctx.rng, ctx.log) {
        let move_data = select_move(actor, choice, &actor_name, ctx);
        ctx.log.push(BattleEvent::UsedMove {
            who: actor_name.clone(),
            move_name: move_data.name.clone(),
        });
        if move_data.is_utility() {
            resolve_utility(actor, target, &move_data, &actor_name, &target_name, ctx)
        } else {
            resolve_attack(actor, target, &move_data, &actor_name, &target_name, ctx)
        }
    } else {
        MoveResult::Blocked
    };

    tick_status_damage(actor, &actor_name, ctx.log);
    tick_status_damage(target, &target_name, ctx.log);
    result
}

fn select_move<R: Rng>(
    actor: &mut Combatant,
    choice: MoveChoice,
    actor_name: &str,
    ctx: &mut MoveContext<'_, R>,
) -> MoveData {
    let picked = match choice {
        MoveChoice::Slot(index) => actor.moves.get_mut(index).filter(|slot| slot.has_pp()).map(|slot| {
            slot.spend_pp();
            slot.data.clone()
        }),
        MoveChoice::Struggle => None,
    };
    match picked {
        Some(data) => {
            items::set_choice_lock_move(actor, &data.name);
            data
        }
        None => {
            ctx.log.push(BattleEvent::OutOfMoves {
                who: actor_name.to_string(),
            });
            ctx.struggle.clone()
        }
    }
}

fn self_damage(
    actor: &mut Combatant,
    amount: u16,
    who: &str,
    log: &mut BattleLog,
    event: impl FnOnce(u16) -> BattleEvent,
) {
    if actor.is_fainted() {
        return;
    }
    let lost = actor.take_damage(amount);
    log.push(event(lost));
    if actor.is_fainted() {
        log.push(BattleEvent::Fainted { who: who.to_string() });
    }
}

fn resolve_attack<R: Rng>(
    actor: &mut Combatant,
    target: &mut Combatant,
    move_data: &MoveData,
    actor_name: &str,
    target_name: &str,
    ctx: &mut MoveContext<'_, R>,
) -> MoveResult {
    let actor_side = ctx.actor_side;
    let target_side = actor_side.opposite();
    let weather = ctx.weather.current();

    if !accuracy_check(
        move_data,
        ctx.stages.table(actor_side),
        target,
        ctx.stages.table(target_side),
        weather,
        ctx.rng,
    ) {
        ctx.log.push(BattleEvent::Missed {
            who: actor_name.to_string(),
        });
        return MoveResult::Missed;
    }

    let effectiveness = type_effectiveness(move_data.move_type, &target.types);
    if effectiveness == 0.0 {
        ctx.log.push(BattleEvent::NoEffect {
            target: target_name.to_string(),
        });
        return MoveResult::Immune;
    }

    let critical = check_critical(actor, target, move_data, ctx.rng);
    let hits = calculate_hit_count(move_data, actor, ctx.rng);
    let mut total: u32 = 0;
    let mut landed: u8 = 0;
    for _ in 0..hits {
        if target.is_fainted() {
            break;
        }
        let rolled = {
            let damage_ctx = DamageContext {
                attacker: &*actor,
                defender: &*target,
                move_data,
                attacker_stages: ctx.stages.table(actor_side),
                defender_stages: ctx.stages.table(target_side),
                weather,
                critical,
            };
            roll_damage(&damage_ctx, ctx.rng)
        };
        let (damage, prevention) = prevent_ko_if_applicable(target, rolled, ctx.rng);
        let lost = target.take_damage(damage);
        total += u32::from(lost);
        landed += 1;
        ctx.log.push(BattleEvent::Damage {
            target: target_name.to_string(),
            amount: lost,
            hp: target.current_hp,
            max_hp: target.max_hp(),
        });
        if prevention.is_some() {
            ctx.log.push(BattleEvent::Endured {
                who: target_name.to_string(),
                item: target.item_name().to_string(),
            });
        }
    }
    debug!(
        move_name = %move_data.name,
        effectiveness,
        critical,
        hits = landed,
        total,
        "attack resolved"
    );

    if critical {
        ctx.log.push(BattleEvent::CriticalHit);
    }
    if let Some(event) = effectiveness_event(effectiveness) {
        ctx.log.push(event);
    }
    if move_data.multi_hit.is_some() {
        ctx.log.push(BattleEvent::HitTimes { hits: landed });
    }
    if target.is_fainted() {
        ctx.log.push(BattleEvent::Fainted {
            who: target_name.to_string(),
        });
    }

    if let Some(recoil) = recoil_damage(move_data, actor, total) {
        self_damage(actor, recoil, actor_name, ctx.log, |amount| BattleEvent::Recoil {
            who: actor_name.to_string(),
            amount,
        });
    }
    if let Some(orb) = items::life_orb_recoil(actor, total) {
        let item = actor.item_name().to_string();
        self_damage(actor, orb, actor_name, ctx.log, |amount| BattleEvent::ItemDamage {
            who: actor_name.to_string(),
            item,
            amount,
        });
    }
    if let Some(heal) = items::shell_bell_heal(actor, total) {
        let gained = actor.heal(heal);
        if gained > 0 {
            ctx.log.push(BattleEvent::ItemHeal {
                who: actor_name.to_string(),
                item: actor.item_name().to_string(),
                amount: gained,
            });
        }
    }
    if move_data.contact {
        if let Some(retaliation) = items::contact_retaliation(target, actor) {
            let item = target.item_name().to_string();
            self_damage(actor, retaliation, actor_name, ctx.log, |amount| BattleEvent::ItemDamage {
                who: actor_name.to_string(),
                item,
                amount,
            });
        }
    }

    if !target.is_fainted() && target.status.is_none() {
        if let Some(status) = roll_status_inflict(move_data, ctx.rng) {
            if apply_status(target, status, ctx.rng) {
                ctx.log.push(BattleEvent::StatusInflicted {
                    target: target_name.to_string(),
                    status,
                });
            }
        }
    }
    if let Some(change) = roll_stat_change(move_data, ctx.rng) {
        apply_stat_change(change, actor, target, actor_name, target_name, ctx);
    }

    MoveResult::Hit {
        damage: total,
        critical,
        hits: landed,
    }
}

fn resolve_utility<R: Rng>(
    actor: &mut Combatant,
    target: &mut Combatant,
    move_data: &MoveData,
    actor_name: &str,
    target_name: &str,
    ctx: &mut MoveContext<'_, R>,
) -> MoveResult {
    let mut acted = false;

    if let Some(weather) = move_data.sets_weather {
        ctx.weather.set_weather(weather, ctx.weather_turns, ctx.log);
        acted = true;
    }
    if let Some(change) = roll_stat_change(move_data, ctx.rng) {
        apply_stat_change(change, actor, target, actor_name, target_name, ctx);
        acted = true;
    }
    if let Some(status) = roll_status_inflict(move_data, ctx.rng) {
        if !target.is_fainted() && apply_status(target, status, ctx.rng) {
            ctx.log.push(BattleEvent::StatusInflicted {
                target: target_name.to_string(),
                status,
            });
            acted = true;
        }
    }

    if !acted {
        ctx.log.push(BattleEvent::MoveFailed);
    }
    MoveResult::Utility
}

fn apply_stat_change<R: Rng>(
    change: StatChange,
    actor: &Combatant,
    target: &Combatant,
    actor_name: &str,
    target_name: &str,
    ctx: &mut MoveContext<'_, R>,
) {
    let (side, holder, who) = match change.target {
        StatTarget::User => (ctx.actor_side, actor, actor_name),
        StatTarget::Opponent => (ctx.actor_side.opposite(), target, target_name),
    };
    if holder.is_fainted() {
        return;
    }
    ctx.stages
        .modify_stage(side, change.stat, change.stages, holder, who, ctx.log);
}
