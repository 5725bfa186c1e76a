use crate::data::moves::{MoveCategory, MoveData};
use crate::data::types::type_effectiveness;
use crate::sim::abilities::{
    attacker_damage_modifier, blocks_critical, boosts_critical_stage, critical_multiplier,
    defender_damage_modifier, stab_multiplier,
};
use crate::sim::combatant::Combatant;
use crate::sim::items;
use crate::sim::stat_stages::{effective_stat, StatKey, StatStageTable};
use crate::sim::status::Status;
use crate::sim::weather::{weather_damage_modifier, Weather};
use rand::Rng;
use tracing::trace;

pub const MIN_RANDOM_FACTOR: f64 = 0.85;
pub const MAX_RANDOM_FACTOR: f64 = 1.0;

/// Everything a single damage roll depends on.
#[derive(Clone, Copy, Debug)]
pub struct DamageContext<'a> {
    pub attacker: &'a Combatant,
    pub defender: &'a Combatant,
    pub move_data: &'a MoveData,
    pub attacker_stages: &'a StatStageTable,
    pub defender_stages: &'a StatStageTable,
    pub weather: Option<Weather>,
    pub critical: bool,
}

fn stat_pair(category: MoveCategory) -> (StatKey, StatKey) {
    match category {
        MoveCategory::Physical => (StatKey::Attack, StatKey::Defense),
        MoveCategory::Special => (StatKey::Special, StatKey::Defense),
    }
}

/// Attack and defense values for this hit.
///
/// Critical hits ignore attacker drops and defender boosts.
pub fn resolve_stats(ctx: &DamageContext<'_>) -> (u16, u16) {
    let (atk_key, def_key) = stat_pair(ctx.move_data.category);
    let mut atk_stage = ctx.attacker_stages.get(atk_key);
    let mut def_stage = ctx.defender_stages.get(def_key);
    if ctx.critical {
        atk_stage = atk_stage.max(0);
        def_stage = def_stage.min(0);
    }
    let mut attack = effective_stat(ctx.attacker, atk_key, atk_stage, ctx.weather);
    let defense = effective_stat(ctx.defender, def_key, def_stage, ctx.weather);
    if ctx.attacker.status == Some(Status::Burn) && ctx.move_data.category == MoveCategory::Physical {
        attack = (attack / 2).max(1);
    }
    (attack, defense)
}

pub fn compute_base_damage(level: u8, attack: u16, defense: u16, power: u16) -> u32 {
    let level = u32::from(level);
    let attack = u32::from(attack);
    let defense = u32::from(defense.max(1));
    let power = u32::from(power);
    let mut base_damage = 2 * level / 5 + 2;
    base_damage = base_damage.saturating_mul(power);
    base_damage = base_damage.saturating_mul(attack);
    base_damage /= defense;
    base_damage /= 50;
    base_damage + 2
}

pub fn is_stab(attacker: &Combatant, move_data: &MoveData) -> bool {
    attacker.has_type(move_data.move_type)
}

/// Damage for one hit with a fixed random factor.
///
/// Returns 0 only when the defender is immune to the move's type; every other
/// input yields at least 1.
pub fn calculate_damage(ctx: &DamageContext<'_>, random_factor: f64) -> u16 {
    let move_data = ctx.move_data;
    let effectiveness = type_effectiveness(move_data.move_type, &ctx.defender.types);
    if effectiveness == 0.0 {
        return 0;
    }

    let (attack, defense) = resolve_stats(ctx);
    let base = compute_base_damage(ctx.attacker.level, attack, defense, move_data.power);

    let mut damage = f64::from(base);
    damage *= effectiveness;
    if is_stab(ctx.attacker, move_data) {
        damage *= stab_multiplier(ctx.attacker);
    }
    if ctx.critical {
        damage *= critical_multiplier(ctx.attacker);
    }
    damage *= weather_damage_modifier(ctx.weather, move_data.move_type);
    damage *= items::damage_modifier(ctx.attacker, move_data, effectiveness);
    damage *= attacker_damage_modifier(ctx.attacker, move_data);
    damage *= defender_damage_modifier(ctx.defender, move_data);
    damage *= random_factor.clamp(MIN_RANDOM_FACTOR, MAX_RANDOM_FACTOR);

    trace!(
        attack,
        defense,
        base,
        effectiveness,
        critical = ctx.critical,
        random_factor,
        damage,
        "damage roll"
    );
    damage.floor().clamp(1.0, f64::from(u16::MAX)) as u16
}

/// [`calculate_damage`] with a random factor drawn from `[0.85, 1.0]`.
pub fn roll_damage(ctx: &DamageContext<'_>, rng: &mut impl Rng) -> u16 {
    let random_factor = rng.gen_range(MIN_RANDOM_FACTOR..=MAX_RANDOM_FACTOR);
    calculate_damage(ctx, random_factor)
}

/// Critical stage before the defender is consulted.
pub fn critical_stage(attacker: &Combatant, move_data: &MoveData) -> u8 {
    let mut stage = u8::from(move_data.high_crit);
    if boosts_critical_stage(attacker) {
        stage = (stage * 2).max(1);
    }
    stage + items::critical_stage_bonus(attacker)
}

pub fn critical_chance(stage: u8) -> f64 {
    match stage {
        0 => 1.0 / 16.0,
        1 => 1.0 / 8.0,
        _ => 1.0,
    }
}

pub fn check_critical(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    rng: &mut impl Rng,
) -> bool {
    if blocks_critical(defender) {
        return false;
    }
    match critical_stage(attacker, move_data) {
        0 => rng.gen_range(0..16) == 0,
        1 => rng.gen_range(0..8) == 0,
        _ => true,
    }
}
