use crate::data::moves::MoveData;
use crate::sim::abilities::{forces_max_hits, negates_recoil, weather_evasion_multiplier};
use crate::sim::combatant::Combatant;
use crate::sim::stat_stages::{accuracy_stage_multiplier, StatKey, StatStageTable, MAX_STAGE, MIN_STAGE};
use crate::sim::weather::Weather;
use rand::Rng;

pub fn calculate_hit_count(move_data: &MoveData, attacker: &Combatant, rng: &mut impl Rng) -> u8 {
    match move_data.multi_hit {
        None => 1,
        Some((min, max)) => {
            let (min, max) = (min.max(1), max.max(min.max(1)));
            if forces_max_hits(attacker) {
                max
            } else {
                rng.gen_range(min..=max)
            }
        }
    }
}

/// Hit chance in percent after stages and the defender's weather evasion.
pub fn adjusted_accuracy(
    move_data: &MoveData,
    attacker_stages: &StatStageTable,
    defender: &Combatant,
    defender_stages: &StatStageTable,
    weather: Option<Weather>,
) -> Option<f64> {
    let base = f64::from(move_data.accuracy?);
    let net = (attacker_stages.get(StatKey::Accuracy) - defender_stages.get(StatKey::Evasion))
        .clamp(MIN_STAGE, MAX_STAGE);
    Some(base * accuracy_stage_multiplier(net) * weather_evasion_multiplier(defender, weather))
}

/// Rolls 1..=100 against the adjusted accuracy. Moves without accuracy never miss.
pub fn accuracy_check(
    move_data: &MoveData,
    attacker_stages: &StatStageTable,
    defender: &Combatant,
    defender_stages: &StatStageTable,
    weather: Option<Weather>,
    rng: &mut impl Rng,
) -> bool {
    match adjusted_accuracy(move_data, attacker_stages, defender, defender_stages, weather) {
        None => true,
        Some(threshold) => f64::from(rng.gen_range(1..=100u8)) <= threshold,
    }
}

pub fn recoil_damage(move_data: &MoveData, attacker: &Combatant, damage_dealt: u32) -> Option<u16> {
    if move_data.recoil_percent == 0 || damage_dealt == 0 || negates_recoil(attacker) {
        return None;
    }
    let recoil = (damage_dealt * u32::from(move_data.recoil_percent) / 100).max(1);
    Some(recoil.min(u32::from(u16::MAX)) as u16)
}
