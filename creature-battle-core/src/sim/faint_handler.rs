use crate::sim::combatant::Combatant;
use crate::sim::items::ItemEffect;
use rand::Rng;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KoPrevention {
    FocusSash,
    FocusBand,
}

/// Caps lethal damage at `current_hp - 1` when a survival item fires.
///
/// The sash needs full HP and fires once per battle; the band rolls every time.
pub fn prevent_ko_if_applicable(
    defender: &mut Combatant,
    damage: u16,
    rng: &mut impl Rng,
) -> (u16, Option<KoPrevention>) {
    if defender.current_hp <= 1 || damage < defender.current_hp {
        return (damage, None);
    }

    match defender.item_effect() {
        Some(ItemEffect::FocusSash) if defender.at_full_hp() && !defender.focus_sash_consumed => {
            defender.focus_sash_consumed = true;
            (defender.current_hp - 1, Some(KoPrevention::FocusSash))
        }
        Some(ItemEffect::FocusBand { chance }) if rng.gen_range(0..100) < u32::from(*chance) => {
            (defender.current_hp - 1, Some(KoPrevention::FocusBand))
        }
        _ => (damage, None),
    }
}
