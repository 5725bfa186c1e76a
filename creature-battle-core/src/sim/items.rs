use crate::data::moves::{MoveCategory, MoveData};
use crate::data::types::Type;
use crate::sim::combatant::Combatant;
use crate::sim::status::Status;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeldItem {
    pub name: String,
    pub effect: ItemEffect,
}

impl HeldItem {
    pub fn new(name: impl Into<String>, effect: ItemEffect) -> Self {
        Self {
            name: name.into(),
            effect,
        }
    }
}

/// Closed set of held-item behaviours, each carrying its own parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemEffect {
    /// Heals max(1, maxHP / `divisor`) at end of turn.
    Regenerate { divisor: u16 },
    TypeBoost { move_type: Type, multiplier: f64 },
    CategoryBoost { category: MoveCategory, multiplier: f64 },
    ChoiceDamage { category: MoveCategory, multiplier: f64 },
    ChoiceSpeed { multiplier: f64 },
    LifeOrb { multiplier: f64, recoil_divisor: u16 },
    ExpertBelt { multiplier: f64 },
    FocusSash,
    FocusBand { chance: u8 },
    ShellBell { divisor: u16 },
    RockyHelmet { divisor: u16 },
    QuickClaw { chance: u8 },
    ScopeLens,
    StatusOrb { status: Status },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EndOfTurnEffect {
    Heal(u16),
    InflictStatus(Status),
}

pub fn standard_items() -> Vec<HeldItem> {
    use ItemEffect::*;
    let mut items = vec![
        HeldItem::new("Leftovers", Regenerate { divisor: 16 }),
        HeldItem::new(
            "Muscle Band",
            CategoryBoost {
                category: MoveCategory::Physical,
                multiplier: 1.1,
            },
        ),
        HeldItem::new(
            "Wise Glasses",
            CategoryBoost {
                category: MoveCategory::Special,
                multiplier: 1.1,
            },
        ),
        HeldItem::new(
            "Choice Band",
            ChoiceDamage {
                category: MoveCategory::Physical,
                multiplier: 1.5,
            },
        ),
        HeldItem::new(
            "Choice Specs",
            ChoiceDamage {
                category: MoveCategory::Special,
                multiplier: 1.5,
            },
        ),
        HeldItem::new("Choice Scarf", ChoiceSpeed { multiplier: 1.5 }),
        HeldItem::new(
            "Life Orb",
            LifeOrb {
                multiplier: 1.3,
                recoil_divisor: 10,
            },
        ),
        HeldItem::new("Expert Belt", ExpertBelt { multiplier: 1.2 }),
        HeldItem::new("Focus Sash", FocusSash),
        HeldItem::new("Focus Band", FocusBand { chance: 10 }),
        HeldItem::new("Shell Bell", ShellBell { divisor: 8 }),
        HeldItem::new("Rocky Helmet", RockyHelmet { divisor: 6 }),
        HeldItem::new("Quick Claw", QuickClaw { chance: 20 }),
        HeldItem::new("Scope Lens", ScopeLens),
        HeldItem::new("Flame Orb", StatusOrb { status: Status::Burn }),
        HeldItem::new("Toxic Orb", StatusOrb { status: Status::Poison }),
    ];
    let plates = [
        ("Charcoal", Type::Flame),
        ("Mystic Water", Type::Aqua),
        ("Miracle Seed", Type::Leaf),
        ("Magnet", Type::Volt),
        ("Never-Melt Ice", Type::Frost),
        ("Black Belt", Type::Brawl),
        ("Poison Barb", Type::Venom),
        ("Soft Sand", Type::Terra),
        ("Sharp Beak", Type::Gale),
        ("Twisted Spoon", Type::Mind),
        ("Silver Powder", Type::Insect),
        ("Hard Stone", Type::Stone),
        ("Spell Tag", Type::Spirit),
        ("Dragon Fang", Type::Dragon),
        ("Black Glasses", Type::Shadow),
        ("Metal Coat", Type::Metal),
        ("Fairy Feather", Type::Fae),
        ("Silk Scarf", Type::Normal),
    ];
    items.extend(plates.into_iter().map(|(name, move_type)| {
        HeldItem::new(
            name,
            TypeBoost {
                move_type,
                multiplier: 1.2,
            },
        )
    }));
    items
}

fn fraction_of(value: u16, divisor: u16) -> u16 {
    (u32::from(value) / u32::from(divisor.max(1))).max(1) as u16
}

pub fn locks_choice(holder: &Combatant) -> bool {
    matches!(
        holder.item_effect(),
        Some(ItemEffect::ChoiceDamage { .. } | ItemEffect::ChoiceSpeed { .. })
    )
}

pub fn set_choice_lock_move(holder: &mut Combatant, move_name: &str) {
    if locks_choice(holder) && holder.choice_lock.is_none() {
        holder.choice_lock = Some(move_name.to_string());
    }
}

pub fn clear_choice_lock(holder: &mut Combatant) {
    holder.choice_lock = None;
}

pub fn speed_modifier(holder: &Combatant) -> f64 {
    match holder.item_effect() {
        Some(ItemEffect::ChoiceSpeed { multiplier }) => *multiplier,
        _ => 1.0,
    }
}

pub fn damage_modifier(attacker: &Combatant, move_data: &MoveData, type_effectiveness: f64) -> f64 {
    match attacker.item_effect() {
        Some(ItemEffect::TypeBoost { move_type, multiplier }) if *move_type == move_data.move_type => {
            *multiplier
        }
        Some(
            ItemEffect::CategoryBoost { category, multiplier }
            | ItemEffect::ChoiceDamage { category, multiplier },
        ) if *category == move_data.category => *multiplier,
        Some(ItemEffect::LifeOrb { multiplier, .. }) => *multiplier,
        Some(ItemEffect::ExpertBelt { multiplier }) if type_effectiveness > 1.0 => *multiplier,
        _ => 1.0,
    }
}

pub fn critical_stage_bonus(attacker: &Combatant) -> u8 {
    match attacker.item_effect() {
        Some(ItemEffect::ScopeLens) => 1,
        _ => 0,
    }
}

pub fn quick_claw_activates(holder: &Combatant, rng: &mut impl Rng) -> bool {
    match holder.item_effect() {
        Some(ItemEffect::QuickClaw { chance }) => rng.gen_range(0..100) < u32::from(*chance),
        _ => false,
    }
}

/// Self-inflicted HP loss after a damaging attack.
pub fn life_orb_recoil(attacker: &Combatant, damage_dealt: u32) -> Option<u16> {
    match attacker.item_effect() {
        Some(ItemEffect::LifeOrb { recoil_divisor, .. }) if damage_dealt > 0 && !attacker.is_fainted() => {
            Some(fraction_of(attacker.max_hp(), *recoil_divisor))
        }
        _ => None,
    }
}

pub fn shell_bell_heal(attacker: &Combatant, damage_dealt: u32) -> Option<u16> {
    match attacker.item_effect() {
        Some(ItemEffect::ShellBell { divisor }) if damage_dealt > 0 && !attacker.is_fainted() => {
            let heal = (damage_dealt / u32::from((*divisor).max(1))).max(1);
            Some(heal.min(u32::from(u16::MAX)) as u16)
        }
        _ => None,
    }
}

/// Contact retaliation dealt by `defender`'s item to `attacker`.
pub fn contact_retaliation(defender: &Combatant, attacker: &Combatant) -> Option<u16> {
    match defender.item_effect() {
        Some(ItemEffect::RockyHelmet { divisor }) if !defender.is_fainted() => {
            Some(fraction_of(attacker.max_hp(), *divisor))
        }
        _ => None,
    }
}

pub fn end_of_turn_effect(holder: &Combatant) -> Option<EndOfTurnEffect> {
    if holder.is_fainted() {
        return None;
    }
    match holder.item_effect()? {
        ItemEffect::Regenerate { divisor } if !holder.at_full_hp() => {
            Some(EndOfTurnEffect::Heal(fraction_of(holder.max_hp(), *divisor)))
        }
        ItemEffect::StatusOrb { status } if holder.status.is_none() => {
            Some(EndOfTurnEffect::InflictStatus(*status))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::combatant::BaseStats;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn holder(effect: ItemEffect) -> Combatant {
        Combatant::new(
            "Testling",
            30,
            vec![Type::Normal],
            BaseStats {
                hp: 100,
                attack: 60,
                defense: 60,
                special: 60,
                speed: 60,
            },
            Vec::new(),
        )
        .with_item(HeldItem::new("Test", effect))
    }

    #[test]
    fn choice_items_lock_once() {
        let mut mon = holder(ItemEffect::ChoiceSpeed { multiplier: 1.5 });
        set_choice_lock_move(&mut mon, "Tackle");
        set_choice_lock_move(&mut mon, "Ember");
        assert_eq!(mon.choice_lock.as_deref(), Some("Tackle"));
        clear_choice_lock(&mut mon);
        assert_eq!(mon.choice_lock, None);
        assert_eq!(speed_modifier(&mon), 1.5);
    }

    #[test]
    fn non_choice_items_never_lock() {
        let mut mon = holder(ItemEffect::ScopeLens);
        set_choice_lock_move(&mut mon, "Tackle");
        assert_eq!(mon.choice_lock, None);
    }

    #[test]
    fn expert_belt_needs_super_effective() {
        let mon = holder(ItemEffect::ExpertBelt { multiplier: 1.2 });
        let ember = MoveData::new("Ember", Type::Flame, MoveCategory::Special, 40);
        assert_eq!(damage_modifier(&mon, &ember, 1.0), 1.0);
        assert_eq!(damage_modifier(&mon, &ember, 2.0), 1.2);
    }

    #[test]
    fn category_items_match_category() {
        let mon = holder(ItemEffect::ChoiceDamage {
            category: MoveCategory::Physical,
            multiplier: 1.5,
        });
        let ember = MoveData::new("Ember", Type::Flame, MoveCategory::Special, 40);
        let tackle = MoveData::new("Tackle", Type::Normal, MoveCategory::Physical, 40);
        assert_eq!(damage_modifier(&mon, &ember, 1.0), 1.0);
        assert_eq!(damage_modifier(&mon, &tackle, 1.0), 1.5);
    }

    #[test]
    fn regeneration_skips_full_hp() {
        let mut mon = holder(ItemEffect::Regenerate { divisor: 16 });
        assert_eq!(end_of_turn_effect(&mon), None);
        mon.take_damage(50);
        assert_eq!(end_of_turn_effect(&mon), Some(EndOfTurnEffect::Heal(6)));
    }

    #[test]
    fn status_orb_only_targets_healthy_holder() {
        let mut mon = holder(ItemEffect::StatusOrb { status: Status::Burn });
        assert_eq!(
            end_of_turn_effect(&mon),
            Some(EndOfTurnEffect::InflictStatus(Status::Burn))
        );
        mon.status = Some(Status::Sleep);
        assert_eq!(end_of_turn_effect(&mon), None);
    }

    #[test]
    fn recoil_items_have_minimum_one() {
        let mut mon = holder(ItemEffect::LifeOrb {
            multiplier: 1.3,
            recoil_divisor: 10,
        });
        assert_eq!(life_orb_recoil(&mon, 0), None);
        assert_eq!(life_orb_recoil(&mon, 12), Some(10));
        mon.stats.hp = 5;
        assert_eq!(life_orb_recoil(&mon, 12), Some(1));
    }

    #[test]
    fn quick_claw_rate_is_roughly_one_in_five() {
        let mon = holder(ItemEffect::QuickClaw { chance: 20 });
        let mut rng = SmallRng::seed_from_u64(7);
        let hits = (0..5_000)
            .filter(|_| quick_claw_activates(&mon, &mut rng))
            .count();
        assert!((800..1200).contains(&hits), "hits = {hits}");
    }
}
