use crate::data::moves::MoveSlot;
use crate::data::types::Type;
use crate::sim::abilities::{Ability, AbilityEffect};
use crate::sim::items::{HeldItem, ItemEffect};
use crate::sim::stat_stages::StatKey;
use crate::sim::status::Status;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special: u16,
    pub speed: u16,
}

/// One creature as it exists inside a battle.
///
/// HP, status, PP and the one-shot flags are authoritative battle state; the
/// caller copies them back to its persistent roster after the battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub species: String,
    pub level: u8,
    pub types: Vec<Type>,
    pub stats: BaseStats,
    pub current_hp: u16,
    pub status: Option<Status>,
    pub sleep_turns: u8,
    pub item: Option<HeldItem>,
    pub ability: Option<Ability>,
    pub moves: Vec<MoveSlot>,
    pub focus_sash_consumed: bool,
    pub choice_lock: Option<String>,
    pub experience: u32,
}

impl Combatant {
    pub fn new(
        species: impl Into<String>,
        level: u8,
        types: Vec<Type>,
        stats: BaseStats,
        moves: Vec<MoveSlot>,
    ) -> Self {
        Self {
            species: species.into(),
            level,
            types,
            current_hp: stats.hp,
            stats,
            status: None,
            sleep_turns: 0,
            item: None,
            ability: None,
            moves,
            focus_sash_consumed: false,
            choice_lock: None,
            experience: 0,
        }
    }

    pub fn with_item(mut self, item: HeldItem) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn at_full_hp(&self) -> bool {
        self.current_hp == self.stats.hp
    }

    pub fn has_type(&self, ty: Type) -> bool {
        self.types.contains(&ty)
    }

    /// Unmodified stat value. Accuracy and evasion are expressed as 100%.
    pub fn base_stat(&self, stat: StatKey) -> u16 {
        match stat {
            StatKey::Attack => self.stats.attack,
            StatKey::Defense => self.stats.defense,
            StatKey::Special => self.stats.special,
            StatKey::Speed => self.stats.speed,
            StatKey::Accuracy | StatKey::Evasion => 100,
        }
    }

    /// Subtracts HP and returns the amount actually lost.
    pub fn take_damage(&mut self, damage: u16) -> u16 {
        let lost = damage.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restores HP up to the maximum and returns the amount actually gained.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let gained = amount.min(self.stats.hp - self.current_hp.min(self.stats.hp));
        self.current_hp += gained;
        gained
    }

    pub fn ability_effect(&self) -> Option<&AbilityEffect> {
        self.ability.as_ref().map(|ability| &ability.effect)
    }

    pub fn item_effect(&self) -> Option<&ItemEffect> {
        self.item.as_ref().map(|item| &item.effect)
    }

    pub fn ability_name(&self) -> &str {
        self.ability.as_ref().map(|a| a.name.as_str()).unwrap_or("")
    }

    pub fn item_name(&self) -> &str {
        self.item.as_ref().map(|i| i.name.as_str()).unwrap_or("")
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(MoveSlot::has_pp)
    }

    /// Index of the locked move, if the lock still points at a known move.
    pub fn locked_move_index(&self) -> Option<usize> {
        let locked = self.choice_lock.as_deref()?;
        self.moves.iter().position(|slot| slot.name() == locked)
    }

    /// Clears state that only lasts for one battle.
    pub fn reset_battle_flags(&mut self) {
        self.focus_sash_consumed = false;
        self.choice_lock = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::moves::{MoveCategory, MoveData};

    fn make_combatant() -> Combatant {
        Combatant::new(
            "Pyrofox",
            20,
            vec![Type::Flame],
            BaseStats {
                hp: 60,
                attack: 40,
                defense: 30,
                special: 45,
                speed: 50,
            },
            vec![MoveSlot::new(MoveData::new(
                "Ember",
                Type::Flame,
                MoveCategory::Special,
                40,
            ))],
        )
    }

    #[test]
    fn battle_flags_reset_between_battles() {
        let mut mon = make_combatant();
        mon.focus_sash_consumed = true;
        mon.choice_lock = Some("Ember".into());
        mon.status = Some(Status::Burn);
        mon.reset_battle_flags();
        assert!(!mon.focus_sash_consumed);
        assert_eq!(mon.locked_move_index(), None);
        assert_eq!(mon.status, Some(Status::Burn));
    }

    #[test]
    fn damage_and_heal_stay_within_bounds() {
        let mut mon = make_combatant();
        assert_eq!(mon.take_damage(25), 25);
        assert_eq!(mon.take_damage(100), 35);
        assert!(mon.is_fainted());
        assert_eq!(mon.heal(500), 60);
        assert!(mon.at_full_hp());
        assert_eq!(mon.heal(5), 0);
    }

    #[test]
    fn locked_move_index_follows_name() {
        let mut mon = make_combatant();
        assert_eq!(mon.locked_move_index(), None);
        mon.choice_lock = Some("Ember".to_string());
        assert_eq!(mon.locked_move_index(), Some(0));
        mon.choice_lock = Some("Forgotten".to_string());
        assert_eq!(mon.locked_move_index(), None);
    }

    #[test]
    fn accuracy_and_evasion_are_percent_based() {
        let mon = make_combatant();
        assert_eq!(mon.base_stat(StatKey::Accuracy), 100);
        assert_eq!(mon.base_stat(StatKey::Speed), 50);
    }
}
