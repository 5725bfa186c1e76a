use crate::sim::combatant::Combatant;
use crate::sim::moves::MoveChoice;
use rand::seq::SliceRandom;
use rand::RngCore;

/// Picks the move for a side the player does not control.
pub trait BattleAI {
    fn choose_move(&mut self, active: &Combatant, rng: &mut dyn RngCore) -> MoveChoice;
}

/// Uniform choice among moves with PP left, honouring a choice lock.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomAI;

impl BattleAI for RandomAI {
    fn choose_move(&mut self, active: &Combatant, rng: &mut dyn RngCore) -> MoveChoice {
        if let Some(locked) = active.locked_move_index() {
            return if active.moves[locked].has_pp() {
                MoveChoice::Slot(locked)
            } else {
                MoveChoice::Struggle
            };
        }
        let usable: Vec<usize> = active
            .moves
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.has_pp().then_some(idx))
            .collect();
        usable
            .choose(rng)
            .map(|&idx| MoveChoice::Slot(idx))
            .unwrap_or(MoveChoice::Struggle)
    }
}
