use crate::sim::combatant::Combatant;

/// Hook for the layer that turns experience into levels, moves and evolutions.
///
/// The battle only decides that a reward is due and records it on the combatant.
pub trait Progression {
    fn experience_gained(&mut self, combatant: &mut Combatant, amount: u32);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgression;

impl Progression for NoProgression {
    fn experience_gained(&mut self, _combatant: &mut Combatant, _amount: u32) {}
}

pub fn experience_reward(defeated_level: u8, per_level: u32) -> u32 {
    per_level.saturating_mul(u32::from(defeated_level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_scales_with_level() {
        assert_eq!(experience_reward(12, 50), 600);
        assert_eq!(experience_reward(0, 50), 0);
    }
}
