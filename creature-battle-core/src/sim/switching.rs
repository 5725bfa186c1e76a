use crate::error::InvalidAction;
use crate::sim::combatant::Combatant;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchKind {
    Voluntary,
    /// Replacing a fainted active combatant.
    Forced,
}

/// First non-fainted member of the roster.
pub fn next_available(roster: &[Combatant]) -> Option<usize> {
    roster.iter().position(|member| !member.is_fainted())
}

pub fn has_available(roster: &[Combatant]) -> bool {
    roster.iter().any(|member| !member.is_fainted())
}

pub fn validate_switch(roster: &[Combatant], active: usize, index: usize) -> Result<(), InvalidAction> {
    let member = roster.get(index).ok_or(InvalidAction::RosterOutOfRange {
        index,
        size: roster.len(),
    })?;
    if member.is_fainted() {
        return Err(InvalidAction::Fainted {
            name: member.species.clone(),
        });
    }
    if index == active {
        return Err(InvalidAction::AlreadyActive {
            name: member.species.clone(),
        });
    }
    Ok(())
}

/// Roster indices a voluntary switch may target.
pub fn switch_targets(roster: &[Combatant], active: usize) -> Vec<usize> {
    roster
        .iter()
        .enumerate()
        .filter_map(|(idx, member)| (idx != active && !member.is_fainted()).then_some(idx))
        .collect()
}
