use crate::sim::battle::Side;
use thiserror::Error;

/// Errors surfaced by a battle session.
///
/// Misses, failed escapes and blocked turns are narrated outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("{side} roster has no creature able to battle")]
    Construction { side: Side },
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
}

/// A player decision rejected before any state was touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error("move index {index} is out of range ({available} moves known)")]
    MoveOutOfRange { index: usize, available: usize },
    #[error("{name} has no PP left")]
    NoPp { name: String },
    #[error("roster index {index} is out of range ({size} members)")]
    RosterOutOfRange { index: usize, size: usize },
    #[error("{name} has fainted and cannot battle")]
    Fainted { name: String },
    #[error("{name} is already in battle")]
    AlreadyActive { name: String },
    #[error("{item} would have no effect on {name}")]
    NoEffect { item: String, name: String },
    #[error("there is no running from this battle")]
    CannotRun,
    #[error("only wild creatures can be captured")]
    CannotCapture,
}

pub type Result<T> = std::result::Result<T, BattleError>;
