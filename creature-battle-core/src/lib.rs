//! Turn-based creature combat rules engine.
//!
//! A [`sim::battle::BattleSession`] owns both rosters for the duration of a
//! battle and resolves one player [`sim::battle::Action`] per turn, recording
//! every outcome in a [`battle_log::BattleLog`].

pub mod battle_log;
pub mod data;
pub mod error;
pub mod sim;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::battle_log::{BattleEvent, BattleLog};
    pub use crate::data::moves::{MoveCategory, MoveData, MoveSlot};
    pub use crate::data::types::Type;
    pub use crate::data::Registry;
    pub use crate::error::{BattleError, InvalidAction};
    pub use crate::sim::battle::{Action, BagItem, BattleConfig, BattleResult, BattleSession, Side};
    pub use crate::sim::stat_stages::StatKey;
    pub use crate::sim::status::Status;
    pub use crate::sim::weather::Weather;
    pub use crate::sim::{BaseStats, Combatant};
}
