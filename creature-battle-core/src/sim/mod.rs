pub mod abilities;
pub mod ai;
pub mod battle;
pub mod combatant;
pub mod damage;
pub mod faint_handler;
pub mod items;
pub mod moves;
pub mod progression;
pub mod stat_stages;
pub mod status;
pub mod switching;
pub mod weather;

pub use combatant::{BaseStats, Combatant};
