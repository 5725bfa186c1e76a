use anyhow::{Context, Result};
use creature_battle_core::data::moves::MoveData;
use creature_battle_core::data::types::Type;
use creature_battle_core::data::Registry;
use creature_battle_core::sim::battle::BattleConfig;
use creature_battle_core::sim::status::Status;
use creature_battle_core::sim::{BaseStats, Combatant};
use serde::Deserialize;

/// A battle description loaded from disk: both rosters plus optional extra moves.
#[derive(Debug, Clone, Deserialize)]
pub struct RostersFile {
    #[serde(default)]
    pub config: BattleConfig,
    /// Moves added to the standard catalog before rosters are resolved.
    #[serde(default)]
    pub moves: Vec<MoveData>,
    pub player: Vec<CreatureSpec>,
    pub opponent: Vec<CreatureSpec>,
}

fn default_level() -> u8 {
    5
}

/// Sleep length for creatures that start asleep without an explicit count.
const DEFAULT_SLEEP_TURNS: u8 = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatureSpec {
    pub species: String,
    #[serde(default = "default_level")]
    pub level: u8,
    pub types: Vec<Type>,
    pub stats: BaseStats,
    pub moves: Vec<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub ability: Option<String>,
    /// Defaults to full HP.
    #[serde(default)]
    pub current_hp: Option<u16>,
    #[serde(default)]
    pub status: Option<Status>,
    /// Remaining sleep turns when `status` is sleep, clamped to 1..=3.
    #[serde(default)]
    pub sleep_turns: Option<u8>,
    #[serde(default)]
    pub experience: u32,
}

impl CreatureSpec {
    pub fn to_combatant(&self, registry: &Registry) -> Result<Combatant> {
        let moves = self
            .moves
            .iter()
            .map(|name| registry.move_slot(name))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Failed to resolve moves for {}", self.species))?;
        let mut combatant = Combatant::new(
            self.species.clone(),
            self.level,
            self.types.clone(),
            self.stats,
            moves,
        );
        if let Some(item) = &self.item {
            combatant.item = Some(
                registry
                    .item(item)
                    .with_context(|| format!("Failed to resolve item for {}", self.species))?,
            );
        }
        if let Some(ability) = &self.ability {
            combatant.ability = Some(
                registry
                    .ability(ability)
                    .with_context(|| format!("Failed to resolve ability for {}", self.species))?,
            );
        }
        if let Some(hp) = self.current_hp {
            combatant.current_hp = hp.min(combatant.max_hp());
        }
        if let Some(status) = self.status {
            combatant.status = Some(status);
            if status == Status::Sleep {
                combatant.sleep_turns = self.sleep_turns.unwrap_or(DEFAULT_SLEEP_TURNS).clamp(1, 3);
            }
        }
        combatant.experience = self.experience;
        Ok(combatant)
    }
}

impl RostersFile {
    /// The registry these rosters resolve against.
    pub fn registry(&self) -> Registry {
        let mut registry = Registry::standard();
        for data in &self.moves {
            registry.insert_move(data.clone());
        }
        registry
    }

    pub fn resolve(&self, registry: &Registry) -> Result<(Vec<Combatant>, Vec<Combatant>)> {
        let player = self
            .player
            .iter()
            .map(|spec| spec.to_combatant(registry))
            .collect::<Result<Vec<_>>>()?;
        let opponent = self
            .opponent
            .iter()
            .map(|spec| spec.to_combatant(registry))
            .collect::<Result<Vec<_>>>()?;
        Ok((player, opponent))
    }
}
