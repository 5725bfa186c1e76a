pub mod model;

use crate::model::RostersFile;
use anyhow::Context;
use creature_battle_core::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub rosters_path: PathBuf,
    pub seed: u64,
    /// Forces a wild battle regardless of the file's config.
    pub wild: bool,
    pub max_turns: u32,
    pub json: bool,
}

/// Outcome of one simulated battle.
#[derive(Debug, Clone, Serialize)]
pub struct BattleReport {
    pub result: BattleResult,
    pub turns: u32,
    pub lines: Vec<String>,
    pub log: serde_json::Value,
}

pub fn load_rosters(path: &Path) -> anyhow::Result<RostersFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rosters file at {}", path.display()))?;
    let parsed: RostersFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    if parsed.player.is_empty() || parsed.opponent.is_empty() {
        anyhow::bail!("Both rosters need at least one creature ({})", path.display());
    }
    Ok(parsed)
}

/// Plays a battle with random player choices until it ends or `max_turns` pass.
pub fn simulate(file: &RostersFile, seed: u64, wild: bool, max_turns: u32) -> anyhow::Result<BattleReport> {
    let registry = file.registry();
    let (player, opponent) = file.resolve(&registry)?;
    let mut config = file.config.clone();
    if wild {
        config.wild = true;
    }

    let mut battle = BattleSession::seeded(player, opponent, config, &registry, seed)?;
    let mut chooser = SmallRng::seed_from_u64(seed.wrapping_add(1));
    while !battle.result().is_terminal() && battle.turn() < max_turns {
        let actions: Vec<Action> = battle
            .legal_actions()
            .into_iter()
            .filter(|action| !matches!(action, Action::Run))
            .collect();
        let Some(&action) = actions.choose(&mut chooser) else {
            break;
        };
        battle.execute_turn(action)?;
    }
    if !battle.result().is_terminal() {
        warn!(turns = battle.turn(), "battle stopped before a result");
    }
    info!(result = ?battle.result(), turns = battle.turn(), "simulation finished");

    Ok(BattleReport {
        result: battle.result(),
        turns: battle.turn(),
        lines: battle.log().lines(),
        log: battle.log().to_json(),
    })
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if opts.max_turns == 0 {
        anyhow::bail!("--max-turns must be > 0");
    }
    let rosters = load_rosters(&opts.rosters_path)?;
    let report = simulate(&rosters, opts.seed, opts.wild, opts.max_turns)?;
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report.log)?);
    } else {
        for line in &report.lines {
            println!("{line}");
        }
        if !report.result.is_terminal() {
            println!("Battle stopped after {} turns.", report.turns);
        }
    }
    Ok(())
}
